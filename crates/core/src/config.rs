//! 설정 관리 -- qapi.toml 파싱 및 런타임 설정
//!
//! [`QapiConfig`]는 로깅과 디코더 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`QAPI_DECODER_MAX_DEPTH=64` 형식)
//! 2. 설정 파일 (`qapi.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), qapi_core::error::QapiError> {
//! use qapi_core::config::QapiConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = QapiConfig::load("qapi.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = QapiConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, QapiError};

/// 디코딩 가능한 응답 문서의 최대 크기 상한 (256 MB)
const MAX_DOCUMENT_SIZE_LIMIT: usize = 256 * 1024 * 1024;

/// 요소 중첩 깊이 상한
const MAX_DEPTH_LIMIT: usize = 1024;

/// qapi 통합 설정
///
/// `qapi.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QapiConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 문서 디코더 설정
    #[serde(default)]
    pub decoder: DecoderSection,
}

impl QapiConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, QapiError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, QapiError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                QapiError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                QapiError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, QapiError> {
        toml::from_str(toml_str).map_err(|e| {
            QapiError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `QAPI_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_parsed(&mut self.general.log_level, "QAPI_GENERAL_LOG_LEVEL");
        override_parsed(&mut self.general.log_format, "QAPI_GENERAL_LOG_FORMAT");

        override_parsed(
            &mut self.decoder.max_document_size,
            "QAPI_DECODER_MAX_DOCUMENT_SIZE",
        );
        override_parsed(&mut self.decoder.max_depth, "QAPI_DECODER_MAX_DEPTH");
        override_parsed(&mut self.decoder.trim_text, "QAPI_DECODER_TRIM_TEXT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), QapiError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.decoder.max_document_size == 0
            || self.decoder.max_document_size > MAX_DOCUMENT_SIZE_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "decoder.max_document_size".to_owned(),
                reason: format!("must be 1-{MAX_DOCUMENT_SIZE_LIMIT}"),
            }
            .into());
        }

        if self.decoder.max_depth == 0 || self.decoder.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "decoder.max_depth".to_owned(),
                reason: format!("must be 1-{MAX_DEPTH_LIMIT}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 문서 디코더 설정
///
/// `qapi-objects`의 `DecoderConfig`가 이 섹션에서 파생됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSection {
    /// 응답 문서 최대 크기 (바이트)
    pub max_document_size: usize,
    /// 요소 최대 중첩 깊이
    pub max_depth: usize,
    /// 텍스트 노드 앞뒤 공백 제거 여부
    pub trim_text: bool,
}

impl Default for DecoderSection {
    fn default() -> Self {
        Self {
            max_document_size: 32 * 1024 * 1024, // 32 MB
            max_depth: 128,
            trim_text: true,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

/// 환경변수 값을 `T`로 해석해 덮어씁니다. 해석에 실패하면 기존 값을 유지합니다.
fn override_parsed<T>(target: &mut T, env_key: &str)
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(val) = std::env::var(env_key) else {
        return;
    };
    match val.parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(e) => warn!(
            env_key,
            value = val.as_str(),
            error = %e,
            "ignoring unparsable env override"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = QapiConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.decoder.max_depth, 128);
        assert!(config.decoder.trim_text);
    }

    #[test]
    fn default_config_passes_validation() {
        let config = QapiConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = QapiConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.decoder.max_document_size, 32 * 1024 * 1024);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[decoder]
max_depth = 32
"#;
        let config = QapiConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.decoder.max_depth, 32);
        assert!(config.decoder.trim_text);
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = QapiConfig::parse("invalid = [[[toml");
        assert!(matches!(
            result,
            Err(QapiError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = QapiConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = QapiConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_document_size() {
        let mut config = QapiConfig::default();
        config.decoder.max_document_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_document_size"));
    }

    #[test]
    fn validate_rejects_excessive_depth() {
        let mut config = QapiConfig::default();
        config.decoder.max_depth = MAX_DEPTH_LIMIT + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_depth"));
    }

    #[test]
    #[serial]
    fn env_override_parsed() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_QAPI_STR", "overridden") };
        override_parsed(&mut val, "TEST_QAPI_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_QAPI_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_QAPI_BOOL_BAD", "not-a-bool") };
        override_parsed(&mut val, "TEST_QAPI_BOOL_BAD");
        assert!(val); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_QAPI_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_usize_valid() {
        let mut val = 10usize;
        // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_QAPI_USIZE", "42") };
        override_parsed(&mut val, "TEST_QAPI_USIZE");
        assert_eq!(val, 42);
        unsafe { std::env::remove_var("TEST_QAPI_USIZE") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_parsed(&mut val, "TEST_QAPI_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = QapiConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = QapiConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.decoder.max_depth, parsed.decoder.max_depth);
        assert_eq!(
            config.decoder.max_document_size,
            parsed.decoder.max_document_size
        );
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = QapiConfig::from_file("/nonexistent/path/qapi.toml").await;
        assert!(matches!(
            result,
            Err(QapiError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
