//! 디코더 설정
//!
//! [`DecoderConfig`]는 core의 [`DecoderSection`](qapi_core::config::DecoderSection)에서
//! 파생되며 문서 파싱 제한(최대 크기, 최대 중첩 깊이)과 텍스트 공백 처리를 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use qapi_objects::{DecoderConfig, DecoderConfigBuilder};
//!
//! let config = DecoderConfig::default();
//! config.validate().unwrap();
//!
//! let config = DecoderConfigBuilder::new()
//!     .max_depth(32)
//!     .trim_text(false)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_depth, 32);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ObjectError;

/// 디코더 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// 문서 최대 크기 (바이트)
    pub max_document_size: usize,
    /// 요소 최대 중첩 깊이 (루트 = 1)
    pub max_depth: usize,
    /// 텍스트 앞뒤 공백 제거 여부
    pub trim_text: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_document_size: 32 * 1024 * 1024, // 32 MB
            max_depth: 128,
            trim_text: true,
        }
    }
}

/// 설정 상한값 상수
const MAX_DOCUMENT_SIZE_LIMIT: usize = 256 * 1024 * 1024; // 256 MB
const MAX_DEPTH_LIMIT: usize = 1024;

impl DecoderConfig {
    /// core의 `DecoderSection`에서 디코더 설정을 생성합니다.
    pub fn from_core(core: &qapi_core::config::DecoderSection) -> Self {
        Self {
            max_document_size: core.max_document_size,
            max_depth: core.max_depth,
            trim_text: core.trim_text,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_document_size`: 1-268435456 (256MB)
    /// - `max_depth`: 1-1024
    pub fn validate(&self) -> Result<(), ObjectError> {
        if self.max_document_size == 0 || self.max_document_size > MAX_DOCUMENT_SIZE_LIMIT {
            return Err(ObjectError::Config {
                field: "max_document_size".to_owned(),
                reason: format!("must be 1-{MAX_DOCUMENT_SIZE_LIMIT}"),
            });
        }

        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ObjectError::Config {
                field: "max_depth".to_owned(),
                reason: format!("must be 1-{MAX_DEPTH_LIMIT}"),
            });
        }

        Ok(())
    }
}

/// [`DecoderConfig`] 빌더
///
/// 빌드 시 유효성 검증을 수행합니다.
#[derive(Default)]
pub struct DecoderConfigBuilder {
    config: DecoderConfig,
}

impl DecoderConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 문서 최대 크기를 설정합니다.
    pub fn max_document_size(mut self, size: usize) -> Self {
        self.config.max_document_size = size;
        self
    }

    /// 최대 중첩 깊이를 설정합니다.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// 텍스트 공백 제거 여부를 설정합니다.
    pub fn trim_text(mut self, trim: bool) -> Self {
        self.config.trim_text = trim;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    pub fn build(self) -> Result<DecoderConfig, ObjectError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
