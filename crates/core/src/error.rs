//! 에러 타입 -- 도메인별 에러 정의

/// qapi 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum QapiError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 응답 문서 디코딩 에러
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 응답 문서 디코딩 에러
///
/// 객체 모델 크레이트의 세부 에러는 이 분류 중 하나로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// 필수 구조가 없거나 구조가 일관되지 않은 문서
    #[error("malformed document: {0}")]
    Malformed(String),

    /// 레코드 타입이 정의하지 않은 기능 호출
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// 필드와 맞지 않는 디렉티브
    #[error("unsupported directive: {0}")]
    UnsupportedDirective(String),

    /// 딕셔너리 형태로 표현할 수 없는 값
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// 서비스가 돌려준 API 에러 응답
    #[error("api error: {0}")]
    Api(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_top_level() {
        let err: QapiError = ConfigError::ParseFailed {
            reason: "bad toml".to_owned(),
        }
        .into();
        assert!(matches!(err, QapiError::Config(ConfigError::ParseFailed { .. })));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn decode_error_display() {
        let err: QapiError = DecodeError::Malformed("VULN: missing QID".to_owned()).into();
        let msg = err.to_string();
        assert!(msg.starts_with("decode error"));
        assert!(msg.contains("missing QID"));
    }

    #[test]
    fn io_error_converts_into_top_level() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: QapiError = io_err.into();
        assert!(matches!(err, QapiError::Io(_)));
    }
}
