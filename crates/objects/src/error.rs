//! 객체 모델 에러 타입
//!
//! [`ObjectError`]는 문서 파싱, 레코드 디코딩, 직렬화 과정에서 발생하는 모든
//! 에러를 나타냅니다. `From<ObjectError> for QapiError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **문서 구조**: `MalformedDocument`, `XmlParse`, `DocumentTooLarge`, `DepthExceeded`
//! - **레코드 계약**: `NotImplemented`, `UnsupportedDirective`
//! - **직렬화**: `Serialization`
//! - **서비스 응답**: `Api`
//! - **설정**: `Config`
//! - **문서 식별 정보**: `InDocument`

use qapi_core::error::{ConfigError, DecodeError, QapiError};

/// 객체 모델 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// 필수 구조가 없거나 일관되지 않은 문서
    #[error("malformed document: <{tag}>: {reason}")]
    MalformedDocument {
        /// 문제가 발견된 요소 태그 (딕셔너리 입력이면 레코드 이름)
        tag: String,
        /// 실패 사유
        reason: String,
    },

    /// 레코드 타입이 정의하지 않은 기능 호출
    #[error("{capability} is not implemented for {record}")]
    NotImplemented {
        /// 레코드 타입 이름
        record: &'static str,
        /// 호출된 기능
        capability: &'static str,
    },

    /// 대상 필드와 맞지 않는 디렉티브
    #[error("unsupported directive {directive} for {record}.{field}")]
    UnsupportedDirective {
        /// 레코드 타입 이름
        record: &'static str,
        /// 대상 필드명
        field: &'static str,
        /// 디렉티브가 만든 값의 종류
        directive: &'static str,
    },

    /// 딕셔너리 형태로 표현할 수 없는 값
    #[error("serialization error: {0}")]
    Serialization(String),

    /// XML 파싱 실패
    #[error("xml parse error at byte {position}: {reason}")]
    XmlParse {
        /// 입력 내 바이트 위치
        position: usize,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 문서 크기 초과
    #[error("document too large: {size} bytes (max: {max})")]
    DocumentTooLarge {
        /// 실제 크기 (바이트)
        size: usize,
        /// 최대 허용 크기 (바이트)
        max: usize,
    },

    /// 요소 중첩 깊이 초과
    #[error("element nesting exceeds maximum depth {max}")]
    DepthExceeded {
        /// 최대 허용 깊이
        max: usize,
    },

    /// 서비스가 에러로 응답함
    #[error("api error: {code}: {text}")]
    Api {
        /// 응답 코드 (없으면 빈 문자열)
        code: String,
        /// 응답 메시지
        text: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 특정 문서를 디코딩하다 발생한 에러
    #[error("failed to decode <{tag}>{}: {source}", .ident.as_deref().map(|i| format!(" ({i})")).unwrap_or_default())]
    InDocument {
        /// 문서 루트 태그
        tag: String,
        /// 식별 속성 또는 식별 필드 값
        ident: Option<String>,
        /// 원인 에러
        #[source]
        source: Box<ObjectError>,
    },
}

impl ObjectError {
    /// 문서 식별 래퍼를 벗겨낸 근본 에러를 반환합니다.
    pub fn root_cause(&self) -> &ObjectError {
        match self {
            Self::InDocument { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn malformed(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            tag: tag.into(),
            reason: reason.into(),
        }
    }
}

impl From<ObjectError> for QapiError {
    fn from(err: ObjectError) -> Self {
        match err {
            ObjectError::MalformedDocument { .. }
            | ObjectError::XmlParse { .. }
            | ObjectError::DocumentTooLarge { .. }
            | ObjectError::DepthExceeded { .. } => {
                QapiError::Decode(DecodeError::Malformed(err.to_string()))
            }
            ObjectError::NotImplemented { .. } => {
                QapiError::Decode(DecodeError::NotImplemented(err.to_string()))
            }
            ObjectError::UnsupportedDirective { .. } => {
                QapiError::Decode(DecodeError::UnsupportedDirective(err.to_string()))
            }
            ObjectError::Serialization(msg) => QapiError::Decode(DecodeError::Serialization(msg)),
            ObjectError::Api { .. } => QapiError::Decode(DecodeError::Api(err.to_string())),
            ObjectError::Config { field, reason } => {
                QapiError::Config(ConfigError::InvalidValue { field, reason })
            }
            ObjectError::InDocument { ref source, .. } => {
                // 분류는 근본 원인을 따르고 메시지는 문서 식별 정보를 유지
                let message = err.to_string();
                match source.root_cause() {
                    ObjectError::NotImplemented { .. } => {
                        QapiError::Decode(DecodeError::NotImplemented(message))
                    }
                    ObjectError::UnsupportedDirective { .. } => {
                        QapiError::Decode(DecodeError::UnsupportedDirective(message))
                    }
                    ObjectError::Serialization(_) => {
                        QapiError::Decode(DecodeError::Serialization(message))
                    }
                    ObjectError::Api { .. } => QapiError::Decode(DecodeError::Api(message)),
                    _ => QapiError::Decode(DecodeError::Malformed(message)),
                }
            }
        }
    }
}
