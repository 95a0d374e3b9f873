//! qapi 공통 기반 크레이트
//!
//! 객체 모델 크레이트와 이를 사용하는 애플리케이션이 공유하는
//! 에러 분류, 설정, 로깅 초기화를 제공합니다.

pub mod config;
pub mod error;
pub mod logging;

// 에러
pub use error::{ConfigError, DecodeError, QapiError};

// 설정
pub use config::{DecoderSection, GeneralConfig, QapiConfig};

// 로깅
pub use logging::init_tracing;
