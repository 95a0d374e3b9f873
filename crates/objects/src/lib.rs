//! qapi 객체 모델 -- 취약점 관리 서비스 응답 문서를 타입 있는 레코드로 디코딩
//!
//! 각 레코드 타입은 소스 태그와 대상 필드, 디렉티브를 연결하는 선언적
//! 파라미터 맵을 가지며, 공용 populate 엔진이 이 맵을 따라 문서 트리를
//! 재귀적으로 레코드에 채웁니다.
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 타입 (`ObjectError`)
//! - [`config`]: 디코더 설정 (`DecoderConfig`, 빌더)
//! - [`source`]: 소스 트리 (`SourceNode`, `NodePath`, XML 읽기)
//! - [`schema`]: 디렉티브와 파라미터 맵 (`Directive`, `ParamMap`, `FieldValue`)
//! - [`populate`]: populate 엔진
//! - [`record`]: 레코드 공통 계약 (`Record`, `Payload`)
//! - [`registry`]: 레코드 종류와 루트 태그 레지스트리 (`RecordKind`, `AnyRecord`, `RecordRegistry`)
//! - [`records`]: 레코드 타입 군
//! - [`decoder`]: 문서 디코더 (`DocumentDecoder`, `DocumentDecoderBuilder`)
//!
//! # Architecture
//!
//! ```text
//! xml --> SourceNode::parse --> RecordRegistry::lookup(root tag)
//!                                      |
//!                      +---------------+---------------+
//!                      |                               |
//!               RecordKind::decode               Decoded::Raw
//!                      |
//!        populate(record, node, ParamMap)
//!                      |
//!         nested RecordKind::decode ...
//!                      |
//!               Decoded::Record(AnyRecord)
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod populate;
pub mod record;
pub mod records;
pub mod registry;
pub mod schema;
pub mod source;

// --- Public API Re-exports ---

// Decoder
pub use decoder::{Decoded, DocumentDecoder, DocumentDecoderBuilder};

// Configuration
pub use config::{DecoderConfig, DecoderConfigBuilder};

// Error
pub use error::ObjectError;

// Engine
pub use populate::populate;
pub use record::{Payload, Record};
pub use registry::{AnyRecord, RecordKind, RecordRegistry};
pub use schema::{Directive, FieldName, FieldValue, ParamMap};
pub use source::{NodePath, SourceNode};

// Records
pub use records::asset::{AssetGroup, Host};
pub use records::common::{TextValue, parse_datetime};
pub use records::knowledge_base::{
    Bugtraq, Compliance, Cve, Cvss, CvssAccess, CvssImpact, Exploit, ExploitSource, Malware,
    MalwareSource, VulnSoftware, VulnVendor, Vulnerability,
};
pub use records::map::{Map, OptionProfile};
pub use records::report::{QualysUser, Report, ReportStatus, ReportTemplate};
pub use records::response::{ResponseItem, SimpleReturnResponse};
pub use records::scan::{Scan, ScanStatus};
