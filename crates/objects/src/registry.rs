//! 레코드 종류와 루트 태그 레지스트리
//!
//! [`RecordKind`]는 디렉티브가 가리킬 수 있는 모든 레코드 타입의 닫힌 집합이고,
//! [`AnyRecord`]는 디코딩된 레코드를 종류와 함께 담습니다.
//! [`RecordRegistry`]는 문서 루트 태그로 최상위 레코드 종류를 찾습니다.
//!
//! # 확장
//!
//! 새 레코드 타입은 [`Record`]를 구현한 뒤 아래 `record_kinds!` 목록에 추가하고,
//! 최상위 문서라면 [`RecordRegistry::register`]로 루트 태그를 연결합니다.

use std::collections::HashMap;

use crate::error::ObjectError;
use crate::record::{Payload, Record};
use crate::records::asset::{AssetGroup, Host};
use crate::records::common::TextValue;
use crate::records::knowledge_base::{
    Bugtraq, Compliance, Cve, Cvss, CvssAccess, CvssImpact, Exploit, ExploitSource, Malware,
    MalwareSource, VulnSoftware, VulnVendor, Vulnerability,
};
use crate::records::map::{Map, OptionProfile};
use crate::records::report::{QualysUser, Report, ReportStatus, ReportTemplate};
use crate::records::response::{ResponseItem, SimpleReturnResponse};
use crate::records::scan::{Scan, ScanStatus};
use crate::source::SourceNode;

macro_rules! record_kinds {
    ($($kind:ident),+ $(,)?) => {
        /// 디코딩 가능한 레코드 종류
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RecordKind {
            $(
                #[doc = concat!("[`", stringify!($kind), "`]")]
                $kind,
            )+
        }

        impl RecordKind {
            /// 모든 종류
            pub const ALL: &'static [RecordKind] = &[$(RecordKind::$kind),+];

            /// 레코드 타입 이름
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$kind => <$kind as Record>::NAME,)+
                }
            }

            /// 대표 태그
            pub fn tag(self) -> &'static str {
                match self {
                    $(Self::$kind => <$kind as Record>::TAG,)+
                }
            }

            /// 소스 요소에서 이 종류의 레코드를 디코딩합니다.
            pub fn decode(self, source: &SourceNode) -> Result<AnyRecord, ObjectError> {
                match self {
                    $(Self::$kind => $kind::decode_from(source).map(AnyRecord::from),)+
                }
            }

            /// 딕셔너리에서 이 종류의 레코드를 생성합니다.
            pub fn from_payload(self, payload: &Payload) -> Result<AnyRecord, ObjectError> {
                match self {
                    $(Self::$kind => $kind::from_payload(payload).map(AnyRecord::from),)+
                }
            }
        }

        /// 종류 정보를 가진 디코딩된 레코드
        ///
        /// 두 값은 종류가 같고 필드가 모두 같을 때만 같습니다.
        #[derive(Debug, Clone, PartialEq)]
        pub enum AnyRecord {
            $(
                #[doc = concat!("[`", stringify!($kind), "`]")]
                $kind(Box<$kind>),
            )+
        }

        impl AnyRecord {
            /// 레코드 종류
            pub fn kind(&self) -> RecordKind {
                match self {
                    $(Self::$kind(_) => RecordKind::$kind,)+
                }
            }

            /// 레코드 식별 키
            pub fn key(&self) -> Result<String, ObjectError> {
                match self {
                    $(Self::$kind(record) => record.key(),)+
                }
            }

            /// 딕셔너리 형태로 변환합니다.
            pub fn to_dict(&self) -> Result<Payload, ObjectError> {
                match self {
                    $(Self::$kind(record) => record.to_dict(),)+
                }
            }

            /// JSON 텍스트 표현
            pub fn to_json(&self) -> Result<String, ObjectError> {
                match self {
                    $(Self::$kind(record) => record.to_json(),)+
                }
            }
        }

        $(
            impl From<$kind> for AnyRecord {
                fn from(record: $kind) -> Self {
                    Self::$kind(Box::new(record))
                }
            }

            impl TryFrom<AnyRecord> for $kind {
                type Error = AnyRecord;

                fn try_from(record: AnyRecord) -> Result<Self, Self::Error> {
                    match record {
                        AnyRecord::$kind(inner) => Ok(*inner),
                        other => Err(other),
                    }
                }
            }
        )+
    };
}

record_kinds! {
    TextValue,
    Vulnerability,
    Cvss,
    CvssAccess,
    CvssImpact,
    Cve,
    Bugtraq,
    VulnSoftware,
    VulnVendor,
    Compliance,
    ExploitSource,
    Exploit,
    MalwareSource,
    Malware,
    Map,
    OptionProfile,
    Report,
    ReportStatus,
    ReportTemplate,
    QualysUser,
    Scan,
    ScanStatus,
    Host,
    AssetGroup,
    SimpleReturnResponse,
    ResponseItem,
}

/// 기본 등록되는 최상위 문서 태그
const DEFAULT_ROOTS: &[(&str, RecordKind)] = &[
    ("VULN", RecordKind::Vulnerability),
    ("MAP_REPORT", RecordKind::Map),
    ("REPORT_TEMPLATE", RecordKind::ReportTemplate),
    ("RESPONSE", RecordKind::SimpleReturnResponse),
    ("HOST", RecordKind::Host),
    ("ASSET_GROUP", RecordKind::AssetGroup),
    ("REPORT", RecordKind::Report),
    ("SCAN", RecordKind::Scan),
    ("USER", RecordKind::QualysUser),
];

/// 루트 태그에서 레코드 종류로의 매핑
#[derive(Debug, Clone)]
pub struct RecordRegistry {
    by_tag: HashMap<String, RecordKind>,
}

impl RecordRegistry {
    /// 아무 태그도 등록되지 않은 레지스트리를 생성합니다.
    pub fn empty() -> Self {
        Self {
            by_tag: HashMap::new(),
        }
    }

    /// 루트 태그를 등록합니다. 이전에 등록된 종류가 있으면 반환합니다.
    pub fn register(&mut self, tag: impl Into<String>, kind: RecordKind) -> Option<RecordKind> {
        self.by_tag.insert(tag.into(), kind)
    }

    /// 루트 태그에 등록된 레코드 종류
    pub fn lookup(&self, tag: &str) -> Option<RecordKind> {
        self.by_tag.get(tag).copied()
    }

    /// 등록된 태그 목록 (정렬됨)
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.by_tag.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// 등록된 태그 수
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// 등록된 태그가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

impl Default for RecordRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for (tag, kind) in DEFAULT_ROOTS {
            registry.register(*tag, *kind);
        }
        registry
    }
}
