//! 문서 디코더 -- 응답 문서를 루트 태그에 맞는 레코드로 변환
//!
//! [`DocumentDecoder`]는 [`DecoderConfig`]와 [`RecordRegistry`]를 소유하며,
//! 문서 하나를 파싱한 뒤 루트 태그로 레코드 종류를 찾아 디코딩합니다.
//! 등록되지 않은 루트 태그의 문서는 [`Decoded::Raw`]로 그대로 돌려줍니다.
//!
//! # 사용 예시
//!
//! ```
//! use qapi_objects::{Decoded, DocumentDecoderBuilder};
//!
//! let decoder = DocumentDecoderBuilder::new().build().unwrap();
//! let decoded = decoder
//!     .decode_str("<HOST><ID>8812</ID><IP>10.0.0.5</IP></HOST>")
//!     .unwrap();
//! assert!(matches!(decoded, Decoded::Record(_)));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::config::DecoderConfig;
use crate::error::ObjectError;
use crate::record::Record;
use crate::registry::{AnyRecord, RecordKind, RecordRegistry};
use crate::source::SourceNode;

/// 식별 정보로 사용할 루트 속성 (우선순위 순)
const IDENT_ATTRIBUTES: &[&str] = &["ref", "id", "name"];

/// 식별 정보로 사용할 루트 자식 요소 (우선순위 순)
const IDENT_CHILDREN: &[&str] = &["ID", "QID", "REF", "LOGIN"];

/// 문서 하나의 디코딩 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// 등록된 루트 태그의 레코드
    Record(AnyRecord),
    /// 등록되지 않은 루트 태그의 원본 트리
    Raw(SourceNode),
}

impl Decoded {
    /// 레코드 결과이면 반환합니다.
    pub fn into_record(self) -> Option<AnyRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Raw(_) => None,
        }
    }

    /// 디코딩되지 않은 문서인지 확인합니다.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

/// 응답 문서 디코더
///
/// 내부 상태는 카운터뿐이므로 `&self`로 여러 스레드에서 공유할 수 있습니다.
pub struct DocumentDecoder {
    /// 파서 제한 설정
    config: DecoderConfig,
    /// 루트 태그 레지스트리
    registry: RecordRegistry,
    /// 레코드로 디코딩된 문서 수
    decoded: AtomicU64,
    /// 원본으로 반환된 문서 수
    raw: AtomicU64,
}

impl DocumentDecoder {
    /// XML 문서를 파싱하고 디코딩합니다.
    pub fn decode_str(&self, xml: &str) -> Result<Decoded, ObjectError> {
        let root = SourceNode::parse_with(xml, &self.config)?;
        self.decode_node(root)
    }

    /// 파싱된 문서 트리를 디코딩합니다.
    ///
    /// 실패하면 루트 태그와 식별 정보를 담은 `ObjectError::InDocument`를 반환합니다.
    pub fn decode_node(&self, root: SourceNode) -> Result<Decoded, ObjectError> {
        let Some(kind) = self.registry.lookup(root.tag()) else {
            debug!(root_tag = root.tag(), "no record kind registered, returning raw document");
            self.raw.fetch_add(1, Ordering::Relaxed);
            return Ok(Decoded::Raw(root));
        };

        match kind.decode(&root) {
            Ok(record) => {
                debug!(root_tag = root.tag(), kind = kind.name(), "decoded document");
                self.decoded.fetch_add(1, Ordering::Relaxed);
                Ok(Decoded::Record(record))
            }
            Err(e) => Err(in_document(&root, e)),
        }
    }

    /// 루트가 `R`인 문서를 디코딩합니다. 레지스트리를 거치지 않습니다.
    pub fn decode_as<R: Record>(&self, xml: &str) -> Result<R, ObjectError> {
        let root = SourceNode::parse_with(xml, &self.config)?;
        if root.tag() != R::TAG {
            return Err(ObjectError::malformed(
                root.tag(),
                format!("expected <{}> root element for {}", R::TAG, R::NAME),
            ));
        }

        let record = R::decode_from(&root).map_err(|e| in_document(&root, e))?;
        self.decoded.fetch_add(1, Ordering::Relaxed);
        Ok(record)
    }

    /// 레코드로 디코딩된 문서 수를 반환합니다.
    pub fn decoded_count(&self) -> u64 {
        self.decoded.load(Ordering::Relaxed)
    }

    /// 원본으로 반환된 문서 수를 반환합니다.
    pub fn raw_count(&self) -> u64 {
        self.raw.load(Ordering::Relaxed)
    }

    /// 디코더 설정
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// 루트 태그 레지스트리
    pub fn registry(&self) -> &RecordRegistry {
        &self.registry
    }
}

fn in_document(root: &SourceNode, source: ObjectError) -> ObjectError {
    let ident = document_ident(root);
    warn!(
        root_tag = root.tag(),
        ident = ident.as_deref().unwrap_or("-"),
        error = %source,
        "failed to decode document"
    );
    ObjectError::InDocument {
        tag: root.tag().to_owned(),
        ident,
        source: Box::new(source),
    }
}

/// 루트 요소의 식별 정보 (`QID=38170` 형태)
fn document_ident(root: &SourceNode) -> Option<String> {
    for name in IDENT_ATTRIBUTES {
        if let Some(value) = root.attribute(name).filter(|v| !v.trim().is_empty()) {
            return Some(format!("{name}={}", value.trim()));
        }
    }
    IDENT_CHILDREN.iter().find_map(|tag| {
        let text = root.child(tag)?.text_content();
        let text = text.trim();
        (!text.is_empty()).then(|| format!("{tag}={text}"))
    })
}

/// [`DocumentDecoder`] 빌더
pub struct DocumentDecoderBuilder {
    config: DecoderConfig,
    registry: RecordRegistry,
}

impl DocumentDecoderBuilder {
    /// 기본 설정과 기본 레지스트리로 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: DecoderConfig::default(),
            registry: RecordRegistry::default(),
        }
    }

    /// 디코더 설정을 지정합니다.
    pub fn config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    /// 레지스트리 전체를 교체합니다.
    pub fn registry(mut self, registry: RecordRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// 루트 태그 하나를 등록하거나 덮어씁니다.
    pub fn register(mut self, tag: impl Into<String>, kind: RecordKind) -> Self {
        self.registry.register(tag, kind);
        self
    }

    /// 디코더를 빌드합니다.
    pub fn build(self) -> Result<DocumentDecoder, ObjectError> {
        self.config.validate()?;

        debug!(
            roots = self.registry.len(),
            max_depth = self.config.max_depth,
            "document decoder built"
        );

        Ok(DocumentDecoder {
            config: self.config,
            registry: self.registry,
            decoded: AtomicU64::new(0),
            raw: AtomicU64::new(0),
        })
    }
}

impl Default for DocumentDecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
