//! 레코드 공통 계약
//!
//! 모든 레코드 타입은 [`Record`]를 구현합니다. 레코드는 정적 [`ParamMap`] 하나와
//! 필드별 `assign` 구현만 제공하면 소스 트리 디코딩, 딕셔너리 변환, 텍스트 표현을
//! 공통 기본 구현으로 얻습니다.
//!
//! # 구현 예시
//!
//! ```ignore
//! impl Record for Host {
//!     type Field = HostField;
//!     const NAME: &'static str = "Host";
//!     const TAG: &'static str = "HOST";
//!
//!     fn param_map() -> &'static ParamMap<HostField> { &HOST_MAP }
//!     fn assign(&mut self, field: HostField, value: FieldValue) -> Result<(), ObjectError> { ... }
//!     fn key(&self) -> Result<String, ObjectError> { Ok(self.id.clone()) }
//! }
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ObjectError;
use crate::populate::populate;
use crate::schema::{FieldName, FieldValue, ParamMap};
use crate::source::SourceNode;

/// 레코드의 딕셔너리 형태
pub type Payload = serde_json::Map<String, Value>;

/// 레코드 공통 계약
pub trait Record:
    Sized + Serialize + DeserializeOwned + PartialEq + Debug + Default + Clone + Send + Sync + 'static
{
    /// 필드 식별자
    type Field: FieldName + Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// 레코드 타입 이름
    const NAME: &'static str;

    /// 문서에서 이 레코드를 나타내는 대표 태그
    const TAG: &'static str;

    /// 이 레코드의 파라미터 맵
    fn param_map() -> &'static ParamMap<Self::Field>;

    /// 디렉티브가 만든 값을 필드에 기록합니다.
    ///
    /// 목록 필드는 값을 기존 목록 뒤에 추가합니다.
    fn assign(&mut self, field: Self::Field, value: FieldValue) -> Result<(), ObjectError>;

    /// 스키마 적용 후 호출됩니다.
    ///
    /// 속성 값, 요소 자체의 텍스트, 필수 필드 검사처럼 스키마로 표현되지 않는
    /// 부분을 처리합니다.
    fn finish(&mut self, _source: &SourceNode) -> Result<(), ObjectError> {
        Ok(())
    }

    /// 소스 요소에서 레코드를 디코딩합니다.
    fn decode_from(source: &SourceNode) -> Result<Self, ObjectError> {
        let mut record = Self::default();
        populate(&mut record, source, Self::param_map())?;
        record.finish(source)?;
        Ok(record)
    }

    /// 딕셔너리에서 레코드를 생성합니다. 스키마를 거치지 않습니다.
    fn from_payload(payload: &Payload) -> Result<Self, ObjectError> {
        serde_json::from_value(Value::Object(payload.clone()))
            .map_err(|e| ObjectError::malformed(Self::NAME, e.to_string()))
    }

    /// 레코드 식별 키
    fn key(&self) -> Result<String, ObjectError> {
        Err(ObjectError::NotImplemented {
            record: Self::NAME,
            capability: "key",
        })
    }

    /// 딕셔너리 형태로 변환합니다.
    fn to_dict(&self) -> Result<Payload, ObjectError> {
        match serde_json::to_value(self).map_err(|e| ObjectError::Serialization(e.to_string()))? {
            Value::Object(map) => Ok(map),
            other => Err(ObjectError::Serialization(format!(
                "{} serialized to a non-object value: {other}",
                Self::NAME
            ))),
        }
    }

    /// JSON 텍스트 표현
    fn to_json(&self) -> Result<String, ObjectError> {
        serde_json::to_string(self).map_err(|e| ObjectError::Serialization(e.to_string()))
    }
}

/// 필수 식별 필드가 비어 있으면 `MalformedDocument`를 반환합니다.
pub(crate) fn require(tag: &str, field: &str, value: &str) -> Result<(), ObjectError> {
    if value.trim().is_empty() {
        return Err(ObjectError::malformed(
            tag,
            format!("missing required {field}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::knowledge_base::Cvss;

    #[test]
    fn require_rejects_blank() {
        assert!(require("VULN", "QID", "38170").is_ok());
        let err = require("VULN", "QID", "  ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed document: <VULN>: missing required QID"
        );
    }

    #[test]
    fn key_defaults_to_not_implemented() {
        let err = Cvss::default().key().unwrap_err();
        assert!(matches!(
            err,
            ObjectError::NotImplemented {
                record: "Cvss",
                capability: "key"
            }
        ));
    }

    #[test]
    fn to_dict_produces_object() {
        let dict = Cvss::default().to_dict().unwrap();
        assert!(dict.contains_key("base"));
    }

    #[test]
    fn from_payload_reports_record_name() {
        let mut payload = Payload::new();
        payload.insert("base".to_owned(), Value::from(5));
        let err = Cvss::from_payload(&payload).unwrap_err();
        assert!(err.to_string().contains("<Cvss>"));
    }
}
