//! 명령 응답 레코드
//!
//! 조회가 아닌 명령(스캔 시작, 그룹 편집 등)에 대한 서비스 응답입니다.
//! `ITEM_LIST`의 키/값 쌍은 문서 순서대로 보존합니다.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ObjectError;
use crate::record::Record;
use crate::registry::RecordKind;
use crate::schema::{record_fields, FieldValue, ParamMap};

/// 요청 파라미터 누락을 뜻하는 응답 문구
const MISSING_PARAMETER_TEXT: &str = "Missing required parameter";

record_fields! {
    /// [`SimpleReturnResponse`] 필드
    pub enum SimpleReturnResponseField {
        Datetime => "datetime",
        Code => "code",
        Text => "text",
        Items => "items",
    }
}

/// 명령 응답
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleReturnResponse {
    pub datetime: String,
    pub code: String,
    pub text: String,
    pub items: Vec<ResponseItem>,
}

static SIMPLE_RETURN_RESPONSE_MAP: LazyLock<ParamMap<SimpleReturnResponseField>> =
    LazyLock::new(|| {
        use SimpleReturnResponseField as F;

        ParamMap::new()
            .scalar("DATETIME", F::Datetime)
            .scalar("CODE", F::Code)
            .scalar("TEXT", F::Text)
            .group(
                "ITEM_LIST",
                ParamMap::new().inline("ITEM", F::Items, RecordKind::ResponseItem),
            )
    });

impl Record for SimpleReturnResponse {
    type Field = SimpleReturnResponseField;
    const NAME: &'static str = "SimpleReturnResponse";
    const TAG: &'static str = "RESPONSE";

    fn param_map() -> &'static ParamMap<SimpleReturnResponseField> {
        &SIMPLE_RETURN_RESPONSE_MAP
    }

    fn assign(
        &mut self,
        field: SimpleReturnResponseField,
        value: FieldValue,
    ) -> Result<(), ObjectError> {
        use SimpleReturnResponseField as F;

        match field {
            F::Datetime => self.datetime = value.into_text::<Self>(field)?,
            F::Code => self.code = value.into_text::<Self>(field)?,
            F::Text => self.text = value.into_text::<Self>(field)?,
            F::Items => self
                .items
                .extend(value.into_records::<Self, ResponseItem>(field)?),
        }
        Ok(())
    }
}

impl SimpleReturnResponse {
    /// 키가 응답 항목에 있는지 확인합니다.
    pub fn has_item(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key == key)
    }

    /// 키에 해당하는 첫 번째 항목 값
    pub fn item_value(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value.as_str())
    }

    /// 항목 키 목록 (문서 순서)
    pub fn item_keys(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.key.as_str()).collect()
    }

    /// 요청이 성공했는지 확인합니다.
    pub fn was_successful(&self) -> bool {
        !self.text.contains(MISSING_PARAMETER_TEXT)
    }

    /// 실패 응답이면 `ObjectError::Api`를 반환합니다.
    pub fn raise_api_error(&self) -> Result<(), ObjectError> {
        if self.was_successful() {
            return Ok(());
        }
        debug!(code = %self.code, text = %self.text, "api reported failure");
        Err(ObjectError::Api {
            code: self.code.clone(),
            text: self.text.clone(),
        })
    }
}

record_fields! {
    /// [`ResponseItem`] 필드
    pub enum ResponseItemField {
        Key => "key",
        Value => "value",
    }
}

/// 응답 키/값 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseItem {
    pub key: String,
    pub value: String,
}

static RESPONSE_ITEM_MAP: LazyLock<ParamMap<ResponseItemField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("KEY", ResponseItemField::Key)
        .scalar("VALUE", ResponseItemField::Value)
});

impl Record for ResponseItem {
    type Field = ResponseItemField;
    const NAME: &'static str = "ResponseItem";
    const TAG: &'static str = "ITEM";

    fn param_map() -> &'static ParamMap<ResponseItemField> {
        &RESPONSE_ITEM_MAP
    }

    fn assign(&mut self, field: ResponseItemField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            ResponseItemField::Key => self.key = value.into_text::<Self>(field)?,
            ResponseItemField::Value => self.value = value.into_text::<Self>(field)?,
        }
        Ok(())
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceNode;

    fn item(key: &str, value: &str) -> SourceNode {
        SourceNode::new("ITEM")
            .with_text_child("KEY", key)
            .with_text_child("VALUE", value)
    }

    fn response(text: &str) -> SourceNode {
        SourceNode::new("RESPONSE")
            .with_text_child("DATETIME", "2024-06-01T12:00:00Z")
            .with_text_child("TEXT", text)
            .with_child(
                SourceNode::new("ITEM_LIST")
                    .with_child(item("ID", "12345"))
                    .with_child(item("REFERENCE", "scan/1.2")),
            )
    }

    #[test]
    fn decodes_items_in_order() {
        let resp = SimpleReturnResponse::decode_from(&response("New scan launched")).unwrap();
        assert_eq!(resp.item_keys(), vec!["ID", "REFERENCE"]);
        assert!(resp.has_item("ID"));
        assert!(!resp.has_item("MISSING"));
        assert_eq!(resp.item_value("REFERENCE"), Some("scan/1.2"));
        assert_eq!(resp.item_value("MISSING"), None);
    }

    #[test]
    fn successful_response() {
        let resp = SimpleReturnResponse::decode_from(&response("New scan launched")).unwrap();
        assert!(resp.was_successful());
        assert!(resp.raise_api_error().is_ok());
    }

    #[test]
    fn missing_parameter_is_api_error() {
        let source = response("Missing required parameter: scan_title").with_text_child("CODE", "1903");
        let resp = SimpleReturnResponse::decode_from(&source).unwrap();
        assert!(!resp.was_successful());
        match resp.raise_api_error() {
            Err(ObjectError::Api { code, text }) => {
                assert_eq!(code, "1903");
                assert!(text.starts_with("Missing required parameter"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn response_has_no_required_fields() {
        let resp = SimpleReturnResponse::decode_from(&SourceNode::new("RESPONSE")).unwrap();
        assert!(resp.items.is_empty());
        assert!(matches!(resp.key(), Err(ObjectError::NotImplemented { .. })));
    }
}
