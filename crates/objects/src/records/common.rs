//! 여러 레코드 군이 공유하는 타입과 헬퍼

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::record::Record;
use crate::schema::{record_fields, FieldValue, ParamMap};
use crate::source::SourceNode;

record_fields! {
    /// [`TextValue`] 필드
    pub enum TextValueField {
        Value => "value",
    }
}

/// 요소 자체의 텍스트 하나
///
/// `<AUTH_TYPE>Windows</AUTH_TYPE>` 같은 반복 요소를 문자열 목록으로 모을 때 씁니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    pub value: String,
}

static TEXT_VALUE_MAP: LazyLock<ParamMap<TextValueField>> = LazyLock::new(ParamMap::new);

impl Record for TextValue {
    type Field = TextValueField;
    const NAME: &'static str = "TextValue";
    const TAG: &'static str = "VALUE";

    fn param_map() -> &'static ParamMap<TextValueField> {
        &TEXT_VALUE_MAP
    }

    fn assign(&mut self, field: TextValueField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            TextValueField::Value => self.value = value.into_text::<Self>(field)?,
        }
        Ok(())
    }

    /// 값은 자식이 아니라 요소 자신의 텍스트에서 옵니다.
    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        let text = source.text().unwrap_or_default().to_owned();
        self.assign(TextValueField::Value, FieldValue::Text(text))
    }
}

/// 서비스 응답의 날짜/시간 문자열을 UTC 시각으로 해석합니다.
///
/// `2024-01-31T08:15:00Z`, RFC 3339 오프셋 표기, `2024-01-31 08:15:00`을 받습니다.
/// 빈 문자열이나 해석할 수 없는 값은 `None`입니다.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

/// 인버티드 불리언 필드의 serde 기본값
pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn text_value_rejects_non_text_assignment() {
        let err = TextValue::default()
            .assign(TextValueField::Value, FieldValue::Flag(true))
            .unwrap_err();
        assert!(matches!(
            err,
            ObjectError::UnsupportedDirective { record: "TextValue", field: "value", .. }
        ));
    }

    #[test]
    fn text_value_reads_own_text() {
        let node = SourceNode::new("AUTH_TYPE").with_text("Windows");
        let value = TextValue::decode_from(&node).unwrap();
        assert_eq!(value.value, "Windows");
    }

    #[test]
    fn text_value_ignores_children() {
        let node = SourceNode::new("IP").with_child(SourceNode::new("X").with_text("nested"));
        assert_eq!(TextValue::decode_from(&node).unwrap().value, "");
    }

    #[test]
    fn parses_zulu_timestamp() {
        let parsed = parse_datetime("2024-01-31T08:15:00Z").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.day(), 31);
        assert_eq!(parsed.hour(), 8);
    }

    #[test]
    fn parses_offset_timestamp_as_utc() {
        let parsed = parse_datetime("2024-01-31T09:15:00+01:00").unwrap();
        assert_eq!(parsed.hour(), 8);
    }

    #[test]
    fn parses_space_separated_timestamp() {
        let parsed = parse_datetime("2023-12-01 23:59:59").unwrap();
        assert_eq!(parsed.month(), 12);
        assert_eq!(parsed.second(), 59);
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("   ").is_none());
        assert!(parse_datetime("yesterday").is_none());
    }
}
