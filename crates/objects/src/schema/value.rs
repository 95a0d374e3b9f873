//! 디렉티브가 생성하는 값과 레코드 필드 식별자

use crate::error::ObjectError;
use crate::record::Record;
use crate::records::common::TextValue;
use crate::registry::AnyRecord;

/// 레코드 필드 식별자
///
/// 에러 메시지에 필드명을 담기 위해 사용합니다.
pub trait FieldName {
    /// 직렬화 형태와 같은 필드명
    fn name(self) -> &'static str;
}

/// 레코드 필드 열거형과 [`FieldName`] 구현을 함께 선언합니다.
macro_rules! record_fields {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $field:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = concat!("`", $field, "`")]
                $variant,
            )+
        }

        impl $crate::schema::FieldName for $name {
            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $field,)+
                }
            }
        }
    };
}

pub(crate) use record_fields;

/// 디렉티브 하나를 적용한 결과
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `Scalar`
    Text(String),
    /// `InvertedBoolean`
    Flag(bool),
    /// `NestedObject`
    Record(AnyRecord),
    /// `NestedListInline` / `NestedListQuery`
    Records(Vec<AnyRecord>),
}

impl FieldValue {
    /// 값 종류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
            Self::Record(_) => "record",
            Self::Records(_) => "records",
        }
    }

    /// 문자열 필드 값으로 변환합니다.
    pub fn into_text<R: Record>(self, field: R::Field) -> Result<String, ObjectError> {
        match self {
            Self::Text(text) => Ok(text),
            other => Err(unsupported::<R>(field, other.kind())),
        }
    }

    /// 불리언 필드 값으로 변환합니다.
    pub fn into_flag<R: Record>(self, field: R::Field) -> Result<bool, ObjectError> {
        match self {
            Self::Flag(flag) => Ok(flag),
            other => Err(unsupported::<R>(field, other.kind())),
        }
    }

    /// 중첩 레코드 필드 값으로 변환합니다.
    ///
    /// 레코드 종류가 필드 타입과 다르면 `UnsupportedDirective`입니다.
    pub fn into_record<R, T>(self, field: R::Field) -> Result<T, ObjectError>
    where
        R: Record,
        T: TryFrom<AnyRecord, Error = AnyRecord>,
    {
        match self {
            Self::Record(record) => {
                T::try_from(record).map_err(|_| unsupported::<R>(field, "record"))
            }
            other => Err(unsupported::<R>(field, other.kind())),
        }
    }

    /// 목록 필드에 추가할 레코드들로 변환합니다.
    pub fn into_records<R, T>(self, field: R::Field) -> Result<Vec<T>, ObjectError>
    where
        R: Record,
        T: TryFrom<AnyRecord, Error = AnyRecord>,
    {
        match self {
            Self::Records(records) => records
                .into_iter()
                .map(|record| T::try_from(record).map_err(|_| unsupported::<R>(field, "records")))
                .collect(),
            other => Err(unsupported::<R>(field, other.kind())),
        }
    }

    /// [`TextValue`] 목록을 문자열 목록으로 변환합니다.
    pub fn into_text_list<R: Record>(self, field: R::Field) -> Result<Vec<String>, ObjectError> {
        Ok(self
            .into_records::<R, TextValue>(field)?
            .into_iter()
            .map(|item| item.value)
            .collect())
    }
}

fn unsupported<R: Record>(field: R::Field, directive: &'static str) -> ObjectError {
    ObjectError::UnsupportedDirective {
        record: R::NAME,
        field: field.name(),
        directive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::knowledge_base::{Cve, Vulnerability, VulnerabilityField};

    #[test]
    fn text_value_converts() {
        let value = FieldValue::Text("38170".to_owned());
        assert_eq!(
            value.into_text::<Vulnerability>(VulnerabilityField::Qid).unwrap(),
            "38170"
        );
    }

    #[test]
    fn shape_mismatch_is_unsupported_directive() {
        let err = FieldValue::Flag(true)
            .into_text::<Vulnerability>(VulnerabilityField::Title)
            .unwrap_err();
        match err {
            ObjectError::UnsupportedDirective {
                record,
                field,
                directive,
            } => {
                assert_eq!(record, "Vulnerability");
                assert_eq!(field, "title");
                assert_eq!(directive, "flag");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_record_kind_is_unsupported_directive() {
        let value = FieldValue::Record(AnyRecord::from(TextValue {
            value: "x".to_owned(),
        }));
        let err = value
            .into_record::<Vulnerability, Cve>(VulnerabilityField::Cves)
            .unwrap_err();
        assert!(matches!(err, ObjectError::UnsupportedDirective { .. }));
    }

    #[test]
    fn records_convert_in_order() {
        let value = FieldValue::Records(vec![
            AnyRecord::from(TextValue {
                value: "Windows".to_owned(),
            }),
            AnyRecord::from(TextValue {
                value: "Unix".to_owned(),
            }),
        ]);
        let list = value
            .into_text_list::<Vulnerability>(VulnerabilityField::AuthTypes)
            .unwrap();
        assert_eq!(list, vec!["Windows", "Unix"]);
    }
}
