//! 선언적 스키마 -- 소스 태그와 레코드 필드의 대응 관계
//!
//! 레코드 타입마다 하나의 [`ParamMap`]을 정적으로 선언합니다. 각 항목은 자식 요소
//! 태그 하나를 [`Directive`]에 연결하고, 디렉티브는 그 요소를 어떤 방식으로
//! 디코딩하여 어느 필드에 기록할지 정합니다.
//!
//! # 디렉티브 종류
//!
//! | 디렉티브 | 결과 값 | 필드 반영 |
//! |---|---|---|
//! | `Scalar` | 요소 텍스트 | 한 번만 설정 |
//! | `InvertedBoolean` | `0`이면 `false`, 그 외 `true` | 한 번만 설정 |
//! | `NestedObject` | 중첩 레코드 하나 | 한 번만 설정 |
//! | `NestedListInline` | 요소마다 레코드 하나 | 누적 |
//! | `NestedListQuery` | 경로 질의 결과마다 레코드 하나 | 누적 |
//! | `NestedGroup` | 하위 맵으로 재귀 | 같은 레코드에 직접 |
//!
//! # 사용 예시
//!
//! ```
//! use qapi_objects::schema::{Directive, ParamMap};
//! use qapi_objects::RecordKind;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Field { Id, Title, Users }
//!
//! let map = ParamMap::new()
//!     .scalar("ID", Field::Id)
//!     .scalar("TITLE", Field::Title)
//!     .group("USER_LIST", ParamMap::new().inline("USER", Field::Users, RecordKind::QualysUser));
//!
//! assert_eq!(map.len(), 3);
//! assert!(matches!(map.get("USER_LIST"), Some(Directive::NestedGroup(_))));
//! ```

mod value;

use std::collections::HashSet;

use indexmap::IndexMap;

pub use value::{FieldName, FieldValue};
pub(crate) use value::record_fields;

use crate::registry::RecordKind;
use crate::source::NodePath;

/// 스키마 항목의 디코딩 전략
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<F> {
    /// 요소 텍스트를 문자열로 기록합니다. 텍스트가 없으면 빈 문자열입니다.
    Scalar(F),
    /// 요소 텍스트를 정수로 해석하여 정확히 `0`일 때만 `false`를 기록합니다.
    InvertedBoolean(F),
    /// 요소에서 중첩 레코드 하나를 생성합니다.
    NestedObject(F, RecordKind),
    /// 요소마다 중첩 레코드 하나를 생성하여 목록에 추가합니다.
    NestedListInline(F, RecordKind),
    /// 채우는 중인 요소 기준으로 경로를 질의하여 일치하는 요소마다 레코드를 생성합니다.
    NestedListQuery(F, RecordKind, NodePath),
    /// 하위 맵으로 재귀하며 결과는 같은 레코드에 기록합니다.
    NestedGroup(ParamMap<F>),
}

impl<F: Copy> Directive<F> {
    /// 디렉티브가 기록하는 필드 (그룹은 `None`)
    pub fn target(&self) -> Option<F> {
        match self {
            Self::Scalar(field)
            | Self::InvertedBoolean(field)
            | Self::NestedObject(field, _)
            | Self::NestedListInline(field, _)
            | Self::NestedListQuery(field, _, _) => Some(*field),
            Self::NestedGroup(_) => None,
        }
    }
}

impl<F> Directive<F> {
    /// 디렉티브 이름
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::InvertedBoolean(_) => "inverted_boolean",
            Self::NestedObject(..) => "nested_object",
            Self::NestedListInline(..) => "nested_list_inline",
            Self::NestedListQuery(..) => "nested_list_query",
            Self::NestedGroup(_) => "nested_group",
        }
    }

    /// 여러 번 나타나도 누적되는 목록 디렉티브인지 확인합니다.
    pub fn accumulates(&self) -> bool {
        matches!(
            self,
            Self::NestedListInline(..) | Self::NestedListQuery(..)
        )
    }
}

/// 태그 이름에서 디렉티브로의 순서 있는 매핑
///
/// 같은 태그를 두 번 선언하면 나중 선언이 앞의 것을 대체합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMap<F> {
    entries: IndexMap<String, Directive<F>>,
}

impl<F> Default for ParamMap<F> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<F> ParamMap<F> {
    /// 빈 매핑을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 임의의 디렉티브 항목을 추가합니다.
    pub fn entry(mut self, tag: &str, directive: Directive<F>) -> Self {
        self.entries.insert(tag.to_owned(), directive);
        self
    }

    /// `Scalar` 항목을 추가합니다.
    pub fn scalar(self, tag: &str, field: F) -> Self {
        self.entry(tag, Directive::Scalar(field))
    }

    /// `InvertedBoolean` 항목을 추가합니다.
    pub fn flag(self, tag: &str, field: F) -> Self {
        self.entry(tag, Directive::InvertedBoolean(field))
    }

    /// `NestedObject` 항목을 추가합니다.
    pub fn object(self, tag: &str, field: F, kind: RecordKind) -> Self {
        self.entry(tag, Directive::NestedObject(field, kind))
    }

    /// `NestedListInline` 항목을 추가합니다.
    pub fn inline(self, tag: &str, field: F, kind: RecordKind) -> Self {
        self.entry(tag, Directive::NestedListInline(field, kind))
    }

    /// `NestedListQuery` 항목을 추가합니다.
    pub fn query(self, tag: &str, field: F, kind: RecordKind, path: &str) -> Self {
        self.entry(tag, Directive::NestedListQuery(field, kind, NodePath::new(path)))
    }

    /// `NestedGroup` 항목을 추가합니다.
    pub fn group(self, tag: &str, sub_map: ParamMap<F>) -> Self {
        self.entry(tag, Directive::NestedGroup(sub_map))
    }

    /// 태그에 선언된 디렉티브
    pub fn get(&self, tag: &str) -> Option<&Directive<F>> {
        self.entries.get(tag)
    }

    /// 태그가 선언되어 있는지 확인합니다.
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// 선언된 태그 집합
    pub fn tags(&self) -> HashSet<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// 선언 순서대로의 항목
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Directive<F>)> {
        self.entries.iter().map(|(tag, d)| (tag.as_str(), d))
    }

    /// 최상위 항목 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 항목이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Field {
        Qid,
        Title,
        Patchable,
        Cvss,
        Cves,
        Bugtraqs,
        Remote,
    }

    fn sample() -> ParamMap<Field> {
        ParamMap::new()
            .scalar("QID", Field::Qid)
            .scalar("TITLE", Field::Title)
            .flag("PATCHABLE", Field::Patchable)
            .object("CVSS", Field::Cvss, RecordKind::Cvss)
            .group("CVE_LIST", ParamMap::new().inline("CVE", Field::Cves, RecordKind::Cve))
            .query(
                "BUGTRAQ_LIST",
                Field::Bugtraqs,
                RecordKind::Bugtraq,
                "BUGTRAQ_LIST/BUGTRAQ",
            )
            .group("DISCOVERY", ParamMap::new().flag("REMOTE", Field::Remote))
    }

    #[test]
    fn preserves_insertion_order() {
        let map = sample();
        let tags: Vec<_> = map.iter().map(|(tag, _)| tag).collect();
        assert_eq!(
            tags,
            vec![
                "QID",
                "TITLE",
                "PATCHABLE",
                "CVSS",
                "CVE_LIST",
                "BUGTRAQ_LIST",
                "DISCOVERY"
            ]
        );
    }

    #[test]
    fn lookup_and_tag_set() {
        let map = sample();
        assert!(map.contains("QID"));
        assert!(!map.contains("CVE"));
        assert_eq!(map.tags().len(), 7);
        assert_eq!(map.get("TITLE"), Some(&Directive::Scalar(Field::Title)));
        assert!(map.get("UNKNOWN").is_none());
    }

    #[test]
    fn directive_targets() {
        let map = sample();
        assert_eq!(map.get("PATCHABLE").and_then(Directive::target), Some(Field::Patchable));
        assert_eq!(map.get("DISCOVERY").and_then(Directive::target), None);
        assert_eq!(
            map.get("BUGTRAQ_LIST").map(Directive::name),
            Some("nested_list_query")
        );
    }

    #[test]
    fn accumulating_directives() {
        let map = sample();
        assert!(map.get("BUGTRAQ_LIST").is_some_and(Directive::accumulates));
        assert!(!map.get("CVSS").is_some_and(Directive::accumulates));
    }

    #[test]
    fn later_declaration_replaces_earlier() {
        let map = ParamMap::new()
            .scalar("TITLE", Field::Title)
            .scalar("TITLE", Field::Qid);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("TITLE"), Some(&Directive::Scalar(Field::Qid)));
    }

    #[test]
    fn query_path_is_parsed() {
        let map = sample();
        match map.get("BUGTRAQ_LIST") {
            Some(Directive::NestedListQuery(_, kind, path)) => {
                assert_eq!(*kind, RecordKind::Bugtraq);
                assert_eq!(path.as_str(), "BUGTRAQ_LIST/BUGTRAQ");
            }
            other => panic!("unexpected directive: {other:?}"),
        }
    }
}
