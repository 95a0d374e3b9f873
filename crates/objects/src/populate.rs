//! 채우기 엔진 -- 파라미터 맵에 따라 소스 요소를 레코드에 반영
//!
//! [`populate`]는 소스 요소의 직계 자식 중 맵에 선언된 태그를 문서 순서대로
//! 순회하며 디렉티브를 적용합니다. 선언되지 않은 자식과 속성은 무시합니다.
//!
//! 한 번의 디코딩 동안 다음 상태를 그룹 재귀 전체에서 공유합니다.
//!
//! - 단일 값 필드는 처음 나타난 값만 기록하고 이후 중복은 건너뜁니다.
//! - 질의 목록은 (디렉티브, 문맥 요소) 쌍마다 한 번만 평가합니다.
//!
//! 중첩 레코드 생성이 실패하면 즉시 전체 호출을 중단합니다. 이때 앞서 처리한
//! 필드는 남아 있으므로 호출자는 부분적으로 채워진 레코드를 버려야 합니다.

use std::collections::HashSet;

use tracing::trace;

use crate::error::ObjectError;
use crate::record::Record;
use crate::schema::{Directive, FieldName, FieldValue, ParamMap};
use crate::source::SourceNode;

/// 소스 요소를 `schema`에 따라 `target`에 반영합니다.
pub fn populate<R: Record>(
    target: &mut R,
    source: &SourceNode,
    schema: &ParamMap<R::Field>,
) -> Result<(), ObjectError> {
    let mut pass = Pass::default();
    pass.apply(target, source, schema)
}

/// 디코딩 한 번의 공유 상태
struct Pass<F> {
    assigned: HashSet<F>,
    queried: HashSet<(*const (), *const SourceNode)>,
}

impl<F> Default for Pass<F> {
    fn default() -> Self {
        Self {
            assigned: HashSet::new(),
            queried: HashSet::new(),
        }
    }
}

impl<F> Pass<F>
where
    F: FieldName + Copy + Eq + std::hash::Hash,
{
    fn apply<R: Record<Field = F>>(
        &mut self,
        target: &mut R,
        source: &SourceNode,
        schema: &ParamMap<F>,
    ) -> Result<(), ObjectError> {
        let tags = schema.tags();

        for child in source.children_named(&tags) {
            let Some(directive) = schema.get(child.tag()) else {
                continue;
            };

            if !directive.accumulates() {
                if let Some(field) = directive.target() {
                    if !self.claim::<R>(field, child) {
                        continue;
                    }
                }
            }

            match directive {
                Directive::Scalar(field) => {
                    let text = child.text().unwrap_or_default().to_owned();
                    target.assign(*field, FieldValue::Text(text))?;
                }
                Directive::InvertedBoolean(field) => {
                    let flag = parse_inverted_flag(child)?;
                    target.assign(*field, FieldValue::Flag(flag))?;
                }
                Directive::NestedObject(field, kind) => {
                    let nested = kind.decode(child)?;
                    target.assign(*field, FieldValue::Record(nested))?;
                }
                Directive::NestedListInline(field, kind) => {
                    let item = kind.decode(child)?;
                    target.assign(*field, FieldValue::Records(vec![item]))?;
                }
                Directive::NestedListQuery(field, kind, path) => {
                    let anchor = (directive as *const Directive<F> as *const (), source as *const _);
                    if !self.queried.insert(anchor) {
                        trace!(
                            record = R::NAME,
                            tag = child.tag(),
                            path = %path,
                            "query already evaluated, skipping anchor"
                        );
                        continue;
                    }
                    let items = path
                        .select(source)
                        .into_iter()
                        .map(|node| kind.decode(node))
                        .collect::<Result<Vec<_>, _>>()?;
                    trace!(
                        record = R::NAME,
                        path = %path,
                        matches = items.len(),
                        "query list evaluated"
                    );
                    target.assign(*field, FieldValue::Records(items))?;
                }
                Directive::NestedGroup(sub_map) => {
                    self.apply(target, child, sub_map)?;
                }
            }
        }

        Ok(())
    }

    /// 단일 값 필드를 이번 디코딩에서 처음 기록하는지 확인합니다.
    fn claim<R: Record<Field = F>>(&mut self, field: F, child: &SourceNode) -> bool {
        if self.assigned.insert(field) {
            return true;
        }
        trace!(
            record = R::NAME,
            field = field.name(),
            tag = child.tag(),
            "duplicate element for singular field, keeping first"
        );
        false
    }
}

/// `0`이면 `false`, 비어 있거나 그 외 정수면 `true`
///
/// 자릿수 제한 없이 부호와 숫자만 검사하므로 고정 폭 정수를 넘는 값도 `true`입니다.
fn parse_inverted_flag(node: &SourceNode) -> Result<bool, ObjectError> {
    let text = node.text().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Ok(true);
    }
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ObjectError::malformed(
            node.tag(),
            format!("expected an integer flag, found '{text}'"),
        ));
    }
    Ok(digits.bytes().any(|b| b != b'0'))
}
