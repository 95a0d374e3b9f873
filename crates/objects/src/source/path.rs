//! 하위 트리 경로 질의
//!
//! 경로는 `/`로 구분된 단계들입니다. 각 단계는 태그 이름 또는 `*`입니다.
//!
//! - `EXPLOITS/EXPLT_SRC` -- 직계 자식 축으로 차례대로 내려감
//! - `//BUGTRAQ` -- 문맥 요소의 모든 하위 요소 중 일치하는 것
//! - `CORRELATION//EXPLT` -- 중간의 빈 단계는 하위 요소 축
//! - 선행 `/` 한 개와 `.` 단계는 문맥 요소 기준으로 해석
//!
//! 결과는 문서 순서를 유지하며 같은 요소는 한 번만 포함됩니다.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::SourceNode;

/// 단계 축
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

/// 태그 검사
#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Tag(String),
}

impl NameTest {
    fn matches(&self, node: &SourceNode) -> bool {
        match self {
            Self::Any => true,
            Self::Tag(tag) => node.tag() == tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    name: NameTest,
}

/// 파싱된 경로 질의
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    raw: String,
    steps: Vec<Step>,
}

impl NodePath {
    /// 경로 문자열을 파싱합니다.
    ///
    /// 빈 경로는 아무 요소도 선택하지 않습니다.
    pub fn new(path: &str) -> Self {
        let raw = path.trim().to_owned();
        let mut steps = Vec::new();
        let mut axis = Axis::Child;

        let body = if let Some(rest) = raw.strip_prefix("//") {
            axis = Axis::Descendant;
            rest
        } else {
            raw.strip_prefix('/').unwrap_or(&raw)
        };

        for segment in body.split('/') {
            let segment = segment.trim();
            match segment {
                "" => axis = Axis::Descendant,
                "." => {}
                "*" => {
                    steps.push(Step {
                        axis,
                        name: NameTest::Any,
                    });
                    axis = Axis::Child;
                }
                tag => {
                    steps.push(Step {
                        axis,
                        name: NameTest::Tag(tag.to_owned()),
                    });
                    axis = Axis::Child;
                }
            }
        }

        Self { raw, steps }
    }

    /// 원본 경로 문자열
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `context`를 기준으로 경로를 평가합니다.
    pub fn select<'a>(&self, context: &'a SourceNode) -> Vec<&'a SourceNode> {
        if self.steps.is_empty() {
            return Vec::new();
        }

        let order = document_order(context);
        let mut current = vec![context];
        for step in &self.steps {
            let mut next = Vec::new();
            let mut seen: HashSet<*const SourceNode> = HashSet::new();
            for node in current {
                match step.axis {
                    Axis::Child => {
                        for child in node.children() {
                            if step.name.matches(child) && seen.insert(child as *const _) {
                                next.push(child);
                            }
                        }
                    }
                    Axis::Descendant => collect_descendants(node, &step.name, &mut seen, &mut next),
                }
            }
            if next.is_empty() {
                return next;
            }
            // 중첩된 문맥에서 모은 결과는 문맥 순서와 문서 순서가 다를 수 있음
            next.sort_by_key(|node| order.get(&(*node as *const SourceNode)).copied());
            current = next;
        }
        current
    }
}

/// `context` 하위 요소마다 전위 순회 순번을 매깁니다.
fn document_order(context: &SourceNode) -> HashMap<*const SourceNode, usize> {
    fn visit(node: &SourceNode, order: &mut HashMap<*const SourceNode, usize>) {
        let next = order.len();
        order.insert(node as *const _, next);
        for child in node.children() {
            visit(child, order);
        }
    }

    let mut order = HashMap::new();
    visit(context, &mut order);
    order
}

fn collect_descendants<'a>(
    node: &'a SourceNode,
    name: &NameTest,
    seen: &mut HashSet<*const SourceNode>,
    out: &mut Vec<&'a SourceNode>,
) {
    for child in node.children() {
        if name.matches(child) && seen.insert(child as *const _) {
            out.push(child);
        }
        collect_descendants(child, name, seen, out);
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
