//! 소스 트리 -- 파싱된 응답 문서의 읽기 전용 뷰
//!
//! [`SourceNode`]는 문서의 요소 하나를 나타냅니다. 태그, 직접 포함한 텍스트,
//! 속성, 문서 순서대로의 자식 요소를 가지며 경로 질의([`NodePath`])로
//! 하위 트리의 요소를 선택할 수 있습니다.
//!
//! 트리는 [`SourceNode::parse`]로 XML 문자열에서 만들거나, 이미 파싱된 트리를
//! 가진 전송 계층이 빌더 메서드로 직접 구성할 수 있습니다.

pub mod path;
mod xml;

use std::collections::HashSet;

pub use path::NodePath;

use crate::config::DecoderConfig;
use crate::error::ObjectError;

/// 문서 요소 하나에 대한 불변 뷰
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceNode {
    tag: String,
    text: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<SourceNode>,
}

impl SourceNode {
    /// 태그만 가진 빈 요소를 생성합니다.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// 기본 디코더 설정으로 XML 문서를 파싱합니다.
    pub fn parse(xml: &str) -> Result<Self, ObjectError> {
        xml::parse_document(xml, &DecoderConfig::default())
    }

    /// 주어진 디코더 설정(크기/깊이 제한, 공백 처리)으로 XML 문서를 파싱합니다.
    pub fn parse_with(xml: &str, config: &DecoderConfig) -> Result<Self, ObjectError> {
        xml::parse_document(xml, config)
    }

    /// 텍스트를 설정합니다.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// 속성을 추가합니다.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// 자식 요소를 추가합니다.
    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    /// 텍스트만 가진 자식 요소를 추가합니다.
    pub fn with_text_child(self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(SourceNode::new(tag).with_text(text))
    }

    /// 요소 태그
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 요소가 직접 포함한 텍스트 (자식 요소의 텍스트는 제외)
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// 자신과 모든 하위 요소의 텍스트를 문서 순서대로 이어 붙입니다.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// 이름으로 속성 값을 조회합니다.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 문서 순서대로의 속성 목록
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// 문서 순서대로의 자식 요소
    pub fn children(&self) -> &[SourceNode] {
        &self.children
    }

    /// 태그가 `names`에 포함된 직계 자식을 문서 순서대로 반환합니다.
    pub fn children_named<'a>(
        &'a self,
        names: &'a HashSet<&str>,
    ) -> impl Iterator<Item = &'a SourceNode> + 'a {
        self.children
            .iter()
            .filter(move |child| names.contains(child.tag.as_str()))
    }

    /// 태그가 일치하는 첫 번째 직계 자식
    pub fn child(&self, tag: &str) -> Option<&SourceNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// 경로 문자열로 하위 트리를 질의합니다.
    ///
    /// 문법은 [`NodePath`]를 참고하세요.
    pub fn select(&self, path: &str) -> Vec<&SourceNode> {
        NodePath::new(path).select(self)
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_owned()),
        }
    }
}
