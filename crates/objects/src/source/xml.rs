//! quick-xml 기반 문서 파서
//!
//! 이벤트 스트림을 읽어 [`SourceNode`] 트리를 구성합니다. 문서 크기와 중첩
//! 깊이 제한은 [`DecoderConfig`]를 따르며, 선언/주석/처리 명령/DOCTYPE은 무시합니다.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use super::SourceNode;
use crate::config::DecoderConfig;
use crate::error::ObjectError;

/// XML 문자열을 파싱하여 루트 요소를 반환합니다.
pub(super) fn parse_document(xml: &str, config: &DecoderConfig) -> Result<SourceNode, ObjectError> {
    if xml.len() > config.max_document_size {
        return Err(ObjectError::DocumentTooLarge {
            size: xml.len(),
            max: config.max_document_size,
        });
    }

    let mut reader = Reader::from_str(xml);
    reader.trim_text(config.trim_text);

    let mut buf = Vec::new();
    let mut stack: Vec<SourceNode> = Vec::new();
    let mut root: Option<SourceNode> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| parse_error(&reader, e.to_string()))?;

        match event {
            Event::Start(start) => {
                check_open(&reader, &stack, &root, config)?;
                stack.push(open_element(&reader, &start)?);
            }
            Event::Empty(start) => {
                check_open(&reader, &stack, &root, config)?;
                let node = open_element(&reader, &start)?;
                close_element(node, &mut stack, &mut root);
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| parse_error(&reader, "unexpected closing tag".to_owned()))?;
                close_element(node, &mut stack, &mut root);
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| parse_error(&reader, e.to_string()))?;
                    current.append_text(&text);
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    let raw = cdata.into_inner();
                    let text = std::str::from_utf8(&raw)
                        .map_err(|e| parse_error(&reader, e.to_string()))?;
                    current.append_text(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(
            &reader,
            format!("unclosed element <{}>", open.tag()),
        ));
    }

    let root = root.ok_or_else(|| parse_error(&reader, "document has no root element".to_owned()))?;
    trace!(tag = root.tag(), children = root.children().len(), "parsed document");
    Ok(root)
}

fn check_open(
    reader: &Reader<&[u8]>,
    stack: &[SourceNode],
    root: &Option<SourceNode>,
    config: &DecoderConfig,
) -> Result<(), ObjectError> {
    if stack.is_empty() && root.is_some() {
        return Err(parse_error(reader, "multiple root elements".to_owned()));
    }
    if stack.len() + 1 > config.max_depth {
        return Err(ObjectError::DepthExceeded {
            max: config.max_depth,
        });
    }
    Ok(())
}

fn open_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<SourceNode, ObjectError> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| parse_error(reader, e.to_string()))?
        .to_owned();
    let mut node = SourceNode::new(tag);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| parse_error(reader, e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| parse_error(reader, e.to_string()))?
            .to_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| parse_error(reader, e.to_string()))?
            .into_owned();
        node = node.with_attribute(key, value);
    }

    Ok(node)
}

fn close_element(node: SourceNode, stack: &mut [SourceNode], root: &mut Option<SourceNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn parse_error(reader: &Reader<&[u8]>, reason: String) -> ObjectError {
    ObjectError::XmlParse {
        position: reader.buffer_position(),
        reason,
    }
}
