//! Minimal mutable XML tree for plugin documents
//!
//! The overlay merger edits downloaded plugin documents in place and must
//! keep their hand-written formatting intact, so whitespace text nodes are
//! first-class children here. `xml-rs` does the tokenizing, escaping and
//! namespace resolution; this module only holds the tree between parse and
//! write.

use std::collections::BTreeMap;
use std::io::Read;

use xml::ParserConfig;
use xml::reader::XmlEvent;
use xml::writer::{EmitterConfig, XmlEvent as WriterEvent};

/// A node in a parsed plugin document
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
    CData(String),
}

/// An element with resolved namespace and ordered children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Prefix as written in the source, if any
    pub prefix: Option<String>,
    pub local_name: String,
    /// Resolved namespace URI, if the element is in a namespace
    pub namespace: Option<String>,
    /// Attributes in document order, qualified name as written
    pub attributes: Vec<(String, String)>,
    /// Namespace declarations carried by this element ("" = default xmlns)
    pub declared_ns: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Attribute lookup by qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Indices of element children within `children`
    pub fn element_positions(&self) -> Vec<usize> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, node)| matches!(node, XmlNode::Element(_)).then_some(i))
            .collect()
    }

    /// Borrow the element at a child-index path, `&[]` being `self`
    pub fn descend(&self, path: &[usize]) -> Option<&XmlElement> {
        match path.split_first() {
            None => Some(self),
            Some((&idx, rest)) => match self.children.get(idx) {
                Some(XmlNode::Element(el)) => el.descend(rest),
                _ => None,
            },
        }
    }

    /// Mutably borrow the element at a child-index path
    pub fn descend_mut(&mut self, path: &[usize]) -> Option<&mut XmlElement> {
        match path.split_first() {
            None => Some(self),
            Some((&idx, rest)) => match self.children.get_mut(idx) {
                Some(XmlNode::Element(el)) => el.descend_mut(rest),
                _ => None,
            },
        }
    }
}

/// Parse a document, keeping whitespace, comments and CDATA sections.
/// Returns the root element; prolog content is dropped. Errors carry the
/// parser's own message so callers can wrap them with the document path.
pub fn parse<R: Read>(source: R) -> Result<XmlElement, String> {
    let reader = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true)
        .ignore_comments(false)
        .create_reader(source);

    // Parent namespace scopes, for computing which declarations each
    // element actually introduces.
    let mut scopes: Vec<BTreeMap<String, String>> = vec![BTreeMap::new()];
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    for event in reader {
        match event.map_err(|e| e.to_string())? {
            XmlEvent::StartElement {
                name,
                attributes,
                namespace,
            } => {
                let parent_scope = scopes.last().cloned().unwrap_or_default();
                let mut declared = Vec::new();
                for (prefix, uri) in namespace.0.iter() {
                    if prefix == "xml" || prefix == "xmlns" {
                        continue;
                    }
                    if prefix.is_empty() && uri.is_empty() {
                        continue;
                    }
                    if parent_scope.get(prefix).map(String::as_str) != Some(uri.as_str()) {
                        declared.push((prefix.clone(), uri.clone()));
                    }
                }
                scopes.push(namespace.0.clone().into_iter().collect());

                let element = XmlElement {
                    prefix: name.prefix.clone(),
                    local_name: name.local_name.clone(),
                    namespace: name.namespace.clone(),
                    attributes: attributes
                        .iter()
                        .map(|attr| (qualified(&attr.name.prefix, &attr.name.local_name), attr.value.clone()))
                        .collect(),
                    declared_ns: declared,
                    children: Vec::new(),
                };
                stack.push(element);
            }
            XmlEvent::EndElement { .. } => {
                scopes.pop();
                if let Some(done) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Element(done)),
                        None => root = Some(done),
                    }
                }
            }
            XmlEvent::Characters(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
            XmlEvent::Whitespace(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
            XmlEvent::Comment(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Comment(text));
                }
            }
            XmlEvent::CData(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::CData(text));
                }
            }
            XmlEvent::StartDocument { .. }
            | XmlEvent::EndDocument
            | XmlEvent::ProcessingInstruction { .. } => {}
        }
    }

    root.ok_or_else(|| "document has no root element".to_string())
}

/// Serialize an element subtree without re-indenting or an XML declaration.
/// The document's own whitespace nodes are authoritative.
pub fn write(root: &XmlElement) -> Result<String, xml::writer::Error> {
    let mut out: Vec<u8> = Vec::new();
    {
        let mut writer = EmitterConfig::new()
            .perform_indent(false)
            .write_document_declaration(false)
            .create_writer(&mut out);
        write_element(&mut writer, root, &BTreeMap::new())?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn write_element<W: std::io::Write>(
    writer: &mut xml::writer::EventWriter<W>,
    element: &XmlElement,
    scope: &BTreeMap<String, String>,
) -> Result<(), xml::writer::Error> {
    // Declarations already in scope with the same URI are not repeated;
    // elements copied between documents would otherwise re-declare xmlns.
    let mut local_scope = scope.clone();
    let mut to_declare: Vec<(&str, &str)> = Vec::new();
    for (prefix, uri) in &element.declared_ns {
        if local_scope.get(prefix).map(String::as_str) != Some(uri.as_str()) {
            to_declare.push((prefix.as_str(), uri.as_str()));
            local_scope.insert(prefix.clone(), uri.clone());
        }
    }

    let name = qualified(&element.prefix, &element.local_name);
    let mut start = WriterEvent::start_element(name.as_str());
    for (attr_name, value) in &element.attributes {
        start = start.attr(attr_name.as_str(), value);
    }
    for (prefix, uri) in to_declare {
        if prefix.is_empty() {
            start = start.default_ns(uri);
        } else {
            start = start.ns(prefix, uri);
        }
    }
    writer.write(start)?;

    for child in &element.children {
        match child {
            XmlNode::Element(el) => write_element(writer, el, &local_scope)?,
            XmlNode::Text(text) => writer.write(WriterEvent::characters(text))?,
            XmlNode::Comment(text) => writer.write(WriterEvent::comment(text))?,
            XmlNode::CData(text) => writer.write(WriterEvent::cdata(text))?,
        }
    }

    writer.write(WriterEvent::end_element())?;
    Ok(())
}

fn qualified(prefix: &Option<String>, local: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{}:{}", p, local),
        _ => local.to_string(),
    }
}
