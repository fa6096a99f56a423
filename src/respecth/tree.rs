//! Minimal owned element tree on top of quick-xml.
//!
//! ReSpecTh documents are small, so the importer reads the whole document
//! into a tree and navigates it by path; the exporter builds a tree and
//! writes it in one pass.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::encoding::Decoder;
use quick_xml::{Reader, Writer};

use super::ConvertError;

/// An XML element with attributes, text content and children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    /// Tag name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content (trimmed)
    pub text: String,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder: set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set or replace an attribute
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Append a child and return a mutable reference to it
    pub fn push(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Attribute value by name
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given tag
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First element at a `/`-separated path of direct children
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// All elements at a `/`-separated path
    pub fn find_all<'a>(&'a self, path: &str) -> Vec<&'a XmlElement> {
        let mut current = vec![self];
        for segment in path.split('/') {
            current = current
                .into_iter()
                .flat_map(|e| e.children.iter().filter(|c| c.name == segment))
                .collect();
        }
        current
    }

    /// All descendants (excluding self) with the given tag, depth first
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            found.extend(child.descendants_named(name));
        }
        found
    }

    /// Parse a document and return its root element
    pub fn parse_str(xml: &str) -> Result<XmlElement, ConvertError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let decoder = reader.decoder();

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    stack.push(element_from_start(e, decoder)?);
                }
                Event::Empty(ref e) => {
                    let element = element_from_start(e, decoder)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(std::str::from_utf8(&c.into_inner())?);
                    }
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        ConvertError::InvalidStructure("unbalanced end tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(ConvertError::InvalidStructure(format!(
                "unclosed element <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }
        root.ok_or_else(|| {
            ConvertError::InvalidStructure("document has no root element".to_string())
        })
    }

    /// Serialize as an indented document with an XML declaration
    pub fn to_xml_string(&self) -> Result<String, ConvertError> {
        let mut buffer = Vec::new();
        self.write_document(&mut buffer)?;
        Ok(String::from_utf8(buffer).map_err(|e| e.utf8_error())?)
    }

    /// Write as an indented document with an XML declaration
    pub fn write_document<W: Write>(&self, out: W) -> Result<(), ConvertError> {
        let mut writer = Writer::new_with_indent(out, b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write_element(&mut writer)?;
        writer.get_mut().write_all(b"\n")?;
        Ok(())
    }

    fn write_element<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ConvertError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if !self.text.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        }
        for child in &self.children {
            child.write_element(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

fn element_from_start(e: &BytesStart, decoder: Decoder) -> Result<XmlElement, ConvertError> {
    let mut element = XmlElement::new(std::str::from_utf8(e.name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ConvertError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ConvertError::InvalidStructure(
                "multiple root elements".to_string(),
            ))
        }
    }
    Ok(())
}
