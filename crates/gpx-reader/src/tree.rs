//! Element tree builder.
//!
//! Materializes markup into a [`gpx_model::Element`] tree with namespace
//! resolution. Attributes are keyed by local name and namespace declarations
//! are dropped. Entity and character references are resolved, CDATA is kept
//! as text, and whitespace-only text is discarded. Comments, processing
//! instructions and the declaration are ignored.

use std::str::from_utf8;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use gpx_model::{Element, QualifiedName};

use crate::error::{GpxError, Result};

/// Parse markup text into an element tree.
///
/// # Errors
///
/// - [`GpxError::Xml`] when the tokenizer rejects the markup
/// - [`GpxError::Escape`] for an unknown entity reference
/// - [`GpxError::MalformedDocument`] when there is no root, more than one
///   root, stray text outside the root, or an unclosed element
pub fn parse_str(text: &str) -> Result<Element> {
    let mut reader = NsReader::from_str(text);
    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_resolved_event()? {
            (namespace, Event::Start(start)) => {
                let element = open(&namespace, &start)?;
                builder.stack.push(element);
            }
            (namespace, Event::Empty(start)) => {
                let element = open(&namespace, &start)?;
                builder.attach(element)?;
            }
            (_, Event::End(_)) => builder.close()?,
            (_, Event::Text(chunk)) => builder.text(&unescape(from_utf8(&chunk)?)?)?,
            (_, Event::CData(chunk)) => builder.text(from_utf8(&chunk)?)?,
            (_, Event::GeneralRef(reference)) => {
                let name = from_utf8(&reference)?;
                builder.text(&unescape(&format!("&{name};"))?)?;
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    builder.finish()
}

fn open(namespace: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element> {
    let namespace = match namespace {
        ResolveResult::Bound(ns) => Some(from_utf8(ns.as_ref())?),
        _ => None,
    };
    let local = from_utf8(start.local_name().into_inner())?;
    let mut element = Element::new(QualifiedName::new(namespace, local));

    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = from_utf8(attribute.key.local_name().as_ref())?.to_string();
        let value = unescape(from_utf8(&attribute.value)?)?.into_owned();
        element.attributes.insert(key, value);
    }

    Ok(element)
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Element>,
    root: Option<Element>,
}

impl TreeBuilder {
    fn text(&mut self, chunk: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(element) => {
                element.text.get_or_insert_with(String::new).push_str(chunk);
                Ok(())
            }
            None if chunk.trim().is_empty() => Ok(()),
            None => Err(GpxError::malformed("text outside the root element")),
        }
    }

    fn close(&mut self) -> Result<()> {
        let mut element = self
            .stack
            .pop()
            .ok_or_else(|| GpxError::malformed("closing tag without an open element"))?;
        if element.text.as_deref().is_some_and(|text| text.trim().is_empty()) {
            element.text = None;
        }
        self.attach(element)
    }

    fn attach(&mut self, element: Element) -> Result<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(element);
        } else if self.root.is_none() {
            self.root = Some(element);
        } else {
            return Err(GpxError::malformed(format!(
                "second root element {}",
                element.name
            )));
        }
        Ok(())
    }

    fn finish(self) -> Result<Element> {
        if let Some(open) = self.stack.last() {
            return Err(GpxError::malformed(format!("unclosed element {}", open.name)));
        }
        self.root
            .ok_or_else(|| GpxError::malformed("document has no root element"))
    }
}
