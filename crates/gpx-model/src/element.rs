//! Namespaced element tree.
//!
//! The reader never looks at markup directly; it walks this tree. Trees are
//! usually built by `gpx_reader::tree`, but tests and embedding applications
//! can assemble them by hand with the builder methods below.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A tag name qualified by its namespace URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedName {
    /// Namespace URI, if the tag is bound to one.
    pub namespace: Option<String>,
    /// Local part of the tag.
    pub local: String,
}

impl QualifiedName {
    pub fn new(namespace: Option<&str>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.into(),
        }
    }

    /// True if this name is `local` inside `namespace`.
    pub fn matches(&self, namespace: &str, local: &str) -> bool {
        self.local == local && self.namespace.as_deref() == Some(namespace)
    }
}

/// Clark notation (`{uri}local`), the form used in error messages.
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// One element of a document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub name: QualifiedName,
    /// Attributes keyed by local name.
    pub attributes: BTreeMap<String, String>,
    /// Direct children in document order.
    pub children: Vec<Element>,
    /// Character content, absent when the element holds no non-whitespace text.
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create an element bound to `namespace`.
    pub fn namespaced(namespace: &str, local: &str) -> Self {
        Self::new(QualifiedName::new(Some(namespace), local))
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True if this element is `local` inside `namespace`.
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.name.matches(namespace, local)
    }

    /// First direct child named `local` inside `namespace`.
    pub fn find(&self, namespace: &str, local: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is(namespace, local))
    }
}
