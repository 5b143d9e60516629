//! Owned element tree handed to and produced by the binder.
//!
//! The binder never sees raw XML. Documents are read with `roxmltree` and
//! converted into [`XmlElement`] values, and serialization produces fresh
//! [`XmlElement`] trees that [`super::to_string`] turns into text.

use std::borrow::Cow;
use std::fmt;

use roxmltree::{Document, Node};

use crate::error::Result;

/// A namespace URI, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(Cow<'static, str>);

impl Namespace {
    /// The empty namespace (unqualified names).
    pub const NONE: Namespace = Namespace(Cow::Borrowed(""));

    /// Create a namespace from a static URI.
    #[must_use]
    pub const fn from_static(uri: &'static str) -> Self {
        Self(Cow::Borrowed(uri))
    }

    /// Create a namespace from an owned URI.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(Cow::Owned(uri.into()))
    }

    /// The namespace URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty namespace.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    fn from_optional(uri: Option<&str>) -> Self {
        uri.map_or(Self::NONE, Self::new)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format a name in Clark notation (`{uri}name`), as used in messages.
#[must_use]
pub fn clark_name(name: &str, namespace: &Namespace) -> String {
    if namespace.is_none() {
        name.to_string()
    } else {
        format!("{{{namespace}}}{name}")
    }
}

/// A namespaced attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub namespace: Namespace,
    pub value: String,
}

/// An element with its attributes, text and element children.
///
/// Text is the concatenation of the direct text children, trimmed;
/// whitespace-only text is treated as absent. Comments and processing
/// instructions are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    namespace: Namespace,
    text: Option<String>,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
            text: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parse an XML document and return its root element.
    ///
    /// # Errors
    /// Returns `XmlParse` if the document is not well-formed.
    ///
    /// # Examples
    /// ```
    /// use xcri_binder::xml::{Namespace, XmlElement};
    ///
    /// let root = XmlElement::parse(r#"<a xmlns="urn:x"><b>text</b></a>"#).unwrap();
    /// assert_eq!(root.name(), "a");
    /// assert_eq!(root.namespace(), &Namespace::new("urn:x"));
    /// assert_eq!(root.children()[0].text(), Some("text"));
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)?;
        Ok(Self::from_node(doc.root_element()))
    }

    /// Convert a `roxmltree` element node.
    #[must_use]
    pub fn from_node(node: Node<'_, '_>) -> Self {
        let tag = node.tag_name();
        let attributes = node
            .attributes()
            .map(|attr| XmlAttribute {
                name: attr.name().to_string(),
                namespace: Namespace::from_optional(attr.namespace()),
                value: attr.value().to_string(),
            })
            .collect();

        let mut text = String::new();
        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(Self::from_node(child));
            } else if child.is_text() {
                if let Some(t) = child.text() {
                    text.push_str(t);
                }
            }
        }

        Self {
            name: tag.name().to_string(),
            namespace: Namespace::from_optional(tag.namespace()),
            text: non_blank(&text),
            attributes,
            children,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Check the element's identity.
    #[must_use]
    pub fn is(&self, name: &str, namespace: &Namespace) -> bool {
        self.name == name && &self.namespace == namespace
    }

    /// The element name in Clark notation.
    #[must_use]
    pub fn clark_name(&self) -> String {
        clark_name(&self.name, &self.namespace)
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the text content. Blank text clears it.
    pub fn set_text(&mut self, text: impl AsRef<str>) {
        self.text = non_blank(text.as_ref());
    }

    /// Builder form of [`Self::set_text`].
    #[must_use]
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        self.set_text(text);
        self
    }

    /// Get an attribute value by name and namespace.
    #[must_use]
    pub fn attribute(&self, name: &str, namespace: &Namespace) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name && &attr.namespace == namespace)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        namespace: Namespace,
        value: impl Into<String>,
    ) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|attr| attr.name == name && attr.namespace == namespace)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(XmlAttribute {
                name,
                namespace,
                value,
            }),
        }
    }

    /// Builder form of [`Self::set_attribute`].
    #[must_use]
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        namespace: Namespace,
        value: impl Into<String>,
    ) -> Self {
        self.set_attribute(name, namespace, value);
        self
    }

    #[must_use]
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Builder form of [`Self::push_child`].
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
