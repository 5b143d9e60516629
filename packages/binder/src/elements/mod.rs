//! Leaf value types of the catalog vocabulary.
//!
//! Every leaf binds one element to a typed value and back. Leaves are never
//! lenient themselves: a malformed leaf fails with `InvalidElement` and the
//! composite that owns it drops it and reports a diagnostic.

mod common;
mod course;
mod provider;
mod temporal;

pub use common::{ClassificationType, Contributor, Description, Identifier, Image, Subject, Title, Url};
pub use course::{Credit, Qualification};
pub use provider::Location;
pub use temporal::Temporal;

use crate::config::{XML, XSI};
use crate::error::Result;
use crate::xml::{find_all, find_one, Namespace, XmlElement};

/// A typed binding for one element name.
pub trait Element: Sized {
    /// Local name of the element.
    const NAME: &'static str;

    /// Namespace of the element.
    fn namespace() -> &'static Namespace;

    /// Bind an element.
    ///
    /// # Errors
    /// Returns `InvalidElement` if the element is malformed.
    fn from_xml(element: &XmlElement) -> Result<Self>;

    /// Produce a fresh element.
    fn to_xml(&self) -> XmlElement;
}

/// The plain node content shared by every element: text value plus the
/// `xsi:type` and `xml:lang` attributes.
///
/// Binding is pure transcription; nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeData {
    pub value: Option<String>,
    pub type_attr: Option<String>,
    pub lang: Option<String>,
}

impl NodeData {
    /// Node data with a text value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Set the `xsi:type` refinement.
    #[must_use]
    pub fn with_type(mut self, type_attr: impl Into<String>) -> Self {
        self.type_attr = Some(type_attr.into());
        self
    }

    /// Set the `xml:lang` tag.
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Read text and the two fixed attributes.
    #[must_use]
    pub fn from_xml(element: &XmlElement) -> Self {
        Self {
            value: element.text().map(str::to_string),
            type_attr: element.attribute("type", &XSI).map(str::to_string),
            lang: element.attribute("lang", &XML).map(str::to_string),
        }
    }

    /// Build an element named `name` in `namespace` carrying this data.
    #[must_use]
    pub fn to_xml(&self, name: &str, namespace: &Namespace) -> XmlElement {
        let mut element = XmlElement::new(name, namespace.clone());
        if let Some(value) = &self.value {
            element.set_text(value);
        }
        if let Some(type_attr) = &self.type_attr {
            element.set_attribute("type", XSI.clone(), type_attr);
        }
        if let Some(lang) = &self.lang {
            element.set_attribute("lang", XML.clone(), lang);
        }
        element
    }
}

/// Bind every matching child, failing on the first malformed one.
pub(crate) fn parse_all<T: Element>(element: &XmlElement) -> Result<Vec<T>> {
    find_all(element, T::NAME, T::namespace())
        .map(T::from_xml)
        .collect()
}

/// Text of the first matching child.
pub(crate) fn child_text(element: &XmlElement, name: &str, namespace: &Namespace) -> Option<String> {
    find_one(element, name, namespace)
        .primary()
        .and_then(XmlElement::text)
        .map(str::to_string)
}

/// Append a text child when the value is present.
pub(crate) fn push_text(parent: &mut XmlElement, name: &str, namespace: &Namespace, value: Option<&str>) {
    if let Some(value) = value {
        parent.push_child(XmlElement::new(name, namespace.clone()).with_text(value));
    }
}
