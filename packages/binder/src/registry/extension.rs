//! Extension trait and descriptors.

use std::any::Any;
use std::fmt;

use crate::error::Result;
use crate::xml::{clark_name, Namespace, XmlElement};

/// A vendor-defined element bound during parsing of any composite node.
///
/// Implementations report the element they bind, fill themselves from that
/// element and can reproduce it.
pub trait Extension: fmt::Debug + Send + Sync {
    /// Local name of the bound element.
    fn name(&self) -> &str;

    /// Namespace of the bound element.
    fn namespace(&self) -> &Namespace;

    /// Fill this instance from an element.
    ///
    /// # Errors
    /// Implementations return `InvalidElement` for content they cannot bind;
    /// the binder then drops the element and reports a diagnostic.
    fn from_xml(&mut self, element: &XmlElement) -> Result<()>;

    /// Produce a fresh element.
    fn to_xml(&self) -> XmlElement;

    /// Access the concrete type, e.g. with `downcast_ref`.
    fn as_any(&self) -> &dyn Any;
}

/// Creates a fresh, empty extension instance.
pub type ExtensionFactory = Box<dyn Fn() -> Box<dyn Extension> + Send + Sync>;

/// Registration record: which element an extension binds and how to create it.
pub struct ExtensionDescriptor {
    name: String,
    namespace: Namespace,
    factory: ExtensionFactory,
}

impl ExtensionDescriptor {
    /// Create a descriptor with an explicit factory.
    ///
    /// The factory must produce instances reporting the same name and
    /// namespace. Elements whose instance reports anything else are skipped
    /// with an error diagnostic.
    pub fn new<F>(name: impl Into<String>, namespace: Namespace, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Extension> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            namespace,
            factory: Box::new(factory),
        }
    }

    /// Descriptor whose instances keep the element as-is.
    ///
    /// # Examples
    /// ```
    /// use xcri_binder::registry::ExtensionDescriptor;
    /// use xcri_binder::xml::Namespace;
    ///
    /// let descriptor = ExtensionDescriptor::raw("foo", Namespace::new("urn:vendor"));
    /// let instance = descriptor.instantiate();
    /// assert_eq!(instance.name(), "foo");
    /// ```
    pub fn raw(name: impl Into<String>, namespace: Namespace) -> Self {
        let name = name.into();
        let factory_name = name.clone();
        let factory_namespace = namespace.clone();
        Self::new(name, namespace, move || {
            Box::new(RawExtension::new(factory_name.clone(), factory_namespace.clone()))
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Whether this descriptor binds the given element identity.
    #[must_use]
    pub fn matches(&self, name: &str, namespace: &Namespace) -> bool {
        self.name == name && &self.namespace == namespace
    }

    /// The bound element in Clark notation.
    #[must_use]
    pub fn key(&self) -> String {
        clark_name(&self.name, &self.namespace)
    }

    /// Create a fresh instance.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn Extension> {
        (self.factory)()
    }
}

impl fmt::Debug for ExtensionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionDescriptor")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// Extension that keeps the bound element verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtension {
    name: String,
    namespace: Namespace,
    element: Option<XmlElement>,
}

impl RawExtension {
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
            element: None,
        }
    }

    /// The bound element, once parsed.
    #[must_use]
    pub fn element(&self) -> Option<&XmlElement> {
        self.element.as_ref()
    }
}

impl Extension for RawExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn from_xml(&mut self, element: &XmlElement) -> Result<()> {
        self.element = Some(element.clone());
        Ok(())
    }

    fn to_xml(&self) -> XmlElement {
        self.element
            .clone()
            .unwrap_or_else(|| XmlElement::new(self.name.clone(), self.namespace.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
