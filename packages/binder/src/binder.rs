//! Entry point tying the registry, the assembler and the writer together.

use std::path::Path;

use crate::catalog::{parse_catalog, Catalog};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::registry::ExtensionRegistry;
use crate::xml::{self, XmlElement};

/// Outcome of a successful parse: the best-effort catalog and every
/// diagnostic raised while building it, in document order.
#[derive(Debug)]
pub struct Parsed {
    pub catalog: Catalog,
    pub diagnostics: Diagnostics,
}

/// Binds catalog documents against a fixed set of extensions.
///
/// The binder owns its registry and never mutates it, so one binder can be
/// shared across threads and parse independent documents in parallel.
///
/// # Example
///
/// ```
/// use xcri_binder::{Binder, ExtensionRegistry};
///
/// let binder = Binder::new(ExtensionRegistry::new());
/// let parsed = binder
///     .parse_str(r#"<catalog xmlns="http://xcri.org/profiles/1.2/catalog" generated="2012-03-01T09:00:00Z"/>"#)
///     .unwrap();
/// assert!(parsed.diagnostics.is_empty());
/// assert!(parsed.catalog.providers().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Binder {
    registry: ExtensionRegistry,
}

impl Binder {
    /// Create a binder with a fully populated registry.
    #[must_use]
    pub fn new(registry: ExtensionRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Parse a document from a string.
    ///
    /// # Errors
    /// Returns `XmlParse` for input that is not well-formed XML, and the
    /// errors of [`Self::parse_element`].
    pub fn parse_str(&self, xml: &str) -> Result<Parsed> {
        let root = XmlElement::parse(xml)?;
        self.parse_element(&root)
    }

    /// Read and parse a document file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, and the errors of
    /// [`Self::parse_str`].
    pub fn parse_file(&self, path: &Path) -> Result<Parsed> {
        let xml = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = xml.len(), "Read catalog document");
        self.parse_str(&xml)
    }

    /// Parse an already built document tree.
    ///
    /// # Errors
    /// Returns `InvalidGenerated` if the root's `@generated` timestamp is
    /// malformed.
    pub fn parse_element(&self, root: &XmlElement) -> Result<Parsed> {
        let (catalog, diagnostics) = parse_catalog(root, &self.registry)?;
        Ok(Parsed {
            catalog,
            diagnostics,
        })
    }

    /// Serialize a catalog to an XML document.
    ///
    /// # Errors
    /// Returns `Write` if the writer fails.
    pub fn to_xml_string(&self, catalog: &Catalog) -> Result<String> {
        xml::to_string(&catalog.to_xml())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BinderError;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_binder_is_send_sync() {
        assert_send_sync::<Binder>();
        assert_send_sync::<Parsed>();
    }

    #[test]
    fn test_parse_str_rejects_malformed_xml() {
        let binder = Binder::default();
        assert!(matches!(
            binder.parse_str("<catalog>"),
            Err(BinderError::XmlParse(_))
        ));
    }

    #[test]
    fn test_parse_file_missing() {
        let binder = Binder::default();
        assert!(matches!(
            binder.parse_file(Path::new("/nonexistent/catalog.xml")),
            Err(BinderError::Io(_))
        ));
    }

    #[test]
    fn test_to_xml_string_round_trip() {
        let binder = Binder::default();
        let xml = r#"<catalog xmlns="http://xcri.org/profiles/1.2/catalog"
            xmlns:dc="http://purl.org/dc/elements/1.1/"
            generated="2012-03-01T09:00:00.5Z">
            <dc:description>All courses</dc:description>
        </catalog>"#;
        let parsed = binder.parse_str(xml).unwrap();
        let output = binder.to_xml_string(&parsed.catalog).unwrap();
        assert!(output.contains(r#"generated="2012-03-01T09:00:00.500Z""#));

        let reparsed = binder.parse_str(&output).unwrap();
        assert_eq!(reparsed.catalog.generated(), parsed.catalog.generated());
        assert_eq!(
            reparsed.catalog.descriptions(crate::catalog::NodeId::ROOT),
            parsed.catalog.descriptions(crate::catalog::NodeId::ROOT)
        );
    }
}
