//! Registry mapping element identities to extension descriptors.

use super::extension::ExtensionDescriptor;
use crate::xml::Namespace;

/// Append-only registry of extension descriptors.
///
/// Populate it completely, then move it into a [`crate::Binder`]. The binder
/// only reads it, so any number of documents can be parsed concurrently
/// against the same registry; registering while a parse is in flight is not
/// possible because the binder owns it.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    descriptors: Vec<ExtensionDescriptor>,
}

impl ExtensionRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// Registering the same element twice adds a second descriptor.
    /// Lookups return the first one, so callers must not register
    /// conflicting descriptors for one element.
    pub fn register(&mut self, descriptor: ExtensionDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Register an element whose instances keep the raw element.
    pub fn register_raw(&mut self, name: impl Into<String>, namespace: Namespace) {
        self.register(ExtensionDescriptor::raw(name, namespace));
    }

    /// Find the descriptor for an element.
    #[must_use]
    pub fn resolve(&self, name: &str, namespace: &Namespace) -> Option<&ExtensionDescriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.matches(name, namespace))
    }

    /// Check if an extension is registered for an element.
    #[must_use]
    pub fn has_extension(&self, name: &str, namespace: &Namespace) -> bool {
        self.resolve(name, namespace).is_some()
    }

    #[must_use]
    pub fn descriptors(&self) -> &[ExtensionDescriptor] {
        &self.descriptors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_register_and_resolve() {
        let mut registry = ExtensionRegistry::new();
        registry.register_raw("foo", Namespace::new("urn:x"));

        assert!(registry.has_extension("foo", &Namespace::new("urn:x")));
        assert!(!registry.has_extension("foo", &Namespace::new("urn:y")));
        assert!(!registry.has_extension("bar", &Namespace::new("urn:x")));
    }

    #[test]
    fn test_duplicate_registration_is_kept() {
        let mut registry = ExtensionRegistry::new();
        registry.register_raw("foo", Namespace::new("urn:x"));
        registry.register_raw("foo", Namespace::new("urn:x"));

        assert_eq!(registry.len(), 2);
        let resolved = registry.resolve("foo", &Namespace::new("urn:x"));
        assert!(std::ptr::eq(resolved.unwrap(), &registry.descriptors()[0]));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ExtensionRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.resolve("foo", &Namespace::NONE).is_none());
    }
}
