//! Fields shared by every composite level and the shared parse routine.

use std::collections::HashSet;

use super::assembler::ParseContext;
use crate::config::{DC, DISCOURAGED_FIELDS, MLO, XCRI};
use crate::diagnostics::Severity;
use crate::elements::{
    ClassificationType, Contributor, Description, Element, Identifier, Image, NodeData, Subject,
    Title, Url,
};
use crate::error::{BinderError, Result};
use crate::registry::{Extension, ExtensionDescriptor};
use crate::xml::{clark_name, find_all, Namespace, XmlElement};

/// Children bound by [`Common`] itself, never offered to extensions.
static COMMON_FIELDS: [(&str, &Namespace); 8] = [
    ("contributor", &DC),
    ("description", &DC),
    ("identifier", &DC),
    ("title", &DC),
    ("subject", &DC),
    ("image", &XCRI),
    ("type", &DC),
    ("url", &MLO),
];

/// Descriptive collections owned by every composite node.
///
/// Collections hold local values only. Descriptions, subjects and images are
/// inherited from ancestors through the resolved accessors on
/// [`super::Catalog`].
#[derive(Debug, Default)]
pub struct Common {
    pub node: NodeData,
    pub contributors: Vec<Contributor>,
    pub descriptions: Vec<Description>,
    pub identifiers: Vec<Identifier>,
    pub titles: Vec<Title>,
    pub subjects: Vec<Subject>,
    pub images: Vec<Image>,
    pub types: Vec<ClassificationType>,
    pub urls: Vec<Url>,
    pub extensions: Vec<Box<dyn Extension>>,
}

impl Common {
    /// Common fields with a single title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            titles: vec![Title {
                node: NodeData::new(title),
            }],
            ..Self::default()
        }
    }

    /// Extensions of a concrete type, in document order.
    pub fn extensions_of<T: Extension + 'static>(&self) -> impl Iterator<Item = &T> {
        self.extensions
            .iter()
            .filter_map(|extension| extension.as_any().downcast_ref::<T>())
    }

    /// Shared composite parse.
    ///
    /// Every malformed child is dropped with a diagnostic. Children that
    /// match neither [`COMMON_FIELDS`] nor `level_fields` are offered to the
    /// extension registry; unregistered ones are ignored.
    pub(super) fn parse(
        element: &XmlElement,
        level_fields: &[(&str, &Namespace)],
        ctx: &mut ParseContext<'_>,
    ) -> Self {
        for field in DISCOURAGED_FIELDS {
            if find_all(element, field.name, field.namespace).next().is_some() {
                ctx.warn(format!("{}: {}", field.name, field.advice));
            }
        }

        let contributors: Vec<Contributor> = ctx.collect(element, Severity::Warning);
        for contributor in &contributors {
            if contributor.node.type_attr.is_none() {
                ctx.info(
                    "contributor: Producers SHOULD use refinements of this element, \
                     for example for \"presenter\" or \"lecturer\"",
                );
            }
        }

        let titles: Vec<Title> = ctx.collect(element, Severity::Warning);
        let mut languages = HashSet::new();
        for lang in titles.iter().filter_map(|title| title.node.lang.as_deref()) {
            if !languages.insert(lang) {
                ctx.warn(format!(
                    "title: there SHOULD NOT be more than one title per language tag ('{lang}')"
                ));
            }
        }

        let images: Vec<Image> = ctx.collect(element, Severity::Warning);
        for image in &images {
            if !image.has_alt() {
                ctx.warn(format!(
                    "image: a Producer SHOULD provide meaningful alternative text for '{}'",
                    image.src
                ));
            }
            if !image.has_standard_format() {
                ctx.warn(format!(
                    "image: a Producer SHOULD offer images in standard formats such as PNG and JPEG ('{}')",
                    image.src
                ));
            }
        }

        Self {
            node: NodeData::from_xml(element),
            contributors,
            descriptions: ctx.collect(element, Severity::Warning),
            identifiers: ctx.collect(element, Severity::Warning),
            titles,
            subjects: ctx.collect(element, Severity::Warning),
            images,
            types: ctx.collect(element, Severity::Warning),
            urls: ctx.collect(element, Severity::Error),
            extensions: parse_extensions(element, level_fields, ctx),
        }
    }

    /// Build the element with every local collection, extensions last.
    #[must_use]
    pub fn to_xml(&self, name: &str, namespace: &Namespace) -> XmlElement {
        let mut element = self.node.to_xml(name, namespace);
        push_all(&mut element, &self.contributors);
        push_all(&mut element, &self.descriptions);
        push_all(&mut element, &self.identifiers);
        push_all(&mut element, &self.titles);
        push_all(&mut element, &self.subjects);
        push_all(&mut element, &self.images);
        push_all(&mut element, &self.types);
        push_all(&mut element, &self.urls);
        for extension in &self.extensions {
            element.push_child(extension.to_xml());
        }
        element
    }
}

fn push_all<T: Element>(element: &mut XmlElement, items: &[T]) {
    for item in items {
        element.push_child(item.to_xml());
    }
}

fn is_known(child: &XmlElement, level_fields: &[(&str, &Namespace)]) -> bool {
    COMMON_FIELDS
        .iter()
        .any(|(name, namespace)| child.is(name, namespace))
        || level_fields
            .iter()
            .any(|(name, namespace)| child.is(name, namespace))
}

fn parse_extensions(
    element: &XmlElement,
    level_fields: &[(&str, &Namespace)],
    ctx: &mut ParseContext<'_>,
) -> Vec<Box<dyn Extension>> {
    let mut extensions = Vec::new();
    for child in element.children() {
        if is_known(child, level_fields) {
            continue;
        }
        let Some(descriptor) = ctx.registry().resolve(child.name(), child.namespace()) else {
            continue;
        };
        match bind_extension(descriptor, child) {
            Ok(instance) => extensions.push(instance),
            Err(err) => ctx.error(format!(
                "skipping invalid extension {}: {err}",
                child.clark_name()
            )),
        }
    }
    extensions
}

fn bind_extension(descriptor: &ExtensionDescriptor, child: &XmlElement) -> Result<Box<dyn Extension>> {
    let mut instance = descriptor.instantiate();
    if !descriptor.matches(instance.name(), instance.namespace()) {
        return Err(BinderError::ExtensionMismatch {
            expected: descriptor.key(),
            found: clark_name(instance.name(), instance.namespace()),
        });
    }
    instance.from_xml(child)?;
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ExtensionRegistry;

    fn parse(xml: &str, registry: &ExtensionRegistry) -> (Common, Vec<String>) {
        let element = XmlElement::parse(xml).unwrap();
        let mut ctx = ParseContext::new(registry);
        let common = Common::parse(&element, &[], &mut ctx);
        let messages = ctx
            .into_diagnostics()
            .into_vec()
            .into_iter()
            .map(|d| d.message)
            .collect();
        (common, messages)
    }

    #[test]
    fn test_collections_keep_document_order_and_duplicates() {
        let xml = r#"<course xmlns="http://xcri.org/profiles/1.2/catalog" xmlns:dc="http://purl.org/dc/elements/1.1/">
            <dc:subject>Chemistry</dc:subject>
            <dc:subject>Physics</dc:subject>
            <dc:subject>Chemistry</dc:subject>
        </course>"#;
        let (common, messages) = parse(xml, &ExtensionRegistry::new());
        let subjects: Vec<_> = common
            .subjects
            .iter()
            .map(|s| s.node.value().unwrap_or_default().to_string())
            .collect();
        assert_eq!(subjects, ["Chemistry", "Physics", "Chemistry"]);
        assert!(messages.is_empty());
    }

    #[test]
    fn test_malformed_child_is_skipped() {
        let xml = r#"<course xmlns="http://xcri.org/profiles/1.2/catalog" xmlns:mlo="http://purl.org/net/mlo">
            <mlo:url>not a url</mlo:url>
            <mlo:url>http://example.ac.uk/</mlo:url>
            <image alt="Logo"/>
        </course>"#;
        let (common, messages) = parse(xml, &ExtensionRegistry::new());
        assert_eq!(common.urls.len(), 1);
        assert!(common.images.is_empty());
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("skipping invalid <url>")));
        assert!(messages.iter().any(|m| m.contains("skipping invalid <image>")));
    }

    #[test]
    fn test_quality_checks() {
        let xml = r#"<course xmlns="http://xcri.org/profiles/1.2/catalog" xmlns:dc="http://purl.org/dc/elements/1.1/">
            <dc:contributor>Dr Smith</dc:contributor>
            <dc:title xml:lang="en">Chemistry</dc:title>
            <dc:title xml:lang="en">Chemistry BSc</dc:title>
            <dc:title xml:lang="cy">Cemeg</dc:title>
            <image src="logo.bmp"/>
            <dc:date>2012</dc:date>
            <dc:hasPart>X</dc:hasPart>
        </course>"#;
        let (common, messages) = parse(xml, &ExtensionRegistry::new());
        assert_eq!(common.titles.len(), 3);
        assert_eq!(messages.len(), 6);
        assert!(messages[0].starts_with("date:"));
        assert!(messages[1].starts_with("hasPart:"));
        assert!(messages[2].starts_with("contributor:"));
        assert!(messages[3].contains("('en')"));
        assert!(messages[4].contains("alternative text"));
        assert!(messages[5].contains("standard formats"));
    }

    #[test]
    fn test_registered_extension_is_materialized() {
        let ns = Namespace::new("urn:vendor");
        let mut registry = ExtensionRegistry::new();
        registry.register_raw("foo", ns.clone());

        let xml = r#"<course xmlns="http://xcri.org/profiles/1.2/catalog" xmlns:v="urn:vendor" xmlns:w="urn:other">
            <v:foo>1</v:foo>
            <w:foo>ignored</w:foo>
            <v:foo>2</v:foo>
            <v:bar>ignored</v:bar>
        </course>"#;
        let (common, messages) = parse(xml, &registry);
        assert_eq!(common.extensions.len(), 2);
        assert!(common.extensions.iter().all(|e| e.namespace() == &ns));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_known_fields_are_not_offered_to_extensions() {
        let mut registry = ExtensionRegistry::new();
        registry.register_raw("title", DC.clone());

        let xml = r#"<course xmlns="http://xcri.org/profiles/1.2/catalog" xmlns:dc="http://purl.org/dc/elements/1.1/">
            <dc:title>Chemistry</dc:title>
        </course>"#;
        let (common, _) = parse(xml, &registry);
        assert_eq!(common.titles.len(), 1);
        assert!(common.extensions.is_empty());
    }

    #[test]
    fn test_serialize_order() {
        let mut common = Common::titled("Chemistry");
        common.urls.push(Url::new("http://example.ac.uk/").unwrap());
        common.contributors.push(Contributor {
            node: NodeData::new("Dr Smith"),
        });
        let element = common.to_xml("course", &XCRI);
        let names: Vec<&str> = element.children().iter().map(XmlElement::name).collect();
        assert_eq!(names, ["contributor", "title", "url"]);
    }
}
