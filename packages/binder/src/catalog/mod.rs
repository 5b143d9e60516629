//! The catalog object graph.
//!
//! Composite nodes live in an arena owned by [`Catalog`] and refer to each
//! other by [`NodeId`]. A node's parent is recorded once, when the node is
//! attached, and never changes afterwards. Index 0 is always the root
//! catalog node.
//!
//! Descriptions, subjects and images are inherited: when a node has none of
//! its own, the resolved accessors return a copy of the nearest ancestor's
//! collection.
//!
//! # Example
//!
//! ```
//! use xcri_binder::catalog::{Catalog, Common};
//! use xcri_binder::elements::{Description, NodeData};
//!
//! let mut catalog = Catalog::new();
//! let mut provider = Common::titled("Example University");
//! provider.descriptions.push(Description { node: NodeData::new("A university") });
//! let provider = catalog.add_provider(provider);
//! let course = catalog.add_course(provider, Common::titled("Chemistry")).unwrap();
//!
//! assert_eq!(catalog.descriptions(course).len(), 1);
//! assert!(catalog.node(course).unwrap().common.descriptions.is_empty());
//! ```

mod assembler;
mod common;
mod levels;

pub(crate) use assembler::parse_catalog;
pub use common::Common;
pub use levels::{CourseLevel, Level, PresentationLevel, ProviderLevel};

use chrono::{DateTime, FixedOffset, Utc};

use crate::config::{format_xsd_datetime, XCRI};
use crate::elements::{Description, Image, Subject};
use crate::error::{BinderError, Result};
use crate::xml::{Namespace, XmlElement};

/// Handle of a node in a [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root catalog node.
    pub const ROOT: NodeId = NodeId(0);

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One composite node: shared fields, level data and arena links.
#[derive(Debug)]
pub struct Composite {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub common: Common,
    level: Level,
}

impl Composite {
    fn new(parent: Option<NodeId>, common: Common, level: Level) -> Self {
        Self {
            parent,
            children: Vec::new(),
            common,
            level,
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child composites in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Element name of the node.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.level.name()
    }

    pub fn provider_mut(&mut self) -> Option<&mut ProviderLevel> {
        match &mut self.level {
            Level::Provider(provider) => Some(provider),
            _ => None,
        }
    }

    pub fn course_mut(&mut self) -> Option<&mut CourseLevel> {
        match &mut self.level {
            Level::Course(course) => Some(course),
            _ => None,
        }
    }

    pub fn presentation_mut(&mut self) -> Option<&mut PresentationLevel> {
        match &mut self.level {
            Level::Presentation(presentation) => Some(presentation),
            _ => None,
        }
    }
}

/// A course catalog: the root node and every node below it.
#[derive(Debug)]
pub struct Catalog {
    nodes: Vec<Composite>,
    generated: DateTime<FixedOffset>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog generated now.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generated(Utc::now().fixed_offset())
    }

    /// Create an empty catalog with an explicit generation timestamp.
    #[must_use]
    pub fn with_generated(generated: DateTime<FixedOffset>) -> Self {
        Self::with_root(Common::default(), generated)
    }

    pub(crate) fn with_root(common: Common, generated: DateTime<FixedOffset>) -> Self {
        Self {
            nodes: vec![Composite::new(None, common, Level::Catalog)],
            generated,
        }
    }

    /// When the catalog was generated.
    #[must_use]
    pub fn generated(&self) -> DateTime<FixedOffset> {
        self.generated
    }

    pub fn set_generated(&mut self, generated: DateTime<FixedOffset>) {
        self.generated = generated;
    }

    /// The root catalog node.
    #[must_use]
    pub fn root(&self) -> &Composite {
        &self.nodes[NodeId::ROOT.0]
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Composite> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Composite> {
        self.nodes.get_mut(id.0)
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Composite::parent)
    }

    /// Number of nodes, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Composite)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    #[must_use]
    pub fn providers(&self) -> &[NodeId] {
        &self.root().children
    }

    /// Courses of a provider; empty for any other node.
    #[must_use]
    pub fn courses(&self, provider: NodeId) -> &[NodeId] {
        self.children_at(provider, "provider")
    }

    /// Presentations of a course; empty for any other node.
    #[must_use]
    pub fn presentations(&self, course: NodeId) -> &[NodeId] {
        self.children_at(course, "course")
    }

    fn children_at(&self, id: NodeId, level: &str) -> &[NodeId] {
        match self.node(id) {
            Some(node) if node.name() == level => &node.children,
            _ => &[],
        }
    }

    /// Attach a provider below the root.
    pub fn add_provider(&mut self, common: Common) -> NodeId {
        self.push(NodeId::ROOT, common, Level::Provider(ProviderLevel::default()))
    }

    /// Attach a course below a provider.
    ///
    /// # Errors
    /// Returns `Hierarchy` if `provider` is not a provider node.
    pub fn add_course(&mut self, provider: NodeId, common: Common) -> Result<NodeId> {
        self.attach(provider, "provider", common, Level::Course(CourseLevel::default()))
    }

    /// Attach a presentation below a course.
    ///
    /// # Errors
    /// Returns `Hierarchy` if `course` is not a course node.
    pub fn add_presentation(
        &mut self,
        course: NodeId,
        common: Common,
        presentation: PresentationLevel,
    ) -> Result<NodeId> {
        self.attach(course, "course", common, Level::Presentation(presentation))
    }

    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        expected: &str,
        common: Common,
        level: Level,
    ) -> Result<NodeId> {
        match self.node(parent) {
            Some(node) if node.name() == expected => Ok(self.push(parent, common, level)),
            Some(node) => Err(BinderError::Hierarchy {
                parent: format!("node {} <{}>", parent.0, node.name()),
                expected: expected.to_string(),
            }),
            None => Err(BinderError::Hierarchy {
                parent: format!("unknown node {}", parent.0),
                expected: expected.to_string(),
            }),
        }
    }

    fn push(&mut self, parent: NodeId, common: Common, level: Level) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Composite::new(Some(parent), common, level));
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    /// The node and its ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Composite> {
        std::iter::successors(self.node(id), |node| {
            node.parent.and_then(|parent| self.node(parent))
        })
    }

    /// Resolved descriptions of a node.
    #[must_use]
    pub fn descriptions(&self, id: NodeId) -> Vec<Description> {
        self.resolve(id, |common| &common.descriptions)
    }

    /// Resolved subjects of a node.
    #[must_use]
    pub fn subjects(&self, id: NodeId) -> Vec<Subject> {
        self.resolve(id, |common| &common.subjects)
    }

    /// Resolved images of a node.
    #[must_use]
    pub fn images(&self, id: NodeId) -> Vec<Image> {
        self.resolve(id, |common| &common.images)
    }

    fn resolve<T: Clone>(&self, id: NodeId, field: impl Fn(&Common) -> &Vec<T>) -> Vec<T> {
        self.ancestors(id)
            .map(|node| field(&node.common))
            .find(|values| !values.is_empty())
            .cloned()
            .unwrap_or_default()
    }

    /// Build the document tree from local values.
    #[must_use]
    pub fn to_xml(&self) -> XmlElement {
        let mut element = self.node_to_xml(NodeId::ROOT);
        element.set_attribute("generated", Namespace::NONE, format_xsd_datetime(&self.generated));
        element
    }

    fn node_to_xml(&self, id: NodeId) -> XmlElement {
        let Some(node) = self.node(id) else {
            return XmlElement::new("catalog", XCRI.clone());
        };
        let mut element = node.common.to_xml(node.name(), &XCRI);
        for child in &node.children {
            element.push_child(self.node_to_xml(*child));
        }
        node.level.write_fields(&mut element);
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::NodeData;
    use pretty_assertions::assert_eq;

    fn subject(value: &str) -> Subject {
        Subject {
            node: NodeData::new(value),
        }
    }

    fn sample() -> (Catalog, NodeId, NodeId, NodeId) {
        let mut catalog = Catalog::new();
        let mut provider = Common::titled("Example University");
        provider.subjects.push(subject("Science"));
        let provider = catalog.add_provider(provider);
        let course = catalog.add_course(provider, Common::titled("Chemistry")).unwrap();
        let presentation = catalog
            .add_presentation(course, Common::default(), PresentationLevel::default())
            .unwrap();
        (catalog, provider, course, presentation)
    }

    #[test]
    fn test_parent_links() {
        let (catalog, provider, course, presentation) = sample();
        assert_eq!(catalog.parent(NodeId::ROOT), None);
        assert_eq!(catalog.parent(provider), Some(NodeId::ROOT));
        assert_eq!(catalog.parent(course), Some(provider));
        assert_eq!(catalog.parent(presentation), Some(course));
        assert_eq!(catalog.providers(), [provider]);
        assert_eq!(catalog.courses(provider), [course]);
        assert_eq!(catalog.presentations(course), [presentation]);
        assert!(catalog.courses(course).is_empty());
    }

    #[test]
    fn test_inherits_from_nearest_non_empty_ancestor() {
        let (mut catalog, _, course, presentation) = sample();
        assert_eq!(catalog.subjects(presentation), vec![subject("Science")]);

        catalog
            .node_mut(course)
            .unwrap()
            .common
            .subjects
            .push(subject("Chemistry"));
        assert_eq!(catalog.subjects(presentation), vec![subject("Chemistry")]);
        assert_eq!(catalog.subjects(course), vec![subject("Chemistry")]);
    }

    #[test]
    fn test_resolved_values_are_copies() {
        let (mut catalog, provider, _, presentation) = sample();
        let mut observed = catalog.subjects(presentation);
        observed.push(subject("Mutated"));
        assert_eq!(catalog.node(provider).unwrap().common.subjects.len(), 1);

        catalog
            .node_mut(provider)
            .unwrap()
            .common
            .subjects
            .push(subject("Later"));
        assert_eq!(observed.len(), 2);
        assert_eq!(observed[0], subject("Science"));
    }

    #[test]
    fn test_nothing_to_inherit() {
        let (catalog, _, course, _) = sample();
        assert!(catalog.images(course).is_empty());
        assert!(catalog.descriptions(NodeId::ROOT).is_empty());
        assert!(catalog.subjects(NodeId(99)).is_empty());
    }

    #[test]
    fn test_attach_below_wrong_level_fails() {
        let (mut catalog, provider, _, presentation) = sample();
        let err = catalog
            .add_presentation(provider, Common::default(), PresentationLevel::default())
            .unwrap_err();
        assert!(matches!(err, BinderError::Hierarchy { .. }));
        assert!(catalog.add_course(presentation, Common::default()).is_err());
        assert!(catalog.add_course(NodeId(42), Common::default()).is_err());
        assert_eq!(catalog.node_count(), 4);
    }

    #[test]
    fn test_to_xml_uses_local_values() {
        let (catalog, _, _, _) = sample();
        let root = catalog.to_xml();
        assert!(root.is("catalog", &XCRI));
        assert!(root.attribute("generated", &Namespace::NONE).is_some());

        let provider = &root.children()[0];
        let course = provider
            .children()
            .iter()
            .find(|child| child.name() == "course")
            .unwrap();
        let names: Vec<&str> = course.children().iter().map(XmlElement::name).collect();
        assert_eq!(names, ["title", "presentation"]);
    }

    #[test]
    fn test_set_generated() {
        let mut catalog = Catalog::new();
        let generated = crate::config::parse_xsd_datetime("2012-01-01T00:00:00Z").unwrap();
        catalog.set_generated(generated);
        assert_eq!(catalog.generated(), generated);
    }
}
