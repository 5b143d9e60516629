//! Recursive assembly of the catalog hierarchy.
//!
//! Each level parses its shared composite fields, attaches itself to the
//! arena below its parent, runs its own quality checks and then recurses
//! into its child levels. Only a malformed `@generated` timestamp stops the
//! parse; everything else becomes a diagnostic.

use chrono::{DateTime, FixedOffset, Utc};

use super::common::Common;
use super::levels::{CourseLevel, Level, PresentationLevel, ProviderLevel};
use super::{Catalog, NodeId};
use crate::config::{has_time_of_day, parse_xsd_datetime, MLO, XCRI};
use crate::diagnostics::{Diagnostics, Severity};
use crate::elements::{Element, Location, NodeData, Temporal};
use crate::error::{BinderError, Result};
use crate::registry::ExtensionRegistry;
use crate::xml::{clark_name, find_all, find_one, Namespace, XmlElement};

static CATALOG_FIELDS: [(&str, &Namespace); 1] = [("provider", &XCRI)];

static PROVIDER_FIELDS: [(&str, &Namespace); 2] = [("course", &XCRI), ("location", &MLO)];

static COURSE_FIELDS: [(&str, &Namespace); 4] = [
    ("presentation", &XCRI),
    ("qualification", &MLO),
    ("credit", &MLO),
    ("level", &MLO),
];

static PRESENTATION_FIELDS: [(&str, &Namespace); 11] = [
    ("start", &MLO),
    ("end", &XCRI),
    ("applyFrom", &XCRI),
    ("applyUntil", &XCRI),
    ("duration", &MLO),
    ("studyMode", &XCRI),
    ("attendanceMode", &XCRI),
    ("attendancePattern", &XCRI),
    ("languageOfInstruction", &MLO),
    ("places", &MLO),
    ("cost", &MLO),
];

/// State threaded through one parse: the registry, collected diagnostics
/// and the path of the composite being parsed.
pub(crate) struct ParseContext<'r> {
    registry: &'r ExtensionRegistry,
    diagnostics: Diagnostics,
    path: Vec<String>,
}

impl<'r> ParseContext<'r> {
    pub(crate) fn new(registry: &'r ExtensionRegistry) -> Self {
        Self {
            registry,
            diagnostics: Diagnostics::new(),
            path: Vec::new(),
        }
    }

    pub(crate) fn registry(&self) -> &'r ExtensionRegistry {
        self.registry
    }

    /// Path of the current composite, e.g. `catalog/provider[0]/course[2]`.
    pub(crate) fn path(&self) -> String {
        self.path.join("/")
    }

    /// Run `f` one level deeper in the path.
    fn scoped<T>(&mut self, segment: String, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    pub(crate) fn report(&mut self, severity: Severity, message: impl Into<String>) {
        let path = self.path();
        self.diagnostics.push(severity, path, message);
    }

    pub(crate) fn info(&mut self, message: impl Into<String>) {
        self.report(Severity::Info, message);
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.report(Severity::Warning, message);
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.report(Severity::Error, message);
    }

    /// Lenient single lookup that reports ambiguity as a warning.
    pub(crate) fn find_one<'a>(
        &mut self,
        container: &'a XmlElement,
        name: &str,
        namespace: &Namespace,
    ) -> Option<&'a XmlElement> {
        let lookup = find_one(container, name, namespace);
        if let Some(message) = lookup.diagnostic() {
            self.warn(message);
        }
        lookup.primary()
    }

    /// Bind every child of one kind, dropping malformed ones.
    pub(crate) fn collect<T: Element>(&mut self, element: &XmlElement, severity: Severity) -> Vec<T> {
        let mut items = Vec::new();
        for child in find_all(element, T::NAME, T::namespace()) {
            match T::from_xml(child) {
                Ok(item) => items.push(item),
                Err(err) => self.report(
                    severity,
                    format!("skipping invalid <{}> element: {err}", T::NAME),
                ),
            }
        }
        items
    }

    /// Bind the child expected at most once.
    fn bind_one<T: Element>(&mut self, element: &XmlElement) -> Option<T> {
        let child = self.find_one(element, T::NAME, T::namespace())?;
        match T::from_xml(child) {
            Ok(item) => Some(item),
            Err(err) => {
                self.warn(format!("skipping invalid <{}> element: {err}", T::NAME));
                None
            }
        }
    }

    fn temporal(&mut self, element: &XmlElement, name: &str, namespace: &Namespace) -> Option<Temporal> {
        let child = self.find_one(element, name, namespace)?;
        match Temporal::from_xml(child) {
            Ok(temporal) => Some(temporal),
            Err(err) => {
                self.warn(format!("skipping invalid <{name}> element: {err}"));
                None
            }
        }
    }

    fn node_one(&mut self, element: &XmlElement, name: &str, namespace: &Namespace) -> Option<NodeData> {
        self.find_one(element, name, namespace)
            .map(NodeData::from_xml)
    }

    pub(crate) fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

/// Parse a catalog document's root element.
///
/// # Errors
/// Returns `InvalidGenerated` for a malformed `@generated` timestamp. No
/// partial catalog is returned.
pub(crate) fn parse_catalog(
    root: &XmlElement,
    registry: &ExtensionRegistry,
) -> Result<(Catalog, Diagnostics)> {
    let mut ctx = ParseContext::new(registry);
    ctx.path.push("catalog".to_string());

    if !root.is("catalog", &XCRI) {
        ctx.warn(format!(
            "root element is {}, expected {}",
            root.clark_name(),
            clark_name("catalog", &XCRI)
        ));
    }

    let generated = parse_generated(root, &mut ctx)?;
    let common = Common::parse(root, &CATALOG_FIELDS, &mut ctx);
    let mut catalog = Catalog::with_root(common, generated);

    for (index, element) in find_all(root, "provider", &XCRI).enumerate() {
        ctx.scoped(format!("provider[{index}]"), |ctx| {
            parse_provider(element, &mut catalog, ctx)
        })?;
    }

    tracing::debug!(
        nodes = catalog.node_count(),
        diagnostics = ctx.diagnostics.len(),
        "Parsed catalog"
    );
    Ok((catalog, ctx.into_diagnostics()))
}

fn parse_generated(root: &XmlElement, ctx: &mut ParseContext<'_>) -> Result<DateTime<FixedOffset>> {
    let Some(raw) = root.attribute("generated", &Namespace::NONE) else {
        return Ok(Utc::now().fixed_offset());
    };

    let Some(generated) = parse_xsd_datetime(raw) else {
        tracing::error!(value = %raw, "catalog: @generated contains invalid date");
        return Err(BinderError::InvalidGenerated {
            field: "generated".to_string(),
            value: raw.to_string(),
        });
    };

    if !has_time_of_day(raw) {
        ctx.warn(format!("@generated contains a date but no time: '{raw}'"));
    }
    Ok(generated)
}

fn parse_provider(element: &XmlElement, catalog: &mut Catalog, ctx: &mut ParseContext<'_>) -> Result<()> {
    let common = Common::parse(element, &PROVIDER_FIELDS, ctx);
    if common.urls.is_empty() {
        ctx.warn("provider has no URL");
    }
    if common.titles.is_empty() {
        ctx.warn("provider has no title");
    }

    let level = ProviderLevel {
        location: ctx.bind_one::<Location>(element),
    };
    let provider = catalog.attach(NodeId::ROOT, "catalog", common, Level::Provider(level))?;

    for (index, child) in find_all(element, "course", &XCRI).enumerate() {
        ctx.scoped(format!("course[{index}]"), |ctx| {
            parse_course(child, catalog, provider, ctx)
        })?;
    }
    if catalog.courses(provider).is_empty() {
        ctx.warn("provider contains no courses");
    }
    Ok(())
}

fn parse_course(
    element: &XmlElement,
    catalog: &mut Catalog,
    provider: NodeId,
    ctx: &mut ParseContext<'_>,
) -> Result<()> {
    let common = Common::parse(element, &COURSE_FIELDS, ctx);

    if common.identifiers.is_empty() {
        ctx.warn("course does not contain any identifiers");
    } else if !common
        .identifiers
        .iter()
        .any(|identifier| identifier.is_uri() || identifier.node.type_attr.is_some())
    {
        ctx.warn("course does not contain a URI identifier or an identifier with a type");
    }
    if common.titles.is_empty() {
        ctx.warn("course has no title");
    }
    if find_all(element, "level", &MLO).next().is_some() {
        ctx.warn("level is not recommended");
    }

    let level = CourseLevel {
        qualifications: ctx.collect(element, Severity::Warning),
        credits: ctx.collect(element, Severity::Warning),
    };
    let course = catalog.attach(provider, "provider", common, Level::Course(level))?;

    if catalog.subjects(course).is_empty() {
        ctx.warn("course does not contain a subject");
    }

    for (index, child) in find_all(element, "presentation", &XCRI).enumerate() {
        ctx.scoped(format!("presentation[{index}]"), |ctx| {
            parse_presentation(child, catalog, course, ctx)
        })?;
    }
    Ok(())
}

fn parse_presentation(
    element: &XmlElement,
    catalog: &mut Catalog,
    course: NodeId,
    ctx: &mut ParseContext<'_>,
) -> Result<()> {
    let common = Common::parse(element, &PRESENTATION_FIELDS, ctx);
    let level = PresentationLevel {
        start: ctx.temporal(element, "start", &MLO),
        end: ctx.temporal(element, "end", &XCRI),
        apply_from: ctx.temporal(element, "applyFrom", &XCRI),
        apply_until: ctx.temporal(element, "applyUntil", &XCRI),
        duration: ctx.node_one(element, "duration", &MLO),
        study_mode: ctx.node_one(element, "studyMode", &XCRI),
        attendance_mode: ctx.node_one(element, "attendanceMode", &XCRI),
        attendance_pattern: ctx.node_one(element, "attendancePattern", &XCRI),
        languages_of_instruction: find_all(element, "languageOfInstruction", &MLO)
            .map(NodeData::from_xml)
            .collect(),
        places: ctx.node_one(element, "places", &MLO),
        cost: ctx.node_one(element, "cost", &MLO),
    };
    catalog.attach(course, "course", common, Level::Presentation(level))?;
    Ok(())
}
