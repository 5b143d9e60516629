//! Lenient child lookup.
//!
//! Catalog feeds come from many producers and few of them follow the
//! multiplicity rules exactly. Lookups here never fail: a field that should
//! occur at most once but occurs several times yields its first occurrence
//! together with the full match set, and the caller decides how to report it.

use super::tree::{Namespace, XmlElement};

/// Find all direct children with the given name and namespace.
///
/// Zero matches is a valid, silent result.
///
/// # Examples
/// ```
/// use xcri_binder::xml::{find_all, Namespace, XmlElement};
///
/// let root = XmlElement::parse(r#"<root><item>1</item><other/><item>2</item></root>"#).unwrap();
/// let items: Vec<_> = find_all(&root, "item", &Namespace::NONE).collect();
/// assert_eq!(items.len(), 2);
/// ```
pub fn find_all<'a>(
    container: &'a XmlElement,
    name: &'a str,
    namespace: &'a Namespace,
) -> impl Iterator<Item = &'a XmlElement> + 'a {
    container
        .children()
        .iter()
        .filter(move |child| child.is(name, namespace))
}

/// Find the child that should occur at most once.
///
/// # Examples
/// ```
/// use xcri_binder::xml::{find_one, Namespace, XmlElement};
///
/// let root = XmlElement::parse(r#"<root><loc>a</loc><loc>b</loc></root>"#).unwrap();
/// let lookup = find_one(&root, "loc", &Namespace::NONE);
/// assert_eq!(lookup.primary().and_then(|l| l.text()), Some("a"));
/// assert!(lookup.is_ambiguous());
/// ```
pub fn find_one<'a>(container: &'a XmlElement, name: &str, namespace: &Namespace) -> SingleLookup<'a> {
    SingleLookup {
        name: name.to_string(),
        matches: container
            .children()
            .iter()
            .filter(|child| child.is(name, namespace))
            .collect(),
    }
}

/// Result of a lookup for a child expected at most once.
#[derive(Debug, Clone)]
pub struct SingleLookup<'a> {
    name: String,
    matches: Vec<&'a XmlElement>,
}

impl<'a> SingleLookup<'a> {
    /// The designated primary: the first match, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&'a XmlElement> {
        self.matches.first().copied()
    }

    /// Every match, in document order.
    #[must_use]
    pub fn matches(&self) -> &[&'a XmlElement] {
        &self.matches
    }

    /// Whether more than one match was found.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.matches.len() > 1
    }

    /// The multiplicity violation message, when the lookup is ambiguous.
    #[must_use]
    pub fn diagnostic(&self) -> Option<String> {
        self.is_ambiguous().then(|| {
            format!(
                "multiple <{}> elements found ({}) where at most one expected; \
                 all but the first occurrence will be ignored",
                self.name,
                self.matches.len()
            )
        })
    }
}
