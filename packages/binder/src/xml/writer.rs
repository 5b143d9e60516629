//! Serialize an element tree to XML text.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::tree::{Namespace, XmlElement};
use crate::config::{conventional_prefix, XML_NS};
use crate::error::{BinderError, Result};

/// Serialize an element tree as a standalone UTF-8 document.
///
/// All namespaces are declared on the root element. The root's namespace is
/// bound as the default namespace; every other namespace gets its
/// conventional prefix or a generated `nsN` one.
///
/// # Errors
/// Returns `Write` if text or an attribute value contains a character XML
/// cannot represent, or if the underlying writer fails.
///
/// # Examples
/// ```
/// use xcri_binder::xml::{to_string, Namespace, XmlElement};
///
/// let ns = Namespace::from_static("http://xcri.org/profiles/1.2/catalog");
/// let root = XmlElement::new("catalog", ns.clone())
///     .with_child(XmlElement::new("provider", ns));
/// let xml = to_string(&root).unwrap();
/// assert!(xml.contains(r#"<catalog xmlns="http://xcri.org/profiles/1.2/catalog">"#));
/// assert!(xml.contains("<provider/>"));
/// ```
pub fn to_string(root: &XmlElement) -> Result<String> {
    let prefixes = Prefixes::collect(root);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(BinderError::write)?;
    write_element(&mut writer, root, &prefixes, true, false)?;
    String::from_utf8(writer.into_inner()).map_err(BinderError::write)
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
    prefixes: &Prefixes,
    is_root: bool,
    default_in_scope: bool,
) -> Result<()> {
    let name = prefixes.element_name(element);
    let mut start = BytesStart::new(name.as_str());
    let mut in_scope = default_in_scope;

    if is_root {
        if let Some(default) = &prefixes.default {
            start.push_attribute(("xmlns", default.uri()));
            in_scope = true;
        }
        for (prefix, namespace) in &prefixes.bindings {
            let declaration = format!("xmlns:{prefix}");
            start.push_attribute((declaration.as_str(), namespace.uri()));
        }
    } else if element.namespace().is_none() && in_scope {
        start.push_attribute(("xmlns", ""));
        in_scope = false;
    } else if prefixes.is_default(element.namespace()) && !in_scope {
        if let Some(default) = &prefixes.default {
            start.push_attribute(("xmlns", default.uri()));
        }
        in_scope = true;
    }

    for attr in element.attributes() {
        check_chars(&attr.value)?;
        let qualified = prefixes.attribute_name(&attr.name, &attr.namespace);
        start.push_attribute((qualified.as_str(), attr.value.as_str()));
    }

    if element.text().is_none() && element.children().is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(BinderError::write);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(BinderError::write)?;
    if let Some(text) = element.text() {
        check_chars(text)?;
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(BinderError::write)?;
    }
    for child in element.children() {
        write_element(writer, child, prefixes, false, in_scope)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(BinderError::write)
}

/// Reject characters outside the XML 1.0 `Char` production.
fn check_chars(value: &str) -> Result<()> {
    match value
        .chars()
        .find(|&c| matches!(c, '\0'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'))
    {
        Some(c) => Err(BinderError::Write(format!(
            "character U+{:04X} is not allowed in XML",
            u32::from(c)
        ))),
        None => Ok(()),
    }
}

/// Namespace prefix bindings for one document.
struct Prefixes {
    default: Option<Namespace>,
    bindings: Vec<(String, Namespace)>,
}

impl Prefixes {
    fn collect(root: &XmlElement) -> Self {
        let mut element_namespaces = Vec::new();
        let mut attribute_namespaces = Vec::new();
        gather(root, &mut element_namespaces, &mut attribute_namespaces);

        let default = (!root.namespace().is_none()).then(|| root.namespace().clone());
        let mut bindings: Vec<(String, Namespace)> = Vec::new();
        let mut generated = 0;

        for namespace in element_namespaces.iter().chain(attribute_namespaces.iter()) {
            if namespace.is_none()
                || namespace.uri() == XML_NS
                || bindings.iter().any(|(_, bound)| bound == namespace)
            {
                continue;
            }
            // the default namespace only needs a prefix when an attribute uses it
            if default.as_ref() == Some(namespace) && !attribute_namespaces.contains(namespace) {
                continue;
            }
            let prefix = match conventional_prefix(namespace.uri()) {
                Some(p) if !bindings.iter().any(|(bound, _)| bound == p) => p.to_string(),
                _ => {
                    generated += 1;
                    format!("ns{generated}")
                }
            };
            bindings.push((prefix, namespace.clone()));
        }

        Self { default, bindings }
    }

    fn is_default(&self, namespace: &Namespace) -> bool {
        self.default.as_ref() == Some(namespace)
    }

    fn prefix(&self, namespace: &Namespace) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, bound)| bound == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    fn element_name(&self, element: &XmlElement) -> String {
        let namespace = element.namespace();
        if namespace.is_none() || self.is_default(namespace) {
            return element.name().to_string();
        }
        match self.prefix(namespace) {
            Some(prefix) => format!("{prefix}:{}", element.name()),
            None => element.name().to_string(),
        }
    }

    fn attribute_name(&self, name: &str, namespace: &Namespace) -> String {
        if namespace.is_none() {
            return name.to_string();
        }
        if namespace.uri() == XML_NS {
            return format!("xml:{name}");
        }
        match self.prefix(namespace) {
            Some(prefix) => format!("{prefix}:{name}"),
            None => name.to_string(),
        }
    }
}

fn gather(
    element: &XmlElement,
    element_namespaces: &mut Vec<Namespace>,
    attribute_namespaces: &mut Vec<Namespace>,
) {
    if !element_namespaces.contains(element.namespace()) {
        element_namespaces.push(element.namespace().clone());
    }
    for attr in element.attributes() {
        if !attribute_namespaces.contains(&attr.namespace) {
            attribute_namespaces.push(attr.namespace.clone());
        }
    }
    for child in element.children() {
        gather(child, element_namespaces, attribute_namespaces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DC, XCRI, XML, XSI};

    #[test]
    fn test_round_trip_through_parser() {
        let root = XmlElement::new("catalog", XCRI.clone())
            .with_attribute("generated", Namespace::NONE, "2011-01-01T10:00:00Z")
            .with_child(
                XmlElement::new("title", DC.clone())
                    .with_text("Fish & Chips <101>")
                    .with_attribute("lang", XML.clone(), "en")
                    .with_attribute("type", XSI.clone(), "short"),
            )
            .with_child(XmlElement::new("plain", Namespace::NONE).with_text("x"));

        let xml = to_string(&root).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("xmlns:dc=\"http://purl.org/dc/elements/1.1/\""));
        assert!(!xml.contains("xmlns:xml"));

        let reparsed = XmlElement::parse(&xml).unwrap();
        assert_eq!(reparsed, root);
    }

    #[test]
    fn test_control_characters_are_rejected() {
        let text = XmlElement::new("catalog", XCRI.clone()).with_text("a\u{1}b");
        let err = to_string(&text).unwrap_err();
        assert!(err.to_string().contains("U+0001"));

        let attribute = XmlElement::new("catalog", XCRI.clone())
            .with_attribute("generated", Namespace::NONE, "\u{ffff}");
        assert!(matches!(to_string(&attribute), Err(BinderError::Write(_))));

        let whitespace = XmlElement::new("catalog", XCRI.clone()).with_text("a\tb\nc");
        assert!(to_string(&whitespace).is_ok());
    }

    #[test]
    fn test_default_namespace_restored_below_unqualified_element() {
        let root = XmlElement::new("catalog", XCRI.clone()).with_child(
            XmlElement::new("wrapper", Namespace::NONE)
                .with_child(XmlElement::new("provider", XCRI.clone())),
        );
        let xml = to_string(&root).unwrap();
        assert_eq!(XmlElement::parse(&xml).unwrap(), root);
    }

    #[test]
    fn test_unknown_namespace_gets_generated_prefix() {
        let vendor = Namespace::from_static("urn:vendor");
        let root = XmlElement::new("catalog", XCRI.clone())
            .with_child(XmlElement::new("foo", vendor.clone()).with_text("bar"));
        let xml = to_string(&root).unwrap();
        assert!(xml.contains("xmlns:ns1=\"urn:vendor\""));
        assert!(xml.contains("<ns1:foo>bar</ns1:foo>"));
    }

    #[test]
    fn test_attribute_in_default_namespace_is_prefixed() {
        let root = XmlElement::new("catalog", XCRI.clone()).with_attribute(
            "flag",
            XCRI.clone(),
            "1",
        );
        let xml = to_string(&root).unwrap();
        assert_eq!(XmlElement::parse(&xml).unwrap(), root);
    }
}
