//! Temporal leaves: start, end and application window of a presentation.

use chrono::{DateTime, FixedOffset};

use super::NodeData;
use crate::config::{format_xsd_datetime, parse_xsd_datetime};
use crate::error::{BinderError, Result};
use crate::xml::{Namespace, XmlElement};

/// A human-readable date with an optional machine-readable `@dtf`.
///
/// The same shape is used by several element names, so the name is supplied
/// by the owner instead of being fixed on the type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Temporal {
    pub node: NodeData,
    pub dtf: Option<DateTime<FixedOffset>>,
}

impl Temporal {
    /// Bind a temporal element.
    ///
    /// # Errors
    /// Returns `InvalidElement` if `@dtf` is present but not a valid date.
    pub fn from_xml(element: &XmlElement) -> Result<Self> {
        let dtf = match element.attribute("dtf", &Namespace::NONE) {
            Some(raw) => Some(parse_xsd_datetime(raw).ok_or_else(|| {
                BinderError::invalid(element.name(), format!("@dtf contains invalid date: '{raw}'"))
            })?),
            None => None,
        };
        Ok(Self {
            node: NodeData::from_xml(element),
            dtf,
        })
    }

    #[must_use]
    pub fn to_xml(&self, name: &str, namespace: &Namespace) -> XmlElement {
        let mut element = self.node.to_xml(name, namespace);
        if let Some(dtf) = &self.dtf {
            element.set_attribute("dtf", Namespace::NONE, format_xsd_datetime(dtf));
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MLO;

    #[test]
    fn test_temporal_with_dtf() {
        let element = XmlElement::parse(
            r#"<start xmlns="http://purl.org/net/mlo" dtf="2012-09-24">24 September 2012</start>"#,
        )
        .unwrap();
        let start = Temporal::from_xml(&element).unwrap();
        assert_eq!(start.node.value(), Some("24 September 2012"));
        assert!(start.dtf.is_some());

        let reparsed = Temporal::from_xml(&start.to_xml("start", &MLO)).unwrap();
        assert_eq!(reparsed, start);
    }

    #[test]
    fn test_temporal_rejects_bad_dtf() {
        let element =
            XmlElement::parse(r#"<start xmlns="http://purl.org/net/mlo" dtf="autumn">Autumn</start>"#)
                .unwrap();
        let err = Temporal::from_xml(&element).unwrap_err();
        assert!(err.to_string().contains("autumn"));
    }

    #[test]
    fn test_temporal_without_dtf() {
        let element =
            XmlElement::parse(r#"<end xmlns="http://xcri.org/profiles/1.2/catalog">June</end>"#).unwrap();
        let end = Temporal::from_xml(&element).unwrap();
        assert_eq!(end.dtf, None);
    }
}
