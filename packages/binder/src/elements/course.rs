//! Course-level leaves: qualifications and credits.

use super::{child_text, parse_all, push_text, Description, Element, Identifier, NodeData, Title};
use crate::config::{CREDIT, DCTERMS, MLO, XCRI};
use crate::error::{BinderError, Result};
use crate::xml::{Namespace, XmlElement};

/// `mlo:qualification`: the award a course leads to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualification {
    pub node: NodeData,
    pub identifiers: Vec<Identifier>,
    pub titles: Vec<Title>,
    pub descriptions: Vec<Description>,
    pub abbr: Option<String>,
    pub education_level: Option<String>,
    pub awarded_by: Option<String>,
    pub accredited_by: Option<String>,
}

impl Element for Qualification {
    const NAME: &'static str = "qualification";

    fn namespace() -> &'static Namespace {
        &MLO
    }

    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            node: NodeData::from_xml(element),
            identifiers: parse_all(element)?,
            titles: parse_all(element)?,
            descriptions: parse_all(element)?,
            abbr: child_text(element, "abbr", &XCRI),
            education_level: child_text(element, "educationLevel", &DCTERMS),
            awarded_by: child_text(element, "awardedBy", &XCRI),
            accredited_by: child_text(element, "accreditedBy", &XCRI),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = self.node.to_xml(Self::NAME, Self::namespace());
        for identifier in &self.identifiers {
            element.push_child(identifier.to_xml());
        }
        for title in &self.titles {
            element.push_child(title.to_xml());
        }
        for description in &self.descriptions {
            element.push_child(description.to_xml());
        }
        push_text(&mut element, "abbr", &XCRI, self.abbr.as_deref());
        push_text(&mut element, "educationLevel", &DCTERMS, self.education_level.as_deref());
        push_text(&mut element, "awardedBy", &XCRI, self.awarded_by.as_deref());
        push_text(&mut element, "accreditedBy", &XCRI, self.accredited_by.as_deref());
        element
    }
}

/// `mlo:credit`: credit points awarded under a scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credit {
    pub node: NodeData,
    pub scheme: Option<String>,
    pub level: Option<String>,
    /// Numeric credit value, kept as written.
    pub value: Option<String>,
}

impl Element for Credit {
    const NAME: &'static str = "credit";

    fn namespace() -> &'static Namespace {
        &MLO
    }

    fn from_xml(element: &XmlElement) -> Result<Self> {
        let value = child_text(element, "value", &CREDIT);
        if let Some(raw) = &value {
            if !raw.parse::<f64>().is_ok_and(f64::is_finite) {
                return Err(BinderError::invalid(
                    "credit",
                    format!("credit:value is not a number: '{raw}'"),
                ));
            }
        }

        Ok(Self {
            node: NodeData::from_xml(element),
            scheme: child_text(element, "scheme", &CREDIT),
            level: child_text(element, "level", &CREDIT),
            value,
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = self.node.to_xml(Self::NAME, Self::namespace());
        push_text(&mut element, "scheme", &CREDIT, self.scheme.as_deref());
        push_text(&mut element, "level", &CREDIT, self.level.as_deref());
        push_text(&mut element, "value", &CREDIT, self.value.as_deref());
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualification_binds_nested_fields() {
        let xml = r#"<mlo:qualification xmlns:mlo="http://purl.org/net/mlo"
                xmlns:dc="http://purl.org/dc/elements/1.1/"
                xmlns:dcterms="http://purl.org/dc/terms/"
                xmlns="http://xcri.org/profiles/1.2/catalog">
            <dc:identifier>Q-1</dc:identifier>
            <dc:title>BSc (Hons) Chemistry</dc:title>
            <abbr>BSc</abbr>
            <dcterms:educationLevel>6</dcterms:educationLevel>
            <awardedBy>Example University</awardedBy>
        </mlo:qualification>"#;
        let element = XmlElement::parse(xml).unwrap();
        let qualification = Qualification::from_xml(&element).unwrap();

        assert_eq!(qualification.identifiers.len(), 1);
        assert_eq!(qualification.titles[0].node.value(), Some("BSc (Hons) Chemistry"));
        assert_eq!(qualification.abbr.as_deref(), Some("BSc"));
        assert_eq!(qualification.education_level.as_deref(), Some("6"));
        assert_eq!(qualification.awarded_by.as_deref(), Some("Example University"));
        assert_eq!(qualification.accredited_by, None);

        let reparsed = Qualification::from_xml(&qualification.to_xml()).unwrap();
        assert_eq!(reparsed, qualification);
    }

    #[test]
    fn test_credit_rejects_non_numeric_value() {
        let xml = r#"<mlo:credit xmlns:mlo="http://purl.org/net/mlo" xmlns:credit="http://purl.org/net/cm">
            <credit:scheme>CATS</credit:scheme>
            <credit:value>lots</credit:value>
        </mlo:credit>"#;
        let element = XmlElement::parse(xml).unwrap();
        let err = Credit::from_xml(&element).unwrap_err();
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_credit_rejects_non_finite_value() {
        for raw in ["NaN", "inf", "-infinity"] {
            let xml = format!(
                r#"<mlo:credit xmlns:mlo="http://purl.org/net/mlo" xmlns:credit="http://purl.org/net/cm">
                    <credit:value>{raw}</credit:value>
                </mlo:credit>"#
            );
            let element = XmlElement::parse(&xml).unwrap();
            assert!(Credit::from_xml(&element).is_err(), "{raw} accepted");
        }
    }

    #[test]
    fn test_credit_round_trip() {
        let xml = r#"<mlo:credit xmlns:mlo="http://purl.org/net/mlo" xmlns:credit="http://purl.org/net/cm">
            <credit:scheme>CATS</credit:scheme>
            <credit:level>4</credit:level>
            <credit:value>120</credit:value>
        </mlo:credit>"#;
        let element = XmlElement::parse(xml).unwrap();
        let credit = Credit::from_xml(&element).unwrap();
        assert_eq!(credit.value.as_deref(), Some("120"));
        assert_eq!(credit.to_xml(), element);
    }
}
