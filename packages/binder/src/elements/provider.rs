//! Provider-level leaves.

use super::{child_text, push_text, Element, NodeData};
use crate::config::MLO;
use crate::error::Result;
use crate::xml::{find_all, Namespace, XmlElement};

/// `mlo:location`: postal and contact details of a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub node: NodeData,
    pub address: Vec<String>,
    pub town: Option<String>,
    pub postcode: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

impl Element for Location {
    const NAME: &'static str = "location";

    fn namespace() -> &'static Namespace {
        &MLO
    }

    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            node: NodeData::from_xml(element),
            address: find_all(element, "address", &MLO)
                .filter_map(XmlElement::text)
                .map(str::to_string)
                .collect(),
            town: child_text(element, "town", &MLO),
            postcode: child_text(element, "postcode", &MLO),
            phone: child_text(element, "phone", &MLO),
            fax: child_text(element, "fax", &MLO),
            email: child_text(element, "email", &MLO),
            url: child_text(element, "url", &MLO),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = self.node.to_xml(Self::NAME, Self::namespace());
        for line in &self.address {
            push_text(&mut element, "address", &MLO, Some(line));
        }
        push_text(&mut element, "town", &MLO, self.town.as_deref());
        push_text(&mut element, "postcode", &MLO, self.postcode.as_deref());
        push_text(&mut element, "phone", &MLO, self.phone.as_deref());
        push_text(&mut element, "fax", &MLO, self.fax.as_deref());
        push_text(&mut element, "email", &MLO, self.email.as_deref());
        push_text(&mut element, "url", &MLO, self.url.as_deref());
        element
    }
}
