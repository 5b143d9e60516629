//! Descriptive leaves shared by every composite level.

use super::{Element, NodeData};
use crate::config::{DC, IMAGE_EXTENSIONS, MLO, XCRI};
use crate::error::{BinderError, Result};
use crate::xml::{Namespace, XmlElement};

/// Declare a leaf that is nothing more than its [`NodeData`].
macro_rules! node_element {
    ($(#[$meta:meta])* $type:ident, $name:literal, $namespace:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $type {
            pub node: NodeData,
        }

        impl Element for $type {
            const NAME: &'static str = $name;

            fn namespace() -> &'static Namespace {
                &$namespace
            }

            fn from_xml(element: &XmlElement) -> Result<Self> {
                Ok(Self {
                    node: NodeData::from_xml(element),
                })
            }

            fn to_xml(&self) -> XmlElement {
                self.node.to_xml(Self::NAME, Self::namespace())
            }
        }
    };
}

node_element!(
    /// `dc:contributor`: a person or organization involved in the offering.
    Contributor, "contributor", DC
);
node_element!(
    /// `dc:description`, optionally refined by `xsi:type` (aim, objective, ...).
    Description, "description", DC
);
node_element!(
    /// `dc:identifier`.
    Identifier, "identifier", DC
);
node_element!(
    /// `dc:title`.
    Title, "title", DC
);
node_element!(
    /// `dc:subject`.
    Subject, "subject", DC
);
node_element!(
    /// `dc:type`: classification of the offering.
    ClassificationType, "type", DC
);

impl Identifier {
    /// Whether the value parses as an absolute URL.
    #[must_use]
    pub fn is_uri(&self) -> bool {
        self.node
            .value()
            .is_some_and(|value| url::Url::parse(value).is_ok())
    }
}

/// `mlo:url`. The value must be an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub node: NodeData,
}

impl Url {
    /// Create a URL leaf, validating the value.
    ///
    /// # Errors
    /// Returns `InvalidElement` if `value` is not an absolute URL.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        validate_url(&value)?;
        Ok(Self {
            node: NodeData::new(value),
        })
    }
}

fn validate_url(value: &str) -> Result<()> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| BinderError::invalid("url", format!("'{value}' is not a valid URL: {e}")))
}

impl Element for Url {
    const NAME: &'static str = "url";

    fn namespace() -> &'static Namespace {
        &MLO
    }

    fn from_xml(element: &XmlElement) -> Result<Self> {
        let node = NodeData::from_xml(element);
        match node.value() {
            Some(value) => validate_url(value)?,
            None => return Err(BinderError::invalid("url", "empty URL")),
        }
        Ok(Self { node })
    }

    fn to_xml(&self) -> XmlElement {
        self.node.to_xml(Self::NAME, Self::namespace())
    }
}

/// `xcri:image`, carried in attributes: `src` (required), `title` and `alt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub node: NodeData,
    pub src: String,
    pub title: Option<String>,
    pub alt: Option<String>,
}

impl Image {
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            node: NodeData::default(),
            src: src.into(),
            title: None,
            alt: None,
        }
    }

    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Whether meaningful alternative text is present.
    #[must_use]
    pub fn has_alt(&self) -> bool {
        self.alt.as_deref().is_some_and(|alt| !alt.trim().is_empty())
    }

    /// Lower-cased file extension of the source path, ignoring query and fragment.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let path = self.src.split(['?', '#']).next().unwrap_or(self.src.as_str());
        let file = path.rsplit('/').next().unwrap_or(path);
        file.rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Whether the source uses one of the standard raster formats.
    #[must_use]
    pub fn has_standard_format(&self) -> bool {
        self.extension()
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }
}

impl Element for Image {
    const NAME: &'static str = "image";

    fn namespace() -> &'static Namespace {
        &XCRI
    }

    fn from_xml(element: &XmlElement) -> Result<Self> {
        let src = element
            .attribute("src", &Namespace::NONE)
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .ok_or_else(|| BinderError::invalid("image", "missing @src"))?;

        Ok(Self {
            node: NodeData::from_xml(element),
            src: src.to_string(),
            title: element.attribute("title", &Namespace::NONE).map(str::to_string),
            alt: element.attribute("alt", &Namespace::NONE).map(str::to_string),
        })
    }

    fn to_xml(&self) -> XmlElement {
        let mut element = self.node.to_xml(Self::NAME, Self::namespace());
        element.set_attribute("src", Namespace::NONE, &self.src);
        if let Some(title) = &self.title {
            element.set_attribute("title", Namespace::NONE, title);
        }
        if let Some(alt) = &self.alt {
            element.set_attribute("alt", Namespace::NONE, alt);
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> XmlElement {
        XmlElement::parse(xml).unwrap()
    }

    #[test]
    fn test_identifier_is_uri() {
        let uri = Identifier {
            node: NodeData::new("http://example.ac.uk/course/1"),
        };
        let code = Identifier {
            node: NodeData::new("ABC123"),
        };
        assert!(uri.is_uri());
        assert!(!code.is_uri());
        assert!(!Identifier::default().is_uri());
    }

    #[test]
    fn test_url_rejects_relative_value() {
        let element = parse(r#"<url xmlns="http://purl.org/net/mlo">/courses/1</url>"#);
        assert!(matches!(
            Url::from_xml(&element),
            Err(BinderError::InvalidElement { .. })
        ));
    }

    #[test]
    fn test_url_accepts_absolute_value() {
        let element = parse(r#"<url xmlns="http://purl.org/net/mlo">http://example.ac.uk/</url>"#);
        let url = Url::from_xml(&element).unwrap();
        assert_eq!(url.node.value(), Some("http://example.ac.uk/"));
        assert_eq!(url.to_xml(), element);
    }

    #[test]
    fn test_url_rejects_empty_value() {
        let element = parse(r#"<url xmlns="http://purl.org/net/mlo"/>"#);
        assert!(Url::from_xml(&element).is_err());
    }

    #[test]
    fn test_image_requires_src() {
        let element = parse(r#"<image xmlns="http://xcri.org/profiles/1.2/catalog" alt="logo"/>"#);
        let err = Image::from_xml(&element).unwrap_err();
        assert!(err.to_string().contains("missing @src"));
    }

    #[test]
    fn test_image_attributes() {
        let element = parse(
            r#"<image xmlns="http://xcri.org/profiles/1.2/catalog" src="http://x/logo.PNG?v=2" title="Logo" alt="University logo"/>"#,
        );
        let image = Image::from_xml(&element).unwrap();
        assert_eq!(image.extension().as_deref(), Some("png"));
        assert!(image.has_standard_format());
        assert!(image.has_alt());
        assert_eq!(image.title.as_deref(), Some("Logo"));
        assert_eq!(image.to_xml(), element);
    }

    #[test]
    fn test_image_extension_edge_cases() {
        assert_eq!(Image::new("http://x.ac.uk/logo").extension(), None);
        assert_eq!(Image::new("logo.svg").extension().as_deref(), Some("svg"));
        assert!(!Image::new("logo.svg").has_standard_format());
        assert!(Image::new("photo.jpeg").has_standard_format());
        assert!(!Image::new("logo.png").with_alt("  ").has_alt());
    }

    #[test]
    fn test_title_round_trip() {
        let element = parse(
            r#"<title xmlns="http://purl.org/dc/elements/1.1/" xml:lang="en">Chemistry</title>"#,
        );
        let title = Title::from_xml(&element).unwrap();
        assert_eq!(title.node.lang.as_deref(), Some("en"));
        assert_eq!(title.to_xml(), element);
    }
}
