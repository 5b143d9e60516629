//! Error types for the binder.
//!
//! Only hard failures live here. Data-quality problems that the binder can
//! recover from are reported through [`crate::diagnostics`] instead and never
//! become an `Err`.

use thiserror::Error;

/// Main error type for the binder library.
#[derive(Debug, Error)]
pub enum BinderError {
    /// The input is not well-formed XML.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// A leaf element could not be bound.
    ///
    /// Composite nodes catch this, drop the offending child and report a
    /// diagnostic, so it only reaches callers that bind leaves directly.
    #[error("Invalid <{element}> element: {reason}")]
    InvalidElement { element: String, reason: String },

    /// The catalog generation timestamp is not a valid date or date-time.
    #[error("catalog: @{field} contains invalid date: '{value}'")]
    InvalidGenerated { field: String, value: String },

    /// A registered extension factory produced an instance for another element.
    ///
    /// Reported as a diagnostic by the composite parse; the child is skipped.
    #[error("Extension registered for {expected} produced an instance reporting {found}")]
    ExtensionMismatch { expected: String, found: String },

    /// A node was attached below a composite of the wrong level.
    #[error("Cannot attach node below {parent}: expected a <{expected}> node")]
    Hierarchy { parent: String, expected: String },

    /// Serializing an element tree failed.
    #[error("XML serialization failed: {0}")]
    Write(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON report serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl BinderError {
    /// Build an `InvalidElement` error.
    pub fn invalid(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidElement {
            element: element.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn write(err: impl std::fmt::Display) -> Self {
        Self::Write(err.to_string())
    }
}

/// Result type alias for binder operations.
pub type Result<T> = std::result::Result<T, BinderError>;
