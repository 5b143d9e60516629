//! Advisory diagnostics.
//!
//! Every data-quality problem the binder recovers from becomes a
//! [`Diagnostic`]. They are collected in document order and also emitted as
//! `tracing` events, so hosts can either inspect the list or rely on their
//! subscriber.

use std::fmt;

use serde::Serialize;

/// Severity of an advisory diagnostic. None of them stops a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recommendation that the producer may want to follow.
    Info,
    /// Deviation from the profile; the value was still bound.
    Warning,
    /// Content that had to be dropped.
    Error,
}

impl Severity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single advisory event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Location of the composite being parsed, e.g. `catalog/provider[0]`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
    }
}

/// Ordered collector of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a tracing event.
    pub fn push(&mut self, severity: Severity, path: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity,
            path: path.into(),
            message: message.into(),
        };
        match severity {
            Severity::Info => {
                tracing::info!(path = %diagnostic.path, "{}", diagnostic.message);
            }
            Severity::Warning => {
                tracing::warn!(path = %diagnostic.path, "{}", diagnostic.message);
            }
            Severity::Error => {
                tracing::error!(path = %diagnostic.path, "{}", diagnostic.message);
            }
        }
        self.entries.push(diagnostic);
    }

    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Take ownership of the collected diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
