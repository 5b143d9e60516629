//! XCRI Binder - Lenient data binding for XCRI-CAP course catalogs.
//!
//! This crate converts between XCRI-CAP 1.2 catalog documents and an
//! in-memory object graph. Feeds are aggregated from many producers, so the
//! binder tolerates non-conformant input: data-quality problems are reported
//! as [`Diagnostic`]s and parsing continues. Only a malformed catalog
//! timestamp stops a parse.
//!
//! # Example
//!
//! ```
//! use xcri_binder::{Binder, ExtensionRegistry};
//!
//! let xml = r#"<catalog xmlns="http://xcri.org/profiles/1.2/catalog"
//!                  xmlns:dc="http://purl.org/dc/elements/1.1/"
//!                  generated="2012-03-01T09:00:00Z">
//!     <provider>
//!         <dc:title>Example University</dc:title>
//!         <dc:subject>Science</dc:subject>
//!     </provider>
//! </catalog>"#;
//!
//! let binder = Binder::new(ExtensionRegistry::new());
//! let parsed = binder.parse_str(xml).unwrap();
//!
//! let provider = parsed.catalog.providers()[0];
//! assert_eq!(parsed.catalog.subjects(provider).len(), 1);
//! // No URL and no courses
//! assert_eq!(parsed.diagnostics.len(), 2);
//! ```
//!
//! # Architecture
//!
//! - [`xml`]: Owned element tree, lenient child lookup and the writer
//! - [`elements`]: Leaf value types (title, URL, image, credit, ...)
//! - [`registry`]: Vendor extensions and their registry
//! - [`catalog`]: Composite nodes, the hierarchy arena and its assembler
//! - [`binder`]: Parse and serialize entry points
//! - [`diagnostics`]: Advisory findings collected during a parse
//! - [`config`]: Namespaces and other constants
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod binder;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod elements;
pub mod error;
pub mod registry;
pub mod xml;

// Re-export commonly used items
pub use binder::{Binder, Parsed};
pub use catalog::{Catalog, Common, Composite, Level, NodeId};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{BinderError, Result};
pub use registry::{Extension, ExtensionDescriptor, ExtensionRegistry};
