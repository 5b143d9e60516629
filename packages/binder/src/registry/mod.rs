//! Extension registry for vendor-specific elements.
//!
//! Producers add their own elements next to the core vocabulary. Hosts that
//! understand such an element register a descriptor for its name and
//! namespace; every composite node then materializes matching children as
//! extension instances while parsing. Unregistered unknown elements are
//! dropped silently.

mod core;
mod extension;

pub use self::core::ExtensionRegistry;
pub use extension::{Extension, ExtensionDescriptor, ExtensionFactory, RawExtension};
