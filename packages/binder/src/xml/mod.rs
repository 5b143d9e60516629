//! Generic XML element tree, lenient child lookup and writer.

mod tree;
mod utils;
mod writer;

pub use tree::{clark_name, Namespace, XmlAttribute, XmlElement};
pub use utils::{find_all, find_one, SingleLookup};
pub use writer::to_string;
