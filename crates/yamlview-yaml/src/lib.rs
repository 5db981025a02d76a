//! # yamlview-yaml
//!
//! YAML parsing into a node tree with source location tracking.
//!
//! The tree has exactly three node shapes: mappings (ordered key/value
//! entries), sequences, and scalars. Mapping order is the order written in
//! the source, which is also the order the preview renders.
//!
//! ## Example
//!
//! ```rust
//! use yamlview_yaml::parse;
//!
//! let content = r#"
//! Title: Shopping
//! items:
//!   - eggs
//!   - milk
//! "#;
//!
//! let yaml = parse(content).unwrap();
//! assert_eq!(yaml.get("Title").and_then(|t| t.as_str()), Some("Shopping"));
//! assert_eq!(yaml.get("items").map(|i| i.len()), Some(2));
//! ```

mod error;
mod node;
mod parser;
mod source_info;

pub use error::{Error, Result};
pub use node::{MappingEntry, NodeKind, Scalar, YamlNode};
pub use parser::{parse, parse_file};
pub use source_info::SourceInfo;
