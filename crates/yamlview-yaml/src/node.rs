//! The YAML node tree.

use std::fmt;

use crate::SourceInfo;

/// A parsed YAML node with its source location.
///
/// The tree is built fresh from text on every parse and is never mutated
/// afterwards; consumers only borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    /// What kind of node this is, including its children.
    pub kind: NodeKind,

    /// Source location for this node.
    pub source_info: SourceInfo,

    /// Explicit YAML tag suffix (e.g. `str` for `!!str`), if one was written.
    pub tag: Option<String>,
}

/// The three node shapes of a YAML document.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Key/value pairs in source order.
    Mapping(Vec<MappingEntry>),
    /// Items in source order.
    Sequence(Vec<YamlNode>),
    /// A leaf value.
    Scalar(Scalar),
}

/// A key/value pair of a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: YamlNode,
    pub value: YamlNode,
}

/// A resolved YAML leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    /// Floating point value, kept in its written form so `1.50` stays `1.50`.
    Real(String),
    Boolean(bool),
    Null,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) | Scalar::Real(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Null => f.write_str("null"),
        }
    }
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl YamlNode {
    pub fn new(kind: NodeKind, source_info: SourceInfo) -> Self {
        Self {
            kind,
            source_info,
            tag: None,
        }
    }

    pub fn scalar(value: Scalar, source_info: SourceInfo) -> Self {
        Self::new(NodeKind::Scalar(value), source_info)
    }

    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn as_mapping(&self) -> Option<&[MappingEntry]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[YamlNode]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// The string value, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Look up a mapping value by key, comparing keys by their text.
    ///
    /// Returns the first match; `None` if this is not a mapping.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_mapping()?
            .iter()
            .find(|entry| entry.key_text() == key)
            .map(|entry| &entry.value)
    }

    /// Number of children (sequence length or mapping entry count).
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Mapping(entries) => entries.len(),
            NodeKind::Sequence(items) => items.len(),
            NodeKind::Scalar(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for YamlNode {
    /// Flow-style text of the node, used where a node has to appear as plain text
    /// (for example a mapping used as a mapping key).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Scalar(scalar) => write!(f, "{}", scalar),
            NodeKind::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            NodeKind::Mapping(entries) => {
                f.write_str("{")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", entry.key, entry.value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl MappingEntry {
    pub fn new(key: YamlNode, value: YamlNode) -> Self {
        Self { key, value }
    }

    /// The key as display text. Scalar keys stringify verbatim.
    pub fn key_text(&self) -> String {
        self.key.to_string()
    }
}
