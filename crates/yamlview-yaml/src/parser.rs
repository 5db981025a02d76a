//! YAML parser that builds `YamlNode` trees from yaml-rust2 events.

use std::collections::HashMap;

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::{Error, MappingEntry, NodeKind, Result, Scalar, SourceInfo, YamlNode};

/// Parse YAML from a string, producing a `YamlNode` tree.
///
/// Only the first document of a multi-document stream is parsed. Input with
/// no document at all (empty text, or only comments) yields a null scalar.
///
/// # Example
///
/// ```rust
/// use yamlview_yaml::parse;
///
/// let yaml = parse("title: My Document").unwrap();
/// assert!(yaml.is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error carrying the scanner's diagnostic if the YAML is invalid.
pub fn parse(content: &str) -> Result<YamlNode> {
    parse_impl(content, None)
}

/// Parse YAML from a string with an associated filename.
///
/// The filename is recorded in the source location of every node.
///
/// ```rust
/// use yamlview_yaml::parse_file;
///
/// let yaml = parse_file("title: Test", "config.yaml").unwrap();
/// assert_eq!(yaml.source_info.file, Some("config.yaml".into()));
/// ```
pub fn parse_file(content: &str, filename: &str) -> Result<YamlNode> {
    parse_impl(content, Some(filename))
}

fn parse_impl(content: &str, filename: Option<&str>) -> Result<YamlNode> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(filename);

    // false = single document only
    parser.load(&mut builder, false).map_err(|err| {
        let mut error = Error::from(err);
        if let (Error::Parse { location: Some(loc), .. }, Some(name)) = (&mut error, filename) {
            loc.file = Some(name.to_string());
        }
        error
    })?;

    builder.finish()
}

/// Receives parser events and assembles the node tree bottom-up.
struct TreeBuilder {
    filename: Option<String>,

    /// Collections that have been opened but not closed yet
    stack: Vec<OpenCollection>,

    /// Nodes registered under an anchor, by yaml-rust2 anchor id
    anchors: HashMap<usize, YamlNode>,

    root: Option<YamlNode>,

    /// First structural error; later events are ignored once set
    error: Option<Error>,
}

struct OpenCollection {
    start: Marker,
    anchor_id: usize,
    tag: Option<String>,
    body: CollectionBody,
}

enum CollectionBody {
    Sequence(Vec<YamlNode>),
    Mapping {
        entries: Vec<MappingEntry>,
        pending_key: Option<YamlNode>,
    },
}

impl TreeBuilder {
    fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(str::to_string),
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn finish(self) -> Result<YamlNode> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() {
            return Err(Error::InvalidStructure {
                message: "unterminated collection".into(),
                location: None,
            });
        }
        let filename = self.filename;
        Ok(self.root.unwrap_or_else(|| {
            let source_info = SourceInfo {
                file: filename,
                ..SourceInfo::default()
            };
            YamlNode::scalar(Scalar::Null, source_info)
        }))
    }

    fn source_info(&self, marker: &Marker, len: usize) -> SourceInfo {
        let info = SourceInfo::from_marker(marker, len);
        match &self.filename {
            Some(name) => info.with_file(name.clone()),
            None => info,
        }
    }

    fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Hand a finished node to its parent collection (or make it the root).
    fn push_complete(&mut self, node: YamlNode, anchor_id: usize) {
        if anchor_id != 0 {
            self.anchors.insert(anchor_id, node.clone());
        }

        let Some(parent) = self.stack.last_mut() else {
            self.root = Some(node);
            return;
        };

        match &mut parent.body {
            CollectionBody::Sequence(items) => items.push(node),
            CollectionBody::Mapping {
                entries,
                pending_key,
            } => match pending_key.take() {
                Some(key) => entries.push(MappingEntry::new(key, node)),
                None => *pending_key = Some(node),
            },
        }
    }

    fn open(&mut self, marker: Marker, anchor_id: usize, tag: Option<Tag>, body: CollectionBody) {
        self.stack.push(OpenCollection {
            start: marker,
            anchor_id,
            tag: tag.map(|t| t.suffix),
            body,
        });
    }

    fn close(&mut self, end: &Marker, expect_sequence: bool) {
        let Some(open) = self.stack.pop() else {
            self.fail(Error::InvalidStructure {
                message: "collection end without a start".into(),
                location: Some(self.source_info(end, 0)),
            });
            return;
        };

        let len = end.index().saturating_sub(open.start.index());
        let source_info = self.source_info(&open.start, len);

        let kind = match open.body {
            CollectionBody::Sequence(items) if expect_sequence => NodeKind::Sequence(items),
            CollectionBody::Mapping {
                entries,
                pending_key,
            } if !expect_sequence => {
                if let Some(key) = pending_key {
                    self.fail(Error::InvalidStructure {
                        message: format!("mapping key `{}` has no value", key),
                        location: Some(key.source_info),
                    });
                    return;
                }
                NodeKind::Mapping(entries)
            }
            _ => {
                self.fail(Error::InvalidStructure {
                    message: "mismatched collection end".into(),
                    location: Some(source_info),
                });
                return;
            }
        };

        let node = YamlNode::new(kind, source_info).with_tag(open.tag);
        self.push_complete(node, open.anchor_id);
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor_id, tag) => {
                let len = scalar_source_len(&value, style);
                let source_info = self.source_info(&marker, len);
                let tag = tag.map(|t| t.suffix);
                let scalar = resolve_scalar(value, style, tag.as_deref());
                let node = YamlNode::scalar(scalar, source_info).with_tag(tag);
                self.push_complete(node, anchor_id);
            }

            Event::SequenceStart(anchor_id, tag) => {
                self.open(marker, anchor_id, tag, CollectionBody::Sequence(Vec::new()));
            }

            Event::SequenceEnd => self.close(&marker, true),

            Event::MappingStart(anchor_id, tag) => {
                self.open(
                    marker,
                    anchor_id,
                    tag,
                    CollectionBody::Mapping {
                        entries: Vec::new(),
                        pending_key: None,
                    },
                );
            }

            Event::MappingEnd => self.close(&marker, false),

            Event::Alias(anchor_id) => match self.anchors.get(&anchor_id) {
                Some(node) => {
                    let node = node.clone();
                    self.push_complete(node, 0);
                }
                // The scanner rejects undefined anchors first; this only
                // guards the anchor table.
                None => {
                    let location = self.source_info(&marker, 0);
                    self.fail(Error::InvalidStructure {
                        message: format!("alias to undefined anchor {}", anchor_id),
                        location: Some(location),
                    });
                }
            },
        }
    }
}

/// Approximate source length of a scalar token.
fn scalar_source_len(value: &str, style: TScalarStyle) -> usize {
    match style {
        TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => value.len() + 2,
        _ => value.len(),
    }
}

/// Resolve a scalar's text into a typed value.
///
/// Only plain (unquoted, non-block) scalars are type-resolved. An explicit
/// `!!str` tag keeps the text as a string.
fn resolve_scalar(value: String, style: TScalarStyle, tag: Option<&str>) -> Scalar {
    if style != TScalarStyle::Plain || tag == Some("str") {
        return Scalar::String(value);
    }

    match value.as_str() {
        "null" | "Null" | "NULL" | "~" | "" => return Scalar::Null,
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            return Scalar::Boolean(true);
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            return Scalar::Boolean(false);
        }
        _ => {}
    }

    if let Some(i) = parse_integer(&value) {
        return Scalar::Integer(i);
    }

    if is_float(&value) {
        return Scalar::Real(value);
    }

    Scalar::String(value)
}

fn parse_integer(value: &str) -> Option<i64> {
    if let Some(hex) = value.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some(oct) = value.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).ok();
    }
    value.parse::<i64>().ok()
}

/// YAML floats: decimal/exponent forms plus `.inf`, `-.inf` and `.nan`.
///
/// Rust's `f64` parser also accepts words like `inf` and `nan`, which YAML
/// treats as strings, so those are excluded first.
fn is_float(value: &str) -> bool {
    let unsigned = value.trim_start_matches(['+', '-']);
    if matches!(unsigned, ".inf" | ".Inf" | ".INF") {
        return true;
    }
    if matches!(value, ".nan" | ".NaN" | ".NAN") {
        return true;
    }
    value.bytes().any(|b| b.is_ascii_digit())
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        && value.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar() {
        let yaml = parse("hello").unwrap();
        assert_eq!(yaml.as_str(), Some("hello"));
    }

    #[test]
    fn test_parse_integer_and_real() {
        assert_eq!(parse("42").unwrap().as_scalar(), Some(&Scalar::Integer(42)));
        assert_eq!(parse("0x1F").unwrap().as_scalar(), Some(&Scalar::Integer(31)));
        assert_eq!(
            parse("1.50").unwrap().as_scalar(),
            Some(&Scalar::Real("1.50".into()))
        );
        assert_eq!(
            parse("-.inf").unwrap().as_scalar(),
            Some(&Scalar::Real("-.inf".into()))
        );
    }

    #[test]
    fn test_words_that_look_numeric_in_rust_stay_strings() {
        assert_eq!(parse("inf").unwrap().as_str(), Some("inf"));
        assert_eq!(parse("NaN").unwrap().as_str(), Some("NaN"));
        assert_eq!(parse("1.2.3").unwrap().as_str(), Some("1.2.3"));
    }

    #[test]
    fn test_parse_boolean_and_null() {
        assert_eq!(parse("true").unwrap().as_scalar(), Some(&Scalar::Boolean(true)));
        assert_eq!(parse("off").unwrap().as_scalar(), Some(&Scalar::Boolean(false)));
        assert_eq!(parse("~").unwrap().as_scalar(), Some(&Scalar::Null));
    }

    #[test]
    fn test_quoted_scalars_are_strings() {
        let yaml = parse("a: '42'\nb: \"true\"\nc: !!str 7").unwrap();
        assert_eq!(yaml.get("a").and_then(YamlNode::as_str), Some("42"));
        assert_eq!(yaml.get("b").and_then(YamlNode::as_str), Some("true"));
        assert_eq!(yaml.get("c").and_then(YamlNode::as_str), Some("7"));
        assert_eq!(yaml.get("c").and_then(|c| c.tag.as_deref()), Some("str"));
    }

    #[test]
    fn test_parse_sequence() {
        let yaml = parse("[1, 2, 3]").unwrap();
        let items = yaml.as_sequence().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_scalar(), Some(&Scalar::Integer(3)));
    }

    #[test]
    fn test_mapping_preserves_source_order() {
        let yaml = parse("zebra: 1\napple: 2\nmango: 3").unwrap();
        let keys: Vec<String> = yaml
            .as_mapping()
            .unwrap()
            .iter()
            .map(MappingEntry::key_text)
            .collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_nested_structure() {
        let yaml = parse(
            r#"
project:
  title: My Project
  authors:
    - Alice
    - Bob
"#,
        )
        .unwrap();

        let project = yaml.get("project").unwrap();
        assert!(project.is_mapping());
        let authors = project.get("authors").unwrap();
        assert!(authors.is_sequence());
        assert_eq!(authors.len(), 2);
    }

    #[test]
    fn test_null_values_in_mapping() {
        let yaml = parse("empty:\nnext: 1").unwrap();
        assert_eq!(yaml.get("empty").and_then(YamlNode::as_scalar), Some(&Scalar::Null));
    }

    #[test]
    fn test_aliases_resolve_to_anchored_node() {
        let yaml = parse("base: &b\n  x: 1\ncopy: *b").unwrap();
        let copy = yaml.get("copy").unwrap();
        assert!(copy.is_mapping());
        assert_eq!(copy.get("x").and_then(YamlNode::as_scalar), Some(&Scalar::Integer(1)));
    }

    #[test]
    fn test_empty_input_is_null_root() {
        let yaml = parse("").unwrap();
        assert_eq!(yaml.as_scalar(), Some(&Scalar::Null));
        let yaml = parse("# only a comment\n").unwrap();
        assert_eq!(yaml.as_scalar(), Some(&Scalar::Null));
    }

    #[test]
    fn test_only_first_document_is_parsed() {
        let yaml = parse("a: 1\n---\nb: 2\n").unwrap();
        assert!(yaml.get("a").is_some());
        assert!(yaml.get("b").is_none());
    }

    #[test]
    fn test_source_info_tracking() {
        let yaml = parse("title: My Document\nauthor: Jane").unwrap();
        let author = yaml.get("author").unwrap();
        assert_eq!(author.source_info.line, 2);
        assert_eq!(author.source_info.col, 9);
    }

    #[test]
    fn test_parse_with_filename() {
        let yaml = parse_file("title: Test", "config.yaml").unwrap();
        assert_eq!(yaml.source_info.file, Some("config.yaml".into()));
        let title = yaml.get("title").unwrap();
        assert_eq!(title.source_info.file, Some("config.yaml".into()));
    }

    #[test]
    fn test_unterminated_quote_is_parse_error() {
        let err = parse("key: \"unterminated").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(!err.to_string().is_empty());
        assert!(err.location().is_some());
    }

    #[test]
    fn test_parse_error_carries_filename() {
        let err = parse_file("a: [1, 2", "broken.yaml").unwrap_err();
        let location = err.location().unwrap();
        assert_eq!(location.file.as_deref(), Some("broken.yaml"));
    }

    #[test]
    fn test_parse_error_location_matches_scanner_line() {
        // The scanner reports the missing `]` at the start of line 2.
        let err = parse_file("a: [1, 2", "broken.yaml").unwrap_err();
        let location = err.location().unwrap();
        assert_eq!(location.to_string(), "broken.yaml:2:1");
        assert!(!err.to_string().contains("line 2"));
    }

    #[test]
    fn test_first_line_nodes_are_on_line_one() {
        let yaml = parse("title: My Document").unwrap();
        let title = yaml.get("title").unwrap();
        assert_eq!((title.source_info.line, title.source_info.col), (1, 8));
    }
}
