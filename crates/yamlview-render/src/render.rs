//! YAML tree to HTML list rendering.
//!
//! Mappings become list items headed by their key, sequences become `<ul>`
//! lists, string scalars go through Markdown, and every other scalar is
//! written as escaped text. Rendering is a pure function of the tree.

use yamlview_yaml::{MappingEntry, NodeKind, Scalar, YamlNode};

use crate::escape::escape_html;
use crate::markdown::MarkdownRenderer;

/// Root mapping key promoted to the page heading.
pub const TITLE_KEY: &str = "Title";

/// Deepest heading level used for mapping keys.
pub const MAX_HEADING_LEVEL: u8 = 5;

/// Depth from which mapping keys are written as plain text.
pub const PLAIN_KEY_DEPTH: usize = 5;

/// Heading level for a mapping key at `depth`, or `None` for plain text.
///
/// Depth 0 maps to `h1`, and the level saturates at [`MAX_HEADING_LEVEL`]
/// until [`PLAIN_KEY_DEPTH`].
pub fn heading_level(depth: usize) -> Option<u8> {
    if depth >= PLAIN_KEY_DEPTH {
        return None;
    }
    // depth < PLAIN_KEY_DEPTH, so this fits in a u8
    let level = (depth + 1).min(MAX_HEADING_LEVEL as usize) as u8;
    Some(level)
}

/// Render `node` to an HTML fragment.
///
/// `depth` is the nesting depth of `node` (0 for the document root) and
/// `is_root` marks the document root, which gets two special cases:
/// its mapping entries are emitted without an enclosing `<ul>` (the page
/// body supplies it), and a string `Title` entry is pulled out and written
/// first as an `<h1>`.
///
/// Never fails: every node shape has a textual fallback.
pub fn render(
    node: &YamlNode,
    markdown: &dyn MarkdownRenderer,
    depth: usize,
    is_root: bool,
) -> String {
    let mut writer = HtmlListWriter::new(markdown);
    if is_root {
        if let Some(title) = root_title(node) {
            writer.write_title(title);
        }
    }
    writer.write_root_or_node(node, depth, is_root);
    writer.finish()
}

/// A rendered document root, split into the page title and list items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    /// `<h1>` for the root `Title`, when present.
    pub title: Option<String>,
    /// Everything else; list items meant to sit inside the body's `<ul>`.
    pub items: String,
}

/// Render a document root with the title kept separate from the body
/// list, so a page can place the heading above its `<ul>`.
pub fn render_body(node: &YamlNode, markdown: &dyn MarkdownRenderer) -> RenderedBody {
    let title = root_title(node).map(|title| {
        let mut writer = HtmlListWriter::new(markdown);
        writer.write_title(title);
        writer.finish()
    });

    let mut writer = HtmlListWriter::new(markdown);
    writer.write_body_items(node);
    let items = writer.finish();

    tracing::debug!(
        has_title = title.is_some(),
        bytes = items.len(),
        "Rendered YAML body"
    );

    RenderedBody { title, items }
}

/// The root `Title` text, if the root is a mapping with a string `Title`.
fn root_title(node: &YamlNode) -> Option<&str> {
    node.get(TITLE_KEY).and_then(YamlNode::as_str)
}

fn is_title_entry(entry: &MappingEntry) -> bool {
    entry.key.as_str() == Some(TITLE_KEY)
}

/// Accumulates HTML while walking the tree.
struct HtmlListWriter<'md> {
    markdown: &'md dyn MarkdownRenderer,
    out: String,
}

impl<'md> HtmlListWriter<'md> {
    fn new(markdown: &'md dyn MarkdownRenderer) -> Self {
        Self {
            markdown,
            out: String::new(),
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn write_title(&mut self, title: &str) {
        self.out.push_str("<h1>");
        self.out.push_str(&self.markdown.render_inline(title));
        self.out.push_str("</h1>");
    }

    /// An empty document (null root) renders to nothing at all.
    fn write_root_or_node(&mut self, node: &YamlNode, depth: usize, is_root: bool) {
        let absent = node.as_scalar().is_some_and(Scalar::is_null);
        if !(is_root && absent) {
            self.write_node(node, depth, is_root);
        }
    }

    /// Root content as items of the page's body list. A mapping root
    /// already yields `<li>` entries; any other root becomes one item.
    fn write_body_items(&mut self, node: &YamlNode) {
        if node.is_mapping() || node.as_scalar().is_some_and(Scalar::is_null) {
            self.write_root_or_node(node, 0, true);
            return;
        }
        self.out.push_str("<li>");
        self.write_node(node, 0, true);
        self.out.push_str("</li>");
    }

    fn write_node(&mut self, node: &YamlNode, depth: usize, is_root: bool) {
        match &node.kind {
            NodeKind::Sequence(items) => self.write_sequence(items, depth),
            NodeKind::Mapping(entries) => self.write_mapping(entries, depth, is_root),
            NodeKind::Scalar(scalar) => self.write_scalar(scalar),
        }
    }

    fn write_sequence(&mut self, items: &[YamlNode], depth: usize) {
        self.out.push_str("<ul>");
        for item in items {
            match &item.kind {
                // A mapping inside a sequence contributes its entries as
                // sibling items instead of a nested list of its own.
                NodeKind::Mapping(entries) => {
                    for entry in entries {
                        self.write_entry(entry, depth + 1);
                    }
                }
                _ => {
                    self.out.push_str("<li>");
                    self.write_node(item, depth + 1, false);
                    self.out.push_str("</li>");
                }
            }
        }
        self.out.push_str("</ul>");
    }

    fn write_mapping(&mut self, entries: &[MappingEntry], depth: usize, is_root: bool) {
        if !is_root {
            self.out.push_str("<ul>");
        }
        for entry in entries {
            if is_root && is_title_entry(entry) {
                continue;
            }
            self.write_entry(entry, depth);
        }
        if !is_root {
            self.out.push_str("</ul>");
        }
    }

    /// One mapping entry as `<li>{key}{value}</li>`.
    fn write_entry(&mut self, entry: &MappingEntry, depth: usize) {
        self.out.push_str("<li>");
        self.write_key(&entry.key_text(), depth);

        match &entry.value.kind {
            // Sequences and non-root mappings already produce their own `<ul>`.
            NodeKind::Sequence(_) | NodeKind::Mapping(_) => {
                self.write_node(&entry.value, depth + 1, false);
            }
            NodeKind::Scalar(_) => {
                self.out.push_str("<ul><li>");
                self.write_node(&entry.value, depth + 1, false);
                self.out.push_str("</li></ul>");
            }
        }

        self.out.push_str("</li>");
    }

    fn write_key(&mut self, key: &str, depth: usize) {
        let key = escape_html(key);
        match heading_level(depth) {
            Some(level) => {
                self.out.push_str(&format!("<h{level}>{key}</h{level}>"));
            }
            None => self.out.push_str(&key),
        }
    }

    fn write_scalar(&mut self, scalar: &Scalar) {
        match scalar {
            Scalar::String(text) => self.out.push_str(&self.markdown.render(text)),
            other => self.out.push_str(&escape_html(&other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yamlview_yaml::parse;

    /// Markdown stand-in with output that is easy to assert on.
    fn md(text: &str) -> String {
        format!("<p>{}</p>", text)
    }

    fn render_root(yaml: &str) -> String {
        render(&parse(yaml).unwrap(), &md, 0, true)
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading_level(0), Some(1));
        assert_eq!(heading_level(1), Some(2));
        assert_eq!(heading_level(4), Some(5));
        assert_eq!(heading_level(5), None);
        assert_eq!(heading_level(10), None);
    }

    #[test]
    fn test_root_mapping_is_unwrapped() {
        assert_eq!(
            render_root("a: x"),
            "<li><h1>a</h1><ul><li><p>x</p></li></ul></li>"
        );
    }

    #[test]
    fn test_nested_mapping_is_wrapped() {
        assert_eq!(
            render_root("a:\n  b: x"),
            "<li><h1>a</h1><ul><li><h2>b</h2><ul><li><p>x</p></li></ul></li></ul></li>"
        );
    }

    #[test]
    fn test_sequence_value_is_not_double_wrapped() {
        assert_eq!(
            render_root("items:\n  - a\n  - b"),
            "<li><h1>items</h1><ul><li><p>a</p></li><li><p>b</p></li></ul></li>"
        );
    }

    #[test]
    fn test_sequence_of_scalars() {
        let html = render_root("- one\n- 2\n- true\n- ~");
        assert_eq!(
            html,
            "<ul><li><p>one</p></li><li>2</li><li>true</li><li>null</li></ul>"
        );
    }

    #[test]
    fn test_mapping_in_sequence_is_flattened() {
        assert_eq!(
            render_root("- a: 1\n  b: 2"),
            "<ul><li><h2>a</h2><ul><li>1</li></ul></li><li><h2>b</h2><ul><li>2</li></ul></li></ul>"
        );
    }

    #[test]
    fn test_root_title_is_promoted_and_suppressed() {
        assert_eq!(render_root("Title: Hello"), "<h1>Hello</h1>");
    }

    #[test]
    fn test_root_title_precedes_body() {
        assert_eq!(
            render_root("x: 1\nTitle: Hi"),
            "<h1>Hi</h1><li><h1>x</h1><ul><li>1</li></ul></li>"
        );
    }

    #[test]
    fn test_non_string_root_title_is_suppressed_without_heading() {
        assert_eq!(render_root("Title: 3\nx: y"), "<li><h1>x</h1><ul><li><p>y</p></li></ul></li>");
    }

    #[test]
    fn test_nested_title_key_renders_normally() {
        assert_eq!(
            render_root("doc:\n  Title: Inner"),
            "<li><h1>doc</h1><ul><li><h2>Title</h2><ul><li><p>Inner</p></li></ul></li></ul></li>"
        );
    }

    #[test]
    fn test_title_only_promoted_when_rendering_as_root() {
        let node = parse("Title: Hello").unwrap();
        assert_eq!(
            render(&node, &md, 1, false),
            "<ul><li><h2>Title</h2><ul><li><p>Hello</p></li></ul></li></ul>"
        );
    }

    #[test]
    fn test_keys_and_plain_scalars_are_escaped() {
        assert_eq!(
            render_root("\"<b>\": 1 < 2"),
            "<li><h1>&lt;b&gt;</h1><ul><li><p>1 < 2</p></li></ul></li>"
        );
    }

    #[test]
    fn test_keys_past_heading_depth_are_plain() {
        let node = parse("a: x").unwrap();
        assert_eq!(
            render(&node, &md, 5, false),
            "<ul><li>a<ul><li><p>x</p></li></ul></li></ul>"
        );
    }

    #[test]
    fn test_scalar_root() {
        assert_eq!(render_root("just text"), "<p>just text</p>");
        assert_eq!(render_root("42"), "42");
    }

    #[test]
    fn test_absent_root_renders_empty() {
        assert_eq!(render_root(""), "");
        let node = parse("").unwrap();
        assert_eq!(render(&node, &md, 2, false), "null");
    }

    #[test]
    fn test_render_body_separates_title() {
        let node = parse("Title: Hello\nitems:\n  - a").unwrap();
        let body = render_body(&node, &md);
        assert_eq!(body.title.as_deref(), Some("<h1>Hello</h1>"));
        assert_eq!(
            body.items,
            "<li><h1>items</h1><ul><li><p>a</p></li></ul></li>"
        );
    }

    #[test]
    fn test_render_body_wraps_non_mapping_root_in_item() {
        let scalar = render_body(&parse("just text").unwrap(), &md);
        assert_eq!(scalar.items, "<li><p>just text</p></li>");

        let seq = render_body(&parse("- a\n- b").unwrap(), &md);
        assert_eq!(seq.items, "<li><ul><li><p>a</p></li><li><p>b</p></li></ul></li>");

        let empty = render_body(&parse("").unwrap(), &md);
        assert_eq!(empty.items, "");
    }
}
