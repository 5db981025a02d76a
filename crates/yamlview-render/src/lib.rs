//! # yamlview-render
//!
//! Turns a parsed YAML tree into nested HTML lists for live preview.
//!
//! - [`render`] is the core transformation: mapping keys become headings
//!   whose level follows nesting depth, sequences become `<ul>` lists, and
//!   string scalars are rendered as Markdown.
//! - [`MarkdownRenderer`] abstracts the Markdown engine; [`ComrakMarkdown`]
//!   is the default.
//! - [`DocumentShell`] wraps a rendered body in a complete HTML page.
//!
//! ```rust
//! use yamlview_render::{ComrakMarkdown, DocumentShell, render_body};
//!
//! let tree = yamlview_yaml::parse("Title: Hello\nitems:\n  - a\n  - b\n").unwrap();
//! let page = DocumentShell::default().page(&render_body(&tree, &ComrakMarkdown::new()));
//! assert!(page.html.contains("<h1>Hello</h1>"));
//! ```

mod document;
mod escape;
mod markdown;
mod render;

pub use document::{DEFAULT_STYLE, DocumentShell, Page, scroll_sync_script};
pub use escape::escape_html;
pub use markdown::{ComrakMarkdown, MarkdownRenderer};
pub use render::{
    MAX_HEADING_LEVEL, PLAIN_KEY_DEPTH, RenderedBody, TITLE_KEY, heading_level, render,
    render_body,
};
