//! Markdown rendering for YAML string values.
//!
//! The renderer only needs "Markdown text in, HTML fragment out", so the
//! engine sits behind [`MarkdownRenderer`]. [`ComrakMarkdown`] is the
//! production implementation; any `Fn(&str) -> String` also works, which
//! keeps renderer tests independent of the engine's exact output.

use comrak::{Options, markdown_to_html};

/// A Markdown-to-HTML capability.
pub trait MarkdownRenderer {
    /// Render Markdown block content to an HTML fragment.
    fn render(&self, text: &str) -> String;

    /// Render Markdown for use inside an inline context such as a heading.
    ///
    /// Defaults to [`render`](Self::render) with a single enclosing paragraph
    /// removed.
    fn render_inline(&self, text: &str) -> String {
        strip_paragraph(&self.render(text))
    }
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, text: &str) -> String {
        self(text)
    }
}

/// CommonMark rendering via comrak, with the GFM extensions people tend to
/// write in YAML notes (strikethrough, autolinks, tables).
///
/// Raw HTML inside YAML strings is not passed through.
#[derive(Debug, Clone)]
pub struct ComrakMarkdown {
    options: Options<'static>,
}

impl ComrakMarkdown {
    pub fn new() -> Self {
        let mut options = Options::default();
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options.extension.table = true;
        Self { options }
    }
}

impl Default for ComrakMarkdown {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for ComrakMarkdown {
    fn render(&self, text: &str) -> String {
        markdown_to_html(text, &self.options)
    }
}

/// Remove one `<p>...</p>` wrapper if it is the only block in `html`.
fn strip_paragraph(html: &str) -> String {
    let trimmed = html.trim_end();
    if let Some(inner) = trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        if !inner.contains("<p>") {
            return inner.to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comrak_renders_emphasis_and_code() {
        let md = ComrakMarkdown::new();
        assert_eq!(md.render("*hi* `x`"), "<p><em>hi</em> <code>x</code></p>\n");
    }

    #[test]
    fn test_comrak_strikethrough_extension() {
        let md = ComrakMarkdown::new();
        assert_eq!(md.render_inline("~~gone~~"), "<del>gone</del>");
    }

    #[test]
    fn test_comrak_omits_raw_html() {
        let md = ComrakMarkdown::new();
        assert!(!md.render("<script>alert(1)</script>").contains("<script>"));
    }

    #[test]
    fn test_render_inline_strips_single_paragraph() {
        let md = ComrakMarkdown::new();
        assert_eq!(md.render_inline("**Hello**"), "<strong>Hello</strong>");
    }

    #[test]
    fn test_render_inline_keeps_multiple_paragraphs() {
        let md = ComrakMarkdown::new();
        let html = md.render_inline("one\n\ntwo");
        assert_eq!(html, "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_closure_is_a_markdown_renderer() {
        let md = |text: &str| format!("<p>[{}]</p>", text);
        assert_eq!(md.render("a"), "<p>[a]</p>");
        assert_eq!(md.render_inline("a"), "[a]");
    }
}
