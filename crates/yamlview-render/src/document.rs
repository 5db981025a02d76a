//! The HTML page around a rendered YAML body.

use crate::escape::escape_html;
use crate::render::RenderedBody;

/// Stylesheet embedded in every page.
pub const DEFAULT_STYLE: &str = r#"<style>
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; line-height: 1.5; padding: 0 1.5em; }
h1, h2, h3, h4, h5 { margin: 0.4em 0 0.2em; }
ul { padding-left: 1.2em; }
li > p { margin: 0.2em 0; }
code { font-family: Menlo, Consolas, monospace; font-size: 0.9em; }
pre.yamlview-error { color: #b00020; white-space: pre-wrap; }
</style>"#;

/// Client script for the preview page.
///
/// Applies `scroll` messages as `scrollTop = percentage * scrollHeight` and
/// swaps the body on `content` messages. Messages arrive either through
/// `window.postMessage` (embedded webviews) or the `/ws` websocket of the
/// preview server.
pub fn scroll_sync_script() -> &'static str {
    r#"<script>
(function () {
  function apply(msg) {
    if (!msg || typeof msg !== "object") { return; }
    var root = document.scrollingElement || document.documentElement;
    if (msg.type === "scroll") {
      root.scrollTop = msg.percentage * root.scrollHeight;
    } else if (msg.type === "content") {
      document.body.innerHTML = msg.body;
    }
  }
  window.addEventListener("message", function (event) { apply(event.data); });
  if (location.protocol === "http:" || location.protocol === "https:") {
    var scheme = location.protocol === "https:" ? "wss://" : "ws://";
    var socket = new WebSocket(scheme + location.host + "/ws");
    socket.onmessage = function (event) { apply(JSON.parse(event.data)); };
  }
})();
</script>"#
}

/// A complete page plus its body markup on its own.
///
/// Live panels replace only the body; fresh loads take the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub html: String,
    pub body: String,
}

/// Builds pages around rendered bodies.
#[derive(Debug, Clone)]
pub struct DocumentShell {
    pub style: String,
    pub script: Option<String>,
}

impl Default for DocumentShell {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            script: None,
        }
    }
}

impl DocumentShell {
    /// A shell with the default style and, if requested, the scroll-sync script.
    pub fn new(scroll_sync: bool) -> Self {
        Self {
            script: scroll_sync.then(|| scroll_sync_script().to_string()),
            ..Self::default()
        }
    }

    /// Replace the stylesheet with `css`.
    pub fn with_css(mut self, css: &str) -> Self {
        self.style = format!("<style>\n{}\n</style>", css);
        self
    }

    /// Page for a successfully rendered document.
    ///
    /// The root title heading sits above the body list.
    pub fn page(&self, rendered: &RenderedBody) -> Page {
        let mut body = String::new();
        if let Some(title) = &rendered.title {
            body.push_str(title);
        }
        body.push_str("<ul>");
        body.push_str(&rendered.items);
        body.push_str("</ul>");
        self.wrap(body)
    }

    /// Page showing a parse diagnostic as plain text instead of a rendering.
    pub fn error_page(&self, message: &str) -> Page {
        let body = format!(
            "<pre class=\"yamlview-error\">{}</pre>",
            escape_html(message)
        );
        self.wrap(body)
    }

    fn wrap(&self, body: String) -> Page {
        let script = self.script.as_deref().unwrap_or("");
        let html = format!(
            "<html><head>{}{}</head><body>{}</body></html>",
            script, self.style, body
        );
        Page { html, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(title: Option<&str>, items: &str) -> RenderedBody {
        RenderedBody {
            title: title.map(str::to_string),
            items: items.to_string(),
        }
    }

    #[test]
    fn test_page_layout() {
        let shell = DocumentShell::new(false);
        let page = shell.page(&body(None, "<li>x</li>"));
        assert_eq!(page.body, "<ul><li>x</li></ul>");
        assert_eq!(
            page.html,
            format!(
                "<html><head>{}</head><body><ul><li>x</li></ul></body></html>",
                DEFAULT_STYLE
            )
        );
    }

    #[test]
    fn test_title_precedes_list() {
        let page = DocumentShell::new(false).page(&body(Some("<h1>T</h1>"), ""));
        assert_eq!(page.body, "<h1>T</h1><ul></ul>");
    }

    #[test]
    fn test_script_comes_before_style() {
        let page = DocumentShell::new(true).page(&body(None, ""));
        let script_at = page.html.find("<script>").unwrap();
        let style_at = page.html.find("<style>").unwrap();
        assert!(script_at < style_at);
    }

    #[test]
    fn test_no_script_without_scroll_sync() {
        let page = DocumentShell::new(false).page(&body(None, ""));
        assert!(!page.html.contains("<script>"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let page = DocumentShell::default().error_page("bad <thing> at line 1");
        assert_eq!(
            page.body,
            "<pre class=\"yamlview-error\">bad &lt;thing&gt; at line 1</pre>"
        );
    }

    #[test]
    fn test_with_css() {
        let shell = DocumentShell::default().with_css("body { color: red; }");
        assert_eq!(shell.style, "<style>\nbody { color: red; }\n</style>");
    }
}
