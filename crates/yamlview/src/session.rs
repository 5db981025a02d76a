//! The preview session: one source document shown in one panel.
//!
//! A session is created when a preview opens and consumed by
//! [`PreviewSession::dispose`] when it closes. Host events are fed to
//! [`PreviewSession::handle`], which runs each one to completion: a text
//! change re-parses and replaces the whole panel content, a visible-range
//! change posts a scroll message.

use std::path::Path;

use tracing::{debug, info};
use yamlview_render::{ComrakMarkdown, DocumentShell, MarkdownRenderer, Page, render_body};

use crate::protocol::PanelMessage;

/// The display surface a session renders into.
pub trait Panel {
    /// Replace everything the panel shows.
    fn show(&mut self, page: Page);

    /// Deliver a message to the panel's script. Fire-and-forget.
    fn post_message(&mut self, message: PanelMessage);
}

/// An event from the host editor.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The source document's text changed (or was opened).
    TextChanged { text: String },

    /// The source editor scrolled.
    VisibleRangeChanged { top_line: usize, line_count: usize },
}

/// Result of re-rendering after a text change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The panel now shows the rendered document.
    Rendered,

    /// The text was not valid YAML; the panel shows this diagnostic instead.
    ParseFailed(String),
}

/// Per-session settings.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Embed the scroll-sync script and forward scroll events
    pub scroll_sync: bool,

    /// The panel receives content pushes and needs the client script even
    /// without scroll sync
    pub live: bool,

    /// Stylesheet replacing the built-in one
    pub css: Option<String>,

    /// Source name recorded in parse locations and diagnostics
    pub file_name: Option<String>,
}

/// A live preview of one YAML document.
pub struct PreviewSession<P: Panel, M: MarkdownRenderer = ComrakMarkdown> {
    panel: P,
    markdown: M,
    shell: DocumentShell,
    options: SessionOptions,
}

impl<P: Panel> PreviewSession<P> {
    /// Open a session rendering with the default Markdown engine.
    pub fn open(panel: P, options: SessionOptions) -> Self {
        Self::with_markdown(panel, options, ComrakMarkdown::new())
    }
}

impl<P: Panel, M: MarkdownRenderer> PreviewSession<P, M> {
    pub fn with_markdown(panel: P, options: SessionOptions, markdown: M) -> Self {
        let mut shell = DocumentShell::new(options.scroll_sync || options.live);
        if let Some(css) = &options.css {
            shell = shell.with_css(css);
        }

        info!(
            file = options.file_name.as_deref().unwrap_or("<untitled>"),
            scroll_sync = options.scroll_sync,
            "Opened preview session"
        );

        Self {
            panel,
            markdown,
            shell,
            options,
        }
    }

    /// Dispatch one host event.
    ///
    /// Returns the render outcome for text changes, `None` for scroll events.
    pub fn handle(&mut self, event: SessionEvent) -> Option<RenderOutcome> {
        match event {
            SessionEvent::TextChanged { text } => Some(self.update(&text)),
            SessionEvent::VisibleRangeChanged {
                top_line,
                line_count,
            } => {
                self.scroll_to(top_line, line_count);
                None
            }
        }
    }

    /// Parse `text` and replace the panel content with the result.
    ///
    /// On a parse error the panel shows the diagnostic and the renderer is
    /// not run; nothing from an earlier render is kept.
    pub fn update(&mut self, text: &str) -> RenderOutcome {
        let parsed = match &self.options.file_name {
            Some(name) => yamlview_yaml::parse_file(text, name),
            None => yamlview_yaml::parse(text),
        };

        match parsed {
            Ok(tree) => {
                let page = self.shell.page(&render_body(&tree, &self.markdown));
                debug!(bytes = page.html.len(), "Rendered preview");
                self.panel.show(page);
                RenderOutcome::Rendered
            }
            Err(err) => {
                let message = match err.location() {
                    Some(location) => format!("{}: {}", location, err),
                    None => err.to_string(),
                };
                debug!(error = %message, "YAML parse failed");
                self.panel.show(self.shell.error_page(&message));
                RenderOutcome::ParseFailed(message)
            }
        }
    }

    /// Forward the source editor's scroll position to the panel.
    pub fn scroll_to(&mut self, top_line: usize, line_count: usize) {
        if !self.options.scroll_sync {
            return;
        }
        self.panel
            .post_message(PanelMessage::scroll(top_line, line_count));
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Close the session and hand back the panel.
    pub fn dispose(self) -> P {
        info!(
            file = self.options.file_name.as_deref().unwrap_or("<untitled>"),
            "Closed preview session"
        );
        self.panel
    }
}

/// Whether a document at `path` should open a preview automatically.
pub fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
