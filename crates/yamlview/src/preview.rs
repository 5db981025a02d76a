//! Live preview: watch a YAML file, re-render on every change, and serve
//! the result with scroll sync.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};
use yamlview_render::Page;

use crate::config::PreviewConfig;
use crate::error::{Error, Result};
use crate::protocol::PanelMessage;
use crate::server::{BroadcastPanel, PreviewHub, build_router};
use crate::session::{Panel, PreviewSession, RenderOutcome, SessionEvent, SessionOptions};
use crate::watch::{FileWatcher, WatchConfig, WatchEvent};

/// Session options for previewing `input` under `config`.
pub fn session_options(input: &Path, config: &PreviewConfig) -> Result<SessionOptions> {
    Ok(SessionOptions {
        scroll_sync: config.scroll_sync,
        live: false,
        css: config.read_css()?,
        file_name: Some(display_name(input)),
    })
}

fn display_name(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

fn read_input(input: &Path) -> Result<String> {
    if !input.is_file() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }
    Ok(fs::read_to_string(input)?)
}

/// Panel for one-shot rendering: keeps the last page shown.
#[derive(Debug, Default)]
pub struct CapturePanel {
    pub page: Option<Page>,
}

impl Panel for CapturePanel {
    fn show(&mut self, page: Page) {
        self.page = Some(page);
    }

    fn post_message(&mut self, _message: PanelMessage) {}
}

/// Render `input` once, without a server.
///
/// A parse failure is not an error here: the returned page is the error
/// page and the outcome carries the diagnostic.
pub fn render_file(input: &Path, config: &PreviewConfig) -> Result<(Page, RenderOutcome)> {
    let text = read_input(input)?;
    let mut session = PreviewSession::open(CapturePanel::default(), session_options(input, config)?);
    let outcome = session.update(&text);
    let page = session.dispose().page.unwrap_or_default();
    Ok((page, outcome))
}

/// Run the preview server for `input` until interrupted.
pub async fn run_preview(input: &Path, config: PreviewConfig) -> Result<()> {
    let text = read_input(input)?;
    let options = SessionOptions {
        live: true,
        ..session_options(input, &config)?
    };

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let hub = Arc::new(PreviewHub::new(display_name(input), events_tx));

    let mut session = PreviewSession::open(BroadcastPanel::new(hub.clone()), options);
    log_outcome(session.update(&text));

    let mut watcher = FileWatcher::new(
        input,
        WatchConfig {
            debounce_ms: config.watch_debounce_ms,
        },
    )?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, input = %input.display(), "Preview server listening");

    let mut server = tokio::spawn(async move { axum::serve(listener, build_router(hub)).await });

    loop {
        tokio::select! {
            Some(event) = events_rx.recv() => {
                if let Some(outcome) = session.handle(event) {
                    log_outcome(outcome);
                }
            }
            Some(WatchEvent::Modified(path)) = watcher.recv() => {
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        if let Some(outcome) = session.handle(SessionEvent::TextChanged { text }) {
                            log_outcome(outcome);
                        }
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "Failed to read changed file"),
                }
            }
            result = &mut server => {
                session.dispose();
                return match result {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(Error::Server(e.to_string())),
                    Err(e) => Err(Error::Server(e.to_string())),
                };
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down preview");
                break;
            }
        }
    }

    server.abort();
    session.dispose();
    Ok(())
}

fn log_outcome(outcome: RenderOutcome) {
    match outcome {
        RenderOutcome::Rendered => info!("Preview updated"),
        RenderOutcome::ParseFailed(message) => warn!(error = %message, "YAML parse failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("todo.yaml");
        fs::write(&path, "Title: Todo\ntasks:\n  - write\n").unwrap();

        let (page, outcome) = render_file(&path, &PreviewConfig::default()).unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered);
        assert!(page.body.starts_with("<h1>Todo</h1><ul><li><h1>tasks</h1>"));
    }

    #[test]
    fn test_render_file_with_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yaml");
        fs::write(&path, "a: [1, 2\n").unwrap();

        let (page, outcome) = render_file(&path, &PreviewConfig::default()).unwrap();
        assert!(matches!(outcome, RenderOutcome::ParseFailed(ref m) if m.starts_with("bad.yaml:")));
        assert!(page.body.contains("yamlview-error"));
    }

    #[test]
    fn test_render_file_missing_input() {
        let temp = TempDir::new().unwrap();
        let err = render_file(&temp.path().join("nope.yaml"), &PreviewConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }
}
