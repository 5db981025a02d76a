//! yamlview: live HTML preview of YAML documents
//!
//! This crate provides:
//! - [`PreviewSession`], which owns a panel and re-renders it on every edit
//! - The panel message protocol (content replacement and scroll sync)
//! - A preview server that watches a file and pushes updates over websockets
//! - One-shot rendering of a file to a standalone HTML page

pub mod config;
pub mod error;
pub mod preview;
pub mod protocol;
pub mod server;
pub mod session;
pub mod watch;

pub use config::PreviewConfig;
pub use error::{Error, Result};
pub use preview::{render_file, run_preview};
pub use protocol::{PanelMessage, ScrollRequest, scroll_percentage};
pub use session::{Panel, PreviewSession, RenderOutcome, SessionEvent, SessionOptions};
