//! Preview configuration.
//!
//! Values come from an optional JSON file and are then overridden by
//! command-line flags:
//!
//! ```json
//! {
//!   "host": "127.0.0.1",
//!   "port": 4100,
//!   "scroll_sync": true,
//!   "css_path": "preview.css",
//!   "watch_debounce_ms": 100
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Configuration for rendering and the live preview server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Host to bind the preview server to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Embed the scroll-sync client script in rendered pages
    pub scroll_sync: bool,

    /// Stylesheet replacing the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_path: Option<PathBuf>,

    /// Debounce for filesystem events in milliseconds
    pub watch_debounce_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4100,
            scroll_sync: true,
            css_path: None,
            watch_debounce_ms: 100,
        }
    }
}

impl PreviewConfig {
    /// Load config from a JSON file. Missing fields take their defaults.
    ///
    /// A relative `css_path` is resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: PreviewConfig =
            serde_json::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))?;

        if let (Some(css), Some(dir)) = (&config.css_path, path.parent()) {
            if css.is_relative() {
                config.css_path = Some(dir.join(css));
            }
        }

        debug!(path = %path.display(), ?config, "Loaded preview config");
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Contents of the custom stylesheet, if one is configured.
    pub fn read_css(&self) -> Result<Option<String>> {
        self.css_path
            .as_deref()
            .map(fs::read_to_string)
            .transpose()
            .map_err(Error::from)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
