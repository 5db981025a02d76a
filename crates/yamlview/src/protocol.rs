//! Messages sent from the editor side to the preview panel.
//!
//! Every message is a JSON object tagged by `type`:
//!
//! ```json
//! { "type": "scroll", "percentage": 0.25 }
//! { "type": "content", "body": "<ul>...</ul>" }
//! ```

use serde::{Deserialize, Serialize};

/// A one-way message to the preview panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PanelMessage {
    /// Scroll the panel to `percentage * scrollHeight`.
    Scroll { percentage: f64 },

    /// Replace the panel's body markup.
    Content { body: String },
}

impl PanelMessage {
    pub fn scroll(top_line: usize, line_count: usize) -> Self {
        PanelMessage::Scroll {
            percentage: scroll_percentage(top_line, line_count),
        }
    }
}

/// Visible position of the source editor, as posted by an editor integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRequest {
    /// First visible line (0-based)
    pub top_line: usize,

    /// Total number of lines in the document
    pub line_count: usize,
}

/// Fraction of the document above the first visible line, in `[0, 1]`.
///
/// An empty document is always at the top.
pub fn scroll_percentage(top_line: usize, line_count: usize) -> f64 {
    if line_count == 0 {
        return 0.0;
    }
    (top_line as f64 / line_count as f64).clamp(0.0, 1.0)
}
