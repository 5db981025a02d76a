//! Error types for YAML parsing.

use crate::SourceInfo;

/// Result type alias for yamlview-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning YAML text into a node tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner. `message` carries no
    /// position; that lives in `location`.
    #[error("{message}")]
    Parse {
        message: String,
        location: Option<SourceInfo>,
    },

    /// The event stream did not describe a well-formed tree
    #[error("invalid YAML structure: {message}")]
    InvalidStructure {
        message: String,
        location: Option<SourceInfo>,
    },
}

impl Error {
    /// Where in the source the error was detected, if known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::Parse { location, .. } | Error::InvalidStructure { location, .. } => {
                location.as_ref()
            }
        }
    }
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::Parse {
            message: err.info().to_string(),
            location: Some(SourceInfo::from_marker(err.marker(), 0)),
        }
    }
}
