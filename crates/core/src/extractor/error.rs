//! Error types for the extractor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Extraction tool binary not found.
    #[error("makemkvcon not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The tool ran but did not report a successful copy.
    #[error("extraction failed: {reason}")]
    Failed {
        reason: String,
        output: Option<String>,
        log_path: Option<PathBuf>,
    },

    /// The run was cancelled before the tool was started.
    #[error("extraction cancelled")]
    Cancelled,

    /// I/O error during extraction.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractorError {
    /// Creates a new extraction failure with the captured tool output.
    pub fn failed(reason: impl Into<String>, output: Option<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            output,
            log_path: None,
        }
    }

    /// Output captured from the external tool, if any.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } => output.as_deref(),
            _ => None,
        }
    }
}
