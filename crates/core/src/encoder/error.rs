//! Error types for the encoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// HandBrakeCLI binary not found.
    #[error("HandBrakeCLI not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// Encoding process failed.
    #[error("handbrakecli failure: {reason}")]
    Failed {
        reason: String,
        output: Option<String>,
    },

    /// The run was cancelled before the tool was started.
    #[error("Encoding cancelled")]
    Cancelled,

    /// I/O error during encoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncoderError {
    /// Creates a new encoding failure with the captured tool output.
    pub fn failed(reason: impl Into<String>, output: Option<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            output,
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
