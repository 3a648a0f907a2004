//! Error types for the catalog module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while enumerating source units and titles.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog tool binary could not be found.
    #[error("makemkvcon not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The disc was read but no titles were reported.
    #[error("disc {unit}: no titles found on disc")]
    NoTitles { unit: u32 },

    /// The catalog tool exited unsuccessfully.
    #[error("catalog command failed: {reason}")]
    Command {
        reason: String,
        output: Option<String>,
    },

    /// The catalog tool produced output that could not be understood.
    #[error("failed to parse catalog output: {reason}")]
    Parse { reason: String },

    /// I/O error while running the catalog tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Creates a new command failure with the captured tool output.
    pub fn command(reason: impl Into<String>, output: Option<String>) -> Self {
        Self::Command {
            reason: reason.into(),
            output,
        }
    }

    /// The source unit this error refers to, if any.
    pub fn unit(&self) -> Option<u32> {
        match self {
            Self::NoTitles { unit } => Some(*unit),
            _ => None,
        }
    }
}
