//! Error types for the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::TitleId;
use crate::encoder::EncoderError;
use crate::extractor::ExtractorError;

/// The error that ended a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Extracting a title failed.
    #[error("extraction of {id} failed: {source}")]
    Extraction {
        id: TitleId,
        #[source]
        source: ExtractorError,
    },

    /// Encoding a title failed.
    #[error("encoding of {id} failed: {source}")]
    Encoding {
        id: TitleId,
        #[source]
        source: EncoderError,
    },

    /// The raw file handed to the encoder does not exist.
    #[error("raw file for {id} not found: {path}")]
    MissingEncodeInput { id: TitleId, path: PathBuf },

    /// Two titles would be written to the same output file.
    #[error("{first} and {second} would both write {path}")]
    OutputCollision {
        first: TitleId,
        second: TitleId,
        path: PathBuf,
    },

    /// I/O error outside the external tools.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run was started without any titles.
    #[error("no titles selected")]
    NothingToProcess,

    /// A worker task panicked.
    #[error("pipeline worker panicked: {0}")]
    WorkerPanicked(String),
}

impl PipelineError {
    /// The title whose processing failed, if any.
    pub fn title_id(&self) -> Option<TitleId> {
        match self {
            Self::Extraction { id, .. }
            | Self::Encoding { id, .. }
            | Self::MissingEncodeInput { id, .. }
            | Self::OutputCollision { second: id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Output captured from the failing external tool.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::Extraction { source, .. } => source.captured_output(),
            Self::Encoding { source, .. } => source.captured_output(),
            _ => None,
        }
    }
}
