//! Types for the pipeline module.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::TitleId;
use crate::encoder::EncodeParams;

/// A freshly extracted title waiting for the encoder.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Title the raw file belongs to.
    pub id: TitleId,
    /// Fully resolved encode parameters.
    pub params: EncodeParams,
}

/// A title that made it through both stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTitle {
    pub id: TitleId,
    pub raw_path: PathBuf,
    pub encoded_path: PathBuf,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Completed titles in encode order.
    pub items: Vec<CompletedTitle>,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}
