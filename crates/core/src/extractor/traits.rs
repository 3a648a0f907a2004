//! Trait definitions for the extractor module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use super::error::ExtractorError;
use crate::catalog::Title;

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Path of the raw file that was written.
    pub output_path: PathBuf,
    /// Wall time spent in the external tool.
    pub duration_ms: u64,
}

/// Copies one title off its source unit into a destination directory.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns the name of this extractor implementation.
    fn name(&self) -> &str;

    /// Extracts `title` into `dest_dir`.
    ///
    /// Returns [`ExtractorError::Cancelled`] without starting the tool when
    /// `cancel` has already fired. A started extraction runs to completion.
    async fn extract(
        &self,
        title: &Title,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult, ExtractorError>;

    /// Validates that the extractor is properly configured and ready.
    async fn validate(&self) -> Result<(), ExtractorError>;
}
