//! Mock extractor for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::catalog::{Title, TitleId};
use crate::extractor::{ExtractionResult, Extractor, ExtractorError};

/// A recorded extraction for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedExtraction {
    /// The title that was extracted.
    pub id: TitleId,
    /// Directory the title was extracted into.
    pub dest_dir: PathBuf,
    /// When the extraction started.
    pub started: Instant,
    /// When the extraction finished.
    pub finished: Instant,
    /// Whether the extraction succeeded.
    pub success: bool,
}

/// Mock implementation of the Extractor trait.
///
/// Provides controllable behavior for testing:
/// - Track extractions, with timing, for assertions
/// - Simulate per-title failures
/// - Write a fake raw file of a configurable size
/// - Measure how many extractions ran at once
#[derive(Debug, Clone)]
pub struct MockExtractor {
    /// Recorded extractions in completion order.
    extractions: Arc<RwLock<Vec<RecordedExtraction>>>,
    /// Titles that fail, with the failure reason.
    failures: Arc<RwLock<HashMap<TitleId, String>>>,
    /// Titles that report success without writing a file.
    skip_output: Arc<RwLock<HashSet<TitleId>>>,
    /// Simulated extraction duration in milliseconds.
    extraction_duration_ms: Arc<RwLock<u64>>,
    /// Size of the fake raw files.
    file_size: Arc<RwLock<usize>>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    /// Create a new mock extractor.
    pub fn new() -> Self {
        Self {
            extractions: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            skip_output: Arc::new(RwLock::new(HashSet::new())),
            extraction_duration_ms: Arc::new(RwLock::new(10)),
            file_size: Arc::new(RwLock::new(4096)),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded extractions.
    pub async fn recorded_extractions(&self) -> Vec<RecordedExtraction> {
        self.extractions.read().await.clone()
    }

    /// Get the ids of every attempted extraction, in completion order.
    pub async fn extracted_ids(&self) -> Vec<TitleId> {
        self.extractions.read().await.iter().map(|e| e.id).collect()
    }

    /// Make the extraction of `id` fail.
    pub async fn fail_on(&self, id: TitleId, reason: impl Into<String>) {
        self.failures.write().await.insert(id, reason.into());
    }

    /// Report success for `id` without writing its raw file.
    pub async fn skip_output_for(&self, id: TitleId) {
        self.skip_output.write().await.insert(id);
    }

    /// Set the simulated extraction duration.
    pub async fn set_extraction_duration(&self, duration: Duration) {
        *self.extraction_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Set the size of the fake raw files.
    pub async fn set_file_size(&self, bytes: usize) {
        *self.file_size.write().await = bytes;
    }

    /// Highest number of extractions that ran at the same time.
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    async fn record(&self, id: TitleId, dest_dir: &Path, started: Instant, success: bool) {
        self.extractions.write().await.push(RecordedExtraction {
            id,
            dest_dir: dest_dir.to_path_buf(),
            started,
            finished: Instant::now(),
            success,
        });
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(
        &self,
        title: &Title,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult, ExtractorError> {
        if cancel.is_cancelled() {
            return Err(ExtractorError::Cancelled);
        }

        let started = Instant::now();
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        let duration = *self.extraction_duration_ms.read().await;
        tokio::time::sleep(Duration::from_millis(duration)).await;

        self.active.fetch_sub(1, Ordering::SeqCst);

        if let Some(reason) = self.failures.read().await.get(&title.id).cloned() {
            self.record(title.id, dest_dir, started, false).await;
            return Err(ExtractorError::failed(
                reason,
                Some(format!("MSG:5003,0,2,\"Failed to save title {}\"", title.id.index)),
            ));
        }

        let output_path = dest_dir.join(&title.file_name);
        if !self.skip_output.read().await.contains(&title.id) {
            tokio::fs::create_dir_all(dest_dir).await?;
            let size = *self.file_size.read().await;
            tokio::fs::write(&output_path, vec![0u8; size]).await?;
        }

        self.record(title.id, dest_dir, started, true).await;

        Ok(ExtractionResult {
            output_path,
            duration_ms: duration,
        })
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        Ok(())
    }
}
