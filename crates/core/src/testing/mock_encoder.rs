//! Mock encoder for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::encoder::{EncodeParams, EncodeResult, Encoder, EncoderError};

/// A recorded encoding for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncoding {
    /// The parameters that were submitted.
    pub params: EncodeParams,
    /// When the encode started.
    pub started: Instant,
    /// When the encode finished.
    pub finished: Instant,
    /// Whether the encode succeeded.
    pub success: bool,
}

/// Mock implementation of the Encoder trait.
///
/// Writes an output file half the size of its input, so size totals and
/// space savings can be checked.
#[derive(Debug, Clone)]
pub struct MockEncoder {
    /// Recorded encodings in order.
    encodings: Arc<RwLock<Vec<RecordedEncoding>>>,
    /// Input file names that fail, with the failure reason.
    failures: Arc<RwLock<HashMap<String, String>>>,
    /// Simulated encoding duration in milliseconds.
    encoding_duration_ms: Arc<RwLock<u64>>,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self {
            encodings: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            encoding_duration_ms: Arc::new(RwLock::new(10)),
        }
    }

    /// Get all recorded encodings.
    pub async fn recorded_encodings(&self) -> Vec<RecordedEncoding> {
        self.encodings.read().await.clone()
    }

    /// Get the number of encodes attempted.
    pub async fn encoding_count(&self) -> usize {
        self.encodings.read().await.len()
    }

    /// Make encoding of the raw file named `file_name` fail.
    pub async fn fail_on(&self, file_name: impl Into<String>, reason: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(file_name.into(), reason.into());
    }

    /// Set the simulated encoding duration.
    pub async fn set_encoding_duration(&self, duration: Duration) {
        *self.encoding_duration_ms.write().await = duration.as_millis() as u64;
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn encode(
        &self,
        params: &EncodeParams,
        cancel: &CancellationToken,
    ) -> Result<EncodeResult, EncoderError> {
        if cancel.is_cancelled() {
            return Err(EncoderError::Cancelled);
        }

        let started = Instant::now();
        let duration = *self.encoding_duration_ms.read().await;
        tokio::time::sleep(Duration::from_millis(duration)).await;

        let file_name = params
            .input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some(reason) = self.failures.read().await.get(&file_name).cloned() {
            self.encodings.write().await.push(RecordedEncoding {
                params: params.clone(),
                started,
                finished: Instant::now(),
                success: false,
            });
            return Err(EncoderError::failed(
                reason,
                Some("Encode failed (error 3)".to_string()),
            ));
        }

        let input_size = tokio::fs::metadata(&params.input).await?.len() as usize;
        if let Some(parent) = params.output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&params.output, vec![0u8; input_size / 2]).await?;

        self.encodings.write().await.push(RecordedEncoding {
            params: params.clone(),
            started,
            finished: Instant::now(),
            success: true,
        });

        Ok(EncodeResult {
            output_path: params.output.clone(),
            output_size_bytes: (input_size / 2) as u64,
            duration_ms: duration,
        })
    }

    async fn validate(&self) -> Result<(), EncoderError> {
        Ok(())
    }
}
