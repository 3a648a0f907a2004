//! makemkvcon-based extractor implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::ExtractorError;
use super::traits::{ExtractionResult, Extractor};
use crate::catalog::Title;

/// Line makemkvcon prints after a single title was copied successfully.
pub const EXTRACTION_SUCCESS_MARKER: &str = "Copy complete. 1 titles saved.";

/// Log written next to the raw output when an extraction fails.
const ERROR_LOG_NAME: &str = "extract_err.log";

/// Extractor that runs `makemkvcon mkv disc:<unit> <index> <dest>`.
pub struct MakeMkvExtractor {
    binary: PathBuf,
}

impl MakeMkvExtractor {
    /// Creates an extractor using the given makemkvcon binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Creates an extractor that resolves `makemkvcon` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new("makemkvcon")
    }

    /// Builds makemkvcon arguments for extracting one title.
    fn build_args(title: &Title, dest_dir: &Path) -> Vec<String> {
        vec![
            "mkv".to_string(),
            format!("disc:{}", title.id.unit),
            title.id.index.to_string(),
            dest_dir.to_string_lossy().to_string(),
        ]
    }

    fn is_success(output: &str) -> bool {
        output.contains(EXTRACTION_SUCCESS_MARKER)
    }

    /// Appends the tool output to the error log in `dest_dir`.
    async fn write_error_log(dest_dir: &Path, output: &str) -> std::io::Result<PathBuf> {
        let log_path = dest_dir.join(ERROR_LOG_NAME);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .await?;
        file.write_all(output.as_bytes()).await?;
        file.flush().await?;
        Ok(log_path)
    }
}

#[async_trait]
impl Extractor for MakeMkvExtractor {
    fn name(&self) -> &str {
        "makemkv"
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

        tokio::fs::create_dir_all(dest_dir).await?;

        let start = Instant::now();
        let args = Self::build_args(title, dest_dir);
        debug!(unit = title.id.unit, title = title.id.index, ?args, "Starting extraction");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractorError::ToolNotFound {
                        path: self.binary.clone(),
                    }
                } else {
                    ExtractorError::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            let mut captured = stdout;
            captured.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(ExtractorError::failed(
                format!("makemkvcon exited with code: {:?}", output.status.code()),
                if captured.is_empty() { None } else { Some(captured) },
            ));
        }

        if !Self::is_success(&stdout) {
            let log_path = match Self::write_error_log(dest_dir, &stdout).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(error = %e, "Failed to write extraction error log");
                    None
                }
            };

            return Err(ExtractorError::Failed {
                reason: format!(
                    "ripping {} from disc {} was not successful",
                    title.file_name, title.id.unit
                ),
                output: Some(stdout),
                log_path,
            });
        }

        Ok(ExtractionResult {
            output_path: dest_dir.join(&title.file_name),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        which::which(&self.binary).map_err(|_| ExtractorError::ToolNotFound {
            path: self.binary.clone(),
        })?;
        Ok(())
    }
}
