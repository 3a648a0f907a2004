//! HandBrakeCLI-based encoder implementation.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::EncoderError;
use super::traits::Encoder;
use super::types::{EncodeParams, EncodeResult};

/// Lines of tool output kept for diagnostics on failure.
const CAPTURED_OUTPUT_LINES: usize = 40;

/// HandBrakeCLI-based encoder implementation.
pub struct HandBrakeEncoder {
    binary: PathBuf,
}

impl HandBrakeEncoder {
    /// Creates an encoder using the given HandBrakeCLI binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Creates an encoder that resolves `HandBrakeCLI` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new("HandBrakeCLI")
    }

    /// Builds HandBrakeCLI arguments for one encode.
    pub(crate) fn build_args(params: &EncodeParams) -> Vec<String> {
        let settings = &params.settings;
        let mut args = vec![
            "--input".to_string(),
            params.input.to_string_lossy().to_string(),
            "--output".to_string(),
            params.output.to_string_lossy().to_string(),
        ];

        if let Some(ref preset_file) = settings.preset_file {
            args.extend([
                "--preset-import-file".to_string(),
                preset_file.to_string_lossy().to_string(),
            ]);
        }

        if let Some(ref preset) = settings.preset {
            args.extend(["--preset".to_string(), preset.clone()]);
            return args;
        }

        args.extend(["--encoder".to_string(), settings.encoder.clone()]);

        match settings.encoder_preset {
            Some(ref encoder_preset) => {
                args.extend(["--encoder-preset".to_string(), encoder_preset.clone()]);
            }
            None => {
                args.extend(["--quality".to_string(), settings.quality.to_string()]);
            }
        }

        if !settings.subtitle_languages.is_empty() {
            args.extend([
                "--subtitle-lang-list".to_string(),
                settings.subtitle_languages.join(","),
            ]);
            if settings.include_all_subtitles {
                args.push("--all-subtitles".to_string());
            }
        }

        if !settings.audio_languages.is_empty() {
            args.extend([
                "--audio-lang-list".to_string(),
                settings.audio_languages.join(","),
            ]);
            if settings.include_all_audio {
                args.push("--all-audio".to_string());
            }
        }

        args
    }
}

/// Keeps the last `max_lines` lines of tool output.
pub(crate) fn output_tail(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

#[async_trait]
impl Encoder for HandBrakeEncoder {
    fn name(&self) -> &str {
        "handbrake"
    }

    async fn encode(
        &self,
        params: &EncodeParams,
        cancel: &CancellationToken,
    ) -> Result<EncodeResult, EncoderError> {
        if cancel.is_cancelled() {
            return Err(EncoderError::Cancelled);
        }

        if !tokio::fs::try_exists(&params.input).await.unwrap_or(false) {
            return Err(EncoderError::InputNotFound {
                path: params.input.clone(),
            });
        }

        if let Some(parent) = params.output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                EncoderError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        let start = Instant::now();
        let args = Self::build_args(params);
        debug!(?args, "Starting encode");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EncoderError::ToolNotFound {
                        path: self.binary.clone(),
                    }
                } else {
                    EncoderError::Io(e)
                }
            })?;

        let mut captured = String::from_utf8_lossy(&output.stdout).to_string();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));
        let captured = output_tail(&captured, CAPTURED_OUTPUT_LINES);

        if !output.status.success() {
            return Err(EncoderError::failed(
                format!("HandBrakeCLI exited with code: {:?}", output.status.code()),
                if captured.is_empty() { None } else { Some(captured) },
            ));
        }

        let output_meta = tokio::fs::metadata(&params.output).await.map_err(|_| {
            EncoderError::failed(
                "Output file not created",
                if captured.is_empty() { None } else { Some(captured.clone()) },
            )
        })?;

        Ok(EncodeResult {
            output_path: params.output.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), EncoderError> {
        which::which(&self.binary).map_err(|_| EncoderError::ToolNotFound {
            path: self.binary.clone(),
        })?;
        Ok(())
    }
}
