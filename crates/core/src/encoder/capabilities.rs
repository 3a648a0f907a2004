//! HandBrakeCLI capability listing.

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use super::error::EncoderError;

/// Encoders documented by HandBrake, used when `--help` cannot be parsed.
pub const FALLBACK_ENCODERS: &[&str] = &[
    "svt_av1",
    "svt_av1_10bit",
    "x264",
    "x264_10bit",
    "nvenc_h264",
    "x265",
    "x265_10bit",
    "x265_12bit",
    "nvenc_h265",
    "nvenc_h265_10bit",
    "mpeg4",
    "mpeg2",
    "VP8",
    "VP9",
    "VP9_10bit",
    "theora",
];

/// Queries a HandBrakeCLI binary for what it supports.
pub struct HandBrakeCapabilities {
    binary: PathBuf,
}

impl HandBrakeCapabilities {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Built-in preset names (`--preset-list`).
    pub async fn list_presets(&self) -> Result<Vec<String>, EncoderError> {
        let output = self.run(&["--preset-list"]).await?;
        Ok(parse_indented_entries(&output))
    }

    /// Video encoders (`--help`, "Select video encoder" section).
    pub async fn list_encoders(&self) -> Result<Vec<String>, EncoderError> {
        let output = self.run(&["--help"]).await?;
        Ok(parse_encoders(&output))
    }

    /// Speed/quality presets of one encoder (`--encoder-preset-list`).
    pub async fn list_encoder_presets(&self, encoder: &str) -> Result<Vec<String>, EncoderError> {
        let output = self.run(&["--encoder-preset-list", encoder]).await?;
        Ok(parse_indented_entries(&output))
    }

    /// Runs HandBrakeCLI and returns stdout and stderr combined; the listings
    /// are printed to either depending on the version.
    async fn run(&self, args: &[&str]) -> Result<String, EncoderError> {
        let output = Command::new(&self.binary)
            .args(args)
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

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(EncoderError::failed(
                format!("HandBrakeCLI exited with code: {:?}", output.status.code()),
                Some(text),
            ));
        }

        Ok(text)
    }
}

/// Entries indented by exactly four spaces (category headers have none,
/// descriptions have eight).
fn parse_indented_entries(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.starts_with("    ") && !line.starts_with("        "))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn parse_encoders(output: &str) -> Vec<String> {
    let mut encoders = Vec::new();
    let mut in_section = false;

    for line in output.lines().map(str::trim) {
        if line.contains("Select video encoder:") {
            in_section = true;
            continue;
        }

        if in_section {
            if line.is_empty() || line.starts_with("--") {
                break;
            }
            encoders.push(line.to_string());
        }
    }

    encoders
}
