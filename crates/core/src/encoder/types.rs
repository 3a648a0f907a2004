//! Types for the encoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output containers the encoder can produce.
pub const OUTPUT_FORMATS: &[&str] = &["mkv", "mp4", "webm"];

/// Encoding settings shared by every title in a run.
///
/// Either a HandBrake preset (`preset`, optionally imported from
/// `preset_file`) or the simplified encoder settings are used, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// HandBrake video encoder (e.g. `x264`, `nvenc_h265`).
    #[serde(default = "default_encoder")]
    pub encoder: String,

    /// Constant quality value; ignored when `encoder_preset` is set.
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Encoder speed/quality preset (e.g. `slow`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder_preset: Option<String>,

    /// ISO 639-2 subtitle languages to keep.
    #[serde(default)]
    pub subtitle_languages: Vec<String>,

    /// Keep every subtitle track in the selected languages.
    #[serde(default)]
    pub include_all_subtitles: bool,

    /// ISO 639-2 audio languages to keep.
    #[serde(default)]
    pub audio_languages: Vec<String>,

    /// Keep every audio track in the selected languages.
    #[serde(default)]
    pub include_all_audio: bool,

    /// Output container (mkv, mp4, webm).
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Named HandBrake preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// HandBrake preset file to import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_file: Option<PathBuf>,
}

fn default_encoder() -> String {
    "x264".to_string()
}

fn default_quality() -> u8 {
    20
}

fn default_output_format() -> String {
    "mkv".to_string()
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            encoder: default_encoder(),
            quality: default_quality(),
            encoder_preset: None,
            subtitle_languages: Vec::new(),
            include_all_subtitles: false,
            audio_languages: Vec::new(),
            include_all_audio: false,
            output_format: default_output_format(),
            preset: None,
            preset_file: None,
        }
    }
}

impl EncodeSettings {
    /// Whether a HandBrake preset replaces the simplified settings.
    pub fn uses_preset(&self) -> bool {
        self.preset.is_some() || self.preset_file.is_some()
    }
}

/// Fully resolved parameters for encoding one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParams {
    /// Raw extracted file.
    pub input: PathBuf,
    /// Encoded output file.
    pub output: PathBuf,
    /// Settings for this run.
    pub settings: EncodeSettings,
}

/// Result of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeResult {
    /// Path to the encoded file.
    pub output_path: PathBuf,
    /// Size of the encoded file in bytes.
    pub output_size_bytes: u64,
    /// Wall time spent in the external tool.
    pub duration_ms: u64,
}
