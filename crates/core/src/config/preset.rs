//! HandBrake preset file resolution.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use super::ConfigError;
use crate::encoder::EncodeSettings;

/// The parts of an exported HandBrake preset file that matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetFile {
    #[serde(rename = "PresetList", default)]
    pub preset_list: Vec<PresetSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresetSummary {
    #[serde(rename = "PresetName")]
    pub name: String,
    #[serde(rename = "FileFormat", default)]
    pub file_format: String,
}

impl PresetSummary {
    /// Output container implied by the preset's `FileFormat`.
    pub fn output_format(&self) -> &'static str {
        match self.file_format.as_str() {
            "av_mp4" => "mp4",
            "av_webm" => "webm",
            _ => "mkv",
        }
    }
}

/// Fills `preset` and `output_format` from the first preset in
/// `settings.preset_file`. A no-op when no preset file is configured.
pub fn resolve_preset_file(settings: &mut EncodeSettings) -> Result<(), ConfigError> {
    let Some(path) = settings.preset_file.clone() else {
        return Ok(());
    };

    let preset = read_first_preset(&path)?;
    debug!(path = %path.display(), preset = %preset.name, "Resolved HandBrake preset file");

    settings.output_format = preset.output_format().to_string();
    settings.preset = Some(preset.name);
    Ok(())
}

fn read_first_preset(path: &Path) -> Result<PresetSummary, ConfigError> {
    let preset_error = |reason: String| ConfigError::PresetFile {
        path: path.to_path_buf(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => preset_error("file does not exist".to_string()),
        _ => preset_error(e.to_string()),
    })?;

    let file: PresetFile =
        serde_json::from_str(&content).map_err(|e| preset_error(format!("invalid JSON: {}", e)))?;

    file.preset_list
        .into_iter()
        .next()
        .ok_or_else(|| preset_error("no presets found".to_string()))
}
