use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::encoder::EncodeSettings;
use crate::pipeline::PipelineConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub encode: EncodeSettings,
    pub output: OutputConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Output directory roots. Each run writes into a timestamped
/// subdirectory of both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub raw_dir: PathBuf,
    pub encoded_dir: PathBuf,
    /// Remove the run's raw files after a successful run.
    #[serde(default)]
    pub delete_raw_files: bool,
}

/// Paths of the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_makemkvcon")]
    pub makemkvcon: PathBuf,
    #[serde(default = "default_handbrake")]
    pub handbrake: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            makemkvcon: default_makemkvcon(),
            handbrake: default_handbrake(),
        }
    }
}

fn default_makemkvcon() -> PathBuf {
    PathBuf::from("makemkvcon")
}

fn default_handbrake() -> PathBuf {
    PathBuf::from("HandBrakeCLI")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encode = &self.encode;
        writeln!(f, "Encode Settings")?;
        writeln!(f)?;

        if let Some(ref file) = encode.preset_file {
            writeln!(f, "Preset File: {}", file.display())?;
            if let Some(ref preset) = encode.preset {
                writeln!(f, "Custom HandBrake Preset: {}", preset)?;
            }
            writeln!(f, "Output Format: {}", encode.output_format)?;
        } else if let Some(ref preset) = encode.preset {
            writeln!(f, "HandBrake Preset: {}", preset)?;
        } else {
            writeln!(f, "Encoder: {}", encode.encoder)?;
            match encode.encoder_preset {
                Some(ref preset) => writeln!(f, "Encoder Preset: {}", preset)?,
                None => writeln!(f, "Quality: {}", encode.quality)?,
            }
            writeln!(f, "Audio Languages: {}", encode.audio_languages.join(", "))?;
            writeln!(f, "Include All Audio: {}", yes_no(encode.include_all_audio))?;
            writeln!(f, "Subtitle Languages: {}", encode.subtitle_languages.join(", "))?;
            writeln!(f, "Include All Subtitles: {}", yes_no(encode.include_all_subtitles))?;
            writeln!(f, "Output Format: {}", encode.output_format)?;
        }

        writeln!(f)?;
        writeln!(f, "Output Settings")?;
        writeln!(f)?;
        writeln!(f, "Raw Directory: {}", self.output.raw_dir.display())?;
        writeln!(f, "Encoded Directory: {}", self.output.encoded_dir.display())?;
        writeln!(f, "Delete Raw Files: {}", yes_no(self.output.delete_raw_files))?;

        writeln!(f)?;
        writeln!(f, "Pipeline Settings")?;
        writeln!(f)?;
        match self.pipeline.handoff_capacity {
            0 => writeln!(f, "Handoff Capacity: all titles")?,
            n => writeln!(f, "Handoff Capacity: {}", n)?,
        }
        match self.pipeline.max_concurrent_units {
            0 => write!(f, "Concurrent Discs: unlimited"),
            n => write!(f, "Concurrent Discs: {}", n),
        }
    }
}
