//! Interactive configuration wizard (`ripline --configure`).

use anyhow::{bail, Context, Result};
use dialoguer::{Confirm, Input, Select};
use std::path::{Path, PathBuf};

use ripline_core::config::{
    resolve_preset_file, save_config, user_config_path, validate_config, Config, OutputConfig,
    CONFIG_FILE_NAME,
};
use ripline_core::encoder::{EncodeSettings, HandBrakeCapabilities, FALLBACK_ENCODERS, OUTPUT_FORMATS};

/// Where the configuration file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    UserWide,
    WorkingDirectory,
}

impl Location {
    fn config_path(self) -> Result<PathBuf> {
        match self {
            Self::UserWide => {
                user_config_path().context("Could not determine the user configuration directory")
            }
            Self::WorkingDirectory => Ok(PathBuf::from(".").join(CONFIG_FILE_NAME)),
        }
    }

    /// Base for the suggested output directories.
    fn output_base(self) -> PathBuf {
        match self {
            Self::UserWide => dirs::home_dir()
                .map(|home| home.join("ripline"))
                .unwrap_or_else(|| PathBuf::from("ripline")),
            Self::WorkingDirectory => PathBuf::from("."),
        }
    }
}

/// Walks the user through every setting and writes the configuration file.
///
/// `explicit` skips the location question; output directories are then
/// suggested next to that file.
pub async fn run_wizard(explicit: Option<&Path>, handbrake: &Path) -> Result<()> {
    let (path, output_base) = match explicit {
        Some(path) => (path.to_path_buf(), explicit_output_base(path)),
        None => {
            let location = prompt_location()?;
            (location.config_path()?, location.output_base())
        }
    };

    if path.exists()
        && !Confirm::new()
            .with_prompt(format!(
                "A configuration already exists at {}. Overwrite it?",
                path.display()
            ))
            .default(false)
            .interact()?
    {
        println!("Keeping the existing configuration.");
        return Ok(());
    }

    let capabilities = HandBrakeCapabilities::new(handbrake);
    let encode = prompt_encode_settings(&capabilities).await?;
    let output = prompt_output(&output_base)?;

    let config = Config {
        encode,
        output,
        ..Default::default()
    };
    validate_config(&config).context("The entered configuration is not valid")?;

    println!("\n{}\n", config);
    if !Confirm::new()
        .with_prompt("Save this configuration?")
        .default(true)
        .interact()?
    {
        println!("Configuration discarded.");
        return Ok(());
    }

    save_config(&config, &path)
        .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn prompt_location() -> Result<Location> {
    let choice = Select::new()
        .with_prompt("Where should the configuration be stored?")
        .items(&[
            "User-wide configuration (recommended)",
            "Current working directory",
        ])
        .default(0)
        .interact()?;

    Ok(match choice {
        0 => Location::UserWide,
        _ => Location::WorkingDirectory,
    })
}

async fn prompt_encode_settings(capabilities: &HandBrakeCapabilities) -> Result<EncodeSettings> {
    let mode = Select::new()
        .with_prompt("How should titles be encoded?")
        .items(&[
            "Simplified encoder settings",
            "A built-in HandBrake preset",
            "A custom HandBrake preset file",
        ])
        .default(0)
        .interact()?;

    match mode {
        0 => prompt_simplified(capabilities).await,
        1 => prompt_builtin_preset(capabilities).await,
        _ => prompt_preset_file(),
    }
}

async fn prompt_simplified(capabilities: &HandBrakeCapabilities) -> Result<EncodeSettings> {
    let mut settings = EncodeSettings::default();

    let encoders = match capabilities.list_encoders().await {
        Ok(encoders) if !encoders.is_empty() => encoders,
        Ok(_) | Err(_) => {
            println!("Could not read encoders from HandBrakeCLI, showing the documented list.");
            FALLBACK_ENCODERS.iter().map(|e| e.to_string()).collect()
        }
    };
    settings.encoder = select_from("Default video encoder", &encoders)?;

    let use_encoder_preset = Select::new()
        .with_prompt("Control quality with")
        .items(&["An encoder preset", "A numeric quality value"])
        .default(0)
        .interact()?
        == 0;

    if use_encoder_preset {
        let presets = capabilities
            .list_encoder_presets(&settings.encoder)
            .await
            .context("Failed to read encoder presets from HandBrakeCLI")?;
        if presets.is_empty() {
            bail!("HandBrakeCLI reported no presets for encoder {}", settings.encoder);
        }
        settings.encoder_preset = Some(select_from(
            "Encoder preset (slower presets give larger, higher quality files)",
            &presets,
        )?);
    } else {
        settings.quality = Input::new()
            .with_prompt("Quality (0-51, lower is better)")
            .default(settings.quality)
            .validate_with(|q: &u8| {
                if *q <= 51 {
                    Ok(())
                } else {
                    Err("quality must be between 0 and 51")
                }
            })
            .interact_text()?;
    }

    settings.audio_languages = prompt_languages("Audio languages (ISO 639-2, e.g. eng,jpn)", "any")?;
    settings.include_all_audio = Confirm::new()
        .with_prompt("Keep every audio track in those languages?")
        .default(true)
        .interact()?;

    settings.subtitle_languages = prompt_languages("Subtitle languages (ISO 639-2, e.g. eng,jpn)", "eng")?;
    settings.include_all_subtitles = Confirm::new()
        .with_prompt("Keep every subtitle track in those languages?")
        .default(true)
        .interact()?;

    let formats: Vec<String> = OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect();
    settings.output_format = select_from("Output container", &formats)?;

    Ok(settings)
}

async fn prompt_builtin_preset(capabilities: &HandBrakeCapabilities) -> Result<EncodeSettings> {
    let presets = capabilities
        .list_presets()
        .await
        .context("Failed to read presets from HandBrakeCLI")?;
    if presets.is_empty() {
        bail!("HandBrakeCLI reported no presets");
    }

    Ok(EncodeSettings {
        preset: Some(select_from("HandBrake preset", &presets)?),
        ..Default::default()
    })
}

fn prompt_preset_file() -> Result<EncodeSettings> {
    loop {
        let path: String = Input::new()
            .with_prompt("Path to a HandBrake preset file (only the first preset is used)")
            .interact_text()?;

        let mut settings = EncodeSettings {
            preset_file: Some(PathBuf::from(path.trim())),
            ..Default::default()
        };
        match resolve_preset_file(&mut settings) {
            Ok(()) => {
                // Only the file is stored; the preset is re-read on every load.
                settings.preset = None;
                return Ok(settings);
            }
            Err(e) => println!("{}\n", e),
        }
    }
}

/// Directory holding an explicitly given configuration file.
fn explicit_output_base(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn prompt_output(base: &Path) -> Result<OutputConfig> {
    let raw_dir: String = Input::new()
        .with_prompt("Directory for raw extracted files")
        .default(base.join("raw").display().to_string())
        .interact_text()?;
    let encoded_dir: String = Input::new()
        .with_prompt("Directory for encoded files (a different directory is recommended)")
        .default(base.join("encoded").display().to_string())
        .interact_text()?;
    let delete_raw_files = Confirm::new()
        .with_prompt("Delete the raw files after a successful run?")
        .default(false)
        .interact()?;

    Ok(OutputConfig {
        raw_dir: PathBuf::from(raw_dir),
        encoded_dir: PathBuf::from(encoded_dir),
        delete_raw_files,
    })
}

fn select_from(prompt: &str, items: &[String]) -> Result<String> {
    let index = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;
    Ok(items[index].clone())
}

fn prompt_languages(prompt: &str, default: &str) -> Result<Vec<String>> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(parse_languages(&answer))
}

/// Splits a comma separated language list, dropping blanks.
fn parse_languages(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|lang| lang.trim().to_lowercase())
        .filter(|lang| !lang.is_empty())
        .collect()
}
