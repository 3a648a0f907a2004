use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{preset::resolve_preset_file, types::Config, ConfigError};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "ripline.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "RIPLINE_";

/// User-wide configuration file (`<config dir>/ripline/config.toml`).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ripline").join("config.toml"))
}

/// Candidate configuration files in lookup order.
pub fn config_search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }
    paths.push(PathBuf::from(".").join(CONFIG_FILE_NAME));
    if let Some(path) = user_config_path() {
        paths.push(path);
    }
    paths
}

/// First existing configuration file on the search path.
pub fn find_config(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let searched = config_search_paths(explicit);
    if let Some(found) = searched.iter().find(|p| p.is_file()) {
        return Ok(found.clone());
    }
    Err(ConfigError::NotFound { searched })
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            searched: vec![path.to_path_buf()],
        });
    }

    let mut config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    resolve_preset_file(&mut config.encode)?;
    info!(path = %path.display(), "Loaded configuration");

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Writes `config` as TOML, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    debug!(path = %path.display(), "Saved configuration");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[encode]
encoder = "nvenc_h265"
quality = 22
audio_languages = ["eng", "jpn"]

[output]
raw_dir = "/rips/raw"
encoded_dir = "/rips/encoded"
delete_raw_files = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.encode.encoder, "nvenc_h265");
        assert_eq!(config.encode.quality, 22);
        assert_eq!(config.encode.audio_languages, vec!["eng", "jpn"]);
        assert_eq!(config.encode.output_format, "mkv");
        assert!(config.output.delete_raw_files);
        assert_eq!(config.pipeline.handoff_capacity, 0);
        assert_eq!(config.tools.handbrake, PathBuf::from("HandBrakeCLI"));
    }

    #[test]
    fn test_load_config_from_str_missing_output() {
        let toml = r#"
[encode]
quality = 20
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/ripline.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[output]
raw_dir = "/tmp/raw"
encoded_dir = "/tmp/enc"

[pipeline]
handoff_capacity = 1
max_concurrent_units = 2
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.output.raw_dir, PathBuf::from("/tmp/raw"));
        assert_eq!(config.pipeline.handoff_capacity, 1);
        assert_eq!(config.pipeline.max_concurrent_units, 2);
    }

    #[test]
    fn test_load_config_resolves_preset_file() {
        let dir = TempDir::new().unwrap();
        let preset_path = dir.path().join("preset.json");
        std::fs::write(
            &preset_path,
            r#"{"PresetList": [{"PresetName": "Anime", "FileFormat": "av_mp4"}]}"#,
        )
        .unwrap();

        let config_path = dir.path().join("ripline.toml");
        std::fs::write(
            &config_path,
            format!(
                "[encode]\npreset_file = {:?}\n\n[output]\nraw_dir = \"r\"\nencoded_dir = \"e\"\n",
                preset_path.display().to_string()
            ),
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.encode.preset.as_deref(), Some("Anime"));
        assert_eq!(config.encode.output_format, "mp4");
    }

    #[test]
    fn test_find_config_explicit_missing() {
        let result = find_config(Some(Path::new("/nonexistent/custom.toml")));
        match result {
            Err(ConfigError::NotFound { searched }) => {
                assert_eq!(searched, vec![PathBuf::from("/nonexistent/custom.toml")]);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_find_config_explicit_present() {
        let temp_file = NamedTempFile::new().unwrap();
        let found = find_config(Some(temp_file.path())).unwrap();
        assert_eq!(found, temp_file.path());
    }

    #[test]
    fn test_search_paths_default_order() {
        let paths = config_search_paths(None);
        assert_eq!(paths[0], PathBuf::from("./ripline.toml"));
        if let Some(user) = user_config_path() {
            assert_eq!(paths.last(), Some(&user));
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            output: OutputConfig {
                raw_dir: "/a".into(),
                encoded_dir: "/b".into(),
                delete_raw_files: true,
            },
            ..Default::default()
        };

        save_config(&config, &path).unwrap();
        let loaded = load_config_from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }
}
