//! MakeMKV-backed catalog implementation.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::CatalogError;
use super::traits::TitleCatalog;
use super::types::{SourceUnit, Title, TitleId};

/// Disc index that makes makemkvcon report every drive without scanning one.
const ALL_DRIVES_PROBE: &str = "disc:9999";

// TINFO attribute codes.
const CODE_DISC_TITLE: &str = "2";
const CODE_CHAPTERS: &str = "8";
const CODE_LENGTH: &str = "9";
const CODE_SIZE: &str = "10";
const CODE_SIZE_BYTES: &str = "11";
const CODE_FILE_NAME: &str = "27";

/// Catalog that shells out to `makemkvcon` in robot mode.
pub struct MakeMkvCatalog {
    binary: PathBuf,
}

impl MakeMkvCatalog {
    /// Creates a catalog using the given makemkvcon binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Creates a catalog that resolves `makemkvcon` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new("makemkvcon")
    }

    async fn run(&self, args: &[&str]) -> Result<String, CatalogError> {
        debug!(binary = %self.binary.display(), ?args, "Running catalog command");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CatalogError::ToolNotFound {
                        path: self.binary.clone(),
                    }
                } else {
                    CatalogError::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            return Err(CatalogError::command(
                format!("makemkvcon exited with code: {:?}", output.status.code()),
                if stdout.is_empty() { None } else { Some(stdout) },
            ));
        }

        Ok(stdout)
    }

    /// Parses `TINFO:` lines into titles sorted by file name.
    ///
    /// Lines look like `TINFO:0,27,0,"Movie_t00.mkv"`; the value may itself
    /// contain commas, so only the first three are separators.
    pub(crate) fn parse_titles(unit: u32, output: &str) -> Vec<Title> {
        let mut titles: BTreeMap<u32, Title> = BTreeMap::new();

        for line in output.lines() {
            let Some(rest) = line.strip_prefix("TINFO:") else {
                continue;
            };

            let parts: Vec<&str> = rest.splitn(4, ',').collect();
            if parts.len() < 4 {
                continue;
            }

            let Ok(index) = parts[0].parse::<u32>() else {
                continue;
            };
            let code = parts[1];
            let value = parts[3].trim_end_matches('\r').trim_matches('"');

            let title = titles
                .entry(index)
                .or_insert_with(|| Title::new(TitleId::new(unit, index), String::new()));

            match code {
                CODE_DISC_TITLE => title.disc_title = value.to_string(),
                CODE_CHAPTERS => {
                    if let Ok(chapters) = value.parse() {
                        title.chapters = chapters;
                    }
                }
                CODE_LENGTH => title.length = value.to_string(),
                CODE_SIZE => title.size = value.to_string(),
                CODE_SIZE_BYTES => title.size_bytes = value.parse().ok(),
                CODE_FILE_NAME => title.file_name = value.to_string(),
                _ => {}
            }
        }

        let mut titles: Vec<Title> = titles.into_values().collect();
        titles.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        titles
    }

    /// Parses `DRV:` lines into the drives that have a disc inserted.
    pub(crate) fn parse_drives(output: &str) -> Result<Vec<SourceUnit>, CatalogError> {
        let mut drives = Vec::new();

        for line in output.lines() {
            let Some(rest) = line.strip_prefix("DRV:") else {
                continue;
            };

            let parts: Vec<&str> = rest.trim_end_matches('\r').split(',').collect();
            if parts.len() != 7 || parts[5] == "\"\"" {
                continue;
            }

            let index = parts[0].parse::<u32>().map_err(|e| CatalogError::Parse {
                reason: format!("invalid drive index {:?}: {}", parts[0], e),
            })?;

            drives.push(SourceUnit {
                index,
                name: parts[5].trim_matches('"').to_string(),
            });
        }

        Ok(drives)
    }
}

#[async_trait]
impl TitleCatalog for MakeMkvCatalog {
    fn name(&self) -> &str {
        "makemkv"
    }

    async fn list_units(&self) -> Result<Vec<SourceUnit>, CatalogError> {
        let output = self.run(&["-r", "--cache=1", "info", ALL_DRIVES_PROBE]).await?;
        Self::parse_drives(&output)
    }

    async fn list_titles(&self, unit: u32) -> Result<Vec<Title>, CatalogError> {
        let disc = format!("disc:{}", unit);
        let output = self.run(&["-r", "info", &disc]).await?;

        let titles = Self::parse_titles(unit, &output);
        if titles.is_empty() {
            return Err(CatalogError::NoTitles { unit });
        }

        debug!(unit, count = titles.len(), "Read titles from disc");
        Ok(titles)
    }
}
