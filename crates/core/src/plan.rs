//! Output planning for the selected titles.
//!
//! Titles from different discs frequently share a file name (`title_t00.mkv`
//! is on nearly every disc), so before any extraction starts the whole
//! selection is scanned once and colliding titles are routed into a
//! per-disc subdirectory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::{Title, TitleId};

/// Container format that needs no extension rewrite.
const DEFAULT_CONTAINER: &str = "mkv";

/// A selected title together with its output routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTitle {
    /// The catalog title.
    pub title: Title,
    /// Whether outputs go under a subdirectory named after the source unit.
    pub qualify_with_unit: bool,
}

impl PlannedTitle {
    /// Identity of the underlying title.
    pub fn id(&self) -> TitleId {
        self.title.id
    }

    /// Subdirectory below the run roots, empty unless qualification is needed.
    pub fn subdirectory(&self) -> PathBuf {
        if self.qualify_with_unit {
            PathBuf::from(format!("disc_{}", self.title.id.unit))
        } else {
            PathBuf::new()
        }
    }

    /// Directory the raw extraction is written into.
    pub fn raw_dir(&self, raw_root: &Path) -> PathBuf {
        raw_root.join(self.subdirectory())
    }

    /// Full path of the raw extracted file.
    pub fn raw_path(&self, raw_root: &Path) -> PathBuf {
        self.raw_dir(raw_root).join(&self.title.file_name)
    }

    /// Full path of the encoded output file.
    pub fn encoded_path(&self, encoded_root: &Path, output_format: &str) -> PathBuf {
        encoded_root
            .join(self.subdirectory())
            .join(encoded_file_name(&self.title.file_name, output_format))
    }
}

/// Marks every title whose case-folded file name occurs more than once in the
/// selection. Must run on the complete selection across all units.
pub fn plan_titles(titles: Vec<Title>) -> Vec<PlannedTitle> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for title in &titles {
        *counts.entry(title.file_name.to_lowercase()).or_default() += 1;
    }

    titles
        .into_iter()
        .map(|title| {
            let qualify_with_unit = counts
                .get(&title.file_name.to_lowercase())
                .is_some_and(|count| *count > 1);
            PlannedTitle {
                title,
                qualify_with_unit,
            }
        })
        .collect()
}

/// Two planned titles that would write the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCollision {
    pub first: TitleId,
    pub second: TitleId,
    pub path: PathBuf,
}

/// Finds the first pair of titles whose raw or encoded paths are equal once
/// case-folded.
///
/// Qualification only looks at raw names, but the encoded name rewrite can
/// still map two different raw names onto one file (`My Movie.mkv` and
/// `My_Movie.mkv`).
pub fn find_output_collision(
    titles: &[PlannedTitle],
    raw_root: &Path,
    encoded_root: &Path,
    output_format: &str,
) -> Option<OutputCollision> {
    let mut raw_seen: HashMap<String, TitleId> = HashMap::new();
    let mut encoded_seen: HashMap<String, TitleId> = HashMap::new();

    for planned in titles {
        let outputs = [
            (&mut raw_seen, planned.raw_path(raw_root)),
            (
                &mut encoded_seen,
                planned.encoded_path(encoded_root, output_format),
            ),
        ];
        for (seen, path) in outputs {
            let key = path.to_string_lossy().to_lowercase();
            if let Some(first) = seen.get(&key) {
                return Some(OutputCollision {
                    first: *first,
                    second: planned.id(),
                    path,
                });
            }
            seen.insert(key, planned.id());
        }
    }
    None
}

/// `file_name` without a trailing `.mkv`, matched case-insensitively.
pub fn strip_mkv_extension(file_name: &str) -> &str {
    let cut = file_name.len().saturating_sub(4);
    match file_name.get(cut..) {
        Some(ext) if cut > 0 && ext.eq_ignore_ascii_case(".mkv") => &file_name[..cut],
        _ => file_name,
    }
}

/// Derives the encoded file name from a raw file name.
///
/// Spaces become underscores and, for a non-mkv container, the `.mkv`
/// extension is swapped for the configured one. Idempotent.
pub fn encoded_file_name(file_name: &str, output_format: &str) -> String {
    let name = file_name.replace(' ', "_");

    if output_format.is_empty() || output_format == DEFAULT_CONTAINER {
        return name;
    }

    let extension = format!(".{}", output_format);
    let cut = name.len().saturating_sub(extension.len());
    if name
        .get(cut..)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&extension))
    {
        return name;
    }

    format!("{}{}", strip_mkv_extension(&name), extension)
}
