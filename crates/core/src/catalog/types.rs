//! Types for the catalog module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a title: the source unit plus the index on that unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TitleId {
    /// Source unit (disc) index.
    pub unit: u32,
    /// Title index on the unit.
    pub index: u32,
}

impl TitleId {
    pub fn new(unit: u32, index: u32) -> Self {
        Self { unit, index }
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "disc {} title {}", self.unit, self.index)
    }
}

/// A title discovered on a source unit. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Identity of the title.
    pub id: TitleId,
    /// Name of the disc the title was read from.
    pub disc_title: String,
    /// Output file name reported by the catalog (e.g. `Movie_t00.mkv`).
    pub file_name: String,
    /// Human-readable duration (e.g. `1:58:06`).
    pub length: String,
    /// Human-readable size (e.g. `12.5 GB`).
    pub size: String,
    /// Size in bytes, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Number of chapters.
    pub chapters: u32,
}

impl Title {
    /// Creates a title with only the identity and file name populated.
    pub fn new(id: TitleId, file_name: impl Into<String>) -> Self {
        Self {
            id,
            disc_title: String::new(),
            file_name: file_name.into(),
            length: String::new(),
            size: String::new(),
            size_bytes: None,
            chapters: 0,
        }
    }
}

/// A drive with a disc inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Drive index, used as the unit id everywhere else.
    pub index: u32,
    /// Name of the inserted disc.
    pub name: String,
}
