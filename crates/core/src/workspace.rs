//! Run-scoped output directories and post-run bookkeeping.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::pipeline::RunSummary;

/// Prefix of every run directory name.
pub const RUN_DIR_PREFIX: &str = "ripline_";

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// The raw and encoded directories of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectories {
    /// Where extracted files are written.
    pub raw: PathBuf,
    /// Where encoded files are written.
    pub encoded: PathBuf,
}

impl RunDirectories {
    /// Uses the given directories as-is, without creating them.
    pub fn new(raw: impl Into<PathBuf>, encoded: impl Into<PathBuf>) -> Self {
        Self {
            raw: raw.into(),
            encoded: encoded.into(),
        }
    }

    /// Creates a timestamped run directory below each root.
    pub async fn create(
        raw_root: &Path,
        encoded_root: &Path,
        started: DateTime<Local>,
    ) -> std::io::Result<Self> {
        let name = run_dir_name(started);
        let dirs = Self::new(raw_root.join(&name), encoded_root.join(&name));

        tokio::fs::create_dir_all(&dirs.raw).await?;
        tokio::fs::create_dir_all(&dirs.encoded).await?;
        info!(raw = %dirs.raw.display(), encoded = %dirs.encoded.display(), "Created run directories");

        Ok(dirs)
    }

    /// Deletes the raw run directory and everything in it.
    pub async fn remove_raw(&self) -> std::io::Result<()> {
        tokio::fs::remove_dir_all(&self.raw).await?;
        info!(path = %self.raw.display(), "Deleted raw files");
        Ok(())
    }
}

/// Directory name for a run started at `started`.
pub fn run_dir_name(started: DateTime<Local>) -> String {
    format!("{}{}", RUN_DIR_PREFIX, started.format("%Y-%m-%d_%H-%M-%S"))
}

/// Combined file sizes of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeTotals {
    pub raw_bytes: u64,
    pub encoded_bytes: u64,
}

impl SizeTotals {
    /// Bytes saved by encoding, if the encoded files are smaller.
    pub fn saved_bytes(&self) -> Option<u64> {
        self.raw_bytes
            .checked_sub(self.encoded_bytes)
            .filter(|saved| *saved > 0)
    }
}

/// Sums the sizes of every raw and encoded file of a run.
///
/// Files that cannot be read are skipped with a warning.
pub async fn total_sizes(summary: &RunSummary) -> SizeTotals {
    let mut totals = SizeTotals::default();

    for item in &summary.items {
        totals.raw_bytes += file_size(&item.raw_path).await;
        totals.encoded_bytes += file_size(&item.encoded_path).await;
    }

    totals
}

async fn file_size(path: &Path) -> u64 {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.len(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read file size");
            0
        }
    }
}

/// Formats a byte count as GB, MB, KB or Bytes.
pub fn format_bytes(bytes: u64) -> String {
    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{} Bytes", b),
    }
}

/// Formats a duration, rounded to whole seconds, as `XmYs`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = (elapsed.as_millis() + 500) / 1000;
    format!("{}m{}s", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TitleId;
    use crate::pipeline::CompletedTitle;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn started() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap()
    }

    #[test]
    fn test_run_dir_name() {
        assert_eq!(run_dir_name(started()), "ripline_2024-03-09_07-05-02");
    }

    #[tokio::test]
    async fn test_create_and_remove_raw() {
        let temp = TempDir::new().unwrap();
        let raw_root = temp.path().join("raw");
        let enc_root = temp.path().join("enc");

        let dirs = RunDirectories::create(&raw_root, &enc_root, started())
            .await
            .unwrap();
        assert!(dirs.raw.is_dir());
        assert!(dirs.encoded.is_dir());
        assert!(dirs.raw.ends_with("ripline_2024-03-09_07-05-02"));

        dirs.remove_raw().await.unwrap();
        assert!(!dirs.raw.exists());
        assert!(dirs.encoded.is_dir());
    }

    #[tokio::test]
    async fn test_total_sizes_follow_subdirectories() {
        let temp = TempDir::new().unwrap();
        let raw = temp.path().join("raw").join("disc_1");
        let enc = temp.path().join("enc").join("disc_1");
        std::fs::create_dir_all(&raw).unwrap();
        std::fs::create_dir_all(&enc).unwrap();
        std::fs::write(raw.join("a.mkv"), vec![0u8; 3000]).unwrap();
        std::fs::write(enc.join("a.mkv"), vec![0u8; 1000]).unwrap();

        let summary = RunSummary {
            items: vec![CompletedTitle {
                id: TitleId::new(1, 0),
                raw_path: raw.join("a.mkv"),
                encoded_path: enc.join("a.mkv"),
            }],
            elapsed: Duration::from_secs(1),
        };

        let totals = total_sizes(&summary).await;
        assert_eq!(totals.raw_bytes, 3000);
        assert_eq!(totals.encoded_bytes, 1000);
        assert_eq!(totals.saved_bytes(), Some(2000));
    }

    #[test]
    fn test_no_savings_when_encoded_larger() {
        let totals = SizeTotals {
            raw_bytes: 10,
            encoded_bytes: 20,
        };
        assert_eq!(totals.saved_bytes(), None);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * MB), "5.00 MB");
        assert_eq!(format_bytes(GB + GB / 4), "1.25 GB");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0m0s");
        assert_eq!(format_elapsed(Duration::from_millis(59_600)), "1m0s");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "62m5s");
    }
}
