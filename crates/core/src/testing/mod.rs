//! Testing utilities and mock implementations of the external tools.
//!
//! The mocks stand in for makemkvcon and HandBrakeCLI so the pipeline can be
//! exercised end to end against a temporary directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use ripline_core::testing::{fixtures, MockEncoder, MockExtractor, RecordingDisplay};
//!
//! let extractor = MockExtractor::new();
//! let encoder = MockEncoder::new();
//!
//! // Configure failures
//! extractor.fail_on(TitleId::new(0, 1), "read error").await;
//!
//! // Clones share state, so keep one for assertions
//! let runner = PipelineRunner::new(config, extractor.clone(), encoder.clone(), settings);
//! ```

mod mock_catalog;
mod mock_encoder;
mod mock_extractor;
mod recording_display;

pub use mock_catalog::MockCatalog;
pub use mock_encoder::{MockEncoder, RecordedEncoding};
pub use mock_extractor::{MockExtractor, RecordedExtraction};
pub use recording_display::RecordingDisplay;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{SourceUnit, Title, TitleId};

    /// Create a test title with reasonable defaults.
    pub fn title(unit: u32, index: u32, file_name: &str) -> Title {
        let mut title = Title::new(TitleId::new(unit, index), file_name);
        title.disc_title = format!("Test Disc {}", unit);
        title.length = "1:32:10".to_string();
        title.size = "24.1 GB".to_string();
        title.size_bytes = Some(25_877_000_000);
        title.chapters = 12;
        title
    }

    /// Create `count` titles on one unit named `title_t00.mkv`, `title_t01.mkv`, ...
    pub fn disc_titles(unit: u32, count: u32) -> Vec<Title> {
        (0..count)
            .map(|i| title(unit, i, &format!("title_t{:02}.mkv", i)))
            .collect()
    }

    /// Create a source unit with a disc inserted.
    pub fn source_unit(index: u32, name: &str) -> SourceUnit {
        SourceUnit {
            index,
            name: name.to_string(),
        }
    }
}
