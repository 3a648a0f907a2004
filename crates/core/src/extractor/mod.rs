//! Extractor module for copying titles off their source units.
//!
//! This module provides the `Extractor` trait and a `makemkvcon`-backed
//! implementation. An extraction blocks until the external tool finishes;
//! it is never interrupted once started.
//!
//! # Example
//!
//! ```ignore
//! use ripline_core::extractor::{Extractor, MakeMkvExtractor};
//! use tokio_util::sync::CancellationToken;
//!
//! let extractor = MakeMkvExtractor::with_defaults();
//! extractor.validate().await?;
//!
//! let result = extractor
//!     .extract(&title, Path::new("/rips/run"), &CancellationToken::new())
//!     .await?;
//! println!("Extracted {} in {} ms", result.output_path.display(), result.duration_ms);
//! ```

mod error;
mod makemkv;
mod traits;

pub use error::ExtractorError;
pub use makemkv::{MakeMkvExtractor, EXTRACTION_SUCCESS_MARKER};
pub use traits::{ExtractionResult, Extractor};
