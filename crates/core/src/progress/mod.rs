//! Progress tracking for a pipeline run.
//!
//! The `ProgressTracker` owns the per-title status table and the run's error
//! slot behind a single lock. Every status change re-renders the full table
//! while the lock is held, so concurrent workers can never interleave output
//! or observe a half-applied change.
//!
//! # Example
//!
//! ```ignore
//! use ripline_core::progress::{Phase, PhaseStatus, ProgressTracker, TerminalDisplay};
//!
//! let tracker = ProgressTracker::for_titles(&planned, Box::new(TerminalDisplay::new()));
//! tracker.advance(title_id, Phase::Extraction, PhaseStatus::InProgress);
//! ```

mod display;
mod render;
mod tracker;
mod types;

pub use display::{NullDisplay, ProgressDisplay, TerminalDisplay};
pub use render::{TableRenderer, TITLE_WIDTH};
pub use tracker::ProgressTracker;
pub use types::{Phase, PhaseStatus, TitleProgress};
