//! The two-stage extract → encode pipeline.
//!
//! One worker per source unit extracts its titles serially and hands each
//! finished raw file to a single encoding worker over a bounded channel.
//! The first failure anywhere is recorded on the tracker and cancels the
//! whole run; an external tool that is already running is allowed to finish.
//!
//! # Example
//!
//! ```ignore
//! use ripline_core::pipeline::{PipelineConfig, PipelineRunner};
//!
//! let runner = PipelineRunner::new(config.pipeline, extractor, encoder, config.encode);
//! let summary = runner.run(planned, &dirs, tracker).await?;
//! ```

mod config;
mod error;
mod runner;
mod types;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use runner::PipelineRunner;
pub use types::{CompletedTitle, EncodeJob, RunSummary};
