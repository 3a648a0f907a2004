//! Encoder module for transcoding extracted titles.
//!
//! This module provides the `Encoder` trait and a HandBrakeCLI-backed
//! implementation, plus helpers that query HandBrakeCLI for the presets and
//! encoders it supports.
//!
//! # Features
//!
//! - Simplified encoder settings (encoder, quality or encoder preset)
//! - Built-in HandBrake presets and imported preset files
//! - Audio and subtitle language filters
//! - Captured tool output attached to failures
//!
//! # Example
//!
//! ```ignore
//! use ripline_core::encoder::{EncodeParams, EncodeSettings, Encoder, HandBrakeEncoder};
//! use tokio_util::sync::CancellationToken;
//!
//! let encoder = HandBrakeEncoder::with_defaults();
//! encoder.validate().await?;
//!
//! let params = EncodeParams {
//!     input: PathBuf::from("/rips/run/Movie_t00.mkv"),
//!     output: PathBuf::from("/encodes/run/Movie_t00.mkv"),
//!     settings: EncodeSettings::default(),
//! };
//!
//! let result = encoder.encode(&params, &CancellationToken::new()).await?;
//! println!("Encoded {} bytes", result.output_size_bytes);
//! ```

mod capabilities;
mod error;
mod handbrake;
mod traits;
mod types;

pub use capabilities::{HandBrakeCapabilities, FALLBACK_ENCODERS};
pub use error::EncoderError;
pub use handbrake::HandBrakeEncoder;
pub use traits::Encoder;
pub use types::{EncodeParams, EncodeResult, EncodeSettings, OUTPUT_FORMATS};
