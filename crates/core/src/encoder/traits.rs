//! Trait definitions for the encoder module.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::EncoderError;
use super::types::{EncodeParams, EncodeResult};

/// A transcoder for extracted titles.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Encodes `params.input` into `params.output`.
    ///
    /// Returns [`EncoderError::Cancelled`] without starting the tool when
    /// `cancel` has already fired. A started encode runs to completion.
    async fn encode(
        &self,
        params: &EncodeParams,
        cancel: &CancellationToken,
    ) -> Result<EncodeResult, EncoderError>;

    /// Validates that the encoder is properly configured and ready.
    async fn validate(&self) -> Result<(), EncoderError>;
}
