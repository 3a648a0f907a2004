//! Trait definitions for the catalog module.

use async_trait::async_trait;

use super::error::CatalogError;
use super::types::{SourceUnit, Title};

/// Enumerates source units and the processable titles on them.
#[async_trait]
pub trait TitleCatalog: Send + Sync {
    /// Returns the name of this catalog implementation.
    fn name(&self) -> &str;

    /// Lists the source units that currently have media present.
    async fn list_units(&self) -> Result<Vec<SourceUnit>, CatalogError>;

    /// Lists the titles on one source unit, sorted by file name.
    ///
    /// Fails with [`CatalogError::NoTitles`] when the unit is readable but
    /// reports nothing to process.
    async fn list_titles(&self, unit: u32) -> Result<Vec<Title>, CatalogError>;
}
