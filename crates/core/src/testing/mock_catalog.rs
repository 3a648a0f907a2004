//! Mock title catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, SourceUnit, Title, TitleCatalog};

/// Mock implementation of the TitleCatalog trait.
///
/// Units without configured titles report `NoTitles`, like an empty drive.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    units: Arc<RwLock<Vec<SourceUnit>>>,
    titles: Arc<RwLock<HashMap<u32, Vec<Title>>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the units returned by `list_units`.
    pub async fn set_units(&self, units: Vec<SourceUnit>) {
        *self.units.write().await = units;
    }

    /// Set the titles on one unit.
    pub async fn set_titles(&self, unit: u32, titles: Vec<Title>) {
        self.titles.write().await.insert(unit, titles);
    }
}

#[async_trait]
impl TitleCatalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_units(&self) -> Result<Vec<SourceUnit>, CatalogError> {
        Ok(self.units.read().await.clone())
    }

    async fn list_titles(&self, unit: u32) -> Result<Vec<Title>, CatalogError> {
        let mut titles = self
            .titles
            .read()
            .await
            .get(&unit)
            .cloned()
            .unwrap_or_default();

        if titles.is_empty() {
            return Err(CatalogError::NoTitles { unit });
        }
        titles.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(titles)
    }
}
