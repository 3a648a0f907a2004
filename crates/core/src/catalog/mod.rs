//! Catalog module for discovering titles on source units.
//!
//! This module provides the `TitleCatalog` trait and a MakeMKV-backed
//! implementation that enumerates drives and the titles on each disc.
//!
//! # Example
//!
//! ```ignore
//! use ripline_core::catalog::{MakeMkvCatalog, TitleCatalog, parse_selection};
//!
//! let catalog = MakeMkvCatalog::with_defaults();
//!
//! for unit in catalog.list_units().await? {
//!     println!("Disc - {} - {}", unit.index, unit.name);
//! }
//!
//! let titles = catalog.list_titles(0).await?;
//! let selected = parse_selection("0,2")?.apply(titles);
//! ```

mod error;
mod makemkv;
mod selection;
mod traits;
mod types;

pub use error::CatalogError;
pub use makemkv::MakeMkvCatalog;
pub use selection::{parse_selection, Selection, SelectionError};
pub use traits::TitleCatalog;
pub use types::{SourceUnit, Title, TitleId};
