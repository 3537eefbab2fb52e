#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch stages of the book listing pipeline.
//!
//! - [`extract`]: scrape one catalog page into the document store.
//! - [`migrate`]: normalize every stored listing into the key-value store.
//! - [`inspect`]: read a small sample of stored listings back.
//!
//! The stages share no state. Each takes its stores as trait objects so
//! they can run against the real backends or the in-memory ones.

pub mod config;
pub mod extract;
pub mod inspect;
pub mod migrate;
pub mod progress;

use book_pipeline_scraper::ScrapeError;
use book_pipeline_store::StoreError;

pub use config::{CatalogConfig, ConfigError, PipelineConfig};

/// Errors that abort a stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Fetching or parsing the catalog page failed.
    #[error("Scrape failed: {0}")]
    Scrape(#[from] ScrapeError),

    /// A store operation failed.
    #[error("Store failed: {0}")]
    Store(#[from] StoreError),

    /// Rendering a record failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
