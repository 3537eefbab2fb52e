#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Storage backends for the book pipeline.
//!
//! Raw listings live in a [`DocumentStore`] (`MongoDB`/`DocumentDB` via
//! [`docdb`]); transformed books go to a [`KeyValueStore`] (`DynamoDB` via
//! [`dynamodb`]). The [`memory`] module provides in-process versions of
//! both for tests and local runs.

pub mod docdb;
pub mod dynamodb;
pub mod memory;

use async_trait::async_trait;
use book_pipeline_listing_models::{RawListing, StoredListing, TransformedBook};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document store driver reported an error.
    #[error("Document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    /// `PutItem` failed.
    #[error("Failed to put item {key} into table {table}: {source}")]
    Put {
        /// Table name.
        table: String,
        /// Partition key of the item.
        key: String,
        /// Underlying SDK error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A schema-flexible store holding raw scraped listings.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a human-readable `database.collection` name.
    fn name(&self) -> String;

    /// Inserts one listing as a new document and returns the id the store
    /// assigned to it. No deduplication is performed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the insert fails.
    async fn insert_listing(&self, listing: &RawListing) -> Result<String, StoreError>;

    /// Reads documents in the store's natural order, up to `limit` if
    /// given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the scan fails.
    async fn scan(&self, limit: Option<u32>) -> Result<Vec<StoredListing>, StoreError>;
}

/// A store addressed by table name and per-item unique key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the table name items are written to.
    fn table(&self) -> &str;

    /// Writes one book keyed by its `books_id`. An existing item with the
    /// same key is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    async fn put_book(&self, book: &TransformedBook) -> Result<(), StoreError>;
}
