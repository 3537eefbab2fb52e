//! In-process stores.
//!
//! Behave like their remote counterparts for the operations the pipeline
//! uses: documents keep insertion order and get a 24-hex-digit id, table
//! puts replace any item with the same key.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use book_pipeline_listing_models::{RawListing, StoredListing, TransformedBook};

use crate::{DocumentStore, KeyValueStore, StoreError};

/// Document store holding listings in a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<Vec<StoredListing>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `documents`, kept as given
    /// (including any missing fields or ids).
    #[must_use]
    pub const fn with_documents(documents: Vec<StoredListing>) -> Self {
        Self {
            documents: Mutex::new(documents),
        }
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> String {
        "memory.books".to_owned()
    }

    async fn insert_listing(&self, listing: &RawListing) -> Result<String, StoreError> {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = format!("{:024x}", documents.len() + 1);
        documents.push(StoredListing::from_raw(id.clone(), listing.clone()));
        drop(documents);
        Ok(id)
    }

    async fn scan(&self, limit: Option<u32>) -> Result<Vec<StoredListing>, StoreError> {
        let documents = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let take = limit.map_or(documents.len(), |n| n as usize);
        Ok(documents.iter().take(take).cloned().collect())
    }
}

/// Key-value store holding books in a `BTreeMap` keyed by `books_id`.
#[derive(Debug)]
pub struct MemoryKeyValueStore {
    table: String,
    items: Mutex<BTreeMap<String, TransformedBook>>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_owned(),
            items: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns a snapshot of every stored item, ordered by key.
    #[must_use]
    pub fn items(&self) -> Vec<TransformedBook> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Looks up one item by key.
    #[must_use]
    pub fn get(&self, books_id: &str) -> Option<TransformedBook> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(books_id)
            .cloned()
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the table holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    fn table(&self) -> &str {
        &self.table
    }

    async fn put_book(&self, book: &TransformedBook) -> Result<(), StoreError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(book.books_id.clone(), book.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn listing(title: &str) -> RawListing {
        RawListing {
            title: title.to_string(),
            price: "£1.00".to_string(),
            stock: "In stock".to_string(),
            rating: "One".to_string(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn inserts_keep_order_and_get_distinct_ids() {
        let store = MemoryDocumentStore::new();
        let first = store.insert_listing(&listing("A")).await.unwrap();
        let second = store.insert_listing(&listing("A")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), 24);

        let docs = store.scan(None).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id.as_deref(), Some(first.as_str()));
        assert_eq!(docs[1].id.as_deref(), Some(second.as_str()));
    }

    #[tokio::test]
    async fn scan_honours_limit() {
        let store = MemoryDocumentStore::new();
        for i in 0..15 {
            store.insert_listing(&listing(&format!("Book {i}"))).await.unwrap();
        }

        let docs = store.scan(Some(10)).await.unwrap();
        assert_eq!(docs.len(), 10);
        assert_eq!(docs[0].title.as_deref(), Some("Book 0"));
        assert_eq!(store.scan(Some(100)).await.unwrap().len(), 15);
    }

    #[tokio::test]
    async fn put_replaces_same_key() {
        let table = MemoryKeyValueStore::new("books");
        let mut book = TransformedBook {
            books_id: "k".to_string(),
            title: "First".to_string(),
            price: Decimal::ZERO,
            stock: "Unknown".to_string(),
            rating: 0,
            ingestion_time: String::new(),
        };
        table.put_book(&book).await.unwrap();
        book.title = "Second".to_string();
        table.put_book(&book).await.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("k").unwrap().title, "Second");
    }
}
