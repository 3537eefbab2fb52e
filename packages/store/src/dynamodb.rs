//! `DynamoDB` key-value store for transformed books.
//!
//! Credentials come from the standard AWS provider chain
//! (`AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`, shared profile, instance
//! role, ...). Only the region and table name are configured here.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::types::AttributeValue;
use book_pipeline_listing_models::TransformedBook;
use serde::{Deserialize, Serialize};

use crate::{KeyValueStore, StoreError};

/// Default table name.
pub const DEFAULT_TABLE: &str = "dynamo2025";

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-2";

/// Settings for the `DynamoDB` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamoConfig {
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            region: default_region(),
        }
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_owned()
}

fn default_region() -> String {
    DEFAULT_REGION.to_owned()
}

/// Client for writing books into a single `DynamoDB` table.
pub struct DynamoTable {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoTable {
    /// Loads AWS configuration for the configured region and creates a
    /// table client. No request is made until the first write.
    pub async fn connect(config: &DynamoConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self {
            client: aws_sdk_dynamodb::Client::new(&sdk_config),
            table: config.table.clone(),
        }
    }
}

#[async_trait]
impl KeyValueStore for DynamoTable {
    fn table(&self) -> &str {
        &self.table
    }

    async fn put_book(&self, book: &TransformedBook) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(book_item(book)))
            .send()
            .await
            .map_err(|e| StoreError::Put {
                table: self.table.clone(),
                key: book.books_id.clone(),
                source: Box::new(e),
            })?;

        Ok(())
    }
}

/// Encodes a book as a `DynamoDB` item. Price and rating are numbers
/// (`N`); everything else is a string (`S`).
#[must_use]
pub fn book_item(book: &TransformedBook) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            "books_id".to_owned(),
            AttributeValue::S(book.books_id.clone()),
        ),
        ("title".to_owned(), AttributeValue::S(book.title.clone())),
        ("price".to_owned(), AttributeValue::N(book.price.to_string())),
        ("stock".to_owned(), AttributeValue::S(book.stock.clone())),
        ("rating".to_owned(), AttributeValue::N(book.rating.to_string())),
        (
            "ingestion_time".to_owned(),
            AttributeValue::S(book.ingestion_time.clone()),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn encodes_numbers_and_strings() {
        let book = TransformedBook {
            books_id: "5f0c7a52-3e0c-4c8f-9d0e-2b1e4a7f9c11".to_string(),
            title: "A Light in the Attic".to_string(),
            price: Decimal::from_str("51.77").unwrap(),
            stock: "In stock".to_string(),
            rating: 3,
            ingestion_time: "2025-01-15T14:30:00.000000Z".to_string(),
        };

        let item = book_item(&book);

        assert_eq!(item.len(), 6);
        assert_eq!(
            item["books_id"],
            AttributeValue::S("5f0c7a52-3e0c-4c8f-9d0e-2b1e4a7f9c11".to_string())
        );
        assert_eq!(item["price"], AttributeValue::N("51.77".to_string()));
        assert_eq!(item["rating"], AttributeValue::N("3".to_string()));
        assert_eq!(item["stock"], AttributeValue::S("In stock".to_string()));
    }

    #[test]
    fn zero_price_keeps_its_scale() {
        let book = TransformedBook {
            books_id: "id".to_string(),
            title: "Unknown Title".to_string(),
            price: Decimal::from_str("0.00").unwrap(),
            stock: "Unknown".to_string(),
            rating: 0,
            ingestion_time: String::new(),
        };

        assert_eq!(book_item(&book)["price"], AttributeValue::N("0.00".to_string()));
    }

    #[test]
    fn config_defaults() {
        let config = DynamoConfig::default();
        assert_eq!(config.table, "dynamo2025");
        assert_eq!(config.region, "us-east-2");
    }
}
