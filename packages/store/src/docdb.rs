//! `MongoDB`-compatible document store (Amazon `DocumentDB`).
//!
//! Connects with TLS using a CA bundle file, matching the connection string
//! `DocumentDB` clusters expect:
//!
//! ```text
//! mongodb://<user>:<password>@<endpoint>:<port>/?tls=true&tlsCAFile=<path>
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use book_pipeline_listing_models::{RawListing, StoredListing};
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::{DocumentStore, StoreError};

/// Default `MongoDB`/`DocumentDB` port.
pub const DEFAULT_PORT: u16 = 27017;

/// Default database name.
pub const DEFAULT_DATABASE: &str = "booksdb";

/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "books";

/// Default path of the TLS trust bundle.
pub const DEFAULT_CA_FILE: &str = "./global-bundle.pem";

/// Connection settings for the document store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDbConfig {
    pub username: String,
    pub password: String,
    /// Cluster endpoint host name.
    pub endpoint: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// PEM bundle used to verify the cluster's TLS certificate.
    #[serde(default = "default_ca_file")]
    pub ca_file: PathBuf,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_owned()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_owned()
}

fn default_ca_file() -> PathBuf {
    PathBuf::from(DEFAULT_CA_FILE)
}

impl DocumentDbConfig {
    /// Builds the `mongodb://` connection string for this configuration.
    #[must_use]
    pub fn connection_uri(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:{}/?tls=true&tlsCAFile={}",
            self.username,
            self.password,
            self.endpoint,
            self.port,
            self.ca_file.display()
        )
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for DocumentDbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentDbConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("ca_file", &self.ca_file)
            .finish()
    }
}

/// Document store backed by a `MongoDB`-compatible cluster.
pub struct MongoDocumentStore {
    collection: Collection<Document>,
}

impl MongoDocumentStore {
    /// Connects to the cluster and verifies the connection with a `ping`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Document`] if the connection string is
    /// invalid or the cluster cannot be reached.
    pub async fn connect(config: &DocumentDbConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(config.connection_uri()).await?;
        let db = client.database(&config.database);
        db.run_command(doc! { "ping": 1 }).await?;
        log::debug!(
            "Connected to {}:{} ({}.{})",
            config.endpoint,
            config.port,
            config.database,
            config.collection
        );

        Ok(Self {
            collection: db.collection(&config.collection),
        })
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn name(&self) -> String {
        self.collection.namespace().to_string()
    }

    async fn insert_listing(&self, listing: &RawListing) -> Result<String, StoreError> {
        let result = self.collection.insert_one(listing_document(listing)).await?;
        Ok(bson_to_string(&result.inserted_id))
    }

    async fn scan(&self, limit: Option<u32>) -> Result<Vec<StoredListing>, StoreError> {
        // The server reads a limit of 0 as "no limit".
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let find = self.collection.find(doc! {});
        let mut cursor = match limit {
            Some(n) => find.limit(i64::from(n)).await?,
            None => find.await?,
        };

        let mut listings = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            listings.push(stored_listing_from_document(&document));
        }
        Ok(listings)
    }
}

/// Builds the document inserted for one scraped listing.
#[must_use]
pub fn listing_document(listing: &RawListing) -> Document {
    doc! {
        "title": listing.title.as_str(),
        "price": listing.price.as_str(),
        "stock": listing.stock.as_str(),
        "rating": listing.rating.as_str(),
        "image_url": listing.image_url.as_str(),
    }
}

/// Reads a stored document back into a [`StoredListing`].
///
/// Missing and `null` fields become `None`; non-string values are rendered
/// with their extended-JSON display form.
#[must_use]
pub fn stored_listing_from_document(document: &Document) -> StoredListing {
    let field = |name: &str| match document.get(name) {
        None | Some(Bson::Null) => None,
        Some(value) => Some(bson_to_string(value)),
    };

    StoredListing {
        id: field("_id"),
        title: field("title"),
        price: field("price"),
        stock: field("stock"),
        rating: field("rating"),
        image_url: field("image_url"),
    }
}

fn bson_to_string(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}
