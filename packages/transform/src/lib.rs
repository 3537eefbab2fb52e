#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalization of stored raw listings into [`TransformedBook`] records.
//!
//! Everything here is pure apart from [`transform`], which draws a fresh
//! id and the current time. No store or network access.

pub mod price;

use book_pipeline_listing_models::{Rating, StoredListing, TransformedBook};
use chrono::{DateTime, SecondsFormat, Utc};

pub use price::clean_price;

/// Title used when a stored listing has none.
pub const DEFAULT_TITLE: &str = "Unknown Title";

/// Stock text used when a stored listing has none.
pub const DEFAULT_STOCK: &str = "Unknown";

/// Price text assumed when a stored listing has none.
pub const DEFAULT_PRICE: &str = "£0.00";

/// Rating label assumed when a stored listing has none.
pub const DEFAULT_RATING: &str = "Zero";

/// Errors that can occur while normalizing a listing.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The price text did not contain a parseable decimal.
    #[error("Invalid price {raw:?}: {source}")]
    InvalidPrice {
        /// Price text as stored.
        raw: String,
        /// Decimal parse failure.
        source: rust_decimal::Error,
    },
}

/// Maps a rating label to its numeric value (0-5).
///
/// Total: anything other than `"One"`..`"Five"` maps to 0. `"Zero"` and
/// the empty label map to 0 quietly; any other label is logged at `warn`
/// before falling back.
#[must_use]
pub fn rating_to_number(label: &str) -> u8 {
    Rating::parse_label(label).map_or_else(
        || {
            if !label.is_empty() {
                log::warn!("Unrecognized rating label {label:?}, using 0");
            }
            Rating::Zero.value()
        },
        Rating::value,
    )
}

/// Generates a fresh `books_id`.
#[must_use]
pub fn new_books_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Formats an ingestion instant as ISO-8601 UTC with microseconds
/// (`2025-01-15T14:30:00.123456Z`).
#[must_use]
pub fn format_ingestion_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Normalizes one stored listing, applying defaults for missing fields.
///
/// # Errors
///
/// Returns [`TransformError::InvalidPrice`] if the (possibly defaulted)
/// price does not parse.
pub fn transform_listing(
    listing: &StoredListing,
    books_id: String,
    ingested_at: DateTime<Utc>,
) -> Result<TransformedBook, TransformError> {
    let price = clean_price(listing.price.as_deref().unwrap_or(DEFAULT_PRICE))?;
    let rating = rating_to_number(listing.rating.as_deref().unwrap_or(DEFAULT_RATING));

    Ok(TransformedBook {
        books_id,
        title: listing
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
        price,
        stock: listing
            .stock
            .clone()
            .unwrap_or_else(|| DEFAULT_STOCK.to_owned()),
        rating,
        ingestion_time: format_ingestion_time(ingested_at),
    })
}

/// Normalizes one stored listing with a new id, stamped with the current
/// time.
///
/// # Errors
///
/// See [`transform_listing`].
pub fn transform(listing: &StoredListing) -> Result<TransformedBook, TransformError> {
    transform_listing(listing, new_books_id(), Utc::now())
}
