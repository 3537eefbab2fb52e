#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Book listing record types shared by every pipeline stage.
//!
//! The extractor produces [`RawListing`] records exactly as scraped. The
//! document store hands them back as [`StoredListing`] (every field
//! optional, plus the store-assigned id), and the transformer turns those
//! into [`TransformedBook`] records for the key-value store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Star rating of a listing, encoded on the catalog page as a CSS class
/// name (`star-rating Three`).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Rating {
    /// No rating, or a label that could not be recognized.
    #[default]
    Zero = 0,
    /// One star
    One = 1,
    /// Two stars
    Two = 2,
    /// Three stars
    Three = 3,
    /// Four stars
    Four = 4,
    /// Five stars
    Five = 5,
}

impl Rating {
    /// Returns the numeric value of this rating (0-5).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Parses a rating label strictly. The match is exact and
    /// case-sensitive: `"Three"` is recognized, `"three"` is not.
    #[must_use]
    pub fn parse_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }

    /// Maps a rating label to a [`Rating`], falling back to
    /// [`Rating::Zero`] for anything unrecognized. Never fails.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::parse_label(label).unwrap_or_default()
    }
}

/// A book listing exactly as scraped from the catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    /// Value of the listing anchor's `title` attribute.
    pub title: String,
    /// Currency-prefixed price text (e.g. `"£51.77"`).
    pub price: String,
    /// Availability text, trimmed.
    pub stock: String,
    /// Rating label taken from the rating element's class list.
    pub rating: String,
    /// Absolute URL of the cover image.
    pub image_url: String,
}

/// A raw listing as read back from the document store.
///
/// Documents are schema-flexible, so any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredListing {
    /// Identifier assigned by the document store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl StoredListing {
    /// Wraps a freshly inserted [`RawListing`] with the id the store
    /// assigned to it.
    #[must_use]
    pub fn from_raw(id: impl Into<String>, raw: RawListing) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(raw.title),
            price: Some(raw.price),
            stock: Some(raw.stock),
            rating: Some(raw.rating),
            image_url: Some(raw.image_url),
        }
    }
}

/// A cleaned listing ready for the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedBook {
    /// Freshly generated unique key (UUID v4).
    pub books_id: String,
    pub title: String,
    /// Price with the currency symbol stripped.
    pub price: Decimal,
    pub stock: String,
    /// Numeric rating, 0-5.
    pub rating: u8,
    /// ISO-8601 UTC timestamp of the transform (not of the scrape).
    pub ingestion_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_labels_map_to_values() {
        assert_eq!(Rating::from_label("One").value(), 1);
        assert_eq!(Rating::from_label("Two").value(), 2);
        assert_eq!(Rating::from_label("Three").value(), 3);
        assert_eq!(Rating::from_label("Four").value(), 4);
        assert_eq!(Rating::from_label("Five").value(), 5);
        assert_eq!(Rating::from_label("Zero").value(), 0);
    }

    #[test]
    fn unrecognized_rating_falls_back_to_zero() {
        assert_eq!(Rating::from_label(""), Rating::Zero);
        assert_eq!(Rating::from_label("three"), Rating::Zero);
        assert_eq!(Rating::from_label("Six"), Rating::Zero);
        assert!(Rating::parse_label("Six").is_none());
    }

    #[test]
    fn stored_listing_skips_missing_fields() {
        let listing = StoredListing {
            title: Some("A".to_string()),
            ..StoredListing::default()
        };
        let json = serde_json::to_string(&listing).unwrap();
        assert_eq!(json, r#"{"title":"A"}"#);

        let back: StoredListing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, listing);
    }
}
