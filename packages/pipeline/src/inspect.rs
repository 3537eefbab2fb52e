//! Inspect stage: read a sample of raw listings back for manual checking.

use book_pipeline_listing_models::StoredListing;
use book_pipeline_store::DocumentStore;

use crate::PipelineError;

/// Number of listings shown when no limit is given.
pub const DEFAULT_SAMPLE_SIZE: u32 = 10;

/// Reads up to `limit` listings in the store's natural order.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] if the read fails.
pub async fn sample(
    store: &dyn DocumentStore,
    limit: u32,
) -> Result<Vec<StoredListing>, PipelineError> {
    let listings = store.scan(Some(limit)).await?;
    log::debug!(
        "Read {} of at most {limit} listing(s) from {}",
        listings.len(),
        store.name()
    );
    Ok(listings)
}

/// Renders one listing as a single JSON line.
///
/// # Errors
///
/// Returns [`PipelineError::Json`] if serialization fails.
pub fn render(listing: &StoredListing) -> Result<String, PipelineError> {
    Ok(serde_json::to_string(listing)?)
}
