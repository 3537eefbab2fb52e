//! Transform stage: document store to key-value store.
//!
//! Every stored listing is normalized and written on its own. A record
//! that fails (bad price, failed write) is recorded as a
//! [`MigrationOutcome::Failed`] and the scan moves on, so one run can
//! partially succeed. Only a failed scan aborts the stage.

use std::sync::Arc;

use book_pipeline_listing_models::{StoredListing, TransformedBook};
use book_pipeline_store::{DocumentStore, KeyValueStore, StoreError};
use book_pipeline_transform::TransformError;

use crate::PipelineError;
use crate::progress::ProgressCallback;

/// Why a single record could not be migrated.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Normalization failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Writing the transformed book failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A record that could not be migrated.
#[derive(Debug)]
pub struct MigrationFailure {
    /// 1-based position of the record in the scan.
    pub position: usize,
    /// Document store id of the record, if it had one.
    pub source_id: Option<String>,
    /// Title of the record, if it had one.
    pub title: Option<String>,
    pub error: RecordError,
}

impl std::fmt::Display for MigrationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}", self.position)?;
        if let Some(id) = &self.source_id {
            write!(f, " (id {id})")?;
        }
        if let Some(title) = &self.title {
            write!(f, " {title:?}")?;
        }
        write!(f, ": {}", self.error)
    }
}

/// Result of migrating one record.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// The record was transformed and written.
    Migrated(TransformedBook),
    /// The record was skipped.
    Failed(MigrationFailure),
}

/// Per-record outcomes of one transform run, in scan order.
#[derive(Debug, Default)]
pub struct MigrationSummary {
    pub outcomes: Vec<MigrationOutcome>,
}

impl MigrationSummary {
    /// Number of records read from the document store.
    #[must_use]
    pub fn seen(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of records written to the key-value store.
    #[must_use]
    pub fn migrated(&self) -> usize {
        self.books().count()
    }

    /// Books that were written.
    pub fn books(&self) -> impl Iterator<Item = &TransformedBook> {
        self.outcomes.iter().filter_map(|o| match o {
            MigrationOutcome::Migrated(book) => Some(book),
            MigrationOutcome::Failed(_) => None,
        })
    }

    /// Records that were skipped.
    pub fn failures(&self) -> impl Iterator<Item = &MigrationFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            MigrationOutcome::Migrated(_) => None,
            MigrationOutcome::Failed(failure) => Some(failure),
        })
    }
}

impl std::fmt::Display for MigrationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let migrated = self.migrated();
        write!(
            f,
            "{migrated} of {} record(s) migrated, {} failed",
            self.seen(),
            self.seen() - migrated
        )
    }
}

/// Transforms one stored listing and writes it to `target`.
///
/// # Errors
///
/// Returns [`RecordError`] if normalization or the write fails.
pub async fn migrate_record(
    listing: &StoredListing,
    target: &dyn KeyValueStore,
) -> Result<TransformedBook, RecordError> {
    let book = book_pipeline_transform::transform(listing)?;
    target.put_book(&book).await?;
    Ok(book)
}

/// Migrates every listing in `source` into `target`.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] only if scanning `source` fails.
/// Per-record failures are reported in the returned summary.
pub async fn run(
    source: &dyn DocumentStore,
    target: &dyn KeyValueStore,
    progress: Arc<dyn ProgressCallback>,
) -> Result<MigrationSummary, PipelineError> {
    progress.set_message(format!("Scanning {}", source.name()));
    let listings = source.scan(None).await?;
    log::info!(
        "Migrating {} listing(s) from {} into table {}",
        listings.len(),
        source.name(),
        target.table()
    );
    progress.set_total(listings.len() as u64);
    progress.set_message(format!("Migrating into {}", target.table()));

    let mut summary = MigrationSummary::default();

    for (i, listing) in listings.iter().enumerate() {
        let outcome = match migrate_record(listing, target).await {
            Ok(book) => {
                log::debug!("Migrated {:?} as {}", book.title, book.books_id);
                MigrationOutcome::Migrated(book)
            }
            Err(error) => {
                let failure = MigrationFailure {
                    position: i + 1,
                    source_id: listing.id.clone(),
                    title: listing.title.clone(),
                    error,
                };
                log::error!("Error processing {failure}");
                MigrationOutcome::Failed(failure)
            }
        };
        summary.outcomes.push(outcome);
        progress.inc(1);
    }

    progress.finish(summary.to_string());
    log::info!("Migration complete: {summary}");
    Ok(summary)
}
