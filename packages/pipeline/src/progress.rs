//! Progress reporting for the stage loops.
//!
//! Stages report through [`ProgressCallback`] and never render anything
//! themselves; the CLI plugs in `indicatif` bars, tests use
//! [`null_progress`].

use std::sync::Arc;

/// Receives per-record progress from a running stage.
pub trait ProgressCallback: Send + Sync {
    /// Sets the number of records the stage will process.
    fn set_total(&self, total: u64);

    /// Marks `delta` more records as processed.
    fn inc(&self, delta: u64);

    /// Replaces the status message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Marks the stage as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
