//! Progress reporting for long-running scrapes.

use std::sync::Arc;

/// A status update emitted while filings are discovered and extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A search page starting at offset `start` is being requested.
    Searching { ticker: String, start: usize },
    /// Discovery finished; `new` of `total` filings in the window still need extraction.
    Discovered { total: usize, new: usize },
    /// `done` of `total` filing documents have been extracted.
    Extracting { done: usize, total: usize },
    /// Extracted rows are being merged into the persisted table.
    Merging { rows: usize },
    /// The scrape completed and returned `rows` rows.
    Done { rows: usize },
}

/// Receives [`Progress`] events. Implemented for any `Fn(Progress) + Send + Sync`.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn report(&self, event: Progress) {
        self(event);
    }
}

pub(crate) type SharedProgress = Option<Arc<dyn ProgressSink>>;

pub(crate) fn emit(sink: &SharedProgress, event: Progress) {
    #[cfg(feature = "tracing")]
    tracing::debug!(?event, "progress");
    if let Some(s) = sink {
        s.report(event);
    }
}
