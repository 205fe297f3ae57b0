//! Insider filing discovery, extraction and the persisted per-ticker filing table.
//!
//! A scrape pages through the search endpoint, keeps the filings inside the requested
//! window, extracts only those not already stored, and merges them into the store
//! before returning the requested slice.

mod extract;
mod model;
mod search;
mod store;
mod wire;

pub use model::{
    Filing, FilingRecord, FilingRef, OwnershipNature, ReportingOwner, Transaction,
    TransactionTable,
};
pub use search::{bound_to_window, slice_window};
pub use store::{FilingStore, merge_rows};

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};

use crate::core::client::RetryConfig;
use crate::core::progress::{SharedProgress, emit};
use crate::core::{InsiderClient, InsiderError, Progress, ProgressSink};

use extract::extract_filing;
use search::discover;
use store::known_accessions;

/// A builder for scraping the insider filings of one ticker.
///
/// The window is expressed through two dates: `oldest`, the earliest filing date that
/// must be covered (default: one year before `newest`), and `newest`, the date the
/// search is anchored on (default: today).
#[derive(Clone)]
pub struct FilingsBuilder {
    client: InsiderClient,
    ticker: String,
    oldest: Option<NaiveDate>,
    newest: Option<NaiveDate>,
    progress: SharedProgress,
    retry_override: Option<RetryConfig>,
}

impl FilingsBuilder {
    pub fn new(client: &InsiderClient, ticker: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            ticker: ticker.into(),
            oldest: None,
            newest: None,
            progress: None,
            retry_override: None,
        }
    }

    /// Covers filings from `oldest` up to today.
    pub fn since(mut self, oldest: NaiveDate) -> Self {
        self.oldest = Some(oldest);
        self.newest = None;
        self
    }

    /// Covers filings dated between `oldest` and `newest`.
    pub fn between(mut self, oldest: NaiveDate, newest: NaiveDate) -> Self {
        self.oldest = Some(oldest);
        self.newest = Some(newest);
        self
    }

    /// Receives [`Progress`] events while the scrape runs.
    pub fn progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Some(Arc::new(sink));
        self
    }

    /// Overrides the default retry policy for this specific scrape.
    pub fn retry_policy(mut self, cfg: Option<RetryConfig>) -> Self {
        self.retry_override = cfg;
        self
    }

    /// Runs the scrape and returns the rows of the requested window.
    ///
    /// Requests are issued one at a time. The store is only written after every new
    /// filing was extracted, so any failure leaves it untouched.
    ///
    /// # Errors
    ///
    /// - [`InsiderError::NotFound`] if the ticker has no filings at all.
    /// - [`InsiderError::RangeNotFound`] if none of its filings fall inside the window.
    /// - [`InsiderError::InvalidDates`] if `oldest` is after `newest`.
    /// - Transport, status, payload and store I/O errors.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(ticker = %self.ticker)))]
    pub async fn fetch(self) -> Result<TransactionTable, InsiderError> {
        let ticker = self.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(InsiderError::InvalidParams("ticker must not be empty".into()));
        }

        let anchor = self.newest.unwrap_or_else(|| Utc::now().date_naive());
        let oldest = match self.oldest {
            Some(d) => d,
            None => anchor
                .checked_sub_months(Months::new(12))
                .ok_or(InsiderError::InvalidDates)?,
        };
        if oldest > anchor {
            return Err(InsiderError::InvalidDates);
        }

        let retry = self.retry_override.as_ref();
        let discovery = discover(
            &self.client,
            &ticker,
            self.newest,
            oldest,
            &self.progress,
            retry,
        )
        .await?;

        let window = bound_to_window(&discovery.entries, oldest);
        let Some(boundary) = window.last() else {
            return Err(match discovery.entries.first() {
                Some(latest) => InsiderError::RangeNotFound {
                    ticker,
                    latest: latest.filing_date,
                },
                None => InsiderError::NotFound { ticker },
            });
        };
        let boundary_accession = boundary.accession.clone();

        let store = FilingStore::for_client(&self.client);
        let existing = store.load(&ticker)?.map(|t| t.rows).unwrap_or_default();

        let pending: Vec<&FilingRef> = {
            let known = known_accessions(&existing);
            let mut queued = HashSet::new();
            window
                .iter()
                .filter(|e| !known.contains(e.accession.as_str()))
                .filter(|e| queued.insert(e.accession.as_str()))
                .collect()
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            discovered = discovery.entries.len(),
            in_window = window.len(),
            new = pending.len(),
            "filings reconciled against store"
        );
        emit(
            &self.progress,
            Progress::Discovered {
                total: window.len(),
                new: pending.len(),
            },
        );

        let mut fresh = Vec::new();
        for (i, entry) in pending.iter().enumerate() {
            let filing = extract_filing(&self.client, &discovery.cik, &entry.accession, retry).await?;
            fresh.extend(filing.into_rows());
            emit(
                &self.progress,
                Progress::Extracting {
                    done: i + 1,
                    total: pending.len(),
                },
            );
        }

        let table = if fresh.is_empty() {
            existing
        } else {
            emit(&self.progress, Progress::Merging { rows: fresh.len() });
            let merged = TransactionTable {
                ticker: ticker.clone(),
                rows: merge_rows(existing, fresh),
            };
            store.replace(&merged)?;

            #[cfg(feature = "tracing")]
            tracing::info!(rows = merged.rows.len(), path = %store.path(&ticker).display(), "filing store updated");

            merged.rows
        };

        let rows = slice_window(&table, self.newest, &boundary_accession);
        emit(&self.progress, Progress::Done { rows: rows.len() });

        Ok(TransactionTable { ticker, rows })
    }
}
