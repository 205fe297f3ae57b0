use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::{InsiderClient, InsiderError};
use crate::filings::model::{FilingRecord, TransactionTable};

/// Per-ticker JSON tables of previously extracted filing rows.
///
/// Tables are replaced as a whole (written beside the target, then renamed over it), so
/// a failed scrape never leaves a half-written table behind. Callers must not run two
/// scrapes of the same ticker against one store concurrently.
#[derive(Debug, Clone)]
pub struct FilingStore {
    dir: PathBuf,
}

impl FilingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store configured on `client`.
    pub fn for_client(client: &InsiderClient) -> Self {
        Self::new(client.store_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.json", ticker.to_uppercase()))
    }

    /// Loads the table for `ticker`, or `None` if nothing was stored yet.
    pub fn load(&self, ticker: &str) -> Result<Option<TransactionTable>, InsiderError> {
        let raw = match fs::read_to_string(self.path(ticker)) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let table: TransactionTable = serde_json::from_str(&raw)
            .map_err(|e| InsiderError::Data(format!("corrupt filing store for {ticker}: {e}")))?;
        Ok(Some(table))
    }

    /// Replaces the stored table for `table.ticker`.
    pub fn replace(&self, table: &TransactionTable) -> Result<(), InsiderError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path(&table.ticker);
        let tmp = target.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(table)
            .map_err(|e| InsiderError::Data(format!("failed to encode filing table: {e}")))?;
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    /// Returns whether `accession` is already stored for `ticker`.
    pub fn contains(&self, ticker: &str, accession: &str) -> Result<bool, InsiderError> {
        Ok(self
            .load(ticker)?
            .is_some_and(|t| t.rows.iter().any(|r| r.accession == accession)))
    }
}

pub(crate) fn known_accessions(rows: &[FilingRecord]) -> HashSet<&str> {
    rows.iter().map(|r| r.accession.as_str()).collect()
}

/// Appends rows of accessions not yet present and re-sorts by report period, most
/// recent first. The sort is stable, so rows of one filing keep their document order.
pub fn merge_rows(mut existing: Vec<FilingRecord>, incoming: Vec<FilingRecord>) -> Vec<FilingRecord> {
    let known: HashSet<String> = existing.iter().map(|r| r.accession.clone()).collect();
    existing.extend(incoming.into_iter().filter(|r| !known.contains(&r.accession)));
    existing.sort_by(|a, b| b.report_period.cmp(&a.report_period));
    existing
}
