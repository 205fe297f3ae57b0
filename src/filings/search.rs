use chrono::NaiveDate;

use crate::core::client::{RetryConfig, SEARCH_PAGE_SIZE};
use crate::core::progress::{SharedProgress, emit};
use crate::core::{InsiderClient, InsiderError, Progress};
use crate::filings::model::{FilingRecord, FilingRef};
use crate::filings::wire::parse_search_page;

pub(crate) struct Discovery {
    pub cik: String,
    /// Every entry seen, most recent filing first.
    pub entries: Vec<FilingRef>,
}

/// Pages through the search endpoint until a page reaches below `oldest` or the
/// history runs out.
pub(crate) async fn discover(
    client: &InsiderClient,
    ticker: &str,
    newest: Option<NaiveDate>,
    oldest: NaiveDate,
    progress: &SharedProgress,
    retry_override: Option<&RetryConfig>,
) -> Result<Discovery, InsiderError> {
    let dateb = newest
        .map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_default();

    let mut cik: Option<String> = None;
    let mut entries: Vec<FilingRef> = Vec::new();
    let mut start = 0usize;

    loop {
        emit(
            progress,
            Progress::Searching {
                ticker: ticker.to_string(),
                start,
            },
        );

        let mut url = client.base_search().clone();
        url.query_pairs_mut()
            .append_pair("action", "getcompany")
            .append_pair("CIK", ticker)
            .append_pair("type", "4")
            .append_pair("dateb", &dateb)
            .append_pair("owner", "only")
            .append_pair("start", &start.to_string())
            .append_pair("count", &SEARCH_PAGE_SIZE.to_string())
            .append_pair("output", "atom");

        client.pace().await;
        let resp = client
            .send_with_retry(client.http().get(url), retry_override)
            .await?;
        crate::core::net::ensure_success(&resp)?;
        let key = format!("{ticker}_{start}");
        let body = crate::core::net::get_text(resp, "filings_search", &key, "xml").await?;

        let page = parse_search_page(&body)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(start, entries = page.entries.len(), "search page");

        if page.entries.is_empty() {
            if entries.is_empty() {
                return Err(InsiderError::NotFound {
                    ticker: ticker.to_string(),
                });
            }
            break;
        }

        if cik.is_none() {
            cik = page.cik;
        }
        let short_page = page.entries.len() < SEARCH_PAGE_SIZE;
        entries.extend(page.entries);

        let reached_bound = entries.last().is_some_and(|e| e.filing_date < oldest);
        if short_page || reached_bound {
            break;
        }
        start += SEARCH_PAGE_SIZE;
    }

    let cik = cik.ok_or_else(|| InsiderError::Data("search feed carries no CIK".into()))?;
    Ok(Discovery { cik, entries })
}

/// Keeps the leading run of entries filed on or after `oldest`.
///
/// Entries arrive most recent first, so this is the requested window's prefix.
pub fn bound_to_window(entries: &[FilingRef], oldest: NaiveDate) -> Vec<FilingRef> {
    entries
        .iter()
        .take_while(|e| e.filing_date >= oldest)
        .cloned()
        .collect()
}

/// Cuts the rows returned to the caller out of the full (report period descending) table.
///
/// The slice starts at the first row reported on or before `newest` (the top when
/// `newest` is `None`) and ends with the last row of `boundary_accession`.
pub fn slice_window(
    rows: &[FilingRecord],
    newest: Option<NaiveDate>,
    boundary_accession: &str,
) -> Vec<FilingRecord> {
    let start = match newest {
        Some(date) => rows.iter().position(|r| r.report_period <= date),
        None => Some(0),
    };
    let end = rows
        .iter()
        .rposition(|r| r.accession == boundary_accession)
        .map(|i| i + 1);

    match (start, end) {
        (Some(s), Some(e)) if s < e => rows[s..e].to_vec(),
        _ => Vec::new(),
    }
}
