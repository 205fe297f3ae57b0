//! Centralized constants for default endpoints and UA.

/// EDGAR rejects anonymous clients; the UA must carry a contact address.
pub(crate) const USER_AGENT: &str = "insider-rs/0.1 (insider-rs@users.noreply.github.com)";

/// EDGAR company browse endpoint (atom output is requested per page).
pub(crate) const DEFAULT_BASE_SEARCH: &str = "https://www.sec.gov/cgi-bin/browse-edgar";

/// EDGAR archive root; `<cik>/<accession>/` is appended.
pub(crate) const DEFAULT_BASE_ARCHIVE: &str = "https://www.sec.gov/Archives/edgar/data/";

/// Yahoo chart API base (symbol is appended).
pub(crate) const DEFAULT_BASE_CHART: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

/// Fair-access spacing between two EDGAR requests.
pub(crate) const DEFAULT_REQUEST_INTERVAL_MS: u64 = 100;

/// Directory holding one persisted filing table per ticker.
pub(crate) const DEFAULT_STORE_DIR: &str = "saved_transactions";

/// Filing entries requested per search page.
pub(crate) const SEARCH_PAGE_SIZE: usize = 100;
