use chrono::NaiveDate;

use crate::core::client::RetryConfig;
use crate::core::{CacheMode, HolidayCalendar, InsiderClient, InsiderError, ProgressSink};
use crate::filings::{FilingStore, FilingsBuilder, TransactionTable};
use crate::history::{ConfiguredHistory, HistoryBuilder};
use crate::stats::Dataset;

/// A high-level interface for a single ticker symbol.
///
/// `Ticker` ties the filing scraper, the price-history provider and the statistics
/// engine together under one symbol.
///
/// # Example
///
/// ```no_run
/// # use insider_rs::{InsiderClient, Ticker, stats::FilterCriteria};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = InsiderClient::default();
/// let ticker = Ticker::new(&client, "AAPL");
///
/// let dataset = ticker.analyze().with_references(true).fetch().await?;
/// let report = dataset.compute(&FilterCriteria::none());
/// for row in &report.insiders {
///     println!("{}: {} shares across {} trades", row.insider, row.position_delta, row.trade_count);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Ticker {
    #[doc(hidden)]
    pub(crate) client: InsiderClient,
    #[doc(hidden)]
    pub(crate) symbol: String,
    cache_mode: CacheMode,
    retry_override: Option<RetryConfig>,
}

impl Ticker {
    pub fn new(client: &InsiderClient, symbol: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            symbol: symbol.into().trim().to_uppercase(),
            cache_mode: CacheMode::Use,
            retry_override: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Sets the cache mode for price-history calls made through this ticker,
    /// including the ones [`Ticker::analyze`] issues.
    #[must_use]
    pub const fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Overrides the client's default retry policy for calls made through this ticker.
    #[must_use]
    pub fn retry_policy(mut self, cfg: Option<RetryConfig>) -> Self {
        self.retry_override = cfg;
        self
    }

    /// A filing scrape for this ticker.
    pub fn filings(&self) -> FilingsBuilder {
        FilingsBuilder::new(&self.client, &self.symbol).retry_policy(self.retry_override.clone())
    }

    /// The rows stored by earlier scrapes, without touching the network.
    ///
    /// # Errors
    ///
    /// Store I/O or decoding errors.
    pub fn stored_filings(&self) -> Result<Option<TransactionTable>, InsiderError> {
        FilingStore::for_client(&self.client).load(&self.symbol)
    }

    /// A price-history request for this ticker.
    pub fn history(&self) -> HistoryBuilder {
        HistoryBuilder::new(&self.client, &self.symbol)
            .cache_mode(self.cache_mode)
            .retry_policy(self.retry_override.clone())
    }

    /// Scrape plus dataset preparation in one call.
    pub fn analyze(&self) -> AnalyzeBuilder {
        AnalyzeBuilder {
            prices: ConfiguredHistory::new(
                &self.client,
                self.cache_mode,
                self.retry_override.clone(),
            ),
            calendar: self.client.calendar(),
            filings: self.filings(),
            with_references: false,
        }
    }
}

/// Scrapes a ticker's filings and prepares a [`Dataset`] from them.
pub struct AnalyzeBuilder {
    prices: ConfiguredHistory,
    calendar: HolidayCalendar,
    filings: FilingsBuilder,
    with_references: bool,
}

impl AnalyzeBuilder {
    /// Covers filings from `oldest` up to today.
    pub fn since(mut self, oldest: NaiveDate) -> Self {
        self.filings = self.filings.since(oldest);
        self
    }

    /// Covers filings dated between `oldest` and `newest`.
    pub fn between(mut self, oldest: NaiveDate, newest: NaiveDate) -> Self {
        self.filings = self.filings.between(oldest, newest);
        self
    }

    pub fn progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.filings = self.filings.progress(sink);
        self
    }

    /// Also fetch the market-index and volatility reference histories.
    pub fn with_references(mut self, yes: bool) -> Self {
        self.with_references = yes;
        self
    }

    /// # Errors
    ///
    /// Any scrape error, [`InsiderError::EmptyResult`] when no priced purchase or sale
    /// remains, or price-history errors.
    pub async fn fetch(self) -> Result<Dataset, InsiderError> {
        let table = self.filings.fetch().await?;
        Dataset::prepare(&self.prices, &table, self.calendar, self.with_references).await
    }
}

