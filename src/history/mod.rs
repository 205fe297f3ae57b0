//! Daily price history and split events for a ticker.

mod actions;
mod assemble;
mod fetch;
mod reference;
mod wire;

pub use reference::{REFERENCE_INDEX, REFERENCE_VOLATILITY, ReferenceHistories, fetch_references};

use std::future::Future;
use std::pin::Pin;

use chrono::{Months, NaiveDate, NaiveTime, Utc};

use crate::core::client::{CacheMode, RetryConfig};
use crate::core::{InsiderClient, InsiderError, PriceHistory, PriceHistoryService};

use actions::extract_splits;
use assemble::{BarZone, assemble_bars};
use fetch::fetch_chart;

/// A builder for fetching daily price history for a single symbol.
///
/// Bars are returned as quoted by the chart endpoint, i.e. already on the
/// current split scale; they are not adjusted for dividends.
#[derive(Clone)]
pub struct HistoryBuilder {
    #[doc(hidden)]
    pub(crate) client: InsiderClient,
    #[doc(hidden)]
    pub(crate) symbol: String,
    #[doc(hidden)]
    pub(crate) start: Option<NaiveDate>,
    #[doc(hidden)]
    pub(crate) end: Option<NaiveDate>,
    #[doc(hidden)]
    pub(crate) cache_mode: CacheMode,
    #[doc(hidden)]
    pub(crate) retry_override: Option<RetryConfig>,
}

impl HistoryBuilder {
    /// Creates a new `HistoryBuilder` for a given symbol, covering the last six months.
    pub fn new(client: &InsiderClient, symbol: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            symbol: symbol.into(),
            start: None,
            end: None,
            cache_mode: CacheMode::Use,
            retry_override: None,
        }
    }

    /// Sets the cache mode for this specific API call.
    pub fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Overrides the default retry policy for this specific API call.
    pub fn retry_policy(mut self, cfg: Option<RetryConfig>) -> Self {
        self.retry_override = cfg;
        self
    }

    /// First date (inclusive) of the requested history.
    pub fn start(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    /// Last date (inclusive) of the requested history. Default: the present.
    pub fn end(mut self, date: NaiveDate) -> Self {
        self.end = Some(date);
        self
    }

    /// Sets both ends of the requested history.
    pub fn between(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start(start).end(end)
    }

    /// Executes the request.
    ///
    /// # Errors
    ///
    /// Returns [`InsiderError::InvalidDates`] when `start` is not before `end`, and
    /// transport, status or payload errors from the chart endpoint.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(symbol = %self.symbol)))]
    pub async fn fetch(self) -> Result<PriceHistory, InsiderError> {
        let period = self.period()?;

        let fetched = fetch_chart(
            &self.client,
            &self.symbol,
            period,
            self.cache_mode,
            self.retry_override.as_ref(),
        )
        .await?;

        let zone = BarZone::from_meta(fetched.meta.as_ref());
        let bars = assemble_bars(&fetched.ts, &fetched.quote, zone);
        let splits = extract_splits(fetched.events.as_ref(), zone);

        #[cfg(feature = "tracing")]
        tracing::debug!(bars = bars.len(), splits = splits.len(), "price history assembled");

        Ok(PriceHistory {
            symbol: self.symbol,
            bars,
            splits,
            timezone: zone.name(),
        })
    }

    fn period(&self) -> Result<(i64, i64), InsiderError> {
        let now = Utc::now();
        let end_ts = match self.end {
            // The end date is inclusive, so request through the following midnight.
            Some(end) => end
                .succ_opt()
                .ok_or(InsiderError::InvalidDates)?
                .and_time(NaiveTime::MIN)
                .and_utc()
                .timestamp(),
            None => now.timestamp(),
        };
        let start = match self.start {
            Some(s) => s,
            None => self
                .end
                .unwrap_or_else(|| now.date_naive())
                .checked_sub_months(Months::new(6))
                .ok_or(InsiderError::InvalidDates)?,
        };
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        Ok((start_ts, end_ts))
    }
}

/// A [`PriceHistoryService`] that issues its requests with a fixed cache mode and
/// retry policy.
#[derive(Clone)]
pub struct ConfiguredHistory {
    client: InsiderClient,
    cache_mode: CacheMode,
    retry_override: Option<RetryConfig>,
}

impl ConfiguredHistory {
    pub fn new(
        client: &InsiderClient,
        cache_mode: CacheMode,
        retry_override: Option<RetryConfig>,
    ) -> Self {
        Self {
            client: client.clone(),
            cache_mode,
            retry_override,
        }
    }

    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<PriceHistory, InsiderError> {
        let mut builder = HistoryBuilder::new(&self.client, symbol)
            .cache_mode(self.cache_mode)
            .retry_policy(self.retry_override.clone())
            .start(start);
        if let Some(end) = end {
            builder = builder.end(end);
        }
        builder.fetch().await
    }
}

impl PriceHistoryService for ConfiguredHistory {
    fn fetch_price_history<'a>(
        &'a self,
        symbol: &'a str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, InsiderError>> + Send + 'a>> {
        Box::pin(self.fetch(symbol, start, end))
    }
}

impl PriceHistoryService for InsiderClient {
    fn fetch_price_history<'a>(
        &'a self,
        symbol: &'a str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, InsiderError>> + Send + 'a>> {
        Box::pin(async move {
            ConfiguredHistory::new(self, CacheMode::Use, None)
                .fetch(symbol, start, end)
                .await
        })
    }
}
