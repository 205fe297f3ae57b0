//! Filtering and statistics over a ticker's priced insider trades.
//!
//! A [`Dataset`] is prepared once per ticker and window (selection, derived fields,
//! price history, split adjustment). [`Dataset::compute`] can then be called for any
//! number of [`FilterCriteria`] without touching the network.

mod filter;
mod insider;
mod model;
mod performance;
mod prepare;
mod summary;
mod volatility;
mod window;

pub use filter::{
    Comparison, FilterCriteria, FilterParams, Magnitude, Side, SizeColumn, SizeFilter,
};
pub use insider::insider_stats;
pub use model::{
    CommonStockTransaction, DailyVolume, InsiderStatRow, PerformanceRow, StatsReport,
    TradeSide, TransactionSummary, VolatilityPeriod, VolatilityRow,
};
pub use performance::{performance_stats, window_return};
pub use prepare::{
    PRICE_LEAD_DAYS, adjust_for_splits, insider_names, price_window_start, select_common_stock,
};
pub use summary::{daily_volume, summarize};
pub use volatility::{sample_std, volatility_stats};
pub use window::Window;

use serde::{Deserialize, Serialize};

use crate::core::{HolidayCalendar, InsiderError, PriceHistory, PriceHistoryService};
use crate::filings::TransactionTable;
use crate::history::{ReferenceHistories, fetch_references};

/// Prepared transactions and prices for one ticker and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub ticker: String,
    /// Distinct filings the selection was drawn from.
    pub files_searched: usize,
    pub transactions: Vec<CommonStockTransaction>,
    pub insiders: Vec<String>,
    pub prices: PriceHistory,
    pub references: Option<ReferenceHistories>,
}

impl Dataset {
    /// Builds a dataset from an already scraped table and an already fetched price history.
    ///
    /// # Errors
    ///
    /// [`InsiderError::EmptyResult`] when no priced purchase or sale on a trading day remains.
    pub fn from_parts(
        table: &TransactionTable,
        prices: PriceHistory,
        calendar: HolidayCalendar,
    ) -> Result<Self, InsiderError> {
        let transactions = select_common_stock(table, calendar)?;
        Ok(Self::assemble(table, transactions, prices, None))
    }

    /// Selects the qualifying transactions of `table` and fetches the price history
    /// covering them (from four weeks before the earliest one through today).
    ///
    /// With `with_references`, the market-index and volatility instruments are fetched
    /// for the same window.
    ///
    /// # Errors
    ///
    /// [`InsiderError::EmptyResult`] when nothing qualifies, or any price-history error.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(service, table), err, fields(ticker = %table.ticker)))]
    pub async fn prepare(
        service: &dyn PriceHistoryService,
        table: &TransactionTable,
        calendar: HolidayCalendar,
        with_references: bool,
    ) -> Result<Self, InsiderError> {
        let transactions = select_common_stock(table, calendar)?;
        let start = price_window_start(&transactions).ok_or(InsiderError::InvalidDates)?;

        let prices = service.fetch_price_history(&table.ticker, start, None).await?;
        let references = if with_references {
            Some(fetch_references(service, start, None).await?)
        } else {
            None
        };

        Ok(Self::assemble(table, transactions, prices, references))
    }

    fn assemble(
        table: &TransactionTable,
        mut transactions: Vec<CommonStockTransaction>,
        prices: PriceHistory,
        references: Option<ReferenceHistories>,
    ) -> Self {
        adjust_for_splits(&mut transactions, &prices.splits);
        let insiders = insider_names(&transactions);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            transactions = transactions.len(),
            insiders = insiders.len(),
            bars = prices.bars.len(),
            splits = prices.splits.len(),
            "dataset prepared"
        );

        Self {
            ticker: table.ticker.clone(),
            files_searched: table.accessions().len(),
            transactions,
            insiders,
            prices,
            references,
        }
    }

    /// Applies `criteria` and derives every output table from the surviving rows.
    ///
    /// An empty selection is a valid outcome and produces empty tables.
    pub fn compute(&self, criteria: &FilterCriteria) -> StatsReport {
        let filtered = criteria.apply(&self.transactions, &self.prices);

        StatsReport {
            insiders: insider_stats(&filtered),
            volatility: volatility_stats(&filtered, &self.prices),
            performance: performance_stats(&filtered, &self.prices),
            summary: summarize(&filtered),
            daily_volume: daily_volume(&filtered),
            unknown_insiders: criteria.unknown_insiders(&self.insiders),
            prices: self.prices.clone(),
            transactions: filtered,
        }
    }
}
