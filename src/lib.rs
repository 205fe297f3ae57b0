//! insider-rs: insider-trading filings, scraped incrementally and reconciled against prices.
//!
//! The crate has three layers:
//!
//! - [`filings`] pages through the EDGAR ownership-filing search, extracts each
//!   Form 4 document once and keeps the rows in a per-ticker [`FilingStore`].
//! - [`history`] fetches daily price bars and split events.
//! - [`stats`] selects the priced purchases and sales, adjusts them for splits and
//!   derives per-insider, volatility and performance tables for any [`FilterCriteria`].
//!
//! [`Ticker`] wraps all three for a single symbol.
//!
//! ```no_run
//! # use insider_rs::{InsiderClient, Ticker, FilterCriteria, stats::Side};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InsiderClient::builder()
//!     .user_agent("research-bot admin@example.com")
//!     .build()?;
//! let dataset = Ticker::new(&client, "MSFT").analyze().fetch().await?;
//! let sells = dataset.compute(&FilterCriteria::none().side(Side::Sell));
//! println!("{} sales by {} insiders", sells.summary.transactions, sells.summary.insiders);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod filings;
pub mod history;
pub mod stats;
pub mod ticker;

pub use crate::core::{
    CacheMode, HolidayCalendar, InsiderClient, InsiderClientBuilder, InsiderError, PriceBar,
    PriceHistory, PriceHistoryService, Progress, ProgressSink, RetryConfig, SplitEvent,
};
pub use filings::{FilingRecord, FilingStore, FilingsBuilder, TransactionTable};
pub use history::{ConfiguredHistory, HistoryBuilder, ReferenceHistories};
pub use stats::{Dataset, FilterCriteria, FilterParams, StatsReport};
pub use ticker::{AnalyzeBuilder, Ticker};

#[cfg(feature = "dataframe")]
pub use crate::core::dataframe::ToDataFrame;
