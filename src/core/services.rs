use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;

use crate::core::{InsiderError, PriceHistory};

/// A trait for services that can supply daily price history and split events.
///
/// The statistics engine only depends on this trait, which keeps it testable
/// without a network. It is implemented by [`InsiderClient`](crate::InsiderClient).
pub trait PriceHistoryService: Send + Sync {
    /// Fetches daily bars and splits for `symbol` from `start` through `end`
    /// (or through the present when `end` is `None`).
    fn fetch_price_history<'a>(
        &'a self,
        symbol: &'a str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, InsiderError>> + Send + 'a>>;
}
