use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{InsiderError, PriceHistory, PriceHistoryService};

/// Broad-market instrument insider activity is compared against.
pub const REFERENCE_INDEX: &str = "SPY";
/// Volatility instrument insider activity is compared against.
pub const REFERENCE_VOLATILITY: &str = "^VIX";

/// Price histories of the market-index and volatility instruments over an analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceHistories {
    pub index: PriceHistory,
    pub volatility: PriceHistory,
}

/// Fetches both reference instruments concurrently.
pub async fn fetch_references(
    service: &dyn PriceHistoryService,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<ReferenceHistories, InsiderError> {
    let (index, volatility) = futures::try_join!(
        service.fetch_price_history(REFERENCE_INDEX, start, end),
        service.fetch_price_history(REFERENCE_VOLATILITY, start, end),
    )?;
    Ok(ReferenceHistories { index, volatility })
}
