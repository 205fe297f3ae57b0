use chrono::NaiveDate;

use crate::core::PriceHistory;
use crate::stats::model::{CommonStockTransaction, PerformanceRow};
use crate::stats::window::{Window, per_window};

/// Percent change from the close on `date` to the close of the bar nearest to
/// `date + window`. Undefined when the target lies beyond the last bar or no bar
/// exists on `date`.
///
/// The range check applies to the unresolved target date, not to the nearest bar,
/// which always lies inside the history.
pub fn window_return(prices: &PriceHistory, date: NaiveDate, w: Window) -> Option<f64> {
    let target = w.after(date)?;
    if target > prices.last_date()? {
        return None;
    }
    let base = prices.bar_on(date)?.close;
    let reached = prices.nearest(target)?.close;
    Some((reached - base) / base * 100.0)
}

/// One row per transaction, in input order.
pub fn performance_stats(
    transactions: &[CommonStockTransaction],
    prices: &PriceHistory,
) -> Vec<PerformanceRow> {
    transactions
        .iter()
        .map(|t| {
            let [return_1w, return_1m, return_3m, return_6m, return_1y] =
                per_window(|w| window_return(prices, t.transaction_date, w));
            PerformanceRow {
                code: t.side,
                transaction_date: t.transaction_date,
                return_1w,
                return_1m,
                return_3m,
                return_6m,
                return_1y,
            }
        })
        .collect()
}
