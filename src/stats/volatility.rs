use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use crate::core::PriceHistory;
use crate::stats::model::{CommonStockTransaction, VolatilityPeriod, VolatilityRow};
use crate::stats::window::{Window, per_window};

/// Sample standard deviation; `None` below two observations.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (n - 1.0)).sqrt())
}

fn pre_std(prices: &PriceHistory, date: NaiveDate, w: Window) -> Option<f64> {
    let start = w.before(date)?;
    let end = date.checked_sub_days(Days::new(1))?;
    sample_std(&prices.closes_between(start, end))
}

fn post_std(prices: &PriceHistory, date: NaiveDate, w: Window) -> Option<f64> {
    let end = w.after(date)?;
    if end > prices.last_date()? {
        return None;
    }
    let start = date.checked_add_days(Days::new(1))?;
    sample_std(&prices.closes_between(start, end))
}

fn row(date: NaiveDate, period: VolatilityPeriod, v: [Option<f64>; 5]) -> VolatilityRow {
    let [std_1w, std_1m, std_3m, std_6m, std_1y] = v;
    VolatilityRow {
        transaction_date: date,
        period,
        std_1w,
        std_1m,
        std_3m,
        std_6m,
        std_1y,
    }
}

/// A `pre` and a `post` row for every distinct transaction date, in first-seen order.
///
/// `post` is undefined for windows reaching past the last available bar.
pub fn volatility_stats(
    transactions: &[CommonStockTransaction],
    prices: &PriceHistory,
) -> Vec<VolatilityRow> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .map(|t| t.transaction_date)
        .filter(|d| seen.insert(*d))
        .flat_map(|date| {
            [
                row(
                    date,
                    VolatilityPeriod::Pre,
                    per_window(|w| pre_std(prices, date, w)),
                ),
                row(
                    date,
                    VolatilityPeriod::Post,
                    per_window(|w| post_std(prices, date, w)),
                ),
            ]
        })
        .collect()
}
