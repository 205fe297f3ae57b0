use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use crate::core::{HolidayCalendar, InsiderError, SplitEvent};
use crate::filings::{FilingRecord, TransactionTable};
use crate::stats::model::{CommonStockTransaction, TradeSide};

/// How far before the earliest transaction price history is requested.
pub const PRICE_LEAD_DAYS: u64 = 28;

/// Selects the priced open-market purchases and sales dated on trading days.
///
/// # Errors
///
/// [`InsiderError::EmptyResult`] when no row qualifies.
pub fn select_common_stock(
    table: &TransactionTable,
    calendar: HolidayCalendar,
) -> Result<Vec<CommonStockTransaction>, InsiderError> {
    let selected: Vec<CommonStockTransaction> = table
        .iter()
        .filter_map(|r| common_stock_row(r, calendar))
        .collect();

    if selected.is_empty() {
        return Err(InsiderError::EmptyResult(format!(
            "no priced purchases or sales for {} in the requested range, try extending it",
            table.ticker
        )));
    }
    Ok(selected)
}

fn common_stock_row(r: &FilingRecord, calendar: HolidayCalendar) -> Option<CommonStockTransaction> {
    if r.is_placeholder() {
        return None;
    }
    let date = r.transaction_date?;
    if !calendar.is_trading_day(date) {
        return None;
    }
    let side = TradeSide::from_code(r.code.as_deref()?)?;
    let price = r.price.filter(|p| *p != 0.0 && p.is_finite())?;
    let shares = r.shares?;

    let pre = r.post_transaction_shares.map(|post| post - shares);
    Some(CommonStockTransaction {
        accession: r.accession.clone(),
        report_period: r.report_period,
        transaction_date: date,
        name: r.name.clone().unwrap_or_default(),
        is_director: r.is_director.unwrap_or(false),
        is_officer: r.is_officer.unwrap_or(false),
        is_ten_percent_owner: r.is_ten_percent_owner.unwrap_or(false),
        officer_title: r.officer_title.clone(),
        security: r.security.clone(),
        side,
        shares,
        price,
        post_transaction_shares: r.post_transaction_shares,
        ownership_nature: r.ownership_nature,
        amount: shares * price,
        pre_transaction_shares: pre,
        ownership_percentage: pre.map(|p| shares / p * 100.0),
        adj_price: price,
    })
}

/// First date of the price history needed for `transactions`.
pub fn price_window_start(transactions: &[CommonStockTransaction]) -> Option<NaiveDate> {
    transactions
        .iter()
        .map(|t| t.transaction_date)
        .min()?
        .checked_sub_days(Days::new(PRICE_LEAD_DAYS))
}

/// Rescales prices of transactions dated before the last split by the product of all
/// split factors; later transactions keep their raw price.
pub fn adjust_for_splits(transactions: &mut [CommonStockTransaction], splits: &[SplitEvent]) {
    let Some(last_split) = splits.iter().map(|s| s.date).max() else {
        for t in transactions.iter_mut() {
            t.adj_price = t.price;
        }
        return;
    };
    let factor: f64 = splits.iter().map(SplitEvent::price_factor).product();
    for t in transactions.iter_mut() {
        t.adj_price = if t.transaction_date < last_split {
            t.price * factor
        } else {
            t.price
        };
    }
}

/// Distinct insider names in first-seen order.
pub fn insider_names(transactions: &[CommonStockTransaction]) -> Vec<String> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .filter(|t| seen.insert(t.name.as_str()))
        .map(|t| t.name.clone())
        .collect()
}
