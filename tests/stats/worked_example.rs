use chrono::NaiveDate;
use insider_rs::stats::{Dataset, FilterCriteria, TradeSide};
use insider_rs::{HolidayCalendar, PriceHistory};

use crate::common::{d, price_history, record, table, weekday_bars};

/// Closes rise by 0.5 per calendar day from 50.0 on 2023-01-03.
pub fn rising_prices() -> PriceHistory {
    let base = d("2023-01-03");
    let bars = weekday_bars(d("2022-12-01"), d("2023-02-28"), |date: NaiveDate| {
        50.0 + (date - base).num_days() as f64 * 0.5
    });
    price_history("EXM", &bars, &[])
}

fn dataset() -> Dataset {
    let t = table(
        "EXM",
        vec![
            record(1, "2023-01-03", "Doe Jane", "P", 100.0, Some(50.0), 1_150.0),
            record(2, "2023-01-10", "Doe Jane", "S", -50.0, Some(55.0), 1_100.0),
        ],
    );
    Dataset::from_parts(&t, rising_prices(), HolidayCalendar::Nyse).unwrap()
}

#[test]
fn insider_row_matches_hand_computation() {
    let report = dataset().compute(&FilterCriteria::none());

    assert_eq!(report.insiders.len(), 1);
    let row = &report.insiders[0];
    assert_eq!(row.insider, "Doe Jane");
    assert_eq!(row.total_volume, 150.0);
    assert_eq!(row.total_volume_dollar, 100.0 * 50.0 + 50.0 * 55.0);
    assert_eq!(row.position_delta, 50.0);
    assert_eq!(row.position_delta_dollar, 5_000.0 - 2_750.0);
    assert_eq!(row.trade_count, 2);

    // Latest transaction (2023-01-10) held 1_150 shares before selling.
    assert!((row.position_delta_percentage - 50.0 / 1_150.0 * 100.0).abs() < 1e-9);
    assert!((row.position_rotation - 150.0 / 1_150.0 * 100.0).abs() < 1e-9);
}

#[test]
fn position_delta_is_buys_minus_sells() {
    let ds = dataset();
    let report = ds.compute(&FilterCriteria::none());
    let buys: f64 = report
        .transactions
        .iter()
        .filter(|t| t.side == TradeSide::Buy)
        .map(|t| t.shares.abs())
        .sum();
    let sells: f64 = report
        .transactions
        .iter()
        .filter(|t| t.side == TradeSide::Sell)
        .map(|t| t.shares.abs())
        .sum();
    assert_eq!(report.insiders[0].position_delta, buys - sells);
}

#[test]
fn one_week_return_follows_the_close() {
    let report = dataset().compute(&FilterCriteria::none());

    let first = report
        .performance
        .iter()
        .find(|p| p.transaction_date == d("2023-01-03"))
        .unwrap();
    assert_eq!(first.code, TradeSide::Buy);
    // Close on 2023-01-10 is 53.5, close on 2023-01-03 is 50.0.
    let expected = (53.5 - 50.0) / 50.0 * 100.0;
    assert!((first.return_1w.unwrap() - expected).abs() < 1e-9);
    assert!(first.return_1m.is_some());
    assert_eq!(first.return_3m, None);
    assert_eq!(first.return_1y, None);
}

#[test]
fn derived_fields_and_summary() {
    let report = dataset().compute(&FilterCriteria::none());

    let sale = report
        .transactions
        .iter()
        .find(|t| t.side == TradeSide::Sell)
        .unwrap();
    assert_eq!(sale.amount, -2_750.0);
    assert_eq!(sale.pre_transaction_shares, Some(1_150.0));
    assert!((sale.ownership_percentage.unwrap() - (-50.0 / 1_150.0 * 100.0)).abs() < 1e-9);
    assert_eq!(sale.adj_price, 55.0);

    let s = &report.summary;
    assert_eq!(s.transactions, 2);
    assert_eq!(s.insiders, 1);
    assert_eq!(s.buy_volume, 100.0);
    assert_eq!(s.sell_volume, 50.0);
    assert_eq!(s.buy_volume_dollar, 5_000.0);
    assert_eq!(s.sell_volume_dollar, 2_750.0);

    let daily: Vec<_> = report.daily_volume.iter().map(|v| (v.date, v.net_shares)).collect();
    assert_eq!(daily, vec![(d("2023-01-03"), 100.0), (d("2023-01-10"), -50.0)]);
}
