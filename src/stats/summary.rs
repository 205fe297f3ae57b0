use std::collections::BTreeMap;

use crate::stats::model::{CommonStockTransaction, DailyVolume, TradeSide, TransactionSummary};
use crate::stats::prepare::insider_names;

pub fn summarize(transactions: &[CommonStockTransaction]) -> TransactionSummary {
    let mut s = TransactionSummary {
        transactions: transactions.len(),
        insiders: insider_names(transactions).len(),
        ..TransactionSummary::default()
    };
    for t in transactions {
        match t.side {
            TradeSide::Buy => {
                s.buy_volume += t.shares.abs();
                s.buy_volume_dollar += t.amount.abs();
            }
            TradeSide::Sell => {
                s.sell_volume += t.shares.abs();
                s.sell_volume_dollar += t.amount.abs();
            }
        }
    }
    s
}

/// Net signed shares and notional per transaction date, ascending.
pub fn daily_volume(transactions: &[CommonStockTransaction]) -> Vec<DailyVolume> {
    let mut by_date: BTreeMap<_, (f64, f64)> = BTreeMap::new();
    for t in transactions {
        let e = by_date.entry(t.transaction_date).or_default();
        e.0 += t.shares;
        e.1 += t.amount;
    }
    by_date
        .into_iter()
        .map(|(date, (net_shares, net_amount))| DailyVolume {
            date,
            net_shares,
            net_amount,
        })
        .collect()
}
