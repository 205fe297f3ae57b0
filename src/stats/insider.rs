use crate::stats::model::{CommonStockTransaction, InsiderStatRow};

/// One row per insider, in order of first appearance.
///
/// Percentages are taken relative to the prior position of the insider's
/// chronologically latest transaction (the first listed one on equal dates).
pub fn insider_stats(transactions: &[CommonStockTransaction]) -> Vec<InsiderStatRow> {
    let mut groups: Vec<(&str, Vec<&CommonStockTransaction>)> = Vec::new();
    for t in transactions {
        match groups.iter_mut().find(|(name, _)| *name == t.name) {
            Some((_, rows)) => rows.push(t),
            None => groups.push((t.name.as_str(), vec![t])),
        }
    }

    groups
        .into_iter()
        .map(|(name, rows)| {
            let total_volume: f64 = rows.iter().map(|t| t.shares.abs()).sum();
            let total_volume_dollar: f64 = rows.iter().map(|t| t.amount.abs()).sum();
            let position_delta: f64 = rows.iter().map(|t| t.shares).sum();
            let position_delta_dollar: f64 = rows.iter().map(|t| t.amount).sum();

            let mut latest = rows[0];
            for t in &rows[1..] {
                if t.transaction_date > latest.transaction_date {
                    latest = t;
                }
            }
            let base = latest.pre_transaction_shares.unwrap_or(f64::NAN);

            InsiderStatRow {
                insider: name.to_string(),
                total_volume,
                total_volume_dollar,
                position_delta,
                position_delta_dollar,
                position_delta_percentage: position_delta / base * 100.0,
                position_rotation: total_volume / base * 100.0,
                trade_count: rows.len(),
            }
        })
        .collect()
}
