use polars::prelude::*;

use crate::core::PriceHistory;
use crate::filings::{OwnershipNature, TransactionTable};
use crate::stats::{
    CommonStockTransaction, DailyVolume, InsiderStatRow, PerformanceRow, VolatilityPeriod,
    VolatilityRow, Window,
};

/// Conversion of the tabular outputs into Polars DataFrames.
///
/// Dates are rendered as `YYYY-MM-DD` strings.
pub trait ToDataFrame {
    fn to_dataframe(&self) -> PolarsResult<DataFrame>;
}

fn nature(n: Option<OwnershipNature>) -> Option<&'static str> {
    n.map(|n| match n {
        OwnershipNature::Direct => "D",
        OwnershipNature::Indirect => "I",
    })
}

impl ToDataFrame for TransactionTable {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let r = &self.rows;
        df!(
            "accession" => r.iter().map(|x| x.accession.clone()).collect::<Vec<_>>(),
            "report_period" => r.iter().map(|x| x.report_period.to_string()).collect::<Vec<_>>(),
            "transaction_date" => r.iter().map(|x| x.transaction_date.map(|d| d.to_string())).collect::<Vec<_>>(),
            "name" => r.iter().map(|x| x.name.clone()).collect::<Vec<_>>(),
            "is_director" => r.iter().map(|x| x.is_director).collect::<Vec<_>>(),
            "is_officer" => r.iter().map(|x| x.is_officer).collect::<Vec<_>>(),
            "is_ten_percent_owner" => r.iter().map(|x| x.is_ten_percent_owner).collect::<Vec<_>>(),
            "officer_title" => r.iter().map(|x| x.officer_title.clone()).collect::<Vec<_>>(),
            "security" => r.iter().map(|x| x.security.clone()).collect::<Vec<_>>(),
            "code" => r.iter().map(|x| x.code.clone()).collect::<Vec<_>>(),
            "shares" => r.iter().map(|x| x.shares).collect::<Vec<_>>(),
            "price" => r.iter().map(|x| x.price).collect::<Vec<_>>(),
            "post_transaction_shares" => r.iter().map(|x| x.post_transaction_shares).collect::<Vec<_>>(),
            "ownership_nature" => r.iter().map(|x| nature(x.ownership_nature)).collect::<Vec<_>>(),
        )
    }
}

impl ToDataFrame for Vec<CommonStockTransaction> {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        df!(
            "accession" => self.iter().map(|x| x.accession.clone()).collect::<Vec<_>>(),
            "transaction_date" => self.iter().map(|x| x.transaction_date.to_string()).collect::<Vec<_>>(),
            "name" => self.iter().map(|x| x.name.clone()).collect::<Vec<_>>(),
            "officer_title" => self.iter().map(|x| x.officer_title.clone()).collect::<Vec<_>>(),
            "code" => self.iter().map(|x| x.side.code()).collect::<Vec<_>>(),
            "shares" => self.iter().map(|x| x.shares).collect::<Vec<_>>(),
            "price" => self.iter().map(|x| x.price).collect::<Vec<_>>(),
            "adj_price" => self.iter().map(|x| x.adj_price).collect::<Vec<_>>(),
            "amount" => self.iter().map(|x| x.amount).collect::<Vec<_>>(),
            "pre_transaction_shares" => self.iter().map(|x| x.pre_transaction_shares).collect::<Vec<_>>(),
            "post_transaction_shares" => self.iter().map(|x| x.post_transaction_shares).collect::<Vec<_>>(),
            "ownership_percentage" => self.iter().map(|x| x.ownership_percentage).collect::<Vec<_>>(),
            "ownership_nature" => self.iter().map(|x| nature(x.ownership_nature)).collect::<Vec<_>>(),
        )
    }
}

impl ToDataFrame for Vec<InsiderStatRow> {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        df!(
            "insider" => self.iter().map(|x| x.insider.clone()).collect::<Vec<_>>(),
            "total_volume" => self.iter().map(|x| x.total_volume).collect::<Vec<_>>(),
            "total_volume_dollar" => self.iter().map(|x| x.total_volume_dollar).collect::<Vec<_>>(),
            "position_delta" => self.iter().map(|x| x.position_delta).collect::<Vec<_>>(),
            "position_delta_dollar" => self.iter().map(|x| x.position_delta_dollar).collect::<Vec<_>>(),
            "position_delta_percentage" => self.iter().map(|x| x.position_delta_percentage).collect::<Vec<_>>(),
            "position_rotation" => self.iter().map(|x| x.position_rotation).collect::<Vec<_>>(),
            "trade_count" => self.iter().map(|x| x.trade_count as u64).collect::<Vec<_>>(),
        )
    }
}

/// One `<prefix>_<window>` column per analysis window.
fn window_columns<T>(
    rows: &[T],
    prefix: &str,
    value: impl Fn(&T, Window) -> Option<f64>,
) -> Vec<Column> {
    Window::ALL
        .iter()
        .map(|&w| {
            let values: Vec<Option<f64>> = rows.iter().map(|r| value(r, w)).collect();
            Series::new(format!("{prefix}_{}", w.label()).into(), values).into()
        })
        .collect()
}

impl ToDataFrame for Vec<VolatilityRow> {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<String> = self.iter().map(|x| x.transaction_date.to_string()).collect();
        let periods: Vec<&str> = self
            .iter()
            .map(|x| match x.period {
                VolatilityPeriod::Pre => "pre",
                VolatilityPeriod::Post => "post",
            })
            .collect();
        let mut columns: Vec<Column> = vec![
            Series::new("transaction_date".into(), dates).into(),
            Series::new("period".into(), periods).into(),
        ];
        columns.extend(window_columns(self, "std", VolatilityRow::std));
        DataFrame::new(columns)
    }
}

impl ToDataFrame for Vec<PerformanceRow> {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let codes: Vec<&str> = self.iter().map(|x| x.code.code()).collect();
        let dates: Vec<String> = self.iter().map(|x| x.transaction_date.to_string()).collect();
        let mut columns: Vec<Column> = vec![
            Series::new("code".into(), codes).into(),
            Series::new("transaction_date".into(), dates).into(),
        ];
        columns.extend(window_columns(self, "return", PerformanceRow::return_over));
        DataFrame::new(columns)
    }
}

impl ToDataFrame for Vec<DailyVolume> {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        df!(
            "date" => self.iter().map(|x| x.date.to_string()).collect::<Vec<_>>(),
            "net_shares" => self.iter().map(|x| x.net_shares).collect::<Vec<_>>(),
            "net_amount" => self.iter().map(|x| x.net_amount).collect::<Vec<_>>(),
        )
    }
}

impl ToDataFrame for PriceHistory {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let b = &self.bars;
        df!(
            "date" => b.iter().map(|x| x.date.to_string()).collect::<Vec<_>>(),
            "open" => b.iter().map(|x| x.open).collect::<Vec<_>>(),
            "high" => b.iter().map(|x| x.high).collect::<Vec<_>>(),
            "low" => b.iter().map(|x| x.low).collect::<Vec<_>>(),
            "close" => b.iter().map(|x| x.close).collect::<Vec<_>>(),
            "volume" => b.iter().map(|x| x.volume).collect::<Vec<_>>(),
        )
    }
}
