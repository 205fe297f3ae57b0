use chrono::{Months, Utc};
use insider_rs::{FilterCriteria, InsiderClient, Ticker};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = InsiderClient::builder()
        .user_agent("insider-rs demo you@example.com")
        .build()?;

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "MSFT".to_string());
    let today = Utc::now().date_naive();
    let oldest = today.checked_sub_months(Months::new(12)).unwrap_or(today);

    let dataset = Ticker::new(&client, &symbol)
        .analyze()
        .since(oldest)
        .with_references(true)
        .fetch()
        .await?;

    println!(
        "--- {}: {} priced trades from {} filings, {} insiders ---",
        dataset.ticker,
        dataset.transactions.len(),
        dataset.files_searched,
        dataset.insiders.len()
    );

    let report = dataset.compute(&FilterCriteria::none());
    let s = &report.summary;
    println!(
        "Bought {:.0} shares (${:.0}), sold {:.0} shares (${:.0})\n",
        s.buy_volume, s.buy_volume_dollar, s.sell_volume, s.sell_volume_dollar
    );

    println!("{:<28} {:>12} {:>14} {:>9} {:>7}", "insider", "delta", "delta $", "delta %", "trades");
    for row in &report.insiders {
        println!(
            "{:<28} {:>12.0} {:>14.0} {:>9.2} {:>7}",
            row.insider,
            row.position_delta,
            row.position_delta_dollar,
            row.position_delta_percentage,
            row.trade_count
        );
    }

    let fmt = |v: Option<f64>| v.map_or_else(|| "    -".to_string(), |x| format!("{x:>5.2}"));
    println!("\nVolatility (close std) around each trade date:");
    for v in report.volatility.iter().take(10) {
        println!(
            "  {} {:?}: 1w {} 1m {} 3m {}",
            v.transaction_date,
            v.period,
            fmt(v.std_1w),
            fmt(v.std_1m),
            fmt(v.std_3m)
        );
    }

    println!("\nReturns after each trade (%):");
    for p in report.performance.iter().take(10) {
        println!(
            "  {} {}: 1w {} 1m {} 3m {}",
            p.transaction_date,
            p.code.code(),
            fmt(p.return_1w),
            fmt(p.return_1m),
            fmt(p.return_3m)
        );
    }

    if let Some(refs) = &dataset.references {
        println!(
            "\nReference bars: {} {} / {} {}",
            refs.index.symbol,
            refs.index.bars.len(),
            refs.volatility.symbol,
            refs.volatility.bars.len()
        );
    }

    #[cfg(feature = "dataframe")]
    {
        use insider_rs::ToDataFrame;
        println!("\n{}", report.insiders.to_dataframe()?);
    }

    Ok(())
}
