use chrono::{Months, Utc};
use insider_rs::stats::{Comparison, Magnitude, Side, SizeColumn, SizeFilter};
use insider_rs::{FilterCriteria, FilterParams, InsiderClient, Ticker};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = InsiderClient::builder()
        .user_agent("insider-rs demo you@example.com")
        .build()?;

    let today = Utc::now().date_naive();
    let oldest = today.checked_sub_months(Months::new(12)).unwrap_or(today);
    let dataset = Ticker::new(&client, "NVDA").analyze().since(oldest).fetch().await?;

    // Filters are cheap: the dataset is reused without new requests.
    let large = SizeFilter::new(SizeColumn::Amount, Comparison::Gt, 1_000_000.0, Magnitude::Absolute)?;
    let criteria = [
        ("all trades", FilterCriteria::none()),
        ("open-market only", FilterCriteria::none().open_market_only(true)),
        ("purchases", FilterCriteria::none().side(Side::Buy)),
        (
            "large open-market sales",
            FilterCriteria::none()
                .side(Side::Sell)
                .open_market_only(true)
                .size(large),
        ),
    ];
    for (label, c) in &criteria {
        let r = dataset.compute(c);
        println!(
            "{label:<26} {:>4} trades by {:>3} insiders",
            r.summary.transactions, r.summary.insiders
        );
    }
    println!("(size filter: {large})");

    // The same criteria as a presentation layer would submit them.
    let params: FilterParams = serde_json::from_str(
        r#"{ "insiders": ["Huang Jen Hsun", "Someone Else"], "side": "S" }"#,
    )?;
    let report = dataset.compute(&FilterCriteria::try_from(params)?);
    println!(
        "\nnamed sellers: {} trades; not found: {:?}",
        report.transactions.len(),
        report.unknown_insiders
    );

    Ok(())
}
