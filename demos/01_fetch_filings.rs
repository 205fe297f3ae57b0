use chrono::{Months, Utc};
use insider_rs::{FilingsBuilder, InsiderClient, Progress};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = InsiderClient::builder()
        .user_agent("insider-rs demo you@example.com")
        .build()?;

    let ticker = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());
    let today = Utc::now().date_naive();
    let oldest = today.checked_sub_months(Months::new(6)).unwrap_or(today);

    println!("--- Scraping insider filings for {ticker} since {oldest} ---");
    let table = FilingsBuilder::new(&client, &ticker)
        .since(oldest)
        .progress(|p: Progress| match p {
            Progress::Searching { start, .. } => println!("  search page at offset {start}"),
            Progress::Discovered { total, new } => {
                println!("  {total} filings in range, {new} not stored yet")
            }
            Progress::Extracting { done, total } => println!("  extracted {done}/{total}"),
            Progress::Merging { rows } => println!("  merging {rows} new rows"),
            Progress::Done { rows } => println!("  done, {rows} rows"),
        })
        .fetch()
        .await?;

    println!(
        "\n{} rows across {} filings (stored in {})",
        table.len(),
        table.accessions().len(),
        client.store_dir().display()
    );
    for row in table.iter().take(10) {
        println!(
            "  {} {:<24} {:>2} {:>12} @ {}",
            row.transaction_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            row.name.as_deref().unwrap_or("-"),
            row.code.as_deref().unwrap_or("-"),
            row.shares.map(|s| format!("{s:.0}")).unwrap_or_else(|| "-".into()),
            row.price.map(|p| format!("{p:.2}")).unwrap_or_else(|| "n/a".into()),
        );
    }

    println!("\nRunning the same scrape again only re-reads the search pages:");
    let again = FilingsBuilder::new(&client, &ticker).since(oldest).fetch().await?;
    println!("  {} rows, identical: {}", again.len(), again == table);

    Ok(())
}
