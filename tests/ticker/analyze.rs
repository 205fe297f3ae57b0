use std::time::Duration;

use httpmock::{Method::GET, MockServer};
use insider_rs::core::client::{Backoff, RetryConfig};
use insider_rs::stats::{FilterCriteria, Side};
use insider_rs::{InsiderError, Ticker};

use crate::common::{
    CHART_PATH, Owner, Trade, chart_json, client_for, d, form4, mock_chart, mock_filing, mock_search_page,
    search_feed, temp_store, weekday_bars,
};

fn trade_doc(period: &str, code: &str, shares: f64, side: &str, price: f64, post: f64) -> String {
    form4(
        period,
        Some(&Owner {
            name: "Doe Jane",
            director: false,
            officer: true,
            title: Some("CEO"),
        }),
        &[Trade {
            date: period,
            code,
            shares,
            side,
            price: Some(price),
            post,
        }],
    )
}

#[tokio::test]
async fn analyze_scrapes_prices_and_computes() {
    let server = MockServer::start();
    let store_dir = temp_store("ticker");
    let client = client_for(&server, &store_dir);

    mock_search_page(
        &server,
        "EXM",
        0,
        search_feed(&[(1, d("2023-01-12")), (2, d("2023-01-05"))]),
    );
    mock_filing(&server, 1, trade_doc("2023-01-10", "S", 50.0, "D", 55.0, 1_100.0));
    mock_filing(&server, 2, trade_doc("2023-01-03", "P", 100.0, "A", 50.0, 1_150.0));

    let bars = weekday_bars(d("2022-12-01"), d("2023-02-28"), |_| 52.0);
    let chart = mock_chart(&server, "EXM", chart_json(&bars, &[]));

    let ticker = Ticker::new(&client, "exm");
    assert_eq!(ticker.symbol(), "EXM");

    let dataset = ticker
        .analyze()
        .between(d("2023-01-01"), d("2023-01-31"))
        .fetch()
        .await
        .unwrap();

    chart.assert();
    assert_eq!(dataset.ticker, "EXM");
    assert_eq!(dataset.files_searched, 2);
    assert_eq!(dataset.transactions.len(), 2);
    assert_eq!(dataset.insiders, vec!["Doe Jane".to_string()]);
    assert!(dataset.references.is_none());

    let report = dataset.compute(&FilterCriteria::none());
    let row = &report.insiders[0];
    assert_eq!(row.total_volume, 150.0);
    assert_eq!(row.position_delta, 50.0);
    assert_eq!(row.trade_count, 2);

    let sells = dataset.compute(&FilterCriteria::none().side(Side::Sell));
    assert_eq!(sells.summary.transactions, 1);

    let stored = ticker.stored_filings().unwrap().unwrap();
    assert_eq!(stored.accessions().len(), 2);

    let _ = std::fs::remove_dir_all(&store_dir);
}

#[tokio::test]
async fn analyze_with_references_fetches_index_and_volatility() {
    let server = MockServer::start();
    let store_dir = temp_store("ticker-refs");
    let client = client_for(&server, &store_dir);

    mock_search_page(&server, "EXM", 0, search_feed(&[(1, d("2023-01-05"))]));
    mock_filing(&server, 1, trade_doc("2023-01-03", "P", 100.0, "A", 50.0, 1_150.0));

    let bars = weekday_bars(d("2022-12-01"), d("2023-02-28"), |_| 52.0);
    mock_chart(&server, "EXM", chart_json(&bars, &[]));
    let spy = mock_chart(&server, "SPY", chart_json(&bars, &[]));
    let vix = mock_chart(&server, "^VIX", chart_json(&bars, &[]));

    let dataset = Ticker::new(&client, "EXM")
        .analyze()
        .since(d("2023-01-01"))
        .with_references(true)
        .fetch()
        .await
        .unwrap();

    spy.assert();
    vix.assert();
    let refs = dataset.references.unwrap();
    assert_eq!(refs.index.symbol, "SPY");
    assert!(!refs.volatility.is_empty());

    let _ = std::fs::remove_dir_all(&store_dir);
}

#[tokio::test]
async fn analyze_fails_when_nothing_is_priced() {
    let server = MockServer::start();
    let store_dir = temp_store("ticker-empty");
    let client = client_for(&server, &store_dir);

    mock_search_page(&server, "EXM", 0, search_feed(&[(1, d("2023-01-05"))]));
    mock_filing(&server, 1, trade_doc("2023-01-03", "A", 100.0, "A", 0.0, 1_150.0));
    let chart = mock_chart(&server, "EXM", chart_json(&[], &[]));

    let err = Ticker::new(&client, "EXM")
        .analyze()
        .since(d("2023-01-01"))
        .fetch()
        .await
        .unwrap_err();

    assert!(matches!(err, InsiderError::EmptyResult(_)), "got {err:?}");
    chart.assert_hits(0);

    let _ = std::fs::remove_dir_all(&store_dir);
}

#[tokio::test]
async fn ticker_retry_policy_reaches_price_requests() {
    let server = MockServer::start();
    let store_dir = temp_store("ticker-retry");
    let client = client_for(&server, &store_dir);

    mock_search_page(&server, "EXM", 0, search_feed(&[(1, d("2023-01-05"))]));
    mock_filing(&server, 1, trade_doc("2023-01-03", "P", 100.0, "A", 50.0, 1_150.0));
    let chart = server.mock(|when, then| {
        when.method(GET).path(format!("{CHART_PATH}EXM"));
        then.status(503).body("Service Unavailable");
    });

    let cfg = RetryConfig {
        enabled: true,
        max_retries: 2,
        backoff: Backoff::Fixed(Duration::from_millis(1)),
        ..RetryConfig::default()
    };
    let result = Ticker::new(&client, "EXM")
        .retry_policy(Some(cfg))
        .analyze()
        .between(d("2023-01-01"), d("2023-01-31"))
        .fetch()
        .await;

    chart.assert_hits(3);
    assert!(matches!(result, Err(InsiderError::Status { status: 503, .. })), "got {result:?}");

    let _ = std::fs::remove_dir_all(&store_dir);
}
