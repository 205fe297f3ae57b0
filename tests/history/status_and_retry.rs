use std::time::Duration;

use httpmock::{Method::GET, MockServer};
use insider_rs::core::client::{Backoff, RetryConfig};
use insider_rs::{HistoryBuilder, InsiderClient, InsiderError};
use url::Url;

use crate::common::{CHART_PATH, d};

#[tokio::test]
async fn non_success_status_is_surfaced_without_retry_by_default() {
    let server = MockServer::start();
    let fail = server.mock(|when, then| {
        when.method(GET).path(format!("{CHART_PATH}FAIL"));
        then.status(503).body("upstream unavailable");
    });
    let client = InsiderClient::builder()
        .base_chart(Url::parse(&format!("{}{CHART_PATH}", server.base_url())).unwrap())
        .build()
        .unwrap();

    let err = HistoryBuilder::new(&client, "FAIL")
        .between(d("2023-01-02"), d("2023-01-31"))
        .fetch()
        .await
        .unwrap_err();

    match err {
        InsiderError::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.contains("/FAIL"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
    fail.assert_hits(1);
}

#[tokio::test]
async fn opt_in_retry_repeats_retryable_statuses() {
    let server = MockServer::start();
    let fail = server.mock(|when, then| {
        when.method(GET).path(format!("{CHART_PATH}FAIL"));
        then.status(503).body("Service Unavailable");
    });

    let max_retries = 2;
    let cfg = RetryConfig {
        enabled: true,
        max_retries,
        backoff: Backoff::Fixed(Duration::from_millis(1)),
        ..RetryConfig::default()
    };
    let client = InsiderClient::builder()
        .base_chart(Url::parse(&format!("{}{CHART_PATH}", server.base_url())).unwrap())
        .retry_config(cfg)
        .build()
        .unwrap();

    let result = HistoryBuilder::new(&client, "FAIL")
        .between(d("2023-01-02"), d("2023-01-31"))
        .fetch()
        .await;

    fail.assert_hits(1 + max_retries as usize);
    assert!(matches!(result, Err(InsiderError::Status { status: 503, .. })));
}

#[tokio::test]
async fn per_call_retry_override_wins_over_client_default() {
    let server = MockServer::start();
    let fail = server.mock(|when, then| {
        when.method(GET).path(format!("{CHART_PATH}FAIL"));
        then.status(404);
    });
    let client = InsiderClient::builder()
        .base_chart(Url::parse(&format!("{}{CHART_PATH}", server.base_url())).unwrap())
        .build()
        .unwrap();

    let cfg = RetryConfig {
        enabled: true,
        max_retries: 3,
        backoff: Backoff::Fixed(Duration::from_millis(1)),
        retry_on_status: vec![404],
        ..RetryConfig::default()
    };
    let _ = HistoryBuilder::new(&client, "FAIL")
        .between(d("2023-01-02"), d("2023-01-31"))
        .retry_policy(Some(cfg))
        .fetch()
        .await;

    fail.assert_hits(4);
}
