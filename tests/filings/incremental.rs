use std::path::PathBuf;

use httpmock::{Method::GET, MockServer};
use insider_rs::{FilingStore, FilingsBuilder, InsiderClient};

use crate::common::{
    SEARCH_PATH, client_for, d, form4, mock_filing, plain, search_feed, simple_form4, temp_store,
};

const FILINGS: [(usize, &str, &str); 5] = [
    (1, "2023-11-15", "2023-11-13"),
    (2, "2023-09-10", "2023-09-07"),
    (3, "2023-06-20", "2023-06-16"),
    (4, "2023-04-03", "2023-03-31"),
    (5, "2023-02-01", "2023-01-30"),
];

/// Feed as the search endpoint returns it when anchored on `dateb`.
fn mock_anchored_search(server: &MockServer, dateb: &str, newest: &str) {
    let entries: Vec<_> = FILINGS
        .iter()
        .filter(|(_, filed, _)| *filed <= newest)
        .map(|(n, filed, _)| (*n, d(filed)))
        .collect();
    let body = search_feed(&entries);
    let dateb = dateb.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path(SEARCH_PATH)
            .query_param("dateb", dateb.as_str())
            .query_param("start", "0");
        then.status(200).body(body);
    });
}

fn mock_all_filings(server: &MockServer) -> Vec<httpmock::Mock<'_>> {
    FILINGS
        .iter()
        .flat_map(|(n, _, period)| {
            let (index, doc) = mock_filing(server, *n, simple_form4(period));
            [index, doc]
        })
        .collect()
}

fn setup(tag: &str) -> (MockServer, PathBuf) {
    let server = MockServer::start();
    mock_anchored_search(&server, "20230630", "2023-06-30");
    mock_anchored_search(&server, "20231231", "2023-12-31");
    (server, temp_store(tag))
}

async fn scrape(client: &InsiderClient, oldest: &str, newest: &str) -> insider_rs::TransactionTable {
    FilingsBuilder::new(client, "EXM")
        .between(d(oldest), d(newest))
        .fetch()
        .await
        .unwrap()
}

#[tokio::test]
async fn repeated_scrape_is_idempotent() {
    let (server, store_dir) = setup("idem");
    let client = client_for(&server, &store_dir);
    let docs = mock_all_filings(&server);

    let first = scrape(&client, "2023-03-01", "2023-12-31").await;
    let stored_once = FilingStore::new(&store_dir).load("EXM").unwrap().unwrap();

    let second = scrape(&client, "2023-03-01", "2023-12-31").await;
    let stored_twice = FilingStore::new(&store_dir).load("EXM").unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(stored_once, stored_twice);
    assert_eq!(stored_twice.accessions().len(), 4);

    let store = FilingStore::new(&store_dir);
    assert!(store.contains("EXM", &plain(4)).unwrap());
    assert!(!store.contains("EXM", &plain(5)).unwrap());
    assert!(!store.contains("OTHER", &plain(1)).unwrap());
    // Filings 1..=4 were each fetched once, filing 5 never.
    for (i, m) in docs.iter().enumerate() {
        m.assert_hits(if i < 8 { 1 } else { 0 });
    }

    let _ = std::fs::remove_dir_all(&store_dir);
}

#[tokio::test]
async fn adjacent_scrapes_match_one_wide_scrape() {
    let (server, split_dir) = setup("split");
    let client = client_for(&server, &split_dir);
    let docs = mock_all_filings(&server);

    let early = scrape(&client, "2023-03-01", "2023-06-30").await;
    assert_eq!(early.accessions(), vec![plain(3), plain(4)]);

    let late = scrape(&client, "2023-06-01", "2023-12-31").await;
    assert_eq!(late.accessions(), vec![plain(1), plain(2), plain(3)]);
    // Filing 3 was known from the first scrape.
    docs[4].assert_hits(1);
    docs[5].assert_hits(1);

    let wide_dir = temp_store("wide");
    let wide_client = client_for(&server, &wide_dir);
    scrape(&wide_client, "2023-03-01", "2023-12-31").await;

    let incremental = FilingStore::new(&split_dir).load("EXM").unwrap().unwrap();
    let direct = FilingStore::new(&wide_dir).load("EXM").unwrap().unwrap();
    assert_eq!(incremental, direct);

    let _ = std::fs::remove_dir_all(&split_dir);
    let _ = std::fs::remove_dir_all(&wide_dir);
}

#[tokio::test]
async fn filing_without_transactions_is_remembered() {
    let server = MockServer::start();
    let store_dir = temp_store("empty-filing");
    let client = client_for(&server, &store_dir);

    server.mock(|when, then| {
        when.method(GET).path(SEARCH_PATH);
        then.status(200).body(search_feed(&[(7, d("2023-05-02"))]));
    });
    let (_, doc) = mock_filing(&server, 7, form4("2023-04-28", None, &[]));

    let table = FilingsBuilder::new(&client, "EXM")
        .between(d("2023-01-01"), d("2023-12-31"))
        .fetch()
        .await
        .unwrap();
    FilingsBuilder::new(&client, "EXM")
        .between(d("2023-01-01"), d("2023-12-31"))
        .fetch()
        .await
        .unwrap();

    doc.assert_hits(1);
    assert_eq!(table.len(), 1);
    assert!(table.rows[0].is_placeholder());
    assert_eq!(table.rows[0].report_period, d("2023-04-28"));
    assert!(FilingStore::new(&store_dir).contains("EXM", &plain(7)).unwrap());

    let _ = std::fs::remove_dir_all(&store_dir);
}
