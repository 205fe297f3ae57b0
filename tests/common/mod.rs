#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use httpmock::{Method::GET, Mock, MockServer};
use insider_rs::filings::OwnershipNature;
use insider_rs::{FilingRecord, InsiderClient, PriceBar, PriceHistory, SplitEvent, TransactionTable};
use url::Url;

pub const SEARCH_PATH: &str = "/cgi-bin/browse-edgar";
pub const ARCHIVE_PATH: &str = "/Archives/edgar/data/";
pub const CHART_PATH: &str = "/v8/finance/chart/";
pub const CIK: &str = "0000320193";

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// A fresh, not yet existing directory under the system temp dir.
pub fn temp_store(tag: &str) -> PathBuf {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let n = SEQ.fetch_add(1, Ordering::SeqCst);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "insider-rs-{tag}-{}-{n}-{nanos}",
        std::process::id()
    ))
}

pub fn client_for(server: &MockServer, store: &PathBuf) -> InsiderClient {
    InsiderClient::builder()
        .base_search(Url::parse(&format!("{}{SEARCH_PATH}", server.base_url())).unwrap())
        .base_archive(Url::parse(&format!("{}{ARCHIVE_PATH}", server.base_url())).unwrap())
        .base_chart(Url::parse(&format!("{}{CHART_PATH}", server.base_url())).unwrap())
        .request_interval(Duration::ZERO)
        .store_dir(store.clone())
        .build()
        .unwrap()
}

/* ---------------- EDGAR payloads ---------------- */

/// Accession number in the dashed form used by EDGAR feeds.
pub fn dashed(n: usize) -> String {
    format!("0001234567-23-{n:06}")
}

pub fn plain(n: usize) -> String {
    dashed(n).replace('-', "")
}

/// Atom search feed listing `(accession number, filing date)` pairs, newest first.
pub fn search_feed(entries: &[(usize, NaiveDate)]) -> String {
    let mut body = format!(
        r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
<company-info>
<cik>{CIK}</cik>
<conformed-name>Example Corp</conformed-name>
</company-info>
<title>Example Corp (0000320193)</title>
"#
    );
    for (n, date) in entries {
        body.push_str(&format!(
            r#"<entry>
<category label="form type" scheme="https://www.sec.gov/" term="4" />
<content type="text/xml">
<accession-number>{acc}</accession-number>
<filing-date>{date}</filing-date>
<filing-type>4</filing-type>
</content>
<title>4  - Statement of changes in beneficial ownership of securities</title>
<updated>{date}T16:05:12-04:00</updated>
</entry>
"#,
            acc = dashed(*n),
        ));
    }
    body.push_str("</feed>\n");
    body
}

pub fn empty_feed() -> String {
    r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
<title>EDGAR Search Results</title>
</feed>
"#
    .to_string()
}

pub fn directory_listing(doc: &str) -> String {
    format!(
        r#"<html><body>
<table summary="heading"><tr><td>Directory Listing</td></tr></table>
<table>
<tr><th>Name</th><th>Size</th></tr>
<tr><td><a href="/Archives/edgar/data/320193/000123456723000001/0001234567-23-000001-index.htm">index</a></td><td></td></tr>
<tr><td><a href="/Archives/edgar/data/320193/000123456723000001/{doc}">{doc}</a></td><td>4 KB</td></tr>
<tr><td><a href="/Archives/edgar/data/320193/000123456723000001/xslF345X05/{doc}">{doc}</a></td><td>8 KB</td></tr>
</table>
</body></html>"#
    )
}

pub struct Owner<'a> {
    pub name: &'a str,
    pub director: bool,
    pub officer: bool,
    pub title: Option<&'a str>,
}

pub struct Trade<'a> {
    pub date: &'a str,
    pub code: &'a str,
    pub shares: f64,
    /// `A` or `D`.
    pub side: &'a str,
    pub price: Option<f64>,
    pub post: f64,
}

pub fn form4(period: &str, owner: Option<&Owner<'_>>, trades: &[Trade<'_>]) -> String {
    let mut body = format!(
        r#"<?xml version="1.0"?>
<ownershipDocument>
<schemaVersion>X0508</schemaVersion>
<documentType>4</documentType>
<periodOfReport>{period}</periodOfReport>
<issuer><issuerCik>{CIK}</issuerCik><issuerTradingSymbol>EXM</issuerTradingSymbol></issuer>
"#
    );
    if let Some(o) = owner {
        let flag = |b: bool| if b { "1" } else { "0" };
        body.push_str(&format!(
            r#"<reportingOwner>
<reportingOwnerId><rptOwnerCik>0001111111</rptOwnerCik><rptOwnerName>{name}</rptOwnerName></reportingOwnerId>
<reportingOwnerRelationship>
<isDirector>{dir}</isDirector>
<isOfficer>{off}</isOfficer>
{title}
</reportingOwnerRelationship>
</reportingOwner>
"#,
            name = o.name,
            dir = flag(o.director),
            off = flag(o.officer),
            title = o
                .title
                .map(|t| format!("<officerTitle>{t}</officerTitle>"))
                .unwrap_or_default(),
        ));
    }
    body.push_str("<nonDerivativeTable>\n");
    for t in trades {
        let price = match t.price {
            Some(p) => format!("<value>{p}</value>"),
            None => r#"<footnoteId id="F1"/>"#.to_string(),
        };
        body.push_str(&format!(
            r#"<nonDerivativeTransaction>
<securityTitle><value>Common Stock</value></securityTitle>
<transactionDate><value>{date}</value></transactionDate>
<transactionCoding><transactionFormType>4</transactionFormType><transactionCode>{code}</transactionCode><equitySwapInvolved>0</equitySwapInvolved></transactionCoding>
<transactionAmounts>
<transactionShares><value>{shares}</value></transactionShares>
<transactionPricePerShare>{price}</transactionPricePerShare>
<transactionAcquiredDisposedCode><value>{side}</value></transactionAcquiredDisposedCode>
</transactionAmounts>
<postTransactionAmounts><sharesOwnedFollowingTransaction><value>{post}</value></sharesOwnedFollowingTransaction></postTransactionAmounts>
<ownershipNature><directOrIndirectOwnership><value>D</value></directOrIndirectOwnership></ownershipNature>
</nonDerivativeTransaction>
"#,
            date = t.date,
            code = t.code,
            shares = t.shares,
            side = t.side,
            post = t.post,
        ));
    }
    body.push_str("</nonDerivativeTable>\n</ownershipDocument>\n");
    body
}

pub fn mock_search_page<'a>(server: &'a MockServer, ticker: &str, start: usize, body: String) -> Mock<'a> {
    let ticker = ticker.to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path(SEARCH_PATH)
            .query_param("action", "getcompany")
            .query_param("CIK", ticker.as_str())
            .query_param("type", "4")
            .query_param("owner", "only")
            .query_param("count", "100")
            .query_param("output", "atom")
            .query_param("start", start.to_string());
        then.status(200)
            .header("content-type", "application/atom+xml")
            .body(body);
    })
}

/// Mocks the directory listing and the XML document of filing `n`.
pub fn mock_filing<'a>(server: &'a MockServer, n: usize, document: String) -> (Mock<'a>, Mock<'a>) {
    let dir = format!("{ARCHIVE_PATH}320193/{}/", plain(n));
    let doc_name = format!("form4_{n}.xml");
    let listing = directory_listing(&doc_name);
    let dir_path = dir.clone();
    let index = server.mock(move |when, then| {
        when.method(GET).path(dir_path.as_str());
        then.status(200)
            .header("content-type", "text/html")
            .body(listing);
    });
    let doc_path = format!("{dir}{doc_name}");
    let doc = server.mock(move |when, then| {
        when.method(GET).path(doc_path.as_str());
        then.status(200)
            .header("content-type", "application/xml")
            .body(document);
    });
    (index, doc)
}

/// A filing with one open-market purchase by a generic insider.
pub fn simple_form4(period: &str) -> String {
    form4(
        period,
        Some(&Owner {
            name: "Doe Jane",
            director: true,
            officer: false,
            title: None,
        }),
        &[Trade {
            date: period,
            code: "P",
            shares: 100.0,
            side: "A",
            price: Some(10.0),
            post: 1_100.0,
        }],
    )
}

/* ---------------- chart payloads ---------------- */

pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Weekday bars from `start` to `end` inclusive, closing at `close(date)` with a
/// one-dollar range around it.
pub fn weekday_bars(start: NaiveDate, end: NaiveDate, close: impl Fn(NaiveDate) -> f64) -> Vec<Bar> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !insider_rs::core::calendar::is_weekend(*d))
        .map(|date| {
            let c = close(date);
            Bar {
                date,
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
            }
        })
        .collect()
}

fn open_ts(date: NaiveDate) -> i64 {
    // 09:30 New York during EST is 14:30 UTC; both land on the same local date.
    date.and_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap())
        .and_utc()
        .timestamp()
}

pub fn chart_json(bars: &[Bar], splits: &[(NaiveDate, u32, u32)]) -> String {
    let ts: Vec<i64> = bars.iter().map(|b| open_ts(b.date)).collect();
    let col = |f: fn(&Bar) -> f64| bars.iter().map(f).collect::<Vec<_>>();
    let split_map: serde_json::Map<String, serde_json::Value> = splits
        .iter()
        .map(|(date, n, dd)| {
            let t = open_ts(*date);
            (
                t.to_string(),
                serde_json::json!({
                    "date": t,
                    "numerator": n,
                    "denominator": dd,
                    "splitRatio": format!("{n}:{dd}"),
                }),
            )
        })
        .collect();

    serde_json::json!({
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "exchangeTimezoneName": "America/New_York",
                    "gmtoffset": -18000
                },
                "timestamp": ts,
                "events": { "splits": split_map },
                "indicators": {
                    "quote": [{
                        "open": col(|b| b.open),
                        "high": col(|b| b.high),
                        "low": col(|b| b.low),
                        "close": col(|b| b.close),
                        "volume": bars.iter().map(|_| 1_000_000u64).collect::<Vec<_>>(),
                    }]
                }
            }],
            "error": null
        }
    })
    .to_string()
}

pub fn price_history(symbol: &str, bars: &[Bar], splits: &[(NaiveDate, u32, u32)]) -> PriceHistory {
    PriceHistory {
        symbol: symbol.to_string(),
        bars: bars
            .iter()
            .map(|b| PriceBar {
                date: b.date,
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
                volume: Some(1_000_000),
            })
            .collect(),
        splits: splits
            .iter()
            .map(|(date, numerator, denominator)| SplitEvent {
                date: *date,
                numerator: *numerator,
                denominator: *denominator,
            })
            .collect(),
        timezone: Some("America/New_York".into()),
    }
}

/// A transaction row as the scraper would have stored it.
pub fn record(
    accession: usize,
    date: &str,
    name: &str,
    code: &str,
    shares: f64,
    price: Option<f64>,
    post: f64,
) -> FilingRecord {
    FilingRecord {
        accession: plain(accession),
        report_period: d(date),
        transaction_date: Some(d(date)),
        name: Some(name.to_string()),
        is_director: Some(false),
        is_officer: Some(true),
        is_ten_percent_owner: Some(false),
        officer_title: Some("CEO".into()),
        security: Some("Common Stock".into()),
        code: Some(code.to_string()),
        shares: Some(shares),
        price,
        post_transaction_shares: Some(post),
        ownership_nature: Some(OwnershipNature::Direct),
    }
}

/// Sorts like the store does: report period, most recent first.
pub fn table(ticker: &str, mut rows: Vec<FilingRecord>) -> TransactionTable {
    rows.sort_by(|a, b| b.report_period.cmp(&a.report_period));
    TransactionTable {
        ticker: ticker.to_string(),
        rows,
    }
}

pub fn mock_chart<'a>(server: &'a MockServer, symbol: &str, body: String) -> Mock<'a> {
    let path = format!("{CHART_PATH}{symbol}");
    server.mock(move |when, then| {
        when.method(GET).path(path.as_str());
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}
