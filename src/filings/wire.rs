//! Parsers for the three documents involved in a scrape: the search page (atom feed),
//! the accession directory listing (HTML) and the ownership document (XML).
//!
//! The two XML payloads are read with a namespace-aware XML parser and matched on local
//! element names; the directory listing is HTML and goes through `scraper`.

use chrono::NaiveDate;
use roxmltree::{Document, Node};
use scraper::{Html, Selector};

use crate::core::InsiderError;
use crate::filings::model::{Filing, FilingRef, OwnershipNature, ReportingOwner, Transaction};

pub(crate) struct SearchPage {
    pub cik: Option<String>,
    pub entries: Vec<FilingRef>,
}

fn parse_xml<'i>(what: &str, body: &'i str) -> Result<Document<'i>, InsiderError> {
    Document::parse(body).map_err(|e| InsiderError::Data(format!("malformed {what}: {e}")))
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|c| c.is_element() && c.tag_name().name() == name)
}

fn children<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

fn descendant<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.descendants()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// Walks a chain of child elements.
fn at<'a, 'i>(node: Node<'a, 'i>, path: &[&str]) -> Option<Node<'a, 'i>> {
    path.iter().try_fold(node, |n, name| child(n, name))
}

/// The element's own character data; nested elements do not contribute.
fn own_text(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn text_at(node: Node<'_, '_>, path: &[&str]) -> Option<String> {
    at(node, path).and_then(own_text)
}

/// Parses the leading `YYYY-MM-DD` of a date or datetime string.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let head = s.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().replace(',', "").parse::<f64>().ok()
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true")
}

pub(crate) fn parse_search_page(body: &str) -> Result<SearchPage, InsiderError> {
    let doc = parse_xml("search page", body)?;
    let root = doc.root_element();

    let cik = text_at(root, &["company-info", "cik"])
        .or_else(|| descendant(root, "cik").and_then(own_text));

    let mut entries = Vec::new();
    for entry in children(root, "entry") {
        let content = child(entry, "content").unwrap_or(entry);
        let accession = text_at(content, &["accession-number"])
            .ok_or_else(|| InsiderError::Data("search entry without accession-number".into()))?;
        let filing_date = text_at(content, &["filing-date"])
            .as_deref()
            .and_then(parse_date)
            .ok_or_else(|| {
                InsiderError::Data(format!("search entry {accession} without filing-date"))
            })?;
        entries.push(FilingRef {
            accession: accession.replace('-', ""),
            filing_date,
        });
    }

    Ok(SearchPage { cik, entries })
}

/// File name of the first XML document linked from an accession directory listing.
pub(crate) fn find_document_name(body: &str) -> Result<Option<String>, InsiderError> {
    let doc = Html::parse_document(body);
    let sel_link = Selector::parse("table a[href]")
        .map_err(|e| InsiderError::Data(format!("bad selector: {e}")))?;

    Ok(doc
        .select(&sel_link)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.to_ascii_lowercase().ends_with(".xml"))
        .and_then(|href| href.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string))
}

fn parse_owner(doc: Node<'_, '_>) -> Option<ReportingOwner> {
    let owner = child(doc, "reportingOwner")?;
    let name = text_at(owner, &["reportingOwnerId", "rptOwnerName"])?;
    let relationship = child(owner, "reportingOwnerRelationship");
    let text = |field: &str| relationship.and_then(|r| text_at(r, &[field]));
    let flag = |field: &str| text(field).is_some_and(|v| parse_flag(&v));

    Some(ReportingOwner {
        name,
        is_director: flag("isDirector"),
        is_officer: flag("isOfficer"),
        is_ten_percent_owner: flag("isTenPercentOwner"),
        officer_title: text("officerTitle"),
    })
}

/// Text of the `<value>` element below `path`.
fn value_at(node: Node<'_, '_>, path: &[&str]) -> Option<String> {
    at(node, path).and_then(|n| text_at(n, &["value"]))
}

fn parse_transaction(tx: Node<'_, '_>) -> Transaction {
    let disposed = value_at(tx, &["transactionAmounts", "transactionAcquiredDisposedCode"])
        .is_some_and(|s| s.eq_ignore_ascii_case("D"));
    let shares = value_at(tx, &["transactionAmounts", "transactionShares"])
        .as_deref()
        .and_then(parse_number)
        .map(|q| if disposed { -q.abs() } else { q.abs() });

    Transaction {
        date: value_at(tx, &["transactionDate"]).as_deref().and_then(parse_date),
        security: value_at(tx, &["securityTitle"]),
        code: text_at(tx, &["transactionCoding", "transactionCode"]),
        shares,
        price: value_at(tx, &["transactionAmounts", "transactionPricePerShare"])
            .as_deref()
            .and_then(parse_number),
        post_transaction_shares: value_at(tx, &[
            "postTransactionAmounts",
            "sharesOwnedFollowingTransaction",
        ])
        .as_deref()
        .and_then(parse_number),
        ownership_nature: value_at(tx, &["ownershipNature", "directOrIndirectOwnership"])
            .as_deref()
            .and_then(OwnershipNature::parse),
    }
}

/// Parses an ownership document. Only `periodOfReport` is mandatory; any other missing
/// or empty field is recorded as a neutral value.
pub(crate) fn parse_ownership_document(
    accession: &str,
    body: &str,
) -> Result<Filing, InsiderError> {
    let doc = parse_xml("ownership document", body)?;
    let root = doc.root_element();

    let report_period = text_at(root, &["periodOfReport"])
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| {
            InsiderError::Data(format!("filing {accession} has no valid periodOfReport"))
        })?;

    let transactions = child(root, "nonDerivativeTable")
        .map(|table| {
            children(table, "nonDerivativeTransaction")
                .map(parse_transaction)
                .collect()
        })
        .unwrap_or_default();

    Ok(Filing {
        accession: accession.to_string(),
        report_period,
        owner: parse_owner(root),
        transactions,
    })
}
