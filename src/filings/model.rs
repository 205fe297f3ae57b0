use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry of a filing search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRef {
    /// Accession number with dashes stripped (e.g. `000032019323000001`).
    pub accession: String,
    pub filing_date: NaiveDate,
}

/// Direct or indirect beneficial ownership of the reported shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnershipNature {
    #[serde(rename = "D")]
    Direct,
    #[serde(rename = "I")]
    Indirect,
}

impl OwnershipNature {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "D" => Some(OwnershipNature::Direct),
            "I" => Some(OwnershipNature::Indirect),
            _ => None,
        }
    }
}

/// The reporting insider of a filing and their relationship to the issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingOwner {
    pub name: String,
    pub is_director: bool,
    pub is_officer: bool,
    pub is_ten_percent_owner: bool,
    pub officer_title: Option<String>,
}

/// One non-derivative transaction reported in a filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    pub security: Option<String>,
    /// Raw transaction code (`P` open-market purchase, `S` sale, `A` grant, ...).
    pub code: Option<String>,
    /// Signed share quantity; disposals are negative.
    pub shares: Option<f64>,
    /// Per-share price; `None` when the filing omits it or only references a footnote.
    pub price: Option<f64>,
    pub post_transaction_shares: Option<f64>,
    pub ownership_nature: Option<OwnershipNature>,
}

/// A parsed ownership-change filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filing {
    pub accession: String,
    pub report_period: NaiveDate,
    pub owner: Option<ReportingOwner>,
    pub transactions: Vec<Transaction>,
}

impl Filing {
    /// Flattens the filing into table rows.
    ///
    /// A filing without transactions still yields one placeholder row so its
    /// accession is remembered by the store.
    pub fn into_rows(self) -> Vec<FilingRecord> {
        if self.transactions.is_empty() {
            return vec![FilingRecord::placeholder(self.accession, self.report_period)];
        }
        let owner = self.owner;
        self.transactions
            .into_iter()
            .map(|t| FilingRecord {
                accession: self.accession.clone(),
                report_period: self.report_period,
                transaction_date: t.date,
                name: owner.as_ref().map(|o| o.name.clone()),
                is_director: owner.as_ref().map(|o| o.is_director),
                is_officer: owner.as_ref().map(|o| o.is_officer),
                is_ten_percent_owner: owner.as_ref().map(|o| o.is_ten_percent_owner),
                officer_title: owner.as_ref().and_then(|o| o.officer_title.clone()),
                security: t.security,
                code: t.code,
                shares: t.shares,
                price: t.price,
                post_transaction_shares: t.post_transaction_shares,
                ownership_nature: t.ownership_nature,
            })
            .collect()
    }
}

/// One row of the persisted filing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub accession: String,
    pub report_period: NaiveDate,
    pub transaction_date: Option<NaiveDate>,
    pub name: Option<String>,
    pub is_director: Option<bool>,
    pub is_officer: Option<bool>,
    pub is_ten_percent_owner: Option<bool>,
    pub officer_title: Option<String>,
    pub security: Option<String>,
    pub code: Option<String>,
    pub shares: Option<f64>,
    pub price: Option<f64>,
    pub post_transaction_shares: Option<f64>,
    pub ownership_nature: Option<OwnershipNature>,
}

impl FilingRecord {
    pub fn placeholder(accession: String, report_period: NaiveDate) -> Self {
        Self {
            accession,
            report_period,
            transaction_date: None,
            name: None,
            is_director: None,
            is_officer: None,
            is_ten_percent_owner: None,
            officer_title: None,
            security: None,
            code: None,
            shares: None,
            price: None,
            post_transaction_shares: None,
            ownership_nature: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.transaction_date.is_none() && self.code.is_none() && self.shares.is_none()
    }
}

/// Filing rows for one ticker, ordered by report period, most recent first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionTable {
    pub ticker: String,
    pub rows: Vec<FilingRecord>,
}

impl TransactionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilingRecord> {
        self.rows.iter()
    }

    /// Distinct accession ids in row order.
    pub fn accessions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.accession.as_str()))
            .map(|r| r.accession.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a TransactionTable {
    type Item = &'a FilingRecord;
    type IntoIter = std::slice::Iter<'a, FilingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
