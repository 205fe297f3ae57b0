use chrono::NaiveDate;
use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum InsiderError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Reading or replacing a persisted filing table failed.
    #[error("filing store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The data received was in an unexpected format or was missing a required field.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// An invalid date range was provided (start must be before end).
    #[error("invalid date range: start must be before end")]
    InvalidDates,

    /// Builder or filter parameters were incomplete or out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The ticker has no insider filings at all (unknown ticker or no history).
    #[error("no filings found for {ticker}: either the ticker does not exist or it has no filings")]
    NotFound {
        /// The upper-cased ticker that was searched.
        ticker: String,
    },

    /// Filings exist, but none fall inside the requested window.
    #[error("no filings for {ticker} in the requested range; last filing found on {latest}, try extending the search range")]
    RangeNotFound {
        /// The upper-cased ticker that was searched.
        ticker: String,
        /// The most recent filing date that was discovered.
        latest: NaiveDate,
    },

    /// The ticker and range are valid but no transaction survived the mandatory filters.
    #[error("no qualifying transactions: {0}")]
    EmptyResult(String),
}
