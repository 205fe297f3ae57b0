use crate::core::client::RetryConfig;
use crate::core::{InsiderClient, InsiderError};
use crate::filings::model::Filing;
use crate::filings::wire::{find_document_name, parse_ownership_document};

/// Resolves an accession's directory listing to its XML document and parses it.
pub(crate) async fn extract_filing(
    client: &InsiderClient,
    cik: &str,
    accession: &str,
    retry_override: Option<&RetryConfig>,
) -> Result<Filing, InsiderError> {
    let cik = match cik.trim_start_matches('0') {
        "" => cik,
        trimmed => trimmed,
    };
    let dir = client
        .base_archive()
        .join(&format!("{cik}/{accession}/"))?;

    client.pace().await;
    let resp = client
        .send_with_retry(client.http().get(dir.clone()), retry_override)
        .await?;
    crate::core::net::ensure_success(&resp)?;
    let listing = crate::core::net::get_text(resp, "filing_index", accession, "html").await?;

    let name = find_document_name(&listing)?.ok_or_else(|| {
        InsiderError::Data(format!("no XML document listed for filing {accession}"))
    })?;
    let doc_url = dir.join(&name)?;

    client.pace().await;
    let resp = client
        .send_with_retry(client.http().get(doc_url), retry_override)
        .await?;
    crate::core::net::ensure_success(&resp)?;
    let body = crate::core::net::get_text(resp, "filing_document", accession, "xml").await?;

    parse_ownership_document(accession, &body)
}
