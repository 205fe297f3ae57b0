#[cfg(feature = "test-mode")]
use std::env;

use crate::core::InsiderError;

/// Read the response body as text.
/// In `test-mode`, if `INSIDER_RECORD=1`, the body is saved as a fixture via `core::fixtures`.
pub(crate) async fn get_text(
    resp: reqwest::Response,
    _endpoint: &str,
    _key: &str,
    _ext: &str,
) -> Result<String, reqwest::Error> {
    let text = resp.text().await?;

    #[cfg(feature = "test-mode")]
    {
        if env::var("INSIDER_RECORD").ok().as_deref() == Some("1")
            && let Err(e) = crate::core::fixtures::record_fixture(_endpoint, _key, _ext, &text)
        {
            eprintln!("INSIDER_RECORD: failed to write fixture for {_key}: {e}");
        }
    }

    Ok(text)
}

/// Fails with [`InsiderError::Status`] unless the response is a 2xx.
pub(crate) fn ensure_success(resp: &reqwest::Response) -> Result<(), InsiderError> {
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(InsiderError::Status {
            status: resp.status().as_u16(),
            url: resp.url().to_string(),
        })
    }
}
