use std::time::Duration;

use reqwest::{RequestBuilder, Response};

use crate::core::InsiderError;

/// Specifies the backoff strategy for retrying failed requests.
#[derive(Clone, Debug)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed(Duration),
    /// Uses an exponential delay between retries.
    /// The delay is calculated as `base * (factor ^ attempt)`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries.
        max: Duration,
    },
}

impl Backoff {
    fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(d) => *d,
            Backoff::Exponential { base, factor, max } => {
                let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
                let scaled = base.as_secs_f64() * factor.powi(exp);
                Duration::from_secs_f64(scaled.min(max.as_secs_f64()))
            }
        }
    }
}

/// Configuration for the automatic retry mechanism.
///
/// Retries are opt-in: with the default configuration a transport failure or
/// a non-success status is returned to the caller on the first attempt.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Enables or disables the retry mechanism.
    pub enabled: bool,
    /// The maximum number of retries to attempt. The total number of attempts will be `max_retries + 1`.
    pub max_retries: u32,
    /// The backoff strategy to use between retries.
    pub backoff: Backoff,
    /// A list of HTTP status codes that should trigger a retry.
    pub retry_on_status: Vec<u16>,
    /// Whether to retry on request timeouts.
    pub retry_on_timeout: bool,
    /// Whether to retry on connection errors.
    pub retry_on_connect: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_retries: 4,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(200),
                factor: 2.0,
                max: Duration::from_secs(3),
            },
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }
}

/// Defines the behavior of the in-memory cache for an API call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present; otherwise, fetch from the network
    /// and write the response to the cache. (Default)
    Use,
    /// Always fetch from the network, bypassing any cached entry, and write the new response to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

impl super::InsiderClient {
    /// Sends a request, retrying according to `override_cfg` or the client's policy.
    ///
    /// The last response is returned as-is (including non-success statuses) once
    /// the retry budget is exhausted; callers map the status themselves.
    pub(crate) async fn send_with_retry(
        &self,
        req: RequestBuilder,
        override_cfg: Option<&RetryConfig>,
    ) -> Result<Response, InsiderError> {
        let cfg = override_cfg.unwrap_or(&self.retry);
        let mut attempt = 0u32;

        loop {
            let this_try = req
                .try_clone()
                .ok_or_else(|| InsiderError::Data("request body is not cloneable".into()))?;

            match this_try.send().await {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if cfg.enabled
                        && attempt < cfg.max_retries
                        && cfg.retry_on_status.contains(&status)
                    {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(status, attempt, url = %resp.url(), "retrying after status");
                        tokio::time::sleep(cfg.backoff.delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(e) => {
                    let retryable = (e.is_timeout() && cfg.retry_on_timeout)
                        || (e.is_connect() && cfg.retry_on_connect);
                    if cfg.enabled && retryable && attempt < cfg.max_retries {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(error = %e, attempt, "retrying after transport error");
                        tokio::time::sleep(cfg.backoff.delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}
