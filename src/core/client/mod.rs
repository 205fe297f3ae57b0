//! Public client surface + builder.
//! Internals are split into `retry` (policy + send loop) and `constants` (UA + defaults).

mod constants;
pub mod retry;

pub use retry::{Backoff, CacheMode, RetryConfig};

use crate::core::calendar::HolidayCalendar;
use crate::core::InsiderError;
use constants::{
    DEFAULT_BASE_ARCHIVE, DEFAULT_BASE_CHART, DEFAULT_BASE_SEARCH, DEFAULT_REQUEST_INTERVAL_MS,
    DEFAULT_STORE_DIR, USER_AGENT,
};
pub(crate) use constants::SEARCH_PAGE_SIZE;
use reqwest::Client;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use url::Url;

#[derive(Debug)]
struct CacheEntry {
    body: String,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheStore {
    map: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

/// Shared handle to the filing search/archive endpoints and the price-history endpoint.
///
/// Cloning is cheap; clones share the HTTP connection pool, the response cache and the
/// request pacing state.
#[derive(Debug, Clone)]
pub struct InsiderClient {
    http: Client,
    base_search: Url,
    base_archive: Url,
    base_chart: Url,

    retry: RetryConfig,
    request_interval: Duration,
    last_filing_request: Arc<Mutex<Option<Instant>>>,

    store_dir: PathBuf,
    calendar: HolidayCalendar,

    cache: Option<Arc<CacheStore>>,
}

impl Default for InsiderClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl InsiderClient {
    /// Create a new builder.
    pub fn builder() -> InsiderClientBuilder {
        InsiderClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn base_search(&self) -> &Url {
        &self.base_search
    }
    pub(crate) fn base_archive(&self) -> &Url {
        &self.base_archive
    }
    pub(crate) fn base_chart(&self) -> &Url {
        &self.base_chart
    }

    /// Directory holding the persisted filing tables.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Calendar used to discard transactions dated on non-trading days.
    pub fn calendar(&self) -> HolidayCalendar {
        self.calendar
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Waits until the configured spacing since the previous filing request has elapsed.
    pub(crate) async fn pace(&self) {
        if self.request_interval.is_zero() {
            return;
        }
        let mut last = self.last_filing_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.request_interval {
                tokio::time::sleep(self.request_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    pub(crate) async fn cache_get(&self, url: &Url) -> Option<String> {
        let store = self.cache.as_ref()?;
        let key = url.as_str().to_string();
        let guard = store.map.read().await;
        if let Some(entry) = guard.get(&key)
            && Instant::now() <= entry.expires_at
        {
            return Some(entry.body.clone());
        }
        None
    }

    pub(crate) async fn cache_put(&self, url: &Url, body: &str, ttl_override: Option<Duration>) {
        let store = match &self.cache {
            Some(s) => s.clone(),
            None => return,
        };
        let key = url.as_str().to_string();
        let ttl = ttl_override.unwrap_or(store.default_ttl);
        let entry = CacheEntry {
            body: body.to_string(),
            expires_at: Instant::now() + ttl,
        };
        let mut guard = store.map.write().await;
        guard.insert(key, entry);
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct InsiderClientBuilder {
    user_agent: Option<String>,
    base_search: Option<Url>,
    base_archive: Option<Url>,
    base_chart: Option<Url>,

    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryConfig>,
    request_interval: Option<Duration>,
    cache_ttl: Option<Duration>,
    store_dir: Option<PathBuf>,
    calendar: Option<HolidayCalendar>,
}

impl InsiderClientBuilder {
    /// Override the User-Agent. EDGAR expects a contact address in it.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the filing search endpoint (e.g., `https://www.sec.gov/cgi-bin/browse-edgar`).
    pub fn base_search(mut self, url: Url) -> Self {
        self.base_search = Some(url);
        self
    }

    /// Override the filing archive root (e.g., `https://www.sec.gov/Archives/edgar/data/`).
    pub fn base_archive(mut self, url: Url) -> Self {
        self.base_archive = Some(url);
        self
    }

    /// Override the chart API base (e.g., `https://query1.finance.yahoo.com/v8/finance/chart/`).
    pub fn base_chart(mut self, url: Url) -> Self {
        self.base_chart = Some(url);
        self
    }

    /// Set a global request timeout (overall). Default: none.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Set the retry policy. Default: retries disabled.
    pub fn retry_config(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    /// Minimum spacing between two filing requests. Default: 100ms. `Duration::ZERO` disables pacing.
    pub fn request_interval(mut self, dur: Duration) -> Self {
        self.request_interval = Some(dur);
        self
    }

    /// Enable in-memory caching of price-history responses with a default TTL.
    /// If not set, caching is disabled.
    pub fn cache_ttl(mut self, dur: Duration) -> Self {
        self.cache_ttl = Some(dur);
        self
    }

    /// Directory for the persisted per-ticker filing tables. Default: `saved_transactions`.
    pub fn store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    /// Holiday calendar for trading-day checks. Default: [`HolidayCalendar::Nyse`].
    pub fn calendar(mut self, calendar: HolidayCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn build(self) -> Result<InsiderClient, InsiderError> {
        let base_search = match self.base_search {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_SEARCH)?,
        };
        let base_archive = match self.base_archive {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_ARCHIVE)?,
        };
        let base_chart = match self.base_chart {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_CHART)?,
        };

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .cookie_store(true);

        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        Ok(InsiderClient {
            http,
            base_search,
            base_archive,
            base_chart,
            retry: self.retry.unwrap_or_default(),
            request_interval: self
                .request_interval
                .unwrap_or(Duration::from_millis(DEFAULT_REQUEST_INTERVAL_MS)),
            last_filing_request: Arc::new(Mutex::new(None)),
            store_dir: self
                .store_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR)),
            calendar: self.calendar.unwrap_or_default(),
            cache: self.cache_ttl.map(|ttl| {
                Arc::new(CacheStore {
                    map: RwLock::new(HashMap::new()),
                    default_ttl: ttl,
                })
            }),
        })
    }
}
