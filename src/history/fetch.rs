use crate::core::client::{CacheMode, RetryConfig};
use crate::core::{InsiderClient, InsiderError};
use crate::history::wire::{ChartEnvelope, Events, MetaNode, QuoteBlock};

pub(crate) struct Fetched {
    pub ts: Vec<i64>,
    pub quote: QuoteBlock,
    pub events: Option<Events>,
    pub meta: Option<MetaNode>,
}

pub(crate) async fn fetch_chart(
    client: &InsiderClient,
    symbol: &str,
    period: (i64, i64),
    cache_mode: CacheMode,
    retry_override: Option<&RetryConfig>,
) -> Result<Fetched, InsiderError> {
    let (p1, p2) = period;
    if p1 >= p2 {
        return Err(InsiderError::InvalidDates);
    }

    let mut url = client.base_chart().join(symbol)?;
    url.query_pairs_mut()
        .append_pair("period1", &p1.to_string())
        .append_pair("period2", &p2.to_string())
        .append_pair("interval", "1d")
        .append_pair("events", "div|split")
        .append_pair("includePrePost", "false");

    if cache_mode == CacheMode::Use
        && let Some(body) = client.cache_get(&url).await
    {
        return decode_chart(&body);
    }

    let resp = client
        .send_with_retry(client.http().get(url.clone()), retry_override)
        .await?;
    crate::core::net::ensure_success(&resp)?;

    let body = crate::core::net::get_text(resp, "history_chart", symbol, "json").await?;

    if cache_mode != CacheMode::Bypass {
        client.cache_put(&url, &body, None).await;
    }

    decode_chart(&body)
}

fn decode_chart(body: &str) -> Result<Fetched, InsiderError> {
    let parsed: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| InsiderError::Data(format!("json parse error: {e}")))?;

    let chart = parsed
        .chart
        .ok_or_else(|| InsiderError::Data("missing chart".into()))?;

    if let Some(err) = chart.error {
        return Err(InsiderError::Data(format!(
            "chart error: {} - {}",
            err.code, err.description
        )));
    }

    let mut results = chart
        .result
        .ok_or_else(|| InsiderError::Data("missing result".into()))?;

    let r0 = results
        .pop()
        .ok_or_else(|| InsiderError::Data("empty result".into()))?;

    let ts = r0.timestamp.unwrap_or_default();
    let quote = r0
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| InsiderError::Data("missing quote".into()))?;

    Ok(Fetched {
        ts,
        quote,
        events: r0.events,
        meta: r0.meta,
    })
}
