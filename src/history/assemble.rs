use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::PriceBar;
use crate::history::wire::{MetaNode, QuoteBlock};

/// Calendar used to turn bar timestamps into trading dates.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BarZone {
    Named(Tz),
    Offset(FixedOffset),
    Utc,
}

impl BarZone {
    pub(crate) fn from_meta(meta: Option<&MetaNode>) -> Self {
        let Some(m) = meta else {
            return BarZone::Utc;
        };
        if let Some(tz) = m
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return BarZone::Named(tz);
        }
        m.gmtoffset
            .and_then(|secs| i32::try_from(secs).ok())
            .and_then(FixedOffset::east_opt)
            .map_or(BarZone::Utc, BarZone::Offset)
    }

    pub(crate) fn name(self) -> Option<String> {
        match self {
            BarZone::Named(tz) => Some(tz.name().to_string()),
            BarZone::Offset(_) | BarZone::Utc => None,
        }
    }

    pub(crate) fn date_of(self, ts: i64) -> Option<NaiveDate> {
        let utc = Utc.timestamp_opt(ts, 0).single()?;
        Some(match self {
            BarZone::Named(tz) => utc.with_timezone(&tz).date_naive(),
            BarZone::Offset(off) => utc.with_timezone(&off).date_naive(),
            BarZone::Utc => utc.date_naive(),
        })
    }
}

/// Builds bars from the column-oriented quote block, dropping rows with any missing OHLC value.
pub(crate) fn assemble_bars(ts: &[i64], q: &QuoteBlock, zone: BarZone) -> Vec<PriceBar> {
    let mut out: Vec<PriceBar> = Vec::with_capacity(ts.len());

    for (i, &t) in ts.iter().enumerate() {
        let getter_f64 = |v: &Vec<Option<f64>>| v.get(i).and_then(|x| *x);
        let (Some(open), Some(high), Some(low), Some(close)) = (
            getter_f64(&q.open),
            getter_f64(&q.high),
            getter_f64(&q.low),
            getter_f64(&q.close),
        ) else {
            continue;
        };
        let Some(date) = zone.date_of(t) else {
            continue;
        };

        let bar = PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume: q.volume.get(i).and_then(|x| *x),
        };

        // A live (intraday) row can share the date of the last daily row; keep the newest.
        match out.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => out.push(bar),
        }
    }

    out.sort_by_key(|b| b.date);
    out
}
