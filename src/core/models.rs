use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/* ----- PRICES (shared by history/ and stats/) ----- */

/// A single daily OHLC bar, dated in the exchange's local calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

/// A stock split effective on `date`, `numerator`-for-`denominator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitEvent {
    pub date: NaiveDate,
    pub numerator: u32,
    pub denominator: u32,
}

impl SplitEvent {
    /// Multiplier that brings a pre-split price onto the post-split scale (0.5 for a 2:1 split).
    pub fn price_factor(&self) -> f64 {
        if self.numerator == 0 || self.denominator == 0 {
            1.0
        } else {
            f64::from(self.denominator) / f64::from(self.numerator)
        }
    }
}

/// Daily bars (ascending by date) plus the split events inside the same window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub splits: Vec<SplitEvent>,
    /// IANA zone the bars were dated in, when the endpoint reported one.
    pub timezone: Option<String>,
}

impl PriceHistory {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// The bar dated exactly `date`.
    pub fn bar_on(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| &self.bars[i])
    }

    /// Closes of all bars dated within `[start, end]`, both ends inclusive.
    pub fn closes_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<f64> {
        if start > end {
            return Vec::new();
        }
        let lo = self.bars.partition_point(|b| b.date < start);
        let hi = self.bars.partition_point(|b| b.date <= end);
        self.bars[lo..hi].iter().map(|b| b.close).collect()
    }

    /// The bar whose date is closest to `date`; ties resolve to the later bar.
    pub fn nearest(&self, date: NaiveDate) -> Option<&PriceBar> {
        let idx = self.bars.partition_point(|b| b.date < date);
        let after = self.bars.get(idx);
        let before = idx.checked_sub(1).and_then(|i| self.bars.get(i));
        match (before, after) {
            (Some(b), Some(a)) => {
                if (date - b.date) < (a.date - date) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (Some(b), None) => Some(b),
            (None, a) => a,
        }
    }
}
