//! Filter criteria applied to a prepared dataset.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{InsiderError, PriceHistory};
use crate::stats::model::{CommonStockTransaction, TradeSide};

/// Which side of the book to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Either,
    Buy,
    Sell,
}

impl Side {
    fn admits(self, side: TradeSide) -> bool {
        match self {
            Side::Either => true,
            Side::Buy => side == TradeSide::Buy,
            Side::Sell => side == TradeSide::Sell,
        }
    }
}

/// Transaction column a size threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeColumn {
    Shares,
    Price,
    AdjPrice,
    Amount,
    PreTransactionShares,
    PostTransactionShares,
    OwnershipPercentage,
}

impl SizeColumn {
    fn value(self, t: &CommonStockTransaction) -> Option<f64> {
        match self {
            SizeColumn::Shares => Some(t.shares),
            SizeColumn::Price => Some(t.price),
            SizeColumn::AdjPrice => Some(t.adj_price),
            SizeColumn::Amount => Some(t.amount),
            SizeColumn::PreTransactionShares => t.pre_transaction_shares,
            SizeColumn::PostTransactionShares => t.post_transaction_shares,
            SizeColumn::OwnershipPercentage => t.ownership_percentage,
        }
    }
}

impl FromStr for SizeColumn {
    type Err = InsiderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "shares" => SizeColumn::Shares,
            "price" => SizeColumn::Price,
            "adj_price" => SizeColumn::AdjPrice,
            "amount" => SizeColumn::Amount,
            "pre_transaction_shares" => SizeColumn::PreTransactionShares,
            "post_transaction_shares" => SizeColumn::PostTransactionShares,
            "ownership_percentage" => SizeColumn::OwnershipPercentage,
            other => {
                return Err(InsiderError::InvalidParams(format!(
                    "unknown size column `{other}`"
                )));
            }
        })
    }
}

/// Strict comparison; equal values never pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
}

impl FromStr for Comparison {
    type Err = InsiderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Comparison::Lt),
            ">" => Ok(Comparison::Gt),
            other => Err(InsiderError::InvalidParams(format!(
                "size operator must be `<` or `>`, got `{other}`"
            ))),
        }
    }
}

/// Whether the column is compared signed (`Real`) or by magnitude (`Absolute`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Magnitude {
    Absolute,
    Real,
}

impl FromStr for Magnitude {
    type Err = InsiderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "absolute" => Ok(Magnitude::Absolute),
            "real" => Ok(Magnitude::Real),
            other => Err(InsiderError::InvalidParams(format!(
                "size mode must be `absolute` or `real`, got `{other}`"
            ))),
        }
    }
}

/// A complete size threshold such as "absolute `amount` > 1,000,000".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeFilter {
    column: SizeColumn,
    op: Comparison,
    threshold: f64,
    mode: Magnitude,
}

impl SizeFilter {
    /// # Errors
    ///
    /// [`InsiderError::InvalidParams`] for a non-finite threshold.
    pub fn new(
        column: SizeColumn,
        op: Comparison,
        threshold: f64,
        mode: Magnitude,
    ) -> Result<Self, InsiderError> {
        if !threshold.is_finite() {
            return Err(InsiderError::InvalidParams(format!(
                "size threshold must be finite, got {threshold}"
            )));
        }
        Ok(Self {
            column,
            op,
            threshold,
            mode,
        })
    }

    pub fn column(&self) -> SizeColumn {
        self.column
    }

    pub fn op(&self) -> Comparison {
        self.op
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn mode(&self) -> Magnitude {
        self.mode
    }

    fn admits(&self, t: &CommonStockTransaction) -> bool {
        let Some(raw) = self.column.value(t) else {
            return false;
        };
        let v = match self.mode {
            Magnitude::Absolute => raw.abs(),
            Magnitude::Real => raw,
        };
        match self.op {
            Comparison::Lt => v < self.threshold,
            Comparison::Gt => v > self.threshold,
        }
    }
}

/// Conjunction of the optional filters. [`FilterCriteria::none`] keeps everything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub insiders: Option<BTreeSet<String>>,
    pub side: Side,
    /// Keep only fills inside the day's low/high range (compared on the split-adjusted price).
    pub open_market_only: bool,
    pub size: Option<SizeFilter>,
}

impl FilterCriteria {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        *self == Self::none()
    }

    #[must_use]
    pub fn insiders<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insiders = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn open_market_only(mut self, yes: bool) -> Self {
        self.open_market_only = yes;
        self
    }

    #[must_use]
    pub fn size(mut self, size: SizeFilter) -> Self {
        self.size = Some(size);
        self
    }

    /// Requested names absent from `known`, in sorted order.
    pub fn unknown_insiders(&self, known: &[String]) -> Vec<String> {
        self.insiders
            .as_ref()
            .map(|set| {
                set.iter()
                    .filter(|n| !known.iter().any(|k| k == *n))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn admits(&self, t: &CommonStockTransaction, prices: &PriceHistory) -> bool {
        if let Some(names) = &self.insiders
            && !names.contains(&t.name)
        {
            return false;
        }
        if !self.side.admits(t.side) {
            return false;
        }
        if self.open_market_only {
            let in_range = prices
                .bar_on(t.transaction_date)
                .is_some_and(|bar| t.adj_price >= bar.low && t.adj_price <= bar.high);
            if !in_range {
                return false;
            }
        }
        self.size.as_ref().is_none_or(|s| s.admits(t))
    }

    /// Keeps the transactions admitted by every configured filter, preserving order.
    pub fn apply(
        &self,
        transactions: &[CommonStockTransaction],
        prices: &PriceHistory,
    ) -> Vec<CommonStockTransaction> {
        transactions
            .iter()
            .filter(|t| self.admits(t, prices))
            .cloned()
            .collect()
    }
}

/// Loosely-typed filter parameters as submitted by a form or a JSON request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub insiders: Option<Vec<String>>,
    /// `"P"`, `"S"` or absent.
    pub side: Option<String>,
    pub open_market: bool,
    pub size_column: Option<String>,
    /// `"<"` or `">"`.
    pub size_operator: Option<String>,
    pub size_value: Option<f64>,
    /// `"absolute"` or `"real"`.
    pub size_mode: Option<String>,
}

impl TryFrom<FilterParams> for FilterCriteria {
    type Error = InsiderError;

    fn try_from(p: FilterParams) -> Result<Self, Self::Error> {
        let side = match p.side.as_deref().map(str::trim) {
            None | Some("") => Side::Either,
            Some("P") => Side::Buy,
            Some("S") => Side::Sell,
            Some(other) => {
                return Err(InsiderError::InvalidParams(format!(
                    "side must be `P`, `S` or empty, got `{other}`"
                )));
            }
        };

        let size = match (p.size_column, p.size_operator, p.size_value, p.size_mode) {
            (None, None, None, None) => None,
            (Some(column), Some(op), Some(value), Some(mode)) => Some(SizeFilter::new(
                column.parse()?,
                op.parse()?,
                value,
                mode.parse()?,
            )?),
            _ => {
                return Err(InsiderError::InvalidParams(
                    "size filter needs column, operator, value and mode together".into(),
                ));
            }
        };

        Ok(FilterCriteria {
            insiders: p.insiders.map(|v| v.into_iter().collect()),
            side,
            open_market_only: p.open_market,
            size,
        })
    }
}

impl fmt::Display for SizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            Comparison::Lt => "<",
            Comparison::Gt => ">",
        };
        match self.mode {
            Magnitude::Absolute => write!(f, "|{:?}| {op} {}", self.column, self.threshold),
            Magnitude::Real => write!(f, "{:?} {op} {}", self.column, self.threshold),
        }
    }
}
