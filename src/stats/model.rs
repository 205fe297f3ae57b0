use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::PriceHistory;
use crate::filings::OwnershipNature;
use crate::stats::Window;

/// Open-market purchase (`P`) or sale (`S`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    #[serde(rename = "P")]
    Buy,
    #[serde(rename = "S")]
    Sell,
}

impl TradeSide {
    pub fn code(self) -> &'static str {
        match self {
            TradeSide::Buy => "P",
            TradeSide::Sell => "S",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "P" => Some(TradeSide::Buy),
            "S" => Some(TradeSide::Sell),
            _ => None,
        }
    }
}

/// A priced purchase or sale of common stock, with the fields derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonStockTransaction {
    pub accession: String,
    pub report_period: NaiveDate,
    pub transaction_date: NaiveDate,
    /// Reporting insider; empty when the filing omitted the name.
    pub name: String,
    pub is_director: bool,
    pub is_officer: bool,
    pub is_ten_percent_owner: bool,
    pub officer_title: Option<String>,
    pub security: Option<String>,
    pub side: TradeSide,
    /// Signed quantity; sales are negative.
    pub shares: f64,
    pub price: f64,
    pub post_transaction_shares: Option<f64>,
    pub ownership_nature: Option<OwnershipNature>,
    /// `shares * price`.
    pub amount: f64,
    /// `post_transaction_shares - shares`.
    pub pre_transaction_shares: Option<f64>,
    /// `shares / pre_transaction_shares * 100`; infinite or NaN for an empty prior position.
    pub ownership_percentage: Option<f64>,
    /// `price` rescaled onto the split scale of the price bars.
    pub adj_price: f64,
}

/// Aggregates over one insider's filtered transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderStatRow {
    pub insider: String,
    pub total_volume: f64,
    pub total_volume_dollar: f64,
    pub position_delta: f64,
    pub position_delta_dollar: f64,
    /// Non-finite when the reference prior position is zero or unknown.
    pub position_delta_percentage: f64,
    /// Non-finite when the reference prior position is zero or unknown.
    pub position_rotation: f64,
    pub trade_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityPeriod {
    Pre,
    Post,
}

/// Close-price standard deviation before or after one transaction date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRow {
    pub transaction_date: NaiveDate,
    pub period: VolatilityPeriod,
    pub std_1w: Option<f64>,
    pub std_1m: Option<f64>,
    pub std_3m: Option<f64>,
    pub std_6m: Option<f64>,
    pub std_1y: Option<f64>,
}

impl VolatilityRow {
    pub fn std(&self, window: Window) -> Option<f64> {
        match window {
            Window::W1 => self.std_1w,
            Window::M1 => self.std_1m,
            Window::M3 => self.std_3m,
            Window::M6 => self.std_6m,
            Window::Y1 => self.std_1y,
        }
    }
}

/// Percent return following one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub code: TradeSide,
    pub transaction_date: NaiveDate,
    pub return_1w: Option<f64>,
    pub return_1m: Option<f64>,
    pub return_3m: Option<f64>,
    pub return_6m: Option<f64>,
    pub return_1y: Option<f64>,
}

impl PerformanceRow {
    pub fn return_over(&self, window: Window) -> Option<f64> {
        match window {
            Window::W1 => self.return_1w,
            Window::M1 => self.return_1m,
            Window::M3 => self.return_3m,
            Window::M6 => self.return_6m,
            Window::Y1 => self.return_1y,
        }
    }
}

/// Headline figures over the filtered transactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub transactions: usize,
    pub insiders: usize,
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub buy_volume_dollar: f64,
    pub sell_volume_dollar: f64,
}

/// Net signed shares and notional traded by insiders on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub net_shares: f64,
    pub net_amount: f64,
}

/// Everything derived from one filter application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub transactions: Vec<CommonStockTransaction>,
    pub insiders: Vec<InsiderStatRow>,
    pub volatility: Vec<VolatilityRow>,
    pub performance: Vec<PerformanceRow>,
    pub prices: PriceHistory,
    pub summary: TransactionSummary,
    pub daily_volume: Vec<DailyVolume>,
    /// Requested insider names that do not occur in the dataset.
    pub unknown_insiders: Vec<String>,
}
