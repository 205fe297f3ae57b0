//! Core components of the `insider-rs` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`InsiderClient`] and its builder.
//! - The primary [`InsiderError`] type.
//! - Shared price models like [`PriceBar`] and [`PriceHistory`].
//! - The trading-day calendar and the progress-reporting channel.

/// Trading-day and holiday checks.
pub mod calendar;
/// The main client (`InsiderClient`), builder, and configuration.
pub mod client;
/// The primary error type (`InsiderError`) for the crate.
pub mod error;
/// Shared data models used across multiple modules (e.g., `PriceBar`, `SplitEvent`).
pub mod models;
/// Progress events for long-running scrapes.
pub mod progress;
/// Service traits for abstracting functionality like price-history fetching.
pub mod services;

#[cfg(feature = "dataframe")]
/// Polars conversions for the tabular outputs.
pub mod dataframe;

#[cfg(feature = "test-mode")]
pub(crate) mod fixtures;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::InsiderClient`
pub use calendar::HolidayCalendar;
pub use client::{CacheMode, InsiderClient, InsiderClientBuilder, RetryConfig};
pub use error::InsiderError;
pub use models::{PriceBar, PriceHistory, SplitEvent};
pub use progress::{Progress, ProgressSink};
pub use services::PriceHistoryService;
