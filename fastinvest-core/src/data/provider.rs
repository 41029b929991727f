//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, a CSV
//! directory, synthetic data) so the fetcher can be pointed at any of them and
//! tests never need the network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily row exactly as a provider reported it, before the missing-data policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// Failures of a single fetch. Neither kind is retried by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("data source '{provider}' unavailable: {reason}")]
    DataSourceUnavailable { provider: String, reason: String },

    #[error("symbol not recognized by provider: '{symbol}'")]
    InvalidSymbol { symbol: String },
}

impl FetchError {
    pub fn unavailable(provider: &str, reason: impl Into<String>) -> Self {
        FetchError::DataSourceUnavailable {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_symbol(symbol: &str) -> Self {
        FetchError::InvalidSymbol {
            symbol: symbol.to_string(),
        }
    }
}

/// Trait for market data providers.
///
/// One call is one "daily bars for symbol over `[start, end)`" request. Rows may
/// come back unordered, duplicated, incomplete, or outside the range; the
/// fetcher cleans that up. An empty `Vec` means "reachable, nothing in range".
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over a date range.
    fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failure() {
        let err = FetchError::unavailable("yahoo_finance", "connection refused");
        assert_eq!(
            err.to_string(),
            "data source 'yahoo_finance' unavailable: connection refused"
        );
        let err = FetchError::invalid_symbol("NOPE");
        assert!(err.to_string().contains("'NOPE'"));
    }
}
