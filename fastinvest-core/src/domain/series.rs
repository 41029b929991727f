//! PriceSeries: bars ordered strictly ascending by date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::PriceBar;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("bar {index} ({date}) is not after the previous bar")]
    NotAscending { index: usize, date: NaiveDate },
}

/// Ordered sequence of daily bars for one symbol.
///
/// Dates are strictly increasing, so there are no duplicates. An empty series
/// is valid: it is what a reachable provider returns for a range without
/// trading days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NotAscending {
                    index: i + 1,
                    date: pair[1].date,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Build from bars the caller has already sorted and deduplicated.
    pub(crate) fn from_canonical(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        debug_assert!(bars.windows(2).all(|p| p[0].date < p[1].date));
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
