//! EnrichedSeries: a price series plus aligned indicator columns.
//!
//! This is the only thing the presentation layer consumes. Each row keeps the
//! raw bar fields next to the derived `moving_average` and `volatility`, which
//! are `None` until a full window of history exists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bar::PriceBar;

/// One row of the enriched table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub moving_average: Option<f64>,
    pub volatility: Option<f64>,
}

impl EnrichedRow {
    pub fn from_bar(bar: &PriceBar, moving_average: Option<f64>, volatility: Option<f64>) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            moving_average,
            volatility,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSeries {
    pub symbol: String,
    pub window: usize,
    pub periods_per_year: f64,
    rows: Vec<EnrichedRow>,
}

impl EnrichedSeries {
    pub fn new(
        symbol: impl Into<String>,
        window: usize,
        periods_per_year: f64,
        rows: Vec<EnrichedRow>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            window,
            periods_per_year,
            rows,
        }
    }

    pub fn rows(&self) -> &[EnrichedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.volume).collect()
    }

    pub fn moving_average(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.moving_average).collect()
    }

    pub fn volatility(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.volatility).collect()
    }

    pub fn defined_moving_average_count(&self) -> usize {
        self.rows.iter().filter(|r| r.moving_average.is_some()).count()
    }

    /// Most recent row, if any.
    pub fn latest(&self) -> Option<&EnrichedRow> {
        self.rows.last()
    }
}
