//! AnalysisRequest: the single input bundle for one pipeline run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default rolling window in trading days.
pub const DEFAULT_WINDOW: usize = 50;

/// Symbol, `[start_date, end_date)` range, and rolling window.
///
/// Date ordering is deliberately not validated here: the provider decides
/// what an inverted range returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub window: usize,
}

impl AnalysisRequest {
    pub fn new(symbol: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start_date,
            end_date,
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}
