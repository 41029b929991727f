//! Simple moving average of close prices.
//!
//! Lookback: window - 1 (first value at index window - 1).

use super::{finite_mean, trailing_windows, Indicator};

#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    name: String,
}

impl MovingAverage {
    /// `window` must be at least 1; the engine validates before constructing.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            name: format!("ma_{window}"),
        }
    }
}

impl Indicator for MovingAverage {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        // Each window is summed independently, never as a running sum.
        trailing_windows(closes, self.window)
            .map(|w| w.and_then(finite_mean))
            .collect()
    }
}
