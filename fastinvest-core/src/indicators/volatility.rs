//! Rolling annualized volatility of close prices.
//!
//! volatility[i] = sample_stddev(close[i-window+1 ..= i]) * sqrt(periods_per_year)
//!
//! Sample stddev divides by `window - 1`, so a window of 1 has no value at any
//! index. Lookback: window - 1.

use super::{finite_mean, trailing_windows, Indicator};

#[derive(Debug, Clone)]
pub struct RollingVolatility {
    window: usize,
    periods_per_year: f64,
    name: String,
}

impl RollingVolatility {
    pub fn new(window: usize, periods_per_year: f64) -> Self {
        Self {
            window: window.max(1),
            periods_per_year,
            name: format!("volatility_{window}"),
        }
    }

    fn sample_stddev(window: &[f64]) -> Option<f64> {
        if window.len() < 2 {
            return None;
        }
        let mean = finite_mean(window)?;
        let sum_sq: f64 = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum();
        Some((sum_sq / (window.len() - 1) as f64).sqrt())
    }
}

impl Indicator for RollingVolatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let scale = self.periods_per_year.sqrt();
        trailing_windows(closes, self.window)
            .map(|w| w.and_then(Self::sample_stddev).map(|sd| sd * scale))
            .collect()
    }
}
