//! Rolling indicators and the engine that attaches them to a price series.
//!
//! Indicators are pure functions: close prices in, an aligned series of
//! optional values out. `None` marks "no value yet" (insufficient history or
//! an undefined statistic); it is never replaced by zero or extrapolated.

pub mod engine;
pub mod moving_average;
pub mod volatility;

pub use engine::{analyze, AnalysisError, IndicatorEngine, TRADING_DAYS_PER_YEAR};
pub use moving_average::MovingAverage;
pub use volatility::RollingVolatility;

/// Trait for close-price indicators.
///
/// `compute` returns a `Vec` of the same length as its input. The first
/// `lookback()` entries are `None`.
///
/// # Look-ahead guard
/// The value at index t depends only on closes at indices `..=t`.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ma_50", "volatility_50").
    fn name(&self) -> &str;

    /// Number of leading entries that can never have a value.
    fn lookback(&self) -> usize;

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>>;
}

/// Trailing windows of `window` values ending at each index, or `None` during warmup.
pub(crate) fn trailing_windows(
    values: &[f64],
    window: usize,
) -> impl Iterator<Item = Option<&[f64]>> + '_ {
    (0..values.len()).map(move |i| {
        if window == 0 || i + 1 < window {
            None
        } else {
            Some(&values[i + 1 - window..=i])
        }
    })
}

/// Arithmetic mean, or `None` if any value is non-finite.
pub(crate) fn finite_mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() || window.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_windows_warm_up_then_slide() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let windows: Vec<_> = trailing_windows(&values, 3).collect();
        assert_eq!(windows[0], None);
        assert_eq!(windows[1], None);
        assert_eq!(windows[2], Some(&values[0..3]));
        assert_eq!(windows[3], Some(&values[1..4]));
    }

    #[test]
    fn finite_mean_rejects_nan() {
        assert_eq!(finite_mean(&[1.0, 3.0]), Some(2.0));
        assert_eq!(finite_mean(&[1.0, f64::NAN]), None);
        assert_eq!(finite_mean(&[]), None);
    }
}
