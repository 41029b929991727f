//! IndicatorEngine: attaches the moving average and volatility columns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Indicator, MovingAverage, RollingVolatility};
use crate::domain::{EnrichedRow, EnrichedSeries, PriceSeries, DEFAULT_WINDOW};

/// Annualization constant applied regardless of the instrument's calendar.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("window must be a positive number of trading days, got {window}")]
    InvalidWindow { window: usize },

    #[error("periods per year must be a positive finite number, got {periods_per_year}")]
    InvalidAnnualization { periods_per_year: f64 },
}

/// Validated indicator parameters. Stateless: `analyze` is a pure function
/// of the engine and the input series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorEngine {
    window: usize,
    periods_per_year: f64,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl IndicatorEngine {
    pub fn new(window: usize) -> Result<Self, AnalysisError> {
        if window == 0 {
            return Err(AnalysisError::InvalidWindow { window });
        }
        Ok(Self {
            window,
            ..Self::default()
        })
    }

    pub fn with_periods_per_year(mut self, periods_per_year: f64) -> Result<Self, AnalysisError> {
        if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
            return Err(AnalysisError::InvalidAnnualization { periods_per_year });
        }
        self.periods_per_year = periods_per_year;
        Ok(self)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    /// Enrich `series` with aligned `moving_average` and `volatility` columns.
    ///
    /// Same length and order as the input; an empty series gives an empty result.
    pub fn analyze(&self, series: &PriceSeries) -> EnrichedSeries {
        let closes = series.closes();
        let ma = MovingAverage::new(self.window).compute(&closes);
        let vol = RollingVolatility::new(self.window, self.periods_per_year).compute(&closes);

        let rows = series
            .bars()
            .iter()
            .zip(ma)
            .zip(vol)
            .map(|((bar, ma), vol)| EnrichedRow::from_bar(bar, ma, vol))
            .collect();

        EnrichedSeries::new(series.symbol(), self.window, self.periods_per_year, rows)
    }
}

/// Analyze with the default annualization; fails with `InvalidWindow` for a zero window.
pub fn analyze(series: &PriceSeries, window: usize) -> Result<EnrichedSeries, AnalysisError> {
    Ok(IndicatorEngine::new(window)?.analyze(series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceBar;
    use crate::indicators::assert_approx;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000 + i as u64,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn worked_example_window_3() {
        let enriched = analyze(&series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3).unwrap();
        let ma = enriched.moving_average();
        assert_eq!(ma[0], None);
        assert_eq!(ma[1], None);
        assert_approx(ma[2].unwrap(), 20.0, 1e-12);
        assert_approx(ma[3].unwrap(), 30.0, 1e-12);
        assert_approx(ma[4].unwrap(), 40.0, 1e-12);

        let vol = enriched.volatility();
        assert_eq!(vol[0], None);
        assert_eq!(vol[1], None);
        assert_approx(vol[2].unwrap(), 158.745, 1e-3);
    }

    #[test]
    fn zero_window_rejected() {
        let err = analyze(&series(&[1.0, 2.0]), 0).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidWindow { window: 0 });
    }

    #[test]
    fn window_one_ma_is_close_and_no_volatility() {
        let closes = [5.0, 6.0, 7.5];
        let enriched = analyze(&series(&closes), 1).unwrap();
        let ma: Vec<f64> = enriched.moving_average().into_iter().flatten().collect();
        assert_eq!(ma, closes.to_vec());
        assert!(enriched.volatility().iter().all(Option::is_none));
    }

    #[test]
    fn empty_series_gives_empty_result() {
        let empty = PriceSeries::empty("SPY");
        let enriched = analyze(&empty, 50).unwrap();
        assert!(enriched.is_empty());
        assert_eq!(enriched.symbol, "SPY");
    }

    #[test]
    fn window_longer_than_series_leaves_everything_missing() {
        let enriched = analyze(&series(&[1.0, 2.0, 3.0]), 50).unwrap();
        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched.defined_moving_average_count(), 0);
    }

    #[test]
    fn preserves_dates_and_volume() {
        let input = series(&[1.0, 2.0, 3.0, 4.0]);
        let enriched = analyze(&input, 2).unwrap();
        assert_eq!(enriched.dates(), input.dates());
        assert_eq!(enriched.volumes(), input.volumes());
        assert_eq!(enriched.closes(), input.closes());
    }

    #[test]
    fn custom_annualization() {
        let engine = IndicatorEngine::new(3)
            .unwrap()
            .with_periods_per_year(365.0)
            .unwrap();
        let enriched = engine.analyze(&series(&[10.0, 20.0, 30.0]));
        assert_approx(enriched.volatility()[2].unwrap(), 10.0 * 365.0_f64.sqrt(), 1e-9);
        assert_eq!(enriched.periods_per_year, 365.0);
    }

    #[test]
    fn invalid_annualization_rejected() {
        let engine = IndicatorEngine::new(3).unwrap();
        assert!(matches!(
            engine.with_periods_per_year(0.0),
            Err(AnalysisError::InvalidAnnualization { .. })
        ));
        assert!(engine.with_periods_per_year(f64::NAN).is_err());
    }

    #[test]
    fn defaults_match_dashboard() {
        let engine = IndicatorEngine::default();
        assert_eq!(engine.window(), 50);
        assert_eq!(engine.periods_per_year(), 252.0);
    }
}
