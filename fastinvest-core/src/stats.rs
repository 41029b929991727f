//! Close-price distribution statistics for histogram and box-plot views.

use serde::{Deserialize, Serialize};

/// Bin count the histogram view uses.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Whisker reach in multiples of the IQR (Tukey's rule).
const WHISKER_IQR: f64 = 1.5;

/// Summary of a set of values (typically the `close` column).
///
/// Non-finite values are ignored. An empty input gives a distribution with
/// `count == 0` and zeroed statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloseDistribution {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub p10: f64,
    pub p90: f64,
    /// Lowest value within `q1 - 1.5 * iqr`.
    pub whisker_low: f64,
    /// Highest value within `q3 + 1.5 * iqr`.
    pub whisker_high: f64,
    sorted: Vec<f64>,
}

/// One histogram bin: `[lower, upper)`, the last bin closed on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl CloseDistribution {
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 0.25);
        let q3 = percentile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;
        // Whiskers never reach inside the box, even when every value on
        // one side of it is an outlier.
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1)
            .min(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3)
            .max(q3);

        Self {
            count: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            median: percentile(&sorted, 0.5),
            q1,
            q3,
            p10: percentile(&sorted, 0.10),
            p90: percentile(&sorted, 0.90),
            whisker_low,
            whisker_high,
            sorted,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Values beyond the whiskers.
    pub fn outliers(&self) -> Vec<f64> {
        self.sorted
            .iter()
            .copied()
            .filter(|v| *v < self.whisker_low || *v > self.whisker_high)
            .collect()
    }

    /// Equal-width bins spanning `[min, max]`. Returns no bins for empty
    /// input or `bins == 0`; identical values land in a single bin.
    pub fn histogram(&self, bins: usize) -> Vec<HistogramBin> {
        if self.is_empty() || bins == 0 {
            return Vec::new();
        }
        let range = self.max - self.min;
        if range <= 0.0 {
            return vec![HistogramBin {
                lower: self.min,
                upper: self.max,
                count: self.count,
            }];
        }

        let width = range / bins as f64;
        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: self.min + width * i as f64,
                upper: if i + 1 == bins {
                    self.max
                } else {
                    self.min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for v in &self.sorted {
            let idx = (((v - self.min) / width) as usize).min(bins - 1);
            out[idx].count += 1;
        }
        out
    }
}

/// Linear-interpolated percentile of an already sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
