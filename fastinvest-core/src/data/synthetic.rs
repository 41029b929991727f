//! Synthetic data provider: deterministic prices for demos and offline runs.
//!
//! Generates a geometric random walk on weekdays. The walk is seeded from the
//! configured seed and the symbol, and always starts at a fixed anchor date,
//! so the same symbol and date yield the same bar no matter which range was
//! requested.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataProvider, FetchError, RawBar};

const PROVIDER_NAME: &str = "synthetic";

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    anchor: NaiveDate,
    start_price: f64,
    daily_drift: f64,
    daily_vol: f64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            anchor: NaiveDate::from_ymd_opt(2000, 1, 3).unwrap_or_default(),
            start_price: 100.0,
            daily_drift: 0.0003,
            daily_vol: 0.015,
        }
    }

    fn symbol_seed(&self, symbol: &str) -> u64 {
        // FNV-1a; stable across Rust releases unlike DefaultHasher.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in symbol.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash ^ self.seed
    }

    /// Standard normal sample via Box-Muller.
    fn normal(rng: &mut StdRng) -> f64 {
        let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(42)
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, FetchError> {
        if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
            return Err(FetchError::invalid_symbol(symbol));
        }

        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let mut bars = Vec::new();
        let mut close = self.start_price;
        let mut date = self.anchor.min(start);

        while date < end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let open = close;
                let ret = self.daily_drift + self.daily_vol * Self::normal(&mut rng);
                close = (open * ret.exp()).max(0.01);
                let wick = self.daily_vol * rng.gen_range(0.0..1.0);
                let high = open.max(close) * (1.0 + wick);
                let low = open.min(close) * (1.0 - wick).max(0.5);
                let volume = rng.gen_range(100_000..5_000_000u64);

                if date >= start {
                    bars.push(RawBar {
                        date,
                        open: Some(open),
                        high: Some(high),
                        low: Some(low),
                        close: Some(close),
                        volume: Some(volume),
                    });
                }
            }
            date += Duration::days(1);
        }

        Ok(bars)
    }
}
