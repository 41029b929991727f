//! CSV directory provider: offline fallback when Yahoo is unavailable.
//!
//! Reads `<dir>/<SYMBOL>.csv` with a `date,open,high,low,close,volume` header.
//! Empty cells are treated as missing values and go through the same
//! missing-data policy as network rows.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataProvider, FetchError, RawBar};

const PROVIDER_NAME: &str = "csv";

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn symbol_path(&self, symbol: &str) -> Option<PathBuf> {
        let valid = !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '^' | '='))
            && !symbol.starts_with('.');
        valid.then(|| self.dir.join(format!("{symbol}.csv")))
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn daily_bars(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<RawBar>, FetchError> {
        let path = self
            .symbol_path(symbol)
            .ok_or_else(|| FetchError::invalid_symbol(symbol))?;

        if !path.is_file() {
            if !self.dir.is_dir() {
                return Err(FetchError::unavailable(
                    PROVIDER_NAME,
                    format!("data directory not found: {}", self.dir.display()),
                ));
            }
            return Err(FetchError::invalid_symbol(symbol));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| FetchError::unavailable(PROVIDER_NAME, format!("{}: {e}", path.display())))?;

        reader
            .deserialize::<CsvRow>()
            .map(|row| -> Result<RawBar, FetchError> {
                let row = row.map_err(|e| {
                    FetchError::unavailable(PROVIDER_NAME, format!("{}: {e}", path.display()))
                })?;
                Ok(RawBar {
                    date: row.date,
                    open: row.open,
                    high: row.high,
                    low: row.low,
                    close: row.close,
                    volume: row.volume,
                })
            })
            .collect()
    }
}
