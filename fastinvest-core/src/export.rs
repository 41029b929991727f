//! Export enriched and raw price series as CSV or JSON.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{EnrichedSeries, PriceSeries};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat CSV record; missing indicator values become empty cells.
#[derive(Serialize)]
struct CsvRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
    moving_average: Option<f64>,
    volatility: Option<f64>,
}

pub fn write_csv<W: Write>(series: &EnrichedSeries, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if series.is_empty() {
        wtr.write_record([
            "date",
            "open",
            "high",
            "low",
            "close",
            "volume",
            "moving_average",
            "volatility",
        ])?;
    }
    for row in series.rows() {
        wtr.serialize(CsvRecord {
            date: row.date.format("%Y-%m-%d").to_string(),
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            moving_average: row.moving_average,
            volatility: row.volatility,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Raw bars as `date,open,high,low,close,volume`.
pub fn write_prices_csv<W: Write>(series: &PriceSeries, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if series.is_empty() {
        wtr.write_record(["date", "open", "high", "low", "close", "volume"])?;
    }
    for bar in series.bars() {
        wtr.serialize(bar)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(series: &EnrichedSeries, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, series)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EnrichedRow;
    use chrono::NaiveDate;

    fn sample() -> EnrichedSeries {
        let row = |day: u32, close: f64, ma: Option<f64>| EnrichedRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 5,
            moving_average: ma,
            volatility: None,
        };
        EnrichedSeries::new("SPY", 2, 252.0, vec![row(2, 10.0, None), row(3, 12.0, Some(11.0))])
    }

    #[test]
    fn csv_has_header_and_empty_missing_cells() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "date,open,high,low,close,volume,moving_average,volatility"
        );
        assert_eq!(lines[1], "2024-01-02,10.0,10.0,10.0,10.0,5,,");
        assert_eq!(lines[2], "2024-01-03,12.0,12.0,12.0,12.0,5,11.0,");
    }

    #[test]
    fn csv_of_empty_series_is_header_only() {
        let mut buf = Vec::new();
        write_csv(&EnrichedSeries::new("SPY", 50, 252.0, vec![]), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn price_csv_lists_bars_in_order() {
        let bars = [(2, 10.0, 700), (3, 11.5, 800)]
            .into_iter()
            .map(|(day, close, volume)| crate::domain::PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume,
            })
            .collect();
        let series = PriceSeries::new("SPY", bars).unwrap();
        let mut buf = Vec::new();
        write_prices_csv(&series, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "date,open,high,low,close,volume\n\
             2024-01-02,10.0,11.0,9.0,10.0,700\n\
             2024-01-03,11.5,12.5,10.5,11.5,800\n"
        );
    }

    #[test]
    fn price_csv_of_empty_series_is_header_only() {
        let mut buf = Vec::new();
        write_prices_csv(&PriceSeries::empty("SPY"), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "date,open,high,low,close,volume\n");
    }

    #[test]
    fn json_round_trips_nulls() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();
        let parsed: EnrichedSeries = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, sample());
    }
}
