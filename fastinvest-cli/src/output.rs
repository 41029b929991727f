//! Output formats for analyzed and raw series.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;

use fastinvest_core::export;
use fastinvest_core::{EnrichedSeries, PriceSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Fixed-width table of the analyzed series, limited to the last `tail` rows.
pub fn enriched_table(series: &EnrichedSeries, tail: Option<usize>) -> String {
    let rows = series.rows();
    let skip = tail.map_or(0, |n| rows.len().saturating_sub(n));
    let ma_header = format!("MA{}", series.window);

    let mut out = String::new();
    out.push_str(&format!(
        "{} | {} rows | window {} | {} defined\n",
        series.symbol,
        series.len(),
        series.window,
        series.defined_moving_average_count()
    ));
    out.push_str(&format!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12} {:>10} {:>10}\n",
        "Date", "Open", "High", "Low", "Close", "Volume", ma_header, "Volatility"
    ));
    out.push_str(&"-".repeat(89));
    out.push('\n');
    for row in &rows[skip..] {
        out.push_str(&format!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12} {:>10} {:>10}\n",
            row.date.to_string(),
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume,
            opt(row.moving_average),
            opt(row.volatility),
        ));
    }
    out
}

pub fn price_table(series: &PriceSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} | {} bars\n", series.symbol(), series.len()));
    out.push_str(&format!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12}\n",
        "Date", "Open", "High", "Low", "Close", "Volume"
    ));
    out.push_str(&"-".repeat(67));
    out.push('\n');
    for bar in series.bars() {
        out.push_str(&format!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}\n",
            bar.date.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}

pub fn write_enriched<W: Write>(
    series: &EnrichedSeries,
    format: OutputFormat,
    tail: Option<usize>,
    mut writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Table => writer.write_all(enriched_table(series, tail).as_bytes())?,
        OutputFormat::Csv => export::write_csv(series, &mut writer)?,
        OutputFormat::Json => {
            export::write_json(series, &mut writer)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

pub fn write_prices<W: Write>(series: &PriceSeries, format: OutputFormat, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Table => writer.write_all(price_table(series).as_bytes())?,
        OutputFormat::Csv => export::write_prices_csv(series, &mut writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, series)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fastinvest_core::PriceBar;

    fn series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                date: base + chrono::Duration::days(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 100,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn table_marks_warmup_rows() {
        let enriched = fastinvest_core::analyze(&series(&[10.0, 20.0, 30.0]), 3).unwrap();
        let table = enriched_table(&enriched, None);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("TEST | 3 rows | window 3 | 1 defined"));
        assert!(lines[1].contains("MA3"));
        assert!(lines[3].trim_end().ends_with('-'));
        assert!(lines[5].contains("20.00"));
        assert!(lines[5].contains("158.75"));
    }

    #[test]
    fn tail_limits_rows() {
        let enriched = fastinvest_core::analyze(&series(&[1.0, 2.0, 3.0, 4.0]), 2).unwrap();
        let table = enriched_table(&enriched, Some(2));
        assert_eq!(table.lines().count(), 3 + 2);
        assert!(table.contains("2024-01-04"));
        assert!(!table.contains("2024-01-01"));
    }

    #[test]
    fn price_csv_lists_bars() {
        let mut out = Vec::new();
        write_prices(&series(&[5.0, 6.0]), OutputFormat::Csv, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "date,open,high,low,close,volume\n2024-01-01,5.0,5.0,5.0,5.0,100\n2024-01-02,6.0,6.0,6.0,6.0,100\n"
        );
    }

    #[test]
    fn enriched_json_is_valid() {
        let enriched = fastinvest_core::analyze(&series(&[1.0, 2.0]), 2).unwrap();
        let mut out = Vec::new();
        write_enriched(&enriched, OutputFormat::Json, None, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["symbol"], "TEST");
        assert_eq!(value["window"], 2);
    }
}
