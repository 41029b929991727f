//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV rows from Yahoo's v8 chart API. Exactly one HTTP request
//! per call: no retries, no backoff, no circuit breaker. Whatever the caller
//! wants in that department wraps this provider.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; anything that does not decode is reported as the source being
//! unavailable rather than guessed at.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::provider::{DataProvider, FetchError, RawBar};

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const PROVIDER_NAME: &str = "yahoo_finance";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance data provider.
#[derive(Debug, Clone)]
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    /// Build a provider. `timeout` of `None` leaves the request unbounded;
    /// callers that need a deadline pass one in.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::unavailable(PROVIDER_NAME, format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_USER_AGENT, None)
    }

    /// Build the chart API URL for a symbol and `[start, end)` range.
    /// The symbol is encoded as a single path segment.
    pub(crate) fn chart_url(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Url, FetchError> {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp();

        let mut url = Url::parse(&self.base_url).map_err(|e| {
            FetchError::unavailable(PROVIDER_NAME, format!("base url {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::unavailable(
                    PROVIDER_NAME,
                    format!("base url {} cannot take a path", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("period1", &start_ts.to_string())
            .append_pair("period2", &end_ts.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        Ok(url)
    }

    /// Parse the chart API response into raw rows.
    pub(crate) fn parse_response(
        symbol: &str,
        resp: ChartResponse,
    ) -> Result<Vec<RawBar>, FetchError> {
        if let Some(err) = resp.chart.error {
            if err.code == "Not Found" {
                return Err(FetchError::invalid_symbol(symbol));
            }
            return Err(FetchError::unavailable(
                PROVIDER_NAME,
                format!("{}: {}", err.code, err.description),
            ));
        }

        let data = resp
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| FetchError::unavailable(PROVIDER_NAME, "empty result with no error"))?;

        // No timestamps: the symbol exists but nothing traded in range.
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .ok_or_else(|| FetchError::unavailable(PROVIDER_NAME, "no quote data"))?;

        // Daily timestamps are session opens; shift into exchange local time
        // so the calendar date is the exchange's trading date.
        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = ts
                .checked_add(offset)
                .and_then(|local| chrono::DateTime::from_timestamp(local, 0))
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    FetchError::unavailable(PROVIDER_NAME, format!("invalid timestamp: {ts}"))
                })?;

            bars.push(RawBar {
                date,
                open: quote.open.get(i).copied().flatten(),
                high: quote.high.get(i).copied().flatten(),
                low: quote.low.get(i).copied().flatten(),
                close: quote.close.get(i).copied().flatten(),
                volume: quote.volume.get(i).copied().flatten(),
            });
        }

        Ok(bars)
    }

    /// Decode a response body, mapping undecodable bodies to an outage.
    pub fn decode(symbol: &str, body: &str) -> Result<Vec<RawBar>, FetchError> {
        let chart: ChartResponse = serde_json::from_str(body).map_err(|e| {
            FetchError::unavailable(
                PROVIDER_NAME,
                format!("failed to parse response for {symbol}: {e}"),
            )
        })?;
        Self::parse_response(symbol, chart)
    }

    /// Map an HTTP status and body to rows or an error. Unknown symbols come
    /// back as 404 with a chart error body; a 404 that does not decode is an
    /// outage like any other non-success status.
    pub(crate) fn classify(
        symbol: &str,
        status: StatusCode,
        body: &str,
    ) -> Result<Vec<RawBar>, FetchError> {
        if status.is_success() {
            return Self::decode(symbol, body);
        }
        if status == StatusCode::NOT_FOUND {
            if let Err(err @ FetchError::InvalidSymbol { .. }) = Self::decode(symbol, body) {
                return Err(err);
            }
        }
        Err(FetchError::unavailable(
            PROVIDER_NAME,
            format!("HTTP {status} for {symbol}"),
        ))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, FetchError> {
        let url = self.chart_url(symbol, start, end)?;

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::unavailable(PROVIDER_NAME, e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| FetchError::unavailable(PROVIDER_NAME, e.to_string()))?;

        Self::classify(symbol, status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_uses_exclusive_midnight_bounds() {
        let provider = YahooProvider::new("http://localhost:9/", "test", None).unwrap();
        let url = provider
            .chart_url(
                "PETR4.SA",
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9/v8/finance/chart/PETR4.SA?period1=1577836800&period2=1577923200&interval=1d&events=history"
        );
    }

    #[test]
    fn not_found_is_invalid_symbol() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = YahooProvider::decode("ZZZZ", body).unwrap_err();
        assert_eq!(err, FetchError::invalid_symbol("ZZZZ"));
    }

    #[test]
    fn other_chart_errors_are_unavailable() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let err = YahooProvider::decode("SPY", body).unwrap_err();
        assert!(matches!(err, FetchError::DataSourceUnavailable { .. }));
    }

    #[test]
    fn garbage_body_is_unavailable() {
        let err = YahooProvider::decode("SPY", "<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FetchError::DataSourceUnavailable { .. }));
    }

    #[test]
    fn overflowing_timestamp_is_unavailable() {
        let body = format!(
            r#"{{"chart":{{"result":[{{
                "meta":{{"gmtoffset":3600}},
                "timestamp":[{}],
                "indicators":{{"quote":[{{"close":[1.0]}}]}}
            }}],"error":null}}}}"#,
            i64::MAX
        );
        let err = YahooProvider::decode("SPY", &body).unwrap_err();
        assert!(matches!(err, FetchError::DataSourceUnavailable { .. }));
    }

    #[test]
    fn symbol_is_one_encoded_path_segment() {
        let provider = YahooProvider::new("http://localhost:9", "test", None).unwrap();
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let url = provider
            .chart_url("X?interval=1wk#/a", day, day.succ_opt().unwrap())
            .unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/X%3Finterval=1wk%23%2Fa");
        assert_eq!(url.fragment(), None);
        let intervals: Vec<_> = url
            .query_pairs()
            .filter(|(k, _)| k == "interval")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(intervals, vec!["1d".to_string()]);
    }

    const NOT_FOUND_BODY: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

    #[test]
    fn status_404_with_chart_error_is_invalid_symbol() {
        let err = YahooProvider::classify("ZZZZ", StatusCode::NOT_FOUND, NOT_FOUND_BODY).unwrap_err();
        assert_eq!(err, FetchError::invalid_symbol("ZZZZ"));
    }

    #[test]
    fn status_404_with_undecodable_body_is_unavailable() {
        let err = YahooProvider::classify("SPY", StatusCode::NOT_FOUND, "<html>gone</html>")
            .unwrap_err();
        assert!(matches!(err, FetchError::DataSourceUnavailable { .. }));
    }

    #[test]
    fn server_errors_are_unavailable_even_with_chart_error_body() {
        for status in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::TOO_MANY_REQUESTS] {
            let err = YahooProvider::classify("ZZZZ", status, NOT_FOUND_BODY).unwrap_err();
            assert!(matches!(err, FetchError::DataSourceUnavailable { .. }));
        }
    }

    #[test]
    fn status_200_decodes_body() {
        let body = r#"{"chart":{"result":[{"timestamp":[1704205800],"indicators":{"quote":[{"close":[104.0]}]}}],"error":null}}"#;
        let bars = YahooProvider::classify("SPY", StatusCode::OK, body).unwrap();
        assert_eq!(bars.len(), 1);
        let err = YahooProvider::classify("ZZZZ", StatusCode::OK, NOT_FOUND_BODY).unwrap_err();
        assert_eq!(err, FetchError::invalid_symbol("ZZZZ"));
    }

    #[test]
    fn missing_timestamps_mean_no_trading_days() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let bars = YahooProvider::decode("SPY", body).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn parses_rows_with_gmt_offset_and_nulls() {
        // 2024-01-02 14:30 UTC and 2024-01-03 14:30 UTC, New York offset.
        let body = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":-18000},
            "timestamp":[1704205800,1704292200],
            "indicators":{"quote":[{
                "open":[100.0,null],"high":[105.0,null],"low":[99.0,null],
                "close":[104.0,null],"volume":[1200,null]
            }]}
        }],"error":null}}"#;
        let bars = YahooProvider::decode("SPY", body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, Some(104.0));
        assert_eq!(bars[0].volume, Some(1200));
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(bars[1].close, None);
    }
}
