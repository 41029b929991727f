//! MarketDataFetcher: one provider call turned into an ordered `PriceSeries`.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::canonicalize::canonicalize;
use super::provider::{DataProvider, FetchError};
use crate::domain::PriceSeries;

/// Fetches a daily price series from a single provider.
///
/// Stateless between calls: no cache, no retries, one outbound request per
/// `fetch`. Retry and timeout policy belong to the caller.
#[derive(Clone)]
pub struct MarketDataFetcher {
    provider: Arc<dyn DataProvider>,
}

impl std::fmt::Debug for MarketDataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataFetcher")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl MarketDataFetcher {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch bars for `symbol` over `[start, end)`.
    ///
    /// `start >= end` is not rejected; the provider is still asked and whatever
    /// it returns is filtered to the (empty) range.
    pub fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(FetchError::invalid_symbol(symbol));
        }

        let provider = self.provider.name();
        info!(symbol, provider, %start, %end, "fetching daily bars");

        let raw = self
            .provider
            .daily_bars(symbol, start, end)
            .map_err(|err| {
                warn!(symbol, provider, error = %err, "fetch failed");
                err
            })?;

        let received = raw.len();
        let cleaned = canonicalize(raw, start, end);
        if cleaned.dropped() > 0 {
            debug!(
                symbol,
                received,
                incomplete = cleaned.incomplete,
                insane = cleaned.insane,
                out_of_range = cleaned.out_of_range,
                duplicates = cleaned.duplicates,
                "dropped provider rows"
            );
        }

        let series = PriceSeries::from_canonical(symbol, cleaned.bars);
        info!(symbol, provider, bars = series.len(), "fetch complete");
        Ok(series)
    }
}
