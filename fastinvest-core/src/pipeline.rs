//! AnalysisPipeline: `AnalysisRequest` in, `EnrichedSeries` out.
//!
//! Composes the fetcher and the indicator engine. Parameters are validated
//! before any network traffic; errors keep their specific kind so the
//! presentation layer can decide how to word them.

use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::data::{FetchError, MarketDataFetcher};
use crate::domain::{AnalysisRequest, EnrichedSeries};
use crate::indicators::{AnalysisError, IndicatorEngine, TRADING_DAYS_PER_YEAR};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Flat classification of every pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DataSourceUnavailable,
    InvalidSymbol,
    InvalidWindow,
    InvalidAnnualization,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Fetch(FetchError::DataSourceUnavailable { .. }) => {
                ErrorKind::DataSourceUnavailable
            }
            PipelineError::Fetch(FetchError::InvalidSymbol { .. }) => ErrorKind::InvalidSymbol,
            PipelineError::Analysis(AnalysisError::InvalidWindow { .. }) => ErrorKind::InvalidWindow,
            PipelineError::Analysis(AnalysisError::InvalidAnnualization { .. }) => {
                ErrorKind::InvalidAnnualization
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    fetcher: MarketDataFetcher,
    periods_per_year: f64,
}

impl AnalysisPipeline {
    pub fn new(fetcher: MarketDataFetcher) -> Self {
        Self {
            fetcher,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }

    pub fn with_periods_per_year(mut self, periods_per_year: f64) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    pub fn fetcher(&self) -> &MarketDataFetcher {
        &self.fetcher
    }

    /// Run one request: validate, fetch once, analyze.
    pub fn run(&self, request: &AnalysisRequest) -> Result<EnrichedSeries, PipelineError> {
        let engine =
            IndicatorEngine::new(request.window)?.with_periods_per_year(self.periods_per_year)?;

        let series = self
            .fetcher
            .fetch(&request.symbol, request.start_date, request.end_date)?;

        let enriched = engine.analyze(&series);
        info!(
            symbol = %request.symbol,
            window = request.window,
            rows = enriched.len(),
            defined = enriched.defined_moving_average_count(),
            "analysis complete"
        );
        Ok(enriched)
    }

    /// Run independent requests in parallel. Results come back in input order.
    pub fn run_many(
        &self,
        requests: &[AnalysisRequest],
    ) -> Vec<Result<EnrichedSeries, PipelineError>> {
        requests.par_iter().map(|req| self.run(req)).collect()
    }
}
