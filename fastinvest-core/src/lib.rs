//! FastInvest Core: market data retrieval and technical indicator analysis.
//!
//! This crate contains the analysis pipeline behind the dashboard:
//! - Domain types (price bars, price series, analysis requests, enriched series)
//! - Market data providers (Yahoo Finance, CSV directory, synthetic) behind one trait
//! - `MarketDataFetcher`: one provider call, canonicalized into an ordered series
//! - `IndicatorEngine`: rolling moving average and rolling annualized volatility
//! - `AnalysisPipeline`: request in, enriched series out
//! - Close-price distribution statistics and CSV/JSON export for renderers
//!
//! Nothing here knows about terminals, menus, or sessions.

pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod indicators;
pub mod pipeline;
pub mod stats;

pub use data::{DataProvider, FetchError, MarketDataFetcher};
pub use domain::{AnalysisRequest, EnrichedRow, EnrichedSeries, PriceBar, PriceSeries};
pub use indicators::{analyze, AnalysisError, IndicatorEngine};
pub use pipeline::{AnalysisPipeline, ErrorKind, PipelineError};
