//! Domain types: price bars, ordered price series, analysis requests, enriched series.

pub mod bar;
pub mod enriched;
pub mod request;
pub mod series;

pub use bar::PriceBar;
pub use enriched::{EnrichedRow, EnrichedSeries};
pub use request::{AnalysisRequest, DEFAULT_WINDOW};
pub use series::{PriceSeries, SeriesError};
