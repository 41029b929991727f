//! Market data retrieval: provider trait, concrete providers, and the fetcher.

pub mod canonicalize;
pub mod csv_provider;
pub mod fetcher;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use canonicalize::{canonicalize, Canonicalized};
pub use csv_provider::CsvProvider;
pub use fetcher::MarketDataFetcher;
pub use provider::{DataProvider, FetchError, RawBar};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
