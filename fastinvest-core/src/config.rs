//! TOML configuration shared by the CLI and the TUI.
//!
//! Every section and field has a default, so an empty file (or no file) is a
//! valid configuration matching the dashboard's stock settings.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::yahoo::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::data::{CsvProvider, DataProvider, FetchError, SyntheticProvider, YahooProvider};
use crate::domain::{AnalysisRequest, DEFAULT_WINDOW};
use crate::indicators::TRADING_DAYS_PER_YEAR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid provider configuration: {0}")]
    Provider(#[from] FetchError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub request: RequestConfig,
    pub indicators: IndicatorConfig,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// The analysis request the dashboard starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub symbol: String,
    /// Symbols offered by the symbol selector.
    pub symbols: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub window: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            symbol: "PETR4.SA".to_string(),
            symbols: vec!["PETR4.SA".to_string()],
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            window: DEFAULT_WINDOW,
        }
    }
}

impl RequestConfig {
    pub fn to_request(&self) -> AnalysisRequest {
        AnalysisRequest::new(self.symbol.clone(), self.start_date, self.end_date)
            .with_window(self.window)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub periods_per_year: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    pub user_agent: String,
    /// Request deadline for the Yahoo provider; unset means no deadline.
    pub timeout_secs: Option<u64>,
    pub csv_dir: PathBuf,
    pub seed: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Yahoo,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: Some(30),
            csv_dir: PathBuf::from("data"),
            seed: 42,
        }
    }
}

impl ProviderConfig {
    pub fn build(&self) -> Result<Arc<dyn DataProvider>, ConfigError> {
        let provider: Arc<dyn DataProvider> = match self.kind {
            ProviderKind::Yahoo => Arc::new(YahooProvider::new(
                self.base_url.clone(),
                &self.user_agent,
                self.timeout_secs.map(Duration::from_secs),
            )?),
            ProviderKind::Csv => Arc::new(CsvProvider::new(self.csv_dir.clone())),
            ProviderKind::Synthetic => Arc::new(SyntheticProvider::new(self.seed)),
        };
        Ok(provider)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info" or "fastinvest_core=debug".
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_dashboard_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.request.symbol, "PETR4.SA");
        assert_eq!(config.request.window, 50);
        assert_eq!(
            config.request.start_date,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(config.indicators.periods_per_year, 252.0);
        assert_eq!(config.provider.kind, ProviderKind::Yahoo);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn parses_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [request]
            symbol = "VALE3.SA"
            symbols = ["VALE3.SA", "PETR4.SA"]
            window = 20

            [provider]
            kind = "csv"
            csv_dir = "fixtures"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.request.symbol, "VALE3.SA");
        assert_eq!(config.request.symbols.len(), 2);
        assert_eq!(config.request.window, 20);
        assert_eq!(config.request.end_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(config.provider.kind, ProviderKind::Csv);
        assert_eq!(config.provider.csv_dir, PathBuf::from("fixtures"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn request_config_builds_request() {
        let req = RequestConfig::default().to_request();
        assert_eq!(req.symbol, "PETR4.SA");
        assert_eq!(req.window, 50);
    }

    #[test]
    fn unknown_provider_kind_is_parse_error() {
        let err = AppConfig::from_toml("[provider]\nkind = \"bloomberg\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn negative_window_is_parse_error() {
        assert!(AppConfig::from_toml("[request]\nwindow = -5\n").is_err());
    }

    #[test]
    fn builds_each_provider_kind() {
        for (kind, name) in [
            (ProviderKind::Yahoo, "yahoo_finance"),
            (ProviderKind::Csv, "csv"),
            (ProviderKind::Synthetic, "synthetic"),
        ] {
            let config = ProviderConfig {
                kind,
                ..ProviderConfig::default()
            };
            assert_eq!(config.build().unwrap().name(), name);
        }
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn example_config_parses() {
        let config = AppConfig::from_toml(include_str!("../../fastinvest.example.toml")).unwrap();
        assert_eq!(config.request.symbols.len(), 4);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.timeout_secs, Some(30));
        assert_eq!(config.indicators.periods_per_year, 252.0);
    }
}
