//! FastInvest CLI: analyze and fetch commands.
//!
//! Commands:
//! - `analyze`: fetch daily bars and add moving average and volatility
//! - `fetch`: print the canonical daily bars without indicators

mod obs;
mod output;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use fastinvest_core::config::{AppConfig, ProviderKind};
use fastinvest_core::{AnalysisPipeline, AnalysisRequest, EnrichedSeries, MarketDataFetcher};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "fastinvest",
    about = "FastInvest CLI: daily prices, moving average and annualized volatility"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that talks to a data source.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data source: yahoo, csv or synthetic.
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Directory of <SYMBOL>.csv files for the csv provider.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// First date, inclusive (YYYY-MM-DD). Defaults to the configured start.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date, exclusive (YYYY-MM-DD). Defaults to the configured end.
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ProviderArg {
    Yahoo,
    Csv,
    Synthetic,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Yahoo => ProviderKind::Yahoo,
            ProviderArg::Csv => ProviderKind::Csv,
            ProviderArg::Synthetic => ProviderKind::Synthetic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more symbols in parallel.
    Analyze {
        /// Symbols to analyze (e.g., PETR4.SA VALE3.SA).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Rolling window in trading days. Defaults to the configured window.
        #[arg(long)]
        window: Option<usize>,

        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Only print the last N rows (table format).
        #[arg(long)]
        tail: Option<usize>,

        /// Write one <SYMBOL>.<ext> file per symbol here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch and print the daily bars for one symbol.
    Fetch {
        symbol: String,

        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbols,
            window,
            source,
            format,
            tail,
            output,
        } => run_analyze(symbols, window, source, format, tail, output.as_deref()),
        Commands::Fetch {
            symbol,
            source,
            format,
        } => run_fetch(symbol, source, format),
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(source: &SourceArgs) -> Result<AppConfig> {
    let mut config = match &source.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(provider) = source.provider {
        config.provider.kind = provider.into();
    }
    if let Some(dir) = &source.csv_dir {
        config.provider.csv_dir = dir.clone();
        if source.provider.is_none() {
            config.provider.kind = ProviderKind::Csv;
        }
    }
    if let Some(start) = source.start {
        config.request.start_date = start;
    }
    if let Some(end) = source.end {
        config.request.end_date = end;
    }
    Ok(config)
}

fn build_pipeline(config: &AppConfig) -> Result<AnalysisPipeline> {
    let provider = config.provider.build().context("building data provider")?;
    Ok(AnalysisPipeline::new(MarketDataFetcher::new(provider))
        .with_periods_per_year(config.indicators.periods_per_year))
}

fn run_analyze(
    symbols: Vec<String>,
    window: Option<usize>,
    source: SourceArgs,
    format: OutputFormat,
    tail: Option<usize>,
    output_dir: Option<&Path>,
) -> Result<()> {
    if output_dir.is_none() && symbols.len() > 1 && format != OutputFormat::Table {
        bail!("--format {format:?} with several symbols needs --output DIR");
    }

    let config = load_config(&source)?;
    obs::init_tracing(&config.logging)?;
    let pipeline = build_pipeline(&config)?;

    let window = window.unwrap_or(config.request.window);
    let requests: Vec<AnalysisRequest> = symbols
        .iter()
        .map(|symbol| {
            AnalysisRequest::new(
                symbol.clone(),
                config.request.start_date,
                config.request.end_date,
            )
            .with_window(window)
        })
        .collect();

    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    tracing::info!(
        symbols = requests.len(),
        window,
        start = %config.request.start_date,
        end = %config.request.end_date,
        "analyze"
    );
    let results = pipeline.run_many(&requests);

    let mut failed = 0usize;
    let stdout = io::stdout();
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(series) => match output_dir {
                Some(dir) => {
                    let path = output_path(dir, &request.symbol, format);
                    write_enriched_file(&path, &series, format, tail)?;
                    println!("{}: {} rows -> {}", request.symbol, series.len(), path.display());
                }
                None => {
                    let mut lock = stdout.lock();
                    output::write_enriched(&series, format, tail, &mut lock)?;
                    if format == OutputFormat::Table {
                        writeln!(lock)?;
                    }
                }
            },
            Err(err) => {
                failed += 1;
                tracing::warn!(symbol = %request.symbol, kind = ?err.kind(), "analysis failed");
                eprintln!("Error for {}: {err}", request.symbol);
            }
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} symbols failed", requests.len());
        std::process::exit(1);
    }
    Ok(())
}

fn run_fetch(symbol: String, source: SourceArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(&source)?;
    obs::init_tracing(&config.logging)?;
    let pipeline = build_pipeline(&config)?;

    let series = pipeline
        .fetcher()
        .fetch(&symbol, config.request.start_date, config.request.end_date)
        .with_context(|| format!("fetching {symbol}"))?;

    output::write_prices(&series, format, io::stdout().lock())
}

/// Write one analyzed series to `path`, surfacing flush errors.
fn write_enriched_file(
    path: &Path,
    series: &EnrichedSeries,
    format: OutputFormat,
    tail: Option<usize>,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    output::write_enriched(series, format, tail, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// `<dir>/<SYMBOL>.<ext>` with path separators in the symbol replaced.
fn output_path(dir: &Path, symbol: &str, format: OutputFormat) -> PathBuf {
    let safe: String = symbol
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    dir.join(format!("{safe}.{}", format.extension()))
}
