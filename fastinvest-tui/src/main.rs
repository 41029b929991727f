//! FastInvest dashboard binary.

use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use fastinvest_core::config::{AppConfig, LogFormat, LoggingConfig};
use fastinvest_core::{AnalysisPipeline, MarketDataFetcher};
use fastinvest_tui::app::AppState;
use fastinvest_tui::worker::{self, WorkerCommand};
use fastinvest_tui::{input, ui};

#[derive(Parser)]
#[command(name = "fastinvest-tui", about = "Stock dashboard: moving average and volatility")]
struct Args {
    /// Config file (default: <config dir>/fastinvest/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: <cache dir>/fastinvest/tui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fastinvest")
            .join("config.toml")
    });
    let config = AppConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let log_path = args.log_file.unwrap_or_else(|| {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fastinvest")
            .join("tui.log")
    });
    init_tracing(&config.logging, &log_path)?;
    tracing::info!(config = %config_path.display(), provider = ?config.provider.kind, "dashboard starting");

    let provider = config.provider.build().context("building data provider")?;
    let provider_name = provider.name().to_string();
    let pipeline = AnalysisPipeline::new(MarketDataFetcher::new(provider))
        .with_periods_per_year(config.indicators.periods_per_year);

    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(pipeline, cmd_rx, resp_tx).context("spawning analysis worker")?;

    let mut app = AppState::new(&config.request, provider_name, cmd_tx.clone(), resp_rx);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    drop(app);
    // A fetch in flight keeps the worker busy; don't block exit on it.
    if worker_handle.is_finished() {
        let _ = worker_handle.join();
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("dashboard stopped");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, &app.view_context()))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Logs go to a file; the terminal belongs to the dashboard.
fn init_tracing(logging: &LoggingConfig, log_path: &Path) -> Result<()> {
    let filter = std::env::var("FASTINVEST_LOG").unwrap_or_else(|_| logging.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .with_context(|| format!("invalid log filter '{filter}'"))?;

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}
