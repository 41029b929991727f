//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels,
//! and rendering only ever sees a borrowed [`ViewContext`].

use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDate;

use fastinvest_core::config::RequestConfig;
use fastinvest_core::{AnalysisRequest, EnrichedSeries, ErrorKind, PipelineError};

use crate::renderers::ChartKind;
use crate::theme::Theme;
use crate::worker::{WorkerCommand, WorkerResponse};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;
const WINDOW_LEN: usize = 4;

/// Which page the navigation menu shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Charts,
}

impl Page {
    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Charts => "Charts",
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Focusable entries of the sidebar filter form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Symbol,
    Start,
    End,
    Window,
    Analyze,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Symbol,
        FormField::Start,
        FormField::End,
        FormField::Window,
        FormField::Analyze,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Symbol => "Symbol",
            FormField::Start => "Start date",
            FormField::End => "End date",
            FormField::Window => "Window",
            FormField::Analyze => "Analyze",
        }
    }
}

/// Sidebar filter form. Dates and window are kept as typed text and only
/// parsed when the user asks for an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    pub symbol_idx: usize,
    pub start: String,
    pub end: String,
    pub window: String,
    pub focus: FormField,
}

impl FilterForm {
    pub fn from_config(request: &RequestConfig, symbols: &[String]) -> Self {
        Self {
            symbol_idx: symbols
                .iter()
                .position(|s| *s == request.symbol)
                .unwrap_or(0),
            start: request.start_date.format(DATE_FORMAT).to_string(),
            end: request.end_date.format(DATE_FORMAT).to_string(),
            window: request.window.to_string(),
            focus: FormField::Symbol,
        }
    }

    pub fn selected_symbol<'a>(&self, symbols: &'a [String]) -> Option<&'a str> {
        symbols.get(self.symbol_idx).map(String::as_str)
    }

    pub fn cycle_symbol(&mut self, count: usize, forward: bool) {
        if count == 0 {
            return;
        }
        self.symbol_idx = if forward {
            (self.symbol_idx + 1) % count
        } else {
            (self.symbol_idx + count - 1) % count
        };
    }

    /// Text buffer under focus, with its length limit.
    pub fn focused_text_mut(&mut self) -> Option<(&mut String, usize)> {
        match self.focus {
            FormField::Start => Some((&mut self.start, DATE_LEN)),
            FormField::End => Some((&mut self.end, DATE_LEN)),
            FormField::Window => Some((&mut self.window, WINDOW_LEN)),
            FormField::Symbol | FormField::Analyze => None,
        }
    }

    /// Parse the form into a request. Window values are passed through
    /// unchecked beyond being whole numbers; the engine rejects zero.
    pub fn to_request(&self, symbols: &[String]) -> Result<AnalysisRequest, String> {
        let symbol = self
            .selected_symbol(symbols)
            .ok_or_else(|| "No symbol selected".to_string())?;
        let start = parse_date(&self.start, "Start date")?;
        let end = parse_date(&self.end, "End date")?;
        let window: usize = self
            .window
            .trim()
            .parse()
            .map_err(|_| format!("Window must be a whole number, got '{}'", self.window))?;
        Ok(AnalysisRequest::new(symbol, start, end).with_window(window))
    }
}

fn parse_date(text: &str, field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| format!("{field} must look like YYYY-MM-DD, got '{text}'"))
}

/// Lifecycle of the most recent analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Idle,
    Running {
        id: u64,
        request: AnalysisRequest,
    },
    Ready {
        request: AnalysisRequest,
        series: EnrichedSeries,
    },
    Failed {
        request: AnalysisRequest,
        message: String,
    },
}

impl AnalysisState {
    pub fn series(&self) -> Option<&EnrichedSeries> {
        match self {
            AnalysisState::Ready { series, .. } => Some(series),
            _ => None,
        }
    }

    pub fn request(&self) -> Option<&AnalysisRequest> {
        match self {
            AnalysisState::Idle => None,
            AnalysisState::Running { request, .. }
            | AnalysisState::Ready { request, .. }
            | AnalysisState::Failed { request, .. } => Some(request),
        }
    }
}

/// Everything a frame needs, borrowed from [`AppState`] for one draw.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub page: Page,
    pub chart: ChartKind,
    pub symbols: &'a [String],
    pub form: &'a FilterForm,
    pub analysis: &'a AnalysisState,
    pub status: Option<&'a (String, StatusLevel)>,
    pub provider: &'a str,
    pub theme: &'a Theme,
}

impl ViewContext<'_> {
    /// The request currently shown or in flight, if any.
    pub fn active_request(&self) -> Option<&AnalysisRequest> {
        self.analysis.request()
    }
}

/// Turn a pipeline failure into the line shown in the status bar.
pub fn user_message(err: &PipelineError) -> String {
    match err.kind() {
        ErrorKind::DataSourceUnavailable => {
            format!("Market data unavailable, try again later ({err})")
        }
        ErrorKind::InvalidSymbol => format!("Symbol not recognized: {err}"),
        ErrorKind::InvalidWindow => "Window must be at least 1".to_string(),
        ErrorKind::InvalidAnnualization => {
            "Annualization factor must be a positive number".to_string()
        }
    }
}

pub struct AppState {
    pub running: bool,
    pub page: Page,
    pub chart: ChartKind,
    pub symbols: Vec<String>,
    pub form: FilterForm,
    pub analysis: AnalysisState,
    pub status_message: Option<(String, StatusLevel)>,
    pub provider_name: String,
    pub theme: Theme,
    pub worker_rx: Receiver<WorkerResponse>,
    worker_tx: Sender<WorkerCommand>,
    next_request_id: u64,
}

impl AppState {
    pub fn new(
        request: &RequestConfig,
        provider_name: impl Into<String>,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let mut symbols = request.symbols.clone();
        if !symbols.contains(&request.symbol) {
            symbols.insert(0, request.symbol.clone());
        }
        let form = FilterForm::from_config(request, &symbols);

        Self {
            running: true,
            page: Page::Home,
            chart: ChartKind::PriceTrend,
            symbols,
            form,
            analysis: AnalysisState::Idle,
            status_message: None,
            provider_name: provider_name.into(),
            theme: Theme::default(),
            worker_rx,
            worker_tx,
            next_request_id: 0,
        }
    }

    pub fn view_context(&self) -> ViewContext<'_> {
        ViewContext {
            page: self.page,
            chart: self.chart,
            symbols: &self.symbols,
            form: &self.form,
            analysis: &self.analysis,
            status: self.status_message.as_ref(),
            provider: &self.provider_name,
            theme: &self.theme,
        }
    }

    /// Validate the form and hand the request to the worker. Any earlier
    /// request still in flight becomes stale.
    pub fn submit_analysis(&mut self) {
        let request = match self.form.to_request(&self.symbols) {
            Ok(request) => request,
            Err(msg) => {
                self.set_warning(msg);
                return;
            }
        };

        self.next_request_id += 1;
        let id = self.next_request_id;
        let command = WorkerCommand::Analyze {
            id,
            request: request.clone(),
        };
        if self.worker_tx.send(command).is_err() {
            tracing::error!("analysis worker is gone");
            self.set_error("Analysis worker stopped; restart the dashboard");
            return;
        }

        tracing::info!(id, symbol = %request.symbol, window = request.window, "analysis submitted");
        self.set_status(format!("Analyzing {}...", request.symbol));
        self.analysis = AnalysisState::Running { id, request };
        self.page = Page::Charts;
    }

    /// Apply a worker response. Returns false when it answers a request
    /// that is no longer the latest one.
    pub fn handle_worker_response(&mut self, resp: WorkerResponse) -> bool {
        let WorkerResponse::Analyzed { id, outcome } = resp;
        let request = match &self.analysis {
            AnalysisState::Running {
                id: current,
                request,
            } if *current == id => request.clone(),
            _ => {
                tracing::debug!(id, "discarding stale analysis response");
                return false;
            }
        };

        match outcome {
            Ok(series) => {
                if series.is_empty() {
                    self.set_warning(format!(
                        "No trading days for {} between {} and {}",
                        request.symbol, request.start_date, request.end_date
                    ));
                } else {
                    self.set_status(format!(
                        "{}: {} rows, {} with a full {}-day window",
                        series.symbol,
                        series.len(),
                        series.defined_moving_average_count(),
                        series.window
                    ));
                }
                self.analysis = AnalysisState::Ready { request, series };
            }
            Err(err) => {
                let message = user_message(&err);
                self.set_error(message.clone());
                self.analysis = AnalysisState::Failed { request, message };
            }
        }
        true
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::mpsc;

    use fastinvest_core::{analyze, AnalysisError, FetchError, PriceSeries};

    pub(crate) fn test_app() -> (AppState, Receiver<WorkerCommand>, Sender<WorkerResponse>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let request = RequestConfig {
            symbols: vec!["PETR4.SA".into(), "VALE3.SA".into()],
            ..RequestConfig::default()
        };
        (AppState::new(&request, "synthetic", cmd_tx, resp_rx), cmd_rx, resp_tx)
    }

    fn sent_id(rx: &Receiver<WorkerCommand>) -> u64 {
        match rx.try_recv().unwrap() {
            WorkerCommand::Analyze { id, .. } => id,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn form_starts_from_config() {
        let (app, _, _) = test_app();
        assert_eq!(app.form.start, "2020-01-01");
        assert_eq!(app.form.end, "2024-01-01");
        assert_eq!(app.form.window, "50");
        assert_eq!(app.form.selected_symbol(&app.symbols), Some("PETR4.SA"));
    }

    #[test]
    fn configured_symbol_joins_selector() {
        let (cmd_tx, _) = mpsc::channel();
        let (_, resp_rx) = mpsc::channel();
        let request = RequestConfig {
            symbol: "ITUB4.SA".into(),
            symbols: vec!["PETR4.SA".into()],
            ..RequestConfig::default()
        };
        let app = AppState::new(&request, "yahoo_finance", cmd_tx, resp_rx);
        assert_eq!(app.symbols, vec!["ITUB4.SA", "PETR4.SA"]);
        assert_eq!(app.form.symbol_idx, 0);
    }

    #[test]
    fn form_field_cycle() {
        assert_eq!(FormField::Symbol.next(), FormField::Start);
        assert_eq!(FormField::Analyze.next(), FormField::Symbol);
        assert_eq!(FormField::Symbol.prev(), FormField::Analyze);
    }

    #[test]
    fn symbol_cycle_wraps() {
        let (mut app, _, _) = test_app();
        app.form.cycle_symbol(2, true);
        assert_eq!(app.form.selected_symbol(&app.symbols), Some("VALE3.SA"));
        app.form.cycle_symbol(2, true);
        assert_eq!(app.form.symbol_idx, 0);
        app.form.cycle_symbol(2, false);
        assert_eq!(app.form.symbol_idx, 1);
    }

    #[test]
    fn bad_date_is_a_warning_and_sends_nothing() {
        let (mut app, cmd_rx, _) = test_app();
        app.form.start = "2020-13-01".into();
        app.submit_analysis();
        assert!(cmd_rx.try_recv().is_err());
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Warning);
        assert!(msg.contains("Start date"));
        assert_eq!(app.analysis, AnalysisState::Idle);
    }

    #[test]
    fn zero_window_reaches_the_engine() {
        let (mut app, cmd_rx, _) = test_app();
        app.form.window = "0".into();
        app.submit_analysis();
        match cmd_rx.try_recv().unwrap() {
            WorkerCommand::Analyze { request, .. } => assert_eq!(request.window, 0),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn submit_moves_to_charts_and_runs() {
        let (mut app, cmd_rx, _) = test_app();
        app.submit_analysis();
        assert_eq!(sent_id(&cmd_rx), 1);
        assert_eq!(app.page, Page::Charts);
        assert!(matches!(app.analysis, AnalysisState::Running { id: 1, .. }));
    }

    #[test]
    fn stale_response_is_discarded() {
        let (mut app, cmd_rx, _) = test_app();
        app.submit_analysis();
        app.submit_analysis();
        assert_eq!(sent_id(&cmd_rx), 1);
        assert_eq!(sent_id(&cmd_rx), 2);

        let stale = WorkerResponse::Analyzed {
            id: 1,
            outcome: Ok(analyze(&PriceSeries::empty("PETR4.SA"), 50).unwrap()),
        };
        assert!(!app.handle_worker_response(stale));
        assert!(matches!(app.analysis, AnalysisState::Running { id: 2, .. }));
    }

    #[test]
    fn empty_result_is_success_with_warning() {
        let (mut app, _cmd_rx, _) = test_app();
        app.submit_analysis();
        let resp = WorkerResponse::Analyzed {
            id: 1,
            outcome: Ok(analyze(&PriceSeries::empty("PETR4.SA"), 50).unwrap()),
        };
        assert!(app.handle_worker_response(resp));
        assert!(app.analysis.series().is_some());
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Warning);
        assert!(msg.contains("No trading days"));
    }

    #[test]
    fn errors_become_status_messages() {
        let (mut app, _cmd_rx, _) = test_app();
        app.submit_analysis();
        let resp = WorkerResponse::Analyzed {
            id: 1,
            outcome: Err(PipelineError::Fetch(FetchError::invalid_symbol("PETR4.SA"))),
        };
        assert!(app.handle_worker_response(resp));
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Error);
        assert!(msg.contains("PETR4.SA"));
        assert!(matches!(app.analysis, AnalysisState::Failed { .. }));
    }

    #[test]
    fn user_messages_cover_each_kind() {
        let window = user_message(&PipelineError::Analysis(AnalysisError::InvalidWindow {
            window: 0,
        }));
        assert!(window.contains("Window"));
        let outage = user_message(&PipelineError::Fetch(FetchError::unavailable(
            "yahoo_finance",
            "timeout",
        )));
        assert!(outage.contains("unavailable"));
    }

    #[test]
    fn view_context_exposes_active_request() {
        let (mut app, _cmd_rx, _) = test_app();
        assert!(app.view_context().active_request().is_none());
        app.submit_analysis();
        let ctx = app.view_context();
        assert_eq!(ctx.active_request().map(|r| r.symbol.as_str()), Some("PETR4.SA"));
        assert_eq!(ctx.provider, "synthetic");
    }
}
