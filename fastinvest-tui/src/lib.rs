//! FastInvest TUI: terminal dashboard over the analysis pipeline.
//!
//! - Home page with the latest analysis summary
//! - Charts page with a filter form and six interchangeable views
//! - Analysis on a background worker, stale answers dropped

pub mod app;
pub mod input;
pub mod renderers;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::{AppState, ViewContext};
pub use renderers::{ChartKind, SeriesRenderer};
pub use theme::Theme;
