//! Series renderers: interchangeable views over one `EnrichedSeries`.
//!
//! Every view the dashboard offers (line charts, histogram, box plot,
//! scatter, table) implements [`SeriesRenderer`] and draws straight into a
//! ratatui `Buffer`, so the chart page only needs to pick one.

mod box_plot;
mod histogram;
mod price_trend;
mod table;
mod volume_scatter;

pub use box_plot::CloseBoxPlot;
pub use histogram::CloseHistogram;
pub use price_trend::{PriceTrendChart, PriceVolatilityChart};
pub use table::SeriesTable;
pub use volume_scatter::VolumeScatter;

use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use fastinvest_core::EnrichedSeries;

use crate::theme::Theme;

/// Renders an enriched series into a buffer region.
pub trait SeriesRenderer {
    fn title(&self) -> &str;

    /// Must not panic for empty series or tiny areas.
    fn render(&self, series: &EnrichedSeries, area: Rect, buf: &mut Buffer, theme: &Theme);
}

/// The views selectable on the chart page, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    PriceTrend,
    PriceVolatility,
    Histogram,
    BoxPlot,
    VolumeScatter,
    Table,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::PriceTrend,
        ChartKind::PriceVolatility,
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::VolumeScatter,
        ChartKind::Table,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::PriceTrend => "Trend",
            ChartKind::PriceVolatility => "Volatility",
            ChartKind::Histogram => "Histogram",
            ChartKind::BoxPlot => "Box plot",
            ChartKind::VolumeScatter => "Volume",
            ChartKind::Table => "Table",
        }
    }

    pub fn renderer(self) -> Box<dyn SeriesRenderer> {
        match self {
            ChartKind::PriceTrend => Box::new(PriceTrendChart),
            ChartKind::PriceVolatility => Box::new(PriceVolatilityChart),
            ChartKind::Histogram => Box::new(CloseHistogram::default()),
            ChartKind::BoxPlot => Box::new(CloseBoxPlot),
            ChartKind::VolumeScatter => Box::new(VolumeScatter),
            ChartKind::Table => Box::new(SeriesTable),
        }
    }
}

pub(crate) fn framed<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.background))
}

/// Draw the frame with a centered "no data" note.
pub(crate) fn render_empty(title: String, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let block = framed(title, theme);
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }
    let note = Rect {
        y: inner.y + inner.height / 2,
        height: 1,
        ..inner
    };
    Paragraph::new(Span::styled("No data for this range", theme.hint()))
        .alignment(Alignment::Center)
        .render(note, buf);
}

/// Min and max of the finite values, padded 5% (or by 1.0 when flat).
pub(crate) fn padded_bounds(values: impl IntoIterator<Item = f64>) -> Option<[f64; 2]> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let range = hi - lo;
    let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
    Some([lo - pad, hi + pad])
}

/// First, middle and last dates as axis labels.
pub(crate) fn date_labels<'a>(dates: &[NaiveDate], theme: &Theme) -> Vec<Span<'a>> {
    let style = theme.label();
    match dates {
        [] => Vec::new(),
        [only] => vec![Span::styled(only.to_string(), style)],
        [first, .., last] => vec![
            Span::styled(first.to_string(), style),
            Span::styled(dates[dates.len() / 2].to_string(), style),
            Span::styled(last.to_string(), style),
        ],
    }
}

pub(crate) fn value_labels<'a>(bounds: [f64; 2], decimals: usize, theme: &Theme) -> Vec<Span<'a>> {
    let style = theme.label();
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::styled(format!("{v:.decimals$}"), style))
        .collect()
}

/// `(index, value)` points for the defined entries of a column.
pub(crate) fn indexed_points(values: &[Option<f64>]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}
