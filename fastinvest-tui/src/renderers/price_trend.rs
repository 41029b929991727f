//! Price line charts: close with its moving average, optionally with a
//! volatility strip underneath.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

use fastinvest_core::EnrichedSeries;

use super::{
    date_labels, framed, indexed_points, padded_bounds, render_empty, value_labels,
    SeriesRenderer,
};
use crate::theme::Theme;

/// Close and moving average on one line chart.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceTrendChart;

/// Close and moving average above, annualized volatility below.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceVolatilityChart;

fn x_bounds(series: &EnrichedSeries) -> [f64; 2] {
    [0.0, series.len().saturating_sub(1).max(1) as f64]
}

fn render_price(series: &EnrichedSeries, title: String, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let closes: Vec<(f64, f64)> = series
        .closes()
        .into_iter()
        .enumerate()
        .map(|(i, c)| (i as f64, c))
        .collect();
    let averages = indexed_points(&series.moving_average());

    let Some(y_bounds) = padded_bounds(closes.iter().chain(&averages).map(|&(_, v)| v)) else {
        render_empty(title, area, buf, theme);
        return;
    };

    let ma_name = format!("MA{}", series.window);
    let datasets = vec![
        Dataset::default()
            .name("Close")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.accent))
            .data(&closes),
        Dataset::default()
            .name(ma_name)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.warning))
            .data(&averages),
    ];

    let dates = series.dates();
    Chart::new(datasets)
        .block(framed(title, theme))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.muted))
                .bounds(x_bounds(series))
                .labels(date_labels(&dates, theme)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Close", theme.label()))
                .style(Style::default().fg(theme.muted))
                .bounds(y_bounds)
                .labels(value_labels(y_bounds, 2, theme)),
        )
        .render(area, buf);
}

fn render_volatility(series: &EnrichedSeries, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let title = format!(" Volatility ({}d, annualized) ", series.window);
    let points = indexed_points(&series.volatility());

    let Some(y_bounds) = padded_bounds(points.iter().map(|&(_, v)| v)) else {
        let block = framed(title, theme);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width > 0 && inner.height > 0 {
            buf.set_string(
                inner.x,
                inner.y,
                "Not enough history for a full window",
                theme.hint(),
            );
        }
        return;
    };
    let y_bounds = [y_bounds[0].max(0.0), y_bounds[1]];

    let latest = points.last().map(|&(_, v)| v).unwrap_or_default();
    let datasets = vec![Dataset::default()
        .name(format!("{latest:.2}"))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.neutral))
        .data(&points)];

    Chart::new(datasets)
        .block(framed(title, theme).border_style(Style::default().fg(theme.neutral)))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.muted))
                .bounds(x_bounds(series)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.muted))
                .bounds(y_bounds)
                .labels(value_labels(y_bounds, 2, theme)),
        )
        .render(area, buf);
}

impl SeriesRenderer for PriceTrendChart {
    fn title(&self) -> &str {
        "Close & Moving Average"
    }

    fn render(&self, series: &EnrichedSeries, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let title = format!(" {} | {} ", self.title(), series.symbol);
        if series.is_empty() {
            render_empty(title, area, buf, theme);
            return;
        }
        render_price(series, title, area, buf, theme);
    }
}

impl SeriesRenderer for PriceVolatilityChart {
    fn title(&self) -> &str {
        "Price & Volatility"
    }

    fn render(&self, series: &EnrichedSeries, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let title = format!(" {} | {} ", self.title(), series.symbol);
        if series.is_empty() {
            render_empty(title, area, buf, theme);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        render_price(series, title, chunks[0], buf, theme);
        render_volatility(series, chunks[1], buf, theme);
    }
}
