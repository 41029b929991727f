//! The analyzed table: raw bar fields next to the indicator columns.
//!
//! Shows the most recent rows that fit; missing indicator values render
//! as a dash.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Text,
    widgets::{Cell, Row, Table, Widget},
};

use fastinvest_core::{EnrichedRow, EnrichedSeries};

use super::volume_scatter::compact_volume;
use super::{framed, render_empty, SeriesRenderer};
use crate::theme::Theme;

const MISSING: &str = "-";

#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesTable;

fn right(text: String) -> Text<'static> {
    Text::from(text).right_aligned()
}

fn table_row<'a>(row: &EnrichedRow, prev_close: Option<f64>, theme: &Theme) -> Row<'a> {
    let close_style = match prev_close {
        Some(prev) => Style::default().fg(theme.change_color(row.close - prev)),
        None => theme.text(),
    };
    let ma = row
        .moving_average
        .map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"));
    let vol = row
        .volatility
        .map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"));

    Row::new(vec![
        Cell::from(row.date.to_string()).style(theme.label()),
        Cell::from(right(format!("{:.2}", row.open))),
        Cell::from(right(format!("{:.2}", row.high))),
        Cell::from(right(format!("{:.2}", row.low))),
        Cell::from(right(format!("{:.2}", row.close))).style(close_style),
        Cell::from(right(compact_volume(row.volume as f64))),
        Cell::from(right(ma)).style(Style::default().fg(theme.warning)),
        Cell::from(right(vol)).style(Style::default().fg(theme.neutral)),
    ])
    .style(theme.text())
}

impl SeriesRenderer for SeriesTable {
    fn title(&self) -> &str {
        "Analyzed Data"
    }

    fn render(&self, series: &EnrichedSeries, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if series.is_empty() {
            render_empty(format!(" {} | {} ", self.title(), series.symbol), area, buf, theme);
            return;
        }

        // Borders and header take three rows.
        let capacity = (area.height.saturating_sub(3) as usize).min(series.len());
        let start = series.len() - capacity;
        let rows = series.rows();

        let title = format!(
            " {} | {} | rows {}-{} of {} ",
            self.title(),
            series.symbol,
            start + 1,
            series.len(),
            series.len()
        );

        let body: Vec<Row> = rows[start..]
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let prev = (start + i).checked_sub(1).map(|p| rows[p].close);
                table_row(row, prev, theme)
            })
            .collect();

        let header = Row::new(vec![
            Cell::from("Date"),
            Cell::from(right("Open".into())),
            Cell::from(right("High".into())),
            Cell::from(right("Low".into())),
            Cell::from(right("Close".into())),
            Cell::from(right("Volume".into())),
            Cell::from(right(format!("MA{}", series.window))),
            Cell::from(right("Vol".into())),
        ])
        .style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );

        let widths = [
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(9),
        ];

        Table::new(body, widths)
            .header(header)
            .column_spacing(1)
            .block(framed(title, theme))
            .render(area, buf);
    }
}
