//! Scatter of traded volume against date.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

use fastinvest_core::EnrichedSeries;

use super::{date_labels, framed, render_empty, SeriesRenderer};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeScatter;

/// `1234` -> `1.2K`, `5_600_000` -> `5.6M`.
pub(crate) fn compact_volume(volume: f64) -> String {
    match volume.abs() {
        v if v >= 1e9 => format!("{:.1}B", volume / 1e9),
        v if v >= 1e6 => format!("{:.1}M", volume / 1e6),
        v if v >= 1e3 => format!("{:.1}K", volume / 1e3),
        _ => format!("{volume:.0}"),
    }
}

impl SeriesRenderer for VolumeScatter {
    fn title(&self) -> &str {
        "Volume by Date"
    }

    fn render(&self, series: &EnrichedSeries, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let title = format!(" {} | {} ", self.title(), series.symbol);
        if series.is_empty() {
            render_empty(title, area, buf, theme);
            return;
        }

        let points: Vec<(f64, f64)> = series
            .volumes()
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as f64, v as f64))
            .collect();

        let peak = points.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max);
        let y_upper = if peak > 0.0 { peak * 1.05 } else { 1.0 };
        let label_style = theme.label();
        let y_labels = vec![
            Span::styled("0", label_style),
            Span::styled(compact_volume(y_upper / 2.0), label_style),
            Span::styled(compact_volume(y_upper), label_style),
        ];

        let dates = series.dates();
        let datasets = vec![Dataset::default()
            .name("Volume")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.neutral))
            .data(&points)];

        Chart::new(datasets)
            .block(framed(title, theme))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(theme.muted))
                    .bounds([0.0, series.len().saturating_sub(1).max(1) as f64])
                    .labels(date_labels(&dates, theme)),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(theme.muted))
                    .bounds([0.0, y_upper])
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::test_support::{buffer_text, enriched, wave};

    #[test]
    fn compact_volume_units() {
        assert_eq!(compact_volume(950.0), "950");
        assert_eq!(compact_volume(1_234.0), "1.2K");
        assert_eq!(compact_volume(5_600_000.0), "5.6M");
        assert_eq!(compact_volume(2_100_000_000.0), "2.1B");
    }

    #[test]
    fn scatter_labels_volume_scale_and_dates() {
        let theme = Theme::default();
        let series = enriched(&wave(60), 10);
        let area = Rect::new(0, 0, 100, 25);
        let mut buf = Buffer::empty(area);
        VolumeScatter.render(&series, area, &mut buf, &theme);

        let text = buffer_text(&buf);
        assert!(text.contains("Volume by Date"));
        assert!(text.contains("2023-01-02"));
        assert!(text.contains('K'));
    }
}
