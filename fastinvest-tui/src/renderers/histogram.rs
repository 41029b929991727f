//! Histogram of closing prices.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use fastinvest_core::stats::{CloseDistribution, DEFAULT_HISTOGRAM_BINS};
use fastinvest_core::EnrichedSeries;

use super::{framed, render_empty, SeriesRenderer};
use crate::theme::Theme;

const COUNT_LABEL_WIDTH: u16 = 6;

#[derive(Debug, Clone, Copy)]
pub struct CloseHistogram {
    bins: usize,
}

impl CloseHistogram {
    pub fn new(bins: usize) -> Self {
        Self { bins: bins.max(1) }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }
}

impl Default for CloseHistogram {
    fn default() -> Self {
        Self::new(DEFAULT_HISTOGRAM_BINS)
    }
}

/// Fold bin counts onto `columns` screen columns. With more columns than
/// bins a bin spans several columns; with fewer, neighbouring bins sum.
fn column_counts(counts: &[usize], columns: usize) -> Vec<usize> {
    if counts.is_empty() || columns == 0 {
        return Vec::new();
    }
    let bins = counts.len();
    (0..columns)
        .map(|col| {
            let start = col * bins / columns;
            let end = ((col + 1) * bins / columns).max(start + 1).min(bins);
            counts[start..end].iter().sum()
        })
        .collect()
}

impl SeriesRenderer for CloseHistogram {
    fn title(&self) -> &str {
        "Close Distribution"
    }

    fn render(&self, series: &EnrichedSeries, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let dist = CloseDistribution::from_values(&series.closes());
        let title = format!(
            " {} | {} | {} bins | mean {:.2} ",
            self.title(),
            series.symbol,
            self.bins,
            dist.mean
        );
        if dist.is_empty() {
            render_empty(title, area, buf, theme);
            return;
        }

        let block = framed(title, theme);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width <= COUNT_LABEL_WIDTH + 1 || inner.height < 3 {
            return;
        }

        let plot_left = inner.x + COUNT_LABEL_WIDTH;
        let plot_width = inner.width - COUNT_LABEL_WIDTH;
        let plot_top = inner.y;
        let plot_height = inner.height - 1;
        let axis_y = inner.bottom() - 1;

        let counts: Vec<usize> = dist.histogram(self.bins).iter().map(|b| b.count).collect();
        let columns = column_counts(&counts, plot_width as usize);
        let max_count = columns.iter().copied().max().unwrap_or(0).max(1);

        let bar_style = Style::default().fg(theme.accent);
        for (i, &count) in columns.iter().enumerate() {
            let height =
                ((count as f64 / max_count as f64) * plot_height as f64).round() as u16;
            let x = plot_left + i as u16;
            for h in 0..height.min(plot_height) {
                buf.set_string(x, plot_top + plot_height - 1 - h, "\u{2588}", bar_style); // █
            }
        }

        // Count scale on the left.
        buf.set_string(
            inner.x,
            plot_top,
            format!("{max_count:>5}"),
            theme.label(),
        );
        buf.set_string(inner.x, axis_y.saturating_sub(1), format!("{:>5}", 0), theme.label());

        // Price range along the bottom.
        let min_label = format!("{:.2}", dist.min);
        let max_label = format!("{:.2}", dist.max);
        buf.set_string(plot_left, axis_y, &min_label, theme.label());
        let right_x = inner
            .right()
            .saturating_sub(max_label.len() as u16)
            .max(plot_left + min_label.len() as u16 + 1);
        if right_x + (max_label.len() as u16) <= inner.right() {
            buf.set_string(right_x, axis_y, &max_label, theme.label());
        }

        let median_label = format!("median {:.2}", dist.median);
        let mid_x = plot_left + plot_width / 2 - (median_label.len() as u16 / 2).min(plot_width / 2);
        if mid_x > plot_left + min_label.len() as u16
            && mid_x + (median_label.len() as u16) < right_x
        {
            buf.set_string(
                mid_x,
                axis_y,
                &median_label,
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::test_support::{buffer_text, enriched, wave};

    #[test]
    fn default_uses_fifty_bins() {
        assert_eq!(CloseHistogram::default().bins(), 50);
        assert_eq!(CloseHistogram::new(0).bins(), 1);
    }

    #[test]
    fn column_counts_preserve_total_when_folding() {
        let counts = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let folded = column_counts(&counts, 5);
        assert_eq!(folded, vec![3, 7, 11, 15, 19]);
    }

    #[test]
    fn column_counts_stretch_bins() {
        let folded = column_counts(&[4, 1], 4);
        assert_eq!(folded, vec![4, 4, 1, 1]);
    }

    #[test]
    fn tallest_bar_reaches_plot_top() {
        let theme = Theme::default();
        let series = enriched(&wave(300), 50);
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        CloseHistogram::default().render(&series, area, &mut buf, &theme);

        // Inner area starts at (1, 1); plot starts after the count labels.
        let top_row: String = (1 + COUNT_LABEL_WIDTH..79)
            .filter_map(|x| buf.cell((x, 1)).map(|c| c.symbol().to_string()))
            .collect();
        assert!(top_row.contains('\u{2588}'));
    }

    #[test]
    fn shows_price_range() {
        let theme = Theme::default();
        let series = enriched(&[10.0, 20.0, 30.0, 40.0], 2);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        CloseHistogram::default().render(&series, area, &mut buf, &theme);

        let text = buffer_text(&buf);
        assert!(text.contains("10.00"));
        assert!(text.contains("40.00"));
        assert!(text.contains("median 25.00"));
    }

    #[test]
    fn flat_prices_fill_one_bin() {
        let theme = Theme::default();
        let series = enriched(&[5.0; 12], 3);
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        CloseHistogram::default().render(&series, area, &mut buf, &theme);
        assert!(buffer_text(&buf).contains('\u{2588}'));
    }
}
