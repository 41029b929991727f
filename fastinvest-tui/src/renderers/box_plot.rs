//! Box plot of closing prices - horizontal box-and-whisker.
//!
//! - Whiskers at the last closes inside 1.5 IQR of the quartiles
//! - Box from Q1 to Q3
//! - Median marker
//! - Outliers as dots beyond the whiskers

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use fastinvest_core::stats::CloseDistribution;
use fastinvest_core::EnrichedSeries;

use super::{framed, render_empty, SeriesRenderer};
use crate::theme::Theme;

const LABEL_WIDTH: u16 = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct CloseBoxPlot;

impl SeriesRenderer for CloseBoxPlot {
    fn title(&self) -> &str {
        "Close Box Plot"
    }

    fn render(&self, series: &EnrichedSeries, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let title = format!(" {} | {} ", self.title(), series.symbol);
        let dist = CloseDistribution::from_values(&series.closes());
        if dist.is_empty() {
            render_empty(title, area, buf, theme);
            return;
        }

        let block = framed(title, theme).border_style(Style::default().fg(theme.neutral));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 10 || inner.height < 3 {
            return;
        }

        let range = dist.max - dist.min;
        if range < 1e-12 {
            buf.set_string(
                inner.x,
                inner.y,
                format!("All closes = {:.2}", dist.median),
                theme.hint(),
            );
            return;
        }

        let plot_left = inner.x + LABEL_WIDTH;
        let plot_width = inner.width.saturating_sub(LABEL_WIDTH * 2);
        let val_to_x = |v: f64| -> u16 {
            let frac = ((v - dist.min) / range).clamp(0.0, 1.0);
            plot_left + (frac * plot_width.saturating_sub(1) as f64).round() as u16
        };

        // Row 0: marker labels
        let labels = [
            (dist.whisker_low, "Lo"),
            (dist.q1, "Q1"),
            (dist.median, "Med"),
            (dist.q3, "Q3"),
            (dist.whisker_high, "Hi"),
        ];
        let mut next_free = inner.x;
        for (val, lbl) in labels {
            let x = val_to_x(val).max(next_free);
            if x + lbl.len() as u16 <= inner.right() {
                buf.set_string(x, inner.y, lbl, theme.label());
                next_free = x + lbl.len() as u16 + 1;
            }
        }

        // Row 1: box line
        let box_y = inner.y + 1;
        let x_lo = val_to_x(dist.whisker_low);
        let x_q1 = val_to_x(dist.q1);
        let x_med = val_to_x(dist.median);
        let x_q3 = val_to_x(dist.q3);
        let x_hi = val_to_x(dist.whisker_high);

        let whisker_style = Style::default().fg(theme.muted);
        let box_style = Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD);
        let median_style = Style::default()
            .fg(theme.warning)
            .add_modifier(Modifier::BOLD);

        for x in x_lo..x_q1 {
            buf.set_string(x, box_y, "\u{2500}", whisker_style); // ─
        }
        buf.set_string(x_lo, box_y, "\u{251C}", whisker_style); // ├
        for x in (x_q3 + 1)..x_hi {
            buf.set_string(x, box_y, "\u{2500}", whisker_style);
        }
        buf.set_string(x_hi, box_y, "\u{2524}", whisker_style); // ┤

        for x in x_q1..=x_q3 {
            buf.set_string(x, box_y, "\u{2550}", box_style); // ═
        }
        buf.set_string(x_q1, box_y, "[", box_style);
        buf.set_string(x_q3, box_y, "]", box_style);
        buf.set_string(x_med, box_y, "\u{2502}", median_style); // │

        let outliers = dist.outliers();
        for v in &outliers {
            buf.set_string(
                val_to_x(*v),
                box_y,
                "\u{2022}", // •
                Style::default().fg(theme.negative),
            );
        }

        // Row 2: range and median values
        let val_y = inner.y + 2;
        let min_label = format!("{:.2}", dist.min);
        let max_label = format!("{:.2}", dist.max);
        let med_label = format!("{:.2}", dist.median);
        buf.set_string(plot_left, val_y, &min_label, theme.label());
        let right_x = inner.right().saturating_sub(max_label.len() as u16);
        if right_x > plot_left + min_label.len() as u16 {
            buf.set_string(right_x, val_y, &max_label, theme.label());
        }
        let med_x = x_med.saturating_sub(med_label.len() as u16 / 2);
        if med_x > plot_left + min_label.len() as u16
            && med_x + (med_label.len() as u16) < right_x
        {
            buf.set_string(med_x, val_y, &med_label, median_style);
        }

        // Row 4: summary
        let summary_y = inner.y + 4;
        if summary_y < inner.bottom() {
            let summary = format!(
                "n={}  mean={:.2}  Q1={:.2}  Q3={:.2}  IQR={:.2}  outliers={}",
                dist.count,
                dist.mean,
                dist.q1,
                dist.q3,
                dist.iqr(),
                outliers.len()
            );
            buf.set_stringn(
                inner.x,
                summary_y,
                summary,
                inner.width as usize,
                theme.text(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::test_support::{buffer_text, enriched};

    #[test]
    fn draws_box_and_median() {
        let theme = Theme::default();
        let closes: Vec<f64> = (1..=21).map(f64::from).collect();
        let series = enriched(&closes, 5);
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        CloseBoxPlot.render(&series, area, &mut buf, &theme);

        let text = buffer_text(&buf);
        assert!(text.contains('\u{2502}'));
        assert!(text.contains('['));
        assert!(text.contains(']'));
        assert!(text.contains("n=21"));
        assert!(text.contains("outliers=0"));
    }

    #[test]
    fn marks_outliers() {
        let theme = Theme::default();
        let mut closes = vec![10.0; 20];
        for (i, c) in closes.iter_mut().enumerate() {
            *c += (i % 5) as f64 * 0.1;
        }
        closes.push(100.0);
        let series = enriched(&closes, 5);
        let area = Rect::new(0, 0, 70, 10);
        let mut buf = Buffer::empty(area);
        CloseBoxPlot.render(&series, area, &mut buf, &theme);

        let text = buffer_text(&buf);
        assert!(text.contains('\u{2022}'));
        assert!(text.contains("outliers=1"));
    }

    #[test]
    fn flat_prices_report_single_value() {
        let theme = Theme::default();
        let series = enriched(&[7.5; 8], 3);
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        CloseBoxPlot.render(&series, area, &mut buf, &theme);
        assert!(buffer_text(&buf).contains("All closes = 7.50"));
    }
}
