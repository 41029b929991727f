//! Bottom status bar: key hints and the last status message.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{Page, StatusLevel, ViewContext};

pub fn render(f: &mut Frame, area: Rect, ctx: &ViewContext) {
    let theme = ctx.theme;
    let hints = match ctx.page {
        Page::Home => " c:Charts q:Quit",
        Page::Charts => " Tab:Field Enter:Analyze [/]:View h:Home Esc:Quit",
    };

    let mut spans = vec![Span::styled(hints, theme.hint()), Span::raw(" | ")];
    if let Some((msg, level)) = ctx.status {
        let color = match level {
            StatusLevel::Info => theme.accent,
            StatusLevel::Warning => theme.warning,
            StatusLevel::Error => theme.negative,
        };
        spans.push(Span::styled(msg.as_str(), Style::default().fg(color)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
