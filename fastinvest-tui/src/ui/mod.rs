//! Top-level UI layout: menu bar, active page, status bar.

pub mod charts;
pub mod home;
pub mod sidebar;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{Page, ViewContext};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, ctx: &ViewContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_menu(f, chunks[0], ctx);
    match ctx.page {
        Page::Home => home::render(f, chunks[1], ctx),
        Page::Charts => charts::render(f, chunks[1], ctx),
    }
    status_bar::render(f, chunks[2], ctx);
}

fn render_menu(f: &mut Frame, area: Rect, ctx: &ViewContext) {
    let theme = ctx.theme;
    let mut spans = vec![Span::styled(
        " FastInvest ",
        Style::default()
            .fg(theme.background)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )];
    for (key, page) in [("F1", Page::Home), ("F2", Page::Charts)] {
        spans.push(Span::raw("  "));
        let style = if page == ctx.page {
            theme.highlight()
        } else {
            theme.hint()
        };
        spans.push(Span::styled(format!("[{key}] {}", page.label()), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
pub(crate) fn render_to_text(ctx: &ViewContext, width: u16, height: u16) -> String {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| draw(f, ctx)).unwrap();
    crate::renderers::test_support::buffer_text(terminal.backend().buffer())
}
