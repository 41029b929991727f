//! Charts page: sidebar form on the left, selected view on the right.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::app::{AnalysisState, ViewContext};
use crate::renderers::ChartKind;

use super::sidebar;

const SIDEBAR_WIDTH: u16 = 26;

pub fn render(f: &mut Frame, area: Rect, ctx: &ViewContext) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(area);
    sidebar::render(f, columns[0], ctx);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(columns[1]);

    let theme = ctx.theme;
    let tabs = Tabs::new(ChartKind::ALL.iter().map(|k| k.label()))
        .select(ctx.chart.index())
        .style(theme.hint())
        .highlight_style(theme.highlight())
        .divider("|");
    f.render_widget(tabs, rows[0]);

    let view = rows[1];
    match ctx.analysis {
        AnalysisState::Ready { series, .. } => {
            ctx.chart
                .renderer()
                .render(series, view, f.buffer_mut(), theme);
        }
        AnalysisState::Running { request, .. } => {
            let text = format!("Fetching and analyzing {}...", request.symbol);
            message(f, view, ctx, text, theme.warning);
        }
        AnalysisState::Failed { message: msg, .. } => {
            message(f, view, ctx, msg.clone(), theme.negative);
        }
        AnalysisState::Idle => {
            message(
                f,
                view,
                ctx,
                "Choose a symbol and date range, then press Enter to analyze.".to_string(),
                theme.muted,
            );
        }
    }
}

fn message(f: &mut Frame, area: Rect, ctx: &ViewContext, text: String, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ctx.theme.panel_border(false))
        .title(format!(" {} ", ctx.chart.label()));
    let para = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}
