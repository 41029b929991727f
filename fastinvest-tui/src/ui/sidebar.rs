//! Sidebar filter form: symbol select, date range, window, Analyze.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AnalysisState, FormField, ViewContext};

pub fn render(f: &mut Frame, area: Rect, ctx: &ViewContext) {
    let theme = ctx.theme;
    let form = ctx.form;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(true))
        .title(" Filters ")
        .title_style(theme.panel_title(true));

    let value_style = |field: FormField| {
        if form.focus == field {
            theme.highlight()
        } else {
            theme.text()
        }
    };

    let symbol = form.selected_symbol(ctx.symbols).unwrap_or("(none)");
    let mut lines = vec![
        Line::from(Span::styled(FormField::Symbol.label(), theme.label())),
        Line::from(Span::styled(
            format!("< {symbol} >"),
            value_style(FormField::Symbol),
        )),
        Line::from(""),
    ];
    for (field, text) in [
        (FormField::Start, &form.start),
        (FormField::End, &form.end),
        (FormField::Window, &form.window),
    ] {
        lines.push(Line::from(Span::styled(field.label(), theme.label())));
        let cursor = if form.focus == field { "_" } else { "" };
        lines.push(Line::from(Span::styled(
            format!("{text}{cursor}"),
            value_style(field),
        )));
        lines.push(Line::from(""));
    }

    let button_style = if form.focus == FormField::Analyze {
        Style::default()
            .fg(theme.background)
            .bg(theme.positive)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.positive)
    };
    lines.push(Line::from(Span::styled("[ Analyze ]", button_style)));

    if let AnalysisState::Running { .. } = ctx.analysis {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "running...",
            Style::default().fg(theme.warning),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
