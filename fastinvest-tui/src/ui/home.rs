//! Home page: welcome text and a summary of the latest analysis.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AnalysisState, ViewContext};

pub fn render(f: &mut Frame, area: Rect, ctx: &ViewContext) {
    let theme = ctx.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(true))
        .title(" Home ")
        .title_style(theme.panel_title(true));

    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to FastInvest",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Daily prices with a rolling moving average and annualized volatility.",
            theme.text(),
        )),
        Line::from(vec![
            Span::styled("Data source: ", theme.label()),
            Span::styled(ctx.provider, theme.text()),
        ]),
        Line::from(""),
    ];

    match ctx.analysis {
        AnalysisState::Ready { request, series } => {
            lines.push(Line::from(vec![
                Span::styled("Latest analysis: ", theme.label()),
                Span::styled(request.symbol.as_str(), theme.text()),
                Span::styled(
                    format!("  {} to {}", request.start_date, request.end_date),
                    theme.hint(),
                ),
            ]));
            match series.latest() {
                Some(row) => {
                    let ma = row
                        .moving_average
                        .map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
                    let vol = row
                        .volatility
                        .map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
                    lines.push(Line::from(vec![
                        Span::styled(format!("{}  ", row.date), theme.label()),
                        Span::styled(format!("close {:.2}  ", row.close), theme.text()),
                        Span::styled(
                            format!("MA{} {ma}  ", series.window),
                            Style::default().fg(theme.warning),
                        ),
                        Span::styled(format!("volatility {vol}"), Style::default().fg(theme.neutral)),
                    ]));
                }
                None => lines.push(Line::from(Span::styled(
                    "No trading days in the selected range.",
                    theme.hint(),
                ))),
            }
        }
        AnalysisState::Running { request, .. } => {
            lines.push(Line::from(Span::styled(
                format!("Analyzing {}...", request.symbol),
                Style::default().fg(theme.warning),
            )));
        }
        AnalysisState::Failed { message, .. } => {
            lines.push(Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(theme.negative),
            )));
        }
        AnalysisState::Idle => {
            lines.push(Line::from(Span::styled(
                "No analysis yet. Open Charts (F2), pick a symbol and press Enter.",
                theme.hint(),
            )));
        }
    }

    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}
