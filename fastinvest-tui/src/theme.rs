//! Parrot/neon theme tokens for the dashboard
//!
//! - **Background**: deep charcoal
//! - **Accent**: electric cyan (close price, focus)
//! - **Positive** / **Negative**: neon green / hot pink (up and down moves)
//! - **Warning**: neon orange (moving average, alerts)
//! - **Neutral**: cool purple (volatility, secondary series)
//! - **Muted**: steel blue (axes, hints, disabled)

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Green for a non-negative change, pink otherwise.
    pub fn change_color(&self, change: f64) -> Color {
        if change >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn panel_title(&self, focused: bool) -> Style {
        let style = self.panel_border(focused);
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::REVERSED)
    }
}
