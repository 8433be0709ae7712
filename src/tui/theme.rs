//! Colors for the TUI.

use crate::types::{GameResult, Prediction, Trend};
use ratatui::style::{Color, Modifier, Style};

/// Theme for the TUI with consistent color scheme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub up: Color,
    pub down: Color,
    pub neutral: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Yellow,
            accent: Color::Magenta,
            up: Color::Green,
            down: Color::Red,
            neutral: Color::Gray,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Get style for titles.
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for table headers.
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for muted text.
    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Get style for borders.
    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Highlight for the player's own leaderboard row.
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn trend(&self, trend: Trend) -> Style {
        let color = match trend {
            Trend::Up => self.up,
            Trend::Down => self.down,
            Trend::Equal => self.neutral,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn prediction(&self, prediction: Prediction) -> Style {
        match prediction {
            Prediction::Up => Style::default().fg(self.up),
            Prediction::Down => Style::default().fg(self.down),
        }
    }

    pub fn result(&self, result: GameResult) -> Style {
        match result {
            GameResult::Win => Style::default().fg(self.up).add_modifier(Modifier::BOLD),
            GameResult::Loss => Style::default().fg(self.down),
            GameResult::Draw => Style::default().fg(self.neutral),
        }
    }
}

/// Arrow glyph for a trend.
pub fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "▲",
        Trend::Down => "▼",
        Trend::Equal => "■",
    }
}
