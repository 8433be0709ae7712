//! Terminal UI for playing the game from a terminal.

mod app;
mod board;
mod events;
mod game;
mod theme;

pub use app::{run_tui, App, KeyAction};
pub use theme::Theme;

use crate::types::TimeFrame;

/// Lower panel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Leaderboard,
    History,
}

impl Panel {
    /// Get the panel name.
    pub fn name(&self) -> &str {
        match self {
            Self::Leaderboard => "Leaderboard",
            Self::History => "History",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Leaderboard => Self::History,
            Self::History => Self::Leaderboard,
        }
    }
}

/// Shortcut key for a leaderboard timeframe.
pub fn timeframe_key(timeframe: TimeFrame) -> char {
    match timeframe {
        TimeFrame::Day => '1',
        TimeFrame::Week => '2',
        TimeFrame::AllTime => '3',
    }
}
