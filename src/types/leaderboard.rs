use serde::{Deserialize, Serialize};
use std::fmt;

/// Leaderboard window selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFrame {
    #[default]
    #[serde(rename = "24H")]
    Day,
    #[serde(rename = "7D")]
    Week,
    #[serde(rename = "ALL")]
    AllTime,
}

impl TimeFrame {
    /// Get all timeframes in display order.
    pub fn all() -> [Self; 3] {
        [TimeFrame::Day, TimeFrame::Week, TimeFrame::AllTime]
    }

    /// Parse from the wire label (`24H`, `7D`, `ALL`), case-insensitive.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "24H" => Some(TimeFrame::Day),
            "7D" => Some(TimeFrame::Week),
            "ALL" => Some(TimeFrame::AllTime),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::Day => "24H",
            TimeFrame::Week => "7D",
            TimeFrame::AllTime => "ALL",
        }
    }

    /// Seed for the synthetic roster of this window.
    pub fn seed(&self) -> u32 {
        match self {
            TimeFrame::Day => 123,
            TimeFrame::Week => 456,
            TimeFrame::AllTime => 789,
        }
    }

    /// Games a player needs before the window considers them established.
    pub fn min_games(&self) -> u32 {
        match self {
            TimeFrame::Day => 20,
            TimeFrame::Week => 100,
            TimeFrame::AllTime => 500,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One ranked row. Recomputed on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Win percentage rounded to two decimals.
    pub accuracy: f64,
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub streak: u32,
    pub last_active: String,
    pub up_count: u32,
    pub down_count: u32,
    pub is_current_user: bool,
}
