//! Locally claimed player identity and the share-card projection.

use serde::{Deserialize, Serialize};

/// A claimed identity. Nothing verifies the handle belongs to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Handle without the leading `@`.
    pub name: String,
    /// Handle with the leading `@`.
    pub handle: String,
    /// Public avatar URL derived from the handle.
    pub avatar: String,
}

/// Static summary rendered into the shareable stats image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCard {
    pub handle: String,
    pub avatar: String,
    pub max_streak: u32,
    pub current_streak: u32,
    /// Win rate rounded to one decimal.
    pub win_rate: f64,
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    /// Calendar date the card was produced, `YYYY-MM-DD`.
    pub date: String,
}
