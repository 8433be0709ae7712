use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction a player calls for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Prediction {
    Up,
    Down,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Up => write!(f, "UP"),
            Prediction::Down => write!(f, "DOWN"),
        }
    }
}

/// Outcome of a settled round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Win => write!(f, "WIN"),
            GameResult::Loss => write!(f, "LOSS"),
            GameResult::Draw => write!(f, "DRAW"),
        }
    }
}

/// An active round, alive only while the machine is playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Monotonic token identifying this round; settlement must present it.
    pub token: u64,
    pub prediction: Prediction,
    pub start_price: f64,
    pub started_at: DateTime<Utc>,
}

/// Immutable record of a settled round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    /// Settlement time, unix milliseconds.
    pub timestamp: i64,
    pub prediction: Prediction,
    pub start_price: f64,
    pub end_price: f64,
    pub result: GameResult,
}

/// Coarse state of the round machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoundPhase {
    Idle,
    Playing,
}

/// Result of asking the machine to start a round.
///
/// Refusals are ordinary outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartOutcome {
    Started { round: Round },
    AlreadyPlaying,
    FeedNotReady,
}

impl StartOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started { .. })
    }
}
