use super::{GameRecord, PlayerStats, Prediction, Round, StartOutcome, Trend, User};
use serde::{Deserialize, Serialize};

/// Incoming WebSocket message from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Lock in a prediction for a new round.
    StartRound { prediction: Prediction },
    /// Ask for a full state snapshot.
    GetState,
}

/// Outgoing WebSocket message to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Price {
        price: f64,
        trend: Trend,
    },
    RoundStarted {
        round: Round,
    },
    RoundSettled {
        record: GameRecord,
        stats: PlayerStats,
    },
    UserChanged {
        user: Option<User>,
    },
    StartResult {
        outcome: StartOutcome,
    },
    State {
        data: super::GameSnapshot,
    },
    Error {
        error: String,
    },
}
