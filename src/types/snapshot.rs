use super::{PlayerStats, PriceSample, Round, RoundPhase, StatsSummary, User};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the whole game, for display surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub price: PriceSample,
    pub phase: RoundPhase,
    pub round: Option<Round>,
    /// Countdown left in the active round; display only.
    pub remaining_ms: u64,
    pub user: Option<User>,
    pub stats: PlayerStats,
    pub summary: StatsSummary,
}
