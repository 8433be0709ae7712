use serde::{Deserialize, Serialize};

/// Cumulative statistics for the local player.
///
/// `total_games == wins + losses + draws` and
/// `up_count + down_count == total_games` hold after every fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub up_count: u32,
    pub up_wins: u32,
    pub up_losses: u32,
    pub down_count: u32,
    pub down_wins: u32,
    pub down_losses: u32,
}

impl PlayerStats {
    /// Win percentage over all games, 0 when nothing has been played.
    pub fn accuracy(&self) -> f64 {
        percentage(self.wins, self.total_games)
    }
}

/// Display-ready projection of [`PlayerStats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Win percentage rounded to two decimals.
    pub accuracy: f64,
    /// Win percentage rounded to one decimal, as shown on the share card.
    pub win_rate: f64,
    pub up_win_rate: f64,
    pub down_win_rate: f64,
    pub current_streak: u32,
    pub max_streak: u32,
}

pub(crate) fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}
