//! Folding settled rounds into player statistics.

use crate::types::{
    stats::percentage, GameRecord, GameResult, PlayerStats, Prediction, StatsSummary,
};

/// Fold one settled round into `stats`.
///
/// Streak policy: a win extends the streak, a draw holds it, a loss resets
/// it to zero.
pub fn fold(stats: &PlayerStats, record: &GameRecord) -> PlayerStats {
    let win = u32::from(record.result == GameResult::Win);
    let loss = u32::from(record.result == GameResult::Loss);
    let draw = u32::from(record.result == GameResult::Draw);

    let current_streak = match record.result {
        GameResult::Win => stats.current_streak + 1,
        GameResult::Draw => stats.current_streak,
        GameResult::Loss => 0,
    };

    let mut next = PlayerStats {
        total_games: stats.total_games + 1,
        wins: stats.wins + win,
        losses: stats.losses + loss,
        draws: stats.draws + draw,
        current_streak,
        max_streak: stats.max_streak.max(current_streak),
        ..*stats
    };

    match record.prediction {
        Prediction::Up => {
            next.up_count += 1;
            next.up_wins += win;
            next.up_losses += loss;
        }
        Prediction::Down => {
            next.down_count += 1;
            next.down_wins += win;
            next.down_losses += loss;
        }
    }

    next
}

/// Rebuild statistics from a full history.
pub fn fold_history<'a, I>(records: I) -> PlayerStats
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    records
        .into_iter()
        .fold(PlayerStats::default(), |stats, record| fold(&stats, record))
}

/// Display figures derived from the aggregate.
pub fn summarize(stats: &PlayerStats) -> StatsSummary {
    StatsSummary {
        accuracy: round_to(stats.accuracy(), 2),
        win_rate: round_to(stats.accuracy(), 1),
        up_win_rate: round_to(percentage(stats.up_wins, stats.up_count), 1),
        down_win_rate: round_to(percentage(stats.down_wins, stats.down_count), 1),
        current_streak: stats.current_streak,
        max_streak: stats.max_streak,
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
