//! Leaderboard ranking.
//!
//! Competitors are synthetic filler generated from `(seed, index)` alone, so
//! a timeframe always yields the same roster. The local player is merged in
//! from their live stats.

use super::stats::round_to;
use crate::types::{LeaderboardEntry, PlayerStats, TimeFrame, User};
use std::cmp::Ordering;

/// Number of synthetic competitors per board.
pub const SYNTHETIC_COUNT: usize = 15;

/// Accuracy gap (percentage points) within which entries count as tied.
pub const TIE_EPSILON: f64 = 0.01;

const NAME_PREFIXES: [&str; 8] = [
    "@crypto_king",
    "@bnb_whale",
    "@satoshi_v",
    "@trader_alpha",
    "@moon_boy",
    "@cz_fan",
    "@defi_degen",
    "@nft_collector",
];

/// Deterministic value in `[0, 1)` for a seed and index.
pub fn seeded_value(seed: u32, index: usize) -> f64 {
    let x = (f64::from(seed) + index as f64).sin() * 10000.0;
    x - x.floor()
}

/// Build the synthetic competitor at `index` for `timeframe`.
pub fn synthetic_entry(timeframe: TimeFrame, index: usize) -> LeaderboardEntry {
    let r = seeded_value(timeframe.seed(), index);

    let total_games = (r * 500.0).floor() as u32 + 50;
    let win_rate = 0.35 + r * 0.4;
    let wins = (f64::from(total_games) * win_rate).floor() as u32;
    let losses = total_games - wins;

    LeaderboardEntry {
        rank: 0,
        name: format!(
            "{}_{}",
            NAME_PREFIXES[index % NAME_PREFIXES.len()],
            (r * 100.0).floor() as u32
        ),
        handle: None,
        accuracy: round_to(f64::from(wins) / f64::from(total_games) * 100.0, 2),
        total_games,
        wins,
        losses,
        streak: (r * 12.0).floor() as u32,
        last_active: format!("{}m ago", (r * 50.0).floor() as u32 + 1),
        up_count: total_games / 2,
        down_count: total_games / 2,
        is_current_user: false,
    }
}

/// Entry for the local player, if they have played and claimed a handle.
pub fn player_entry(stats: &PlayerStats, user: &User) -> Option<LeaderboardEntry> {
    if stats.total_games == 0 {
        return None;
    }

    Some(LeaderboardEntry {
        rank: 0,
        name: user.handle.clone(),
        handle: Some(user.handle.clone()),
        accuracy: round_to(stats.accuracy(), 2),
        total_games: stats.total_games,
        wins: stats.wins,
        losses: stats.losses,
        streak: stats.max_streak,
        last_active: "Just now".to_string(),
        up_count: stats.up_count,
        down_count: stats.down_count,
        is_current_user: true,
    })
}

/// Ordering between two entries: accuracy descending, with near-equal
/// accuracy broken by wins descending.
pub fn standing(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    if (b.accuracy - a.accuracy).abs() > TIE_EPSILON {
        b.accuracy
            .partial_cmp(&a.accuracy)
            .unwrap_or(Ordering::Equal)
    } else {
        b.wins.cmp(&a.wins)
    }
}

/// Produce the ranked board for `timeframe`.
pub fn rank(
    timeframe: TimeFrame,
    stats: Option<&PlayerStats>,
    user: Option<&User>,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = (0..SYNTHETIC_COUNT)
        .map(|i| synthetic_entry(timeframe, i))
        .collect();

    if let (Some(stats), Some(user)) = (stats, user) {
        entries.extend(player_entry(stats, user));
    }

    sort_standings(&mut entries);

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
}

/// Stable insertion sort. The tie window makes `standing` non-transitive,
/// which the std sorts are allowed to reject.
fn sort_standings(entries: &mut [LeaderboardEntry]) {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && standing(&entries[j - 1], &entries[j]) == Ordering::Greater {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}
