//! Handle claims. Nothing here verifies ownership of the handle.

use super::stats::summarize;
use crate::types::{PlayerStats, ShareCard, User};
use chrono::{DateTime, Utc};

/// Public avatar lookup service keyed by handle.
pub const AVATAR_BASE_URL: &str = "https://unavatar.io/twitter";

/// Fallback avatar when no identity is claimed.
pub const DEFAULT_AVATAR_URL: &str =
    "https://abs.twimg.com/sticky/default_profile_images/default_profile_normal.png";

/// Turn free-text input into an identity.
///
/// Surrounding whitespace and leading `@` are stripped; empty input yields
/// `None`.
pub fn claim(input: &str) -> Option<User> {
    let clean = input.trim().trim_start_matches('@').trim();
    if clean.is_empty() {
        return None;
    }

    Some(User {
        name: clean.to_string(),
        handle: format!("@{}", clean),
        avatar: format!("{}/{}", AVATAR_BASE_URL, clean),
    })
}

/// Read-only projection of the player for the shareable stats image.
pub fn share_card(user: Option<&User>, stats: &PlayerStats, now: DateTime<Utc>) -> ShareCard {
    let summary = summarize(stats);
    ShareCard {
        handle: user
            .map(|u| u.handle.clone())
            .unwrap_or_else(|| "@anonymous".to_string()),
        avatar: user
            .map(|u| u.avatar.clone())
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
        max_streak: stats.max_streak,
        current_streak: stats.current_streak,
        win_rate: summary.win_rate,
        total_games: stats.total_games,
        wins: stats.wins,
        losses: stats.losses,
        date: now.format("%Y-%m-%d").to_string(),
    }
}
