//! The application state for one local player.
//!
//! A session is the single writable working copy of user, stats and
//! history. It is owned by exactly one controller and mutated only through
//! these methods; callers persist after each mutation.

use super::{identity, leaderboard, round::RoundMachine, stats, store::SavedGame};
use crate::types::{
    GameRecord, GameSnapshot, LeaderboardEntry, PlayerStats, Prediction, PriceSample, ShareCard,
    StartOutcome, TimeFrame, User,
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::info;

#[derive(Debug)]
pub struct GameSession {
    user: Option<User>,
    stats: PlayerStats,
    history: Vec<GameRecord>,
    rounds: RoundMachine,
}

impl GameSession {
    pub fn new(saved: SavedGame, round_duration: Duration) -> Self {
        Self {
            user: saved.user,
            stats: saved.stats,
            history: saved.history,
            rounds: RoundMachine::new(round_duration),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn history(&self) -> &[GameRecord] {
        &self.history
    }

    pub fn rounds(&self) -> &RoundMachine {
        &self.rounds
    }

    pub fn start_round(
        &mut self,
        prediction: Prediction,
        current_price: f64,
        now: DateTime<Utc>,
    ) -> StartOutcome {
        self.rounds.start(prediction, current_price, now)
    }

    /// Settle the active round and fold it into stats and history.
    ///
    /// Returns `None` for stale or duplicate settlements.
    pub fn settle(
        &mut self,
        token: u64,
        latest_price: f64,
        now: DateTime<Utc>,
    ) -> Option<GameRecord> {
        let record = self.rounds.settle(token, latest_price, now)?;
        self.stats = stats::fold(&self.stats, &record);
        self.history.push(record.clone());
        info!(
            "Round settled: {} {} -> {} = {} (streak {})",
            record.prediction,
            record.start_price,
            record.end_price,
            record.result,
            self.stats.current_streak
        );
        Some(record)
    }

    /// Claim an identity from free-text input, replacing any previous one.
    /// Empty input leaves the session unchanged.
    pub fn claim_identity(&mut self, input: &str) -> Option<User> {
        let user = identity::claim(input)?;
        info!("Identity claimed: {}", user.handle);
        self.user = Some(user.clone());
        Some(user)
    }

    /// Forget the identity. Stats and history stay.
    pub fn logout(&mut self) -> Option<User> {
        self.user.take()
    }

    pub fn leaderboard(&self, timeframe: TimeFrame) -> Vec<LeaderboardEntry> {
        leaderboard::rank(timeframe, Some(&self.stats), self.user.as_ref())
    }

    pub fn share_card(&self, now: DateTime<Utc>) -> ShareCard {
        identity::share_card(self.user.as_ref(), &self.stats, now)
    }

    pub fn snapshot(&self, price: PriceSample, now: DateTime<Utc>) -> GameSnapshot {
        GameSnapshot {
            price,
            phase: self.rounds.phase(),
            round: self.rounds.active().cloned(),
            remaining_ms: self.rounds.remaining(now).as_millis() as u64,
            user: self.user.clone(),
            stats: self.stats,
            summary: stats::summarize(&self.stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameResult, RoundPhase};

    fn session() -> GameSession {
        GameSession::new(SavedGame::default(), Duration::from_millis(3000))
    }

    fn play(session: &mut GameSession, prediction: Prediction, start: f64, end: f64) -> GameRecord {
        let token = match session.start_round(prediction, start, Utc::now()) {
            StartOutcome::Started { round } => round.token,
            other => panic!("round did not start: {:?}", other),
        };
        session.settle(token, end, Utc::now()).unwrap()
    }

    #[test]
    fn test_settle_updates_stats_and_history() {
        let mut s = session();
        let record = play(&mut s, Prediction::Up, 100.0, 105.0);
        assert_eq!(record.result, GameResult::Win);
        assert_eq!(s.stats().wins, 1);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0], record);
    }

    #[test]
    fn test_duplicate_settle_records_once() {
        let mut s = session();
        let token = match s.start_round(Prediction::Down, 10.0, Utc::now()) {
            StartOutcome::Started { round } => round.token,
            _ => unreachable!(),
        };
        assert!(s.settle(token, 9.0, Utc::now()).is_some());
        assert!(s.settle(token, 9.0, Utc::now()).is_none());
        assert_eq!(s.stats().total_games, 1);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_identity_does_not_touch_stats() {
        let mut s = session();
        play(&mut s, Prediction::Up, 1.0, 2.0);
        let before = *s.stats();

        assert!(s.claim_identity("@frank").is_some());
        assert!(s.claim_identity("   ").is_none());
        assert_eq!(s.user().unwrap().handle, "@frank");

        assert_eq!(s.logout().unwrap().handle, "@frank");
        assert!(s.user().is_none());
        assert_eq!(*s.stats(), before);
    }

    #[test]
    fn test_leaderboard_includes_player_once_played() {
        let mut s = session();
        s.claim_identity("grace");
        assert!(s.leaderboard(TimeFrame::Day).iter().all(|e| !e.is_current_user));

        play(&mut s, Prediction::Up, 1.0, 2.0);
        let board = s.leaderboard(TimeFrame::Day);
        assert_eq!(board.iter().filter(|e| e.is_current_user).count(), 1);
    }

    #[test]
    fn test_snapshot_reflects_round() {
        let mut s = session();
        let now = Utc::now();
        s.start_round(Prediction::Up, 50.0, now);

        let snap = s.snapshot(PriceSample { price: 50.0, ..Default::default() }, now);
        assert_eq!(snap.phase, RoundPhase::Playing);
        assert_eq!(snap.remaining_ms, 3000);
        assert_eq!(snap.round.unwrap().start_price, 50.0);
    }
}
