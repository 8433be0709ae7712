//! Round lifecycle: IDLE -> PLAYING -> IDLE.
//!
//! The machine is synchronous and clock-free; callers pass `now` and the
//! latest price in. Scheduling the settlement is the controller's job.

use crate::types::{
    is_valid_price, GameRecord, GameResult, Prediction, Round, RoundPhase, StartOutcome,
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Default countdown for one round.
pub const ROUND_DURATION: Duration = Duration::from_millis(3000);

/// Decide a round by strict comparison of end against start.
pub fn judge(prediction: Prediction, start_price: f64, end_price: f64) -> GameResult {
    if end_price > start_price {
        match prediction {
            Prediction::Up => GameResult::Win,
            Prediction::Down => GameResult::Loss,
        }
    } else if end_price < start_price {
        match prediction {
            Prediction::Down => GameResult::Win,
            Prediction::Up => GameResult::Loss,
        }
    } else {
        GameResult::Draw
    }
}

/// Holds at most one active round.
#[derive(Debug)]
pub struct RoundMachine {
    active: Option<Round>,
    last_token: u64,
    duration: Duration,
}

impl RoundMachine {
    pub fn new(duration: Duration) -> Self {
        Self {
            active: None,
            last_token: 0,
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn phase(&self) -> RoundPhase {
        if self.active.is_some() {
            RoundPhase::Playing
        } else {
            RoundPhase::Idle
        }
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Round> {
        self.active.as_ref()
    }

    /// Lock in a prediction at `current_price`.
    ///
    /// No-op while a round is active or while the feed has no price.
    pub fn start(
        &mut self,
        prediction: Prediction,
        current_price: f64,
        now: DateTime<Utc>,
    ) -> StartOutcome {
        if self.active.is_some() {
            return StartOutcome::AlreadyPlaying;
        }
        if !is_valid_price(current_price) {
            return StartOutcome::FeedNotReady;
        }

        self.last_token += 1;
        let round = Round {
            token: self.last_token,
            prediction,
            start_price: current_price,
            started_at: now,
        };
        debug!(
            "Round {} started: {} at {}",
            round.token, prediction, current_price
        );
        self.active = Some(round.clone());
        StartOutcome::Started { round }
    }

    /// Countdown left at `now`; zero when idle. Display only.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match &self.active {
            Some(round) => {
                let elapsed = (now - round.started_at).to_std().unwrap_or_default();
                self.duration.saturating_sub(elapsed)
            }
            None => Duration::ZERO,
        }
    }

    /// Settle the round identified by `token`.
    ///
    /// Returns `None` when idle or when `token` belongs to an earlier round,
    /// so late or duplicate timer firings are inert. An unready
    /// `latest_price` falls back to the start price, which settles as a draw.
    pub fn settle(
        &mut self,
        token: u64,
        latest_price: f64,
        now: DateTime<Utc>,
    ) -> Option<GameRecord> {
        match &self.active {
            Some(round) if round.token == token => {}
            _ => {
                debug!("Ignoring stale settlement for round {}", token);
                return None;
            }
        }
        let round = self.active.take()?;

        let end_price = if is_valid_price(latest_price) {
            latest_price
        } else {
            round.start_price
        };

        Some(GameRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: now.timestamp_millis(),
            prediction: round.prediction,
            start_price: round.start_price,
            end_price,
            result: judge(round.prediction, round.start_price, end_price),
        })
    }
}

impl Default for RoundMachine {
    fn default() -> Self {
        Self::new(ROUND_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn started(machine: &mut RoundMachine, prediction: Prediction, price: f64) -> Round {
        match machine.start(prediction, price, Utc::now()) {
            StartOutcome::Started { round } => round,
            other => panic!("expected a started round, got {:?}", other),
        }
    }

    #[test]
    fn test_judge_scenarios() {
        assert_eq!(judge(Prediction::Up, 100.0, 105.0), GameResult::Win);
        assert_eq!(judge(Prediction::Down, 100.0, 100.0), GameResult::Draw);
        assert_eq!(judge(Prediction::Up, 50.0, 49.99), GameResult::Loss);
        assert_eq!(judge(Prediction::Down, 50.0, 49.99), GameResult::Win);
        assert_eq!(judge(Prediction::Down, 50.0, 50.01), GameResult::Loss);
        assert_eq!(judge(Prediction::Up, 7.0, 7.0), GameResult::Draw);
    }

    #[test]
    fn test_start_locks_price_and_prediction() {
        let mut machine = RoundMachine::default();
        let round = started(&mut machine, Prediction::Up, 612.3);
        assert_eq!(round.start_price, 612.3);
        assert_eq!(round.prediction, Prediction::Up);
        assert_eq!(machine.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_start_while_playing_is_noop() {
        let mut machine = RoundMachine::default();
        let first = started(&mut machine, Prediction::Up, 10.0);

        let outcome = machine.start(Prediction::Down, 11.0, Utc::now());
        assert_eq!(outcome, StartOutcome::AlreadyPlaying);
        assert_eq!(machine.active(), Some(&first));
    }

    #[test]
    fn test_start_without_price_is_noop() {
        let mut machine = RoundMachine::default();
        assert_eq!(
            machine.start(Prediction::Up, 0.0, Utc::now()),
            StartOutcome::FeedNotReady
        );
        assert_eq!(machine.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_settle_uses_latest_price() {
        let mut machine = RoundMachine::default();
        let round = started(&mut machine, Prediction::Up, 100.0);

        let record = machine.settle(round.token, 105.0, Utc::now()).unwrap();
        assert_eq!(record.end_price, 105.0);
        assert_eq!(record.result, GameResult::Win);
        assert_eq!(machine.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_settle_unready_feed_is_draw() {
        let mut machine = RoundMachine::default();
        let round = started(&mut machine, Prediction::Down, 42.0);

        let record = machine.settle(round.token, 0.0, Utc::now()).unwrap();
        assert_eq!(record.end_price, 42.0);
        assert_eq!(record.result, GameResult::Draw);
    }

    #[test]
    fn test_settle_is_idempotent() {
        let mut machine = RoundMachine::default();
        let round = started(&mut machine, Prediction::Up, 1.0);

        assert!(machine.settle(round.token, 2.0, Utc::now()).is_some());
        assert!(machine.settle(round.token, 2.0, Utc::now()).is_none());
    }

    #[test]
    fn test_stale_token_cannot_settle_new_round() {
        let mut machine = RoundMachine::default();
        let first = started(&mut machine, Prediction::Up, 1.0);
        machine.settle(first.token, 2.0, Utc::now());

        let second = started(&mut machine, Prediction::Down, 2.0);
        assert!(second.token > first.token);
        assert!(machine.settle(first.token, 1.0, Utc::now()).is_none());
        assert!(machine.is_playing());
    }

    #[test]
    fn test_remaining_counts_down_to_zero() {
        let mut machine = RoundMachine::new(Duration::from_millis(3000));
        let start = Utc::now();
        machine.start(Prediction::Up, 5.0, start);

        assert_eq!(machine.remaining(start), Duration::from_millis(3000));
        assert_eq!(
            machine.remaining(start + ChronoDuration::milliseconds(1200)),
            Duration::from_millis(1800)
        );
        assert_eq!(
            machine.remaining(start + ChronoDuration::milliseconds(4000)),
            Duration::ZERO
        );
        // A clock that reads earlier than the start never exceeds the duration.
        assert_eq!(
            machine.remaining(start - ChronoDuration::milliseconds(500)),
            Duration::from_millis(3000)
        );
    }

    #[test]
    fn test_remaining_idle_is_zero() {
        let machine = RoundMachine::default();
        assert_eq!(machine.remaining(Utc::now()), Duration::ZERO);
    }
}
