//! Game controller: the single owner of the player's session.
//!
//! All mutations arrive as [`Command`]s on one channel and are handled
//! strictly one at a time, so no locking is needed around the session. The
//! countdown is a single delayed `Settle` command tagged with the round
//! token; it is aborted whenever the round ends, and a late firing for an
//! older token is ignored by the round machine.

use super::{price_feed::PriceFeed, session::GameSession, store::GameRepository};
use crate::error::{AppError, Result};
use crate::types::{
    GameRecord, GameSnapshot, LeaderboardEntry, PlayerStats, Prediction, Round, ShareCard,
    StartOutcome, TimeFrame, User,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 256;

/// Requests handled by the controller.
#[derive(Debug)]
pub enum Command {
    StartRound {
        prediction: Prediction,
        reply: oneshot::Sender<StartOutcome>,
    },
    /// Fired by the countdown when the round's time is up.
    Settle { token: u64 },
    ClaimIdentity {
        input: String,
        reply: oneshot::Sender<Option<User>>,
    },
    Logout {
        reply: oneshot::Sender<Option<User>>,
    },
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
    Leaderboard {
        timeframe: TimeFrame,
        reply: oneshot::Sender<Vec<LeaderboardEntry>>,
    },
    History {
        reply: oneshot::Sender<Vec<GameRecord>>,
    },
    ShareCard {
        reply: oneshot::Sender<ShareCard>,
    },
}

/// State changes published to display surfaces.
#[derive(Debug, Clone)]
pub enum GameEvent {
    RoundStarted(Round),
    RoundSettled {
        record: GameRecord,
        stats: PlayerStats,
    },
    UserChanged(Option<User>),
}

pub struct GameController {
    session: GameSession,
    feed: Arc<PriceFeed>,
    repository: GameRepository,
    commands: mpsc::UnboundedReceiver<Command>,
    scheduler: mpsc::WeakUnboundedSender<Command>,
    events: broadcast::Sender<GameEvent>,
    countdown: Option<JoinHandle<()>>,
}

impl GameController {
    /// Load the saved game and start the controller task.
    pub fn spawn(
        feed: Arc<PriceFeed>,
        repository: GameRepository,
        round_duration: Duration,
    ) -> GameHandle {
        let saved = repository.load();
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let controller = Self {
            session: GameSession::new(saved, round_duration),
            feed: feed.clone(),
            repository,
            commands: rx,
            scheduler: tx.downgrade(),
            events: events.clone(),
            countdown: None,
        };
        tokio::spawn(controller.run());

        GameHandle { tx, events, feed }
    }

    async fn run(mut self) {
        info!("Game controller started");
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }
        self.cancel_countdown();
        info!("Game controller stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::StartRound { prediction, reply } => {
                let outcome = self.start_round(prediction);
                let _ = reply.send(outcome);
            }
            Command::Settle { token } => self.settle(token),
            Command::ClaimIdentity { input, reply } => {
                let user = self.session.claim_identity(&input);
                if user.is_some() {
                    self.repository.save_user(self.session.user());
                    self.publish(GameEvent::UserChanged(user.clone()));
                }
                let _ = reply.send(user);
            }
            Command::Logout { reply } => {
                let previous = self.session.logout();
                if previous.is_some() {
                    self.repository.save_user(None);
                    self.publish(GameEvent::UserChanged(None));
                }
                let _ = reply.send(previous);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot(self.feed.latest(), Utc::now()));
            }
            Command::Leaderboard { timeframe, reply } => {
                let _ = reply.send(self.session.leaderboard(timeframe));
            }
            Command::History { reply } => {
                let _ = reply.send(self.session.history().to_vec());
            }
            Command::ShareCard { reply } => {
                let _ = reply.send(self.session.share_card(Utc::now()));
            }
        }
    }

    fn start_round(&mut self, prediction: Prediction) -> StartOutcome {
        let outcome = self
            .session
            .start_round(prediction, self.feed.price(), Utc::now());

        match &outcome {
            StartOutcome::Started { round } => {
                self.schedule_settlement(round.token);
                self.publish(GameEvent::RoundStarted(round.clone()));
            }
            StartOutcome::AlreadyPlaying => debug!("Start ignored: round in progress"),
            StartOutcome::FeedNotReady => debug!("Start ignored: no price yet"),
        }
        outcome
    }

    fn schedule_settlement(&mut self, token: u64) {
        self.cancel_countdown();
        let scheduler = self.scheduler.clone();
        let delay = self.session.rounds().duration();

        self.countdown = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = scheduler.upgrade() {
                let _ = tx.send(Command::Settle { token });
            }
        }));
    }

    fn cancel_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.abort();
        }
    }

    fn settle(&mut self, token: u64) {
        let Some(record) = self.session.settle(token, self.feed.price(), Utc::now()) else {
            return;
        };
        self.cancel_countdown();

        self.repository.save_stats(self.session.stats());
        self.repository.save_history(self.session.history());

        self.publish(GameEvent::RoundSettled {
            record,
            stats: *self.session.stats(),
        });
    }

    fn publish(&self, event: GameEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        self.cancel_countdown();
    }
}

/// Cloneable front door to the controller task.
#[derive(Clone)]
pub struct GameHandle {
    tx: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<GameEvent>,
    feed: Arc<PriceFeed>,
}

impl GameHandle {
    pub async fn start_round(&self, prediction: Prediction) -> Result<StartOutcome> {
        self.request(|reply| Command::StartRound { prediction, reply })
            .await
    }

    pub async fn claim_identity(&self, input: impl Into<String>) -> Result<Option<User>> {
        let input = input.into();
        self.request(|reply| Command::ClaimIdentity { input, reply })
            .await
    }

    pub async fn logout(&self) -> Result<Option<User>> {
        self.request(|reply| Command::Logout { reply }).await
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn leaderboard(&self, timeframe: TimeFrame) -> Result<Vec<LeaderboardEntry>> {
        self.request(|reply| Command::Leaderboard { timeframe, reply })
            .await
    }

    pub async fn history(&self) -> Result<Vec<GameRecord>> {
        self.request(|reply| Command::History { reply }).await
    }

    pub async fn share_card(&self) -> Result<ShareCard> {
        self.request(|reply| Command::ShareCard { reply }).await
    }

    /// Subscribe to controller events.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// The price feed the controller settles against.
    pub fn feed(&self) -> &Arc<PriceFeed> {
        &self.feed
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .map_err(|_| AppError::Internal("game controller stopped".to_string()))?;
        rx.await
            .map_err(|_| AppError::Internal("game controller dropped request".to_string()))
    }
}
