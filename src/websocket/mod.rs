//! Push channel for browser clients.
//!
//! Price ticks and controller events fan out to every connected client;
//! clients may start rounds over the same socket.

mod handler;
mod registry;

pub use handler::ws_handler;
pub use registry::ClientRegistry;

use crate::services::{GameEvent, GameHandle};
use crate::types::ServerMessage;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

impl From<GameEvent> for ServerMessage {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::RoundStarted(round) => ServerMessage::RoundStarted { round },
            GameEvent::RoundSettled { record, stats } => {
                ServerMessage::RoundSettled { record, stats }
            }
            GameEvent::UserChanged(user) => ServerMessage::UserChanged { user },
        }
    }
}

/// Forward price ticks and game events to all connected clients.
pub fn spawn_broadcaster(game: GameHandle, clients: Arc<ClientRegistry>) -> Vec<JoinHandle<()>> {
    let price_task = {
        let mut prices = game.feed().subscribe();
        let clients = clients.clone();
        tokio::spawn(async move {
            while prices.changed().await.is_ok() {
                let sample = *prices.borrow_and_update();
                if clients.is_empty() {
                    continue;
                }
                let msg = ServerMessage::Price {
                    price: sample.price,
                    trend: sample.trend,
                };
                if let Ok(json) = serde_json::to_string(&msg) {
                    clients.broadcast(&json);
                }
            }
        })
    };

    let event_task = {
        let mut events = game.subscribe();
        tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Event broadcaster lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let msg = ServerMessage::from(event);
                if let Ok(json) = serde_json::to_string(&msg) {
                    let reached = clients.broadcast(&json);
                    debug!("Broadcast game event to {} clients", reached);
                }
            }
        })
    };

    vec![price_task, event_task]
}
