//! bnb3s - three-second BNB/USDT price prediction game engine

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod tui;
pub mod types;
pub mod websocket;

use config::Config;
use services::GameHandle;
use std::sync::Arc;
use websocket::ClientRegistry;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub game: GameHandle,
    pub clients: Arc<ClientRegistry>,
}

// Re-export commonly used types
pub use types::*;
