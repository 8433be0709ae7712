pub mod controller;
pub mod identity;
pub mod leaderboard;
pub mod price_feed;
pub mod round;
pub mod session;
pub mod stats;
pub mod store;

pub use controller::{Command, GameController, GameEvent, GameHandle};
pub use price_feed::PriceFeed;
pub use round::{RoundMachine, ROUND_DURATION};
pub use session::GameSession;
pub use store::{GameRepository, KeyValueStore, MemoryStore, SavedGame, SqliteStore};
