pub mod game;
pub mod leaderboard;
pub mod price;
pub mod snapshot;
pub mod stats;
pub mod user;
pub mod ws;

pub use game::*;
pub use leaderboard::*;
pub use price::*;
pub use snapshot::*;
pub use stats::*;
pub use user::*;
pub use ws::*;
