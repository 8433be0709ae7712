//! Persistence for the player's identity, statistics and history.
//!
//! Three independent keys, each read at startup (absent or unreadable means
//! default) and rewritten after the mutation that touches it. Writes are
//! last-write-wins and failures never reach gameplay.

use crate::error::{AppError, Result};
use crate::types::{GameRecord, PlayerStats, User};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub const USER_KEY: &str = "bnb_game_user";
pub const STATS_KEY: &str = "bnb_game_stats";
pub const HISTORY_KEY: &str = "bnb_game_history";

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite-backed key-value store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.lock()?.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Storage("sqlite connection lock poisoned".to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .lock()?
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();
        self.lock()?.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Volatile store, used when no database is available and in tests.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Everything restored at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedGame {
    pub user: Option<User>,
    pub stats: PlayerStats,
    pub history: Vec<GameRecord>,
}

/// Typed load/save over a [`KeyValueStore`].
#[derive(Clone)]
pub struct GameRepository {
    store: Arc<dyn KeyValueStore>,
}

impl GameRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Repository over a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read each key independently; missing or corrupt keys load as default.
    pub fn load(&self) -> SavedGame {
        let saved = SavedGame {
            user: self.read(USER_KEY),
            stats: self.read(STATS_KEY).unwrap_or_default(),
            history: self.read(HISTORY_KEY).unwrap_or_default(),
        };
        info!(
            "Loaded saved game: {} games, {} history records, user {}",
            saved.stats.total_games,
            saved.history.len(),
            saved
                .user
                .as_ref()
                .map(|u| u.handle.as_str())
                .unwrap_or("none")
        );
        saved
    }

    /// Persist the identity; `None` removes the key.
    pub fn save_user(&self, user: Option<&User>) {
        match user {
            Some(user) => self.write(USER_KEY, user),
            None => {
                if let Err(e) = self.store.remove(USER_KEY) {
                    warn!("Failed to remove {}: {}", USER_KEY, e);
                }
            }
        }
    }

    pub fn save_stats(&self, stats: &PlayerStats) {
        self.write(STATS_KEY, stats);
    }

    pub fn save_history(&self, history: &[GameRecord]) {
        self.write(HISTORY_KEY, history);
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding unreadable {}: {}", key, e);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set(key, &json) {
            warn!("Failed to write {}: {}", key, e);
        } else {
            debug!("Saved {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameResult, Prediction};

    #[test]
    fn test_sqlite_set_get_remove() {
        let store = SqliteStore::new_in_memory().unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_repository_empty_loads_defaults() {
        let repo = GameRepository::in_memory();
        assert_eq!(repo.load(), SavedGame::default());
    }

    #[test]
    fn test_repository_roundtrip() {
        let repo = GameRepository::new(Arc::new(SqliteStore::new_in_memory().unwrap()));
        let user = User {
            name: "dave".to_string(),
            handle: "@dave".to_string(),
            avatar: "https://unavatar.io/twitter/dave".to_string(),
        };
        let record = GameRecord {
            id: "r1".to_string(),
            timestamp: 1_700_000_000_000,
            prediction: Prediction::Up,
            start_price: 600.0,
            end_price: 601.0,
            result: GameResult::Win,
        };
        let stats = PlayerStats {
            total_games: 1,
            wins: 1,
            current_streak: 1,
            max_streak: 1,
            up_count: 1,
            up_wins: 1,
            ..PlayerStats::default()
        };

        repo.save_user(Some(&user));
        repo.save_stats(&stats);
        repo.save_history(std::slice::from_ref(&record));

        let saved = repo.load();
        assert_eq!(saved.user, Some(user));
        assert_eq!(saved.stats, stats);
        assert_eq!(saved.history, vec![record]);
    }

    #[test]
    fn test_logout_removes_only_user() {
        let repo = GameRepository::in_memory();
        let stats = PlayerStats {
            total_games: 2,
            draws: 2,
            down_count: 2,
            ..PlayerStats::default()
        };
        repo.save_user(Some(&User {
            name: "e".to_string(),
            handle: "@e".to_string(),
            avatar: String::new(),
        }));
        repo.save_stats(&stats);
        repo.save_user(None);

        let saved = repo.load();
        assert_eq!(saved.user, None);
        assert_eq!(saved.stats, stats);
    }

    #[test]
    fn test_corrupt_key_loads_default() {
        let store = Arc::new(MemoryStore::new());
        store.set(STATS_KEY, "{not json").unwrap();
        store.set(USER_KEY, "42").unwrap();
        let repo = GameRepository::new(store);

        let saved = repo.load();
        assert_eq!(saved.stats, PlayerStats::default());
        assert_eq!(saved.user, None);
    }

    #[test]
    fn test_reads_browser_shaped_json() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                STATS_KEY,
                r#"{"totalGames":2,"wins":1,"losses":1,"draws":0,"currentStreak":0,
                    "maxStreak":1,"upCount":2,"upWins":1,"upLosses":1,
                    "downCount":0,"downWins":0,"downLosses":0}"#,
            )
            .unwrap();
        store
            .set(
                HISTORY_KEY,
                r#"[{"id":"1700000000000","timestamp":1700000000000,"prediction":"UP",
                     "startPrice":600.1,"endPrice":600.2,"result":"WIN"}]"#,
            )
            .unwrap();
        let saved = GameRepository::new(store).load();
        assert_eq!(saved.stats.total_games, 2);
        assert_eq!(saved.stats.up_losses, 1);
        assert_eq!(saved.history[0].result, GameResult::Win);
    }
}
