use crate::services::ROUND_DURATION;
use std::env;
use std::time::Duration;

/// Default trade stream for the BNB/USDT pair.
pub const DEFAULT_FEED_URL: &str = "wss://stream.binance.com:9443/ws/bnbusdt@trade";

/// Default round length in milliseconds.
pub const DEFAULT_ROUND_DURATION_MS: u64 = ROUND_DURATION.as_millis() as u64;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Trade stream URL for the price feed.
    pub feed_url: String,
    /// SQLite database path for user, stats and history.
    pub database_path: String,
    /// Length of a round in milliseconds.
    pub round_duration_ms: u64,
    /// Seconds to wait before reconnecting the feed (0 = never reconnect).
    pub feed_reconnect_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or(env::var("PORT").ok(), 3001),
            feed_url: env::var("FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "bnb3s.db".to_string()),
            round_duration_ms: parse_or(
                env::var("ROUND_DURATION_MS").ok(),
                DEFAULT_ROUND_DURATION_MS,
            ),
            feed_reconnect_secs: parse_or(env::var("FEED_RECONNECT_SECS").ok(), 0),
        }
    }

    /// Round countdown length.
    pub fn round_duration(&self) -> Duration {
        Duration::from_millis(self.round_duration_ms)
    }

    /// Reconnect delay for the feed, if reconnecting is enabled.
    pub fn feed_reconnect(&self) -> Option<Duration> {
        (self.feed_reconnect_secs > 0).then(|| Duration::from_secs(self.feed_reconnect_secs))
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            feed_url: DEFAULT_FEED_URL.to_string(),
            database_path: "bnb3s.db".to_string(),
            round_duration_ms: DEFAULT_ROUND_DURATION_MS,
            feed_reconnect_secs: 0,
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
