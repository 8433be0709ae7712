//! Latest-price holder for the single traded pair.
//!
//! Every tick overwrites the previous sample; nothing is buffered or
//! replayed. Readers take a snapshot through a `watch` channel so the
//! display path and settlement never observe a half-written sample.

use crate::types::{is_valid_price, PriceSample, Trend};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Shared latest-price cell fed by the trade stream.
pub struct PriceFeed {
    tx: watch::Sender<PriceSample>,
}

impl PriceFeed {
    /// Create a feed with no price yet.
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = watch::channel(PriceSample::default());
        Arc::new(Self { tx })
    }

    /// Current sample. `price == 0.0` until the first tick.
    pub fn latest(&self) -> PriceSample {
        *self.tx.borrow()
    }

    /// Current price, or 0 when unready.
    pub fn price(&self) -> f64 {
        self.latest().price
    }

    /// Subscribe to sample changes.
    pub fn subscribe(&self) -> watch::Receiver<PriceSample> {
        self.tx.subscribe()
    }

    /// Apply a new tick. Invalid prices are dropped and the prior sample kept.
    pub fn push(&self, price: f64) -> Option<PriceSample> {
        if !is_valid_price(price) {
            debug!("Dropping invalid tick price {}", price);
            return None;
        }

        let mut applied = PriceSample::default();
        self.tx.send_modify(|sample| {
            // The first tick has no predecessor to compare against.
            let trend = if sample.is_ready() {
                Trend::between(sample.price, price)
            } else {
                sample.trend
            };
            *sample = PriceSample { price, trend };
            applied = *sample;
        });
        Some(applied)
    }

    /// Parse a raw trade message and apply it. Unparseable messages are no-ops.
    pub fn ingest(&self, text: &str) -> Option<PriceSample> {
        match parse_trade_price(text) {
            Some(price) => self.push(price),
            None => {
                debug!("Ignoring feed message without a usable price");
                None
            }
        }
    }
}

/// Extract the trade price from a stream message.
///
/// Accepts the exchange's decimal-string `p` field, or a bare number.
pub fn parse_trade_price(text: &str) -> Option<f64> {
    let value: Value = serde_json::from_str(text).ok()?;
    let price = match value.get("p")? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    is_valid_price(price).then_some(price)
}
