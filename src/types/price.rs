use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the latest tick relative to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Equal,
}

impl Trend {
    /// Compare a new tick against the immediately previous one.
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Trend::Up
        } else if current < previous {
            Trend::Down
        } else {
            Trend::Equal
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "UP"),
            Trend::Down => write!(f, "DOWN"),
            Trend::Equal => write!(f, "EQUAL"),
        }
    }
}

/// Latest observed price with its trend.
///
/// A price of `0.0` means no tick has arrived yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub price: f64,
    pub trend: Trend,
}

impl PriceSample {
    /// Whether the sample holds a usable price.
    pub fn is_ready(&self) -> bool {
        is_valid_price(self.price)
    }
}

/// A price is usable for play only when it is finite and positive.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
