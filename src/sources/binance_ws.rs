use crate::services::PriceFeed;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Binance trade stream client for one pair.
#[derive(Clone)]
pub struct BinanceTradeWs {
    url: String,
    feed: Arc<PriceFeed>,
    reconnect: Option<Duration>,
}

impl BinanceTradeWs {
    /// Create a new trade stream client. `reconnect` of `None` means a dropped
    /// connection leaves the price frozen.
    pub fn new(url: impl Into<String>, feed: Arc<PriceFeed>, reconnect: Option<Duration>) -> Self {
        Self {
            url: url.into(),
            feed,
            reconnect,
        }
    }

    /// Connect and start receiving trades.
    pub async fn connect(&self) -> anyhow::Result<()> {
        loop {
            let result = self.run_connection().await;
            match &result {
                Ok(_) => warn!("Binance trade stream disconnected"),
                Err(e) => error!("Binance trade stream error: {}", e),
            }

            let Some(delay) = self.reconnect else {
                info!("Feed reconnect disabled, price frozen at {}", self.feed.price());
                return result;
            };
            info!("Reconnecting to Binance trade stream in {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    async fn run_connection(&self) -> anyhow::Result<()> {
        info!("Connecting to Binance trade stream {}", self.url);
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();
        info!("Connected to Binance trade stream");

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Some(sample) = self.feed.ingest(&text) {
                        debug!("Binance tick: {} ({})", sample.price, sample.trend);
                    }
                }
                Ok(Message::Ping(data)) => {
                    let _ = write.send(Message::Pong(data)).await;
                }
                Ok(Message::Close(_)) => {
                    info!("Binance trade stream closed");
                    break;
                }
                Err(e) => {
                    return Err(e.into());
                }
                _ => {}
            }
        }

        Ok(())
    }
}
