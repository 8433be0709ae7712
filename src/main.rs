use bnb3s::config::Config;
use bnb3s::services::{GameController, GameRepository, MemoryStore, PriceFeed, SqliteStore};
use bnb3s::sources::BinanceTradeWs;
use bnb3s::websocket::{self, ClientRegistry};
use bnb3s::{api, tui, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let tui_mode = std::env::args().any(|arg| arg == "--tui");

    // Initialize tracing; the TUI owns the terminal so logs go nowhere but errors
    if tui_mode {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new("warn"))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "bnb3s=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting bnb3s on {}", config.bind_addr());

    // Open the saved game; gameplay continues without persistence if this fails
    let repository = match SqliteStore::new(&config.database_path) {
        Ok(store) => {
            info!("Using SQLite store at {}", config.database_path);
            GameRepository::new(Arc::new(store))
        }
        Err(e) => {
            warn!("SQLite store unavailable ({}), using in-memory store", e);
            GameRepository::new(Arc::new(MemoryStore::default()))
        }
    };

    // Price feed and the controller that owns the session
    let feed = PriceFeed::new();
    let game = GameController::spawn(feed.clone(), repository, config.round_duration());

    // Start the trade stream
    let source = BinanceTradeWs::new(config.feed_url.clone(), feed, config.feed_reconnect());
    tokio::spawn(async move {
        if let Err(e) = source.connect().await {
            tracing::error!("Binance trade stream error: {}", e);
        }
    });

    if tui_mode {
        tui::run_tui(game, config.round_duration()).await?;
        return Ok(());
    }

    // Fan price ticks and round events out to socket clients
    let clients = ClientRegistry::new();
    websocket::spawn_broadcaster(game.clone(), clients.clone());

    let state = AppState {
        config: config.clone(),
        game,
        clients,
    };

    let app = api::app(state);

    // Start the server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("bnb3s server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
