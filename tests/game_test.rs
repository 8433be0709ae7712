//! End-to-end tests through the game controller

use bnb3s::services::{GameController, GameEvent, GameHandle, GameRepository, PriceFeed, SqliteStore};
use bnb3s::types::{GameResult, Prediction, RoundPhase, StartOutcome, TimeFrame};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const ROUND: Duration = Duration::from_millis(30);

fn temp_db() -> PathBuf {
    std::env::temp_dir().join(format!("bnb3s-test-{}.db", uuid::Uuid::new_v4()))
}

fn sqlite_repository(path: &PathBuf) -> GameRepository {
    GameRepository::new(Arc::new(SqliteStore::new(path).unwrap()))
}

async fn next_settlement(events: &mut broadcast::Receiver<GameEvent>) -> GameEvent {
    loop {
        let event = events.recv().await.unwrap();
        if matches!(event, GameEvent::RoundSettled { .. }) {
            return event;
        }
    }
}

async fn play(game: &GameHandle, prediction: Prediction, start: f64, end: f64) -> GameResult {
    let mut events = game.subscribe();
    game.feed().push(start);
    let outcome = game.start_round(prediction).await.unwrap();
    assert!(outcome.is_started(), "round did not start: {:?}", outcome);
    game.feed().push(end);

    match next_settlement(&mut events).await {
        GameEvent::RoundSettled { record, .. } => record.result,
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_full_session_flow() {
    let game = GameController::spawn(PriceFeed::new(), GameRepository::in_memory(), ROUND);

    let user = game.claim_identity("  @satoshi ").await.unwrap().unwrap();
    assert_eq!(user.handle, "@satoshi");
    assert_eq!(user.avatar, "https://unavatar.io/twitter/satoshi");

    assert_eq!(play(&game, Prediction::Up, 600.0, 601.0).await, GameResult::Win);
    assert_eq!(play(&game, Prediction::Down, 601.0, 600.5).await, GameResult::Win);
    assert_eq!(play(&game, Prediction::Up, 600.5, 600.5).await, GameResult::Draw);

    let snapshot = game.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, RoundPhase::Idle);
    assert_eq!(snapshot.stats.total_games, 3);
    assert_eq!(snapshot.stats.current_streak, 2);
    assert_eq!(snapshot.user.as_ref(), Some(&user));

    let board = game.leaderboard(TimeFrame::Day).await.unwrap();
    let me = board.iter().find(|e| e.is_current_user).unwrap();
    assert_eq!(me.name, "@satoshi");
    assert_eq!(me.total_games, 3);

    let card = game.share_card().await.unwrap();
    assert_eq!(card.handle, "@satoshi");
    assert_eq!(card.max_streak, 2);
    assert_eq!(card.total_games, 3);

    let history = game.history().await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].result, GameResult::Draw);
}

#[tokio::test]
async fn test_second_start_during_round_creates_no_round() {
    let game = GameController::spawn(
        PriceFeed::new(),
        GameRepository::in_memory(),
        Duration::from_millis(500),
    );
    game.feed().push(612.0);

    let StartOutcome::Started { round } = game.start_round(Prediction::Up).await.unwrap() else {
        panic!("Expected round to start");
    };
    let before = game.snapshot().await.unwrap();

    assert_eq!(
        game.start_round(Prediction::Down).await.unwrap(),
        StartOutcome::AlreadyPlaying
    );
    let after = game.snapshot().await.unwrap();
    assert_eq!(after.round, Some(round));
    assert_eq!(after.stats, before.stats);
    assert_eq!(after.phase, RoundPhase::Playing);
}

#[tokio::test]
async fn test_one_record_per_round() {
    let game = GameController::spawn(PriceFeed::new(), GameRepository::in_memory(), ROUND);
    play(&game, Prediction::Up, 10.0, 11.0).await;

    // Give any stray timer a chance to fire twice
    tokio::time::sleep(ROUND * 3).await;
    assert_eq!(game.history().await.unwrap().len(), 1);
    assert_eq!(game.snapshot().await.unwrap().stats.total_games, 1);
}

#[tokio::test]
async fn test_game_survives_restart() {
    let path = temp_db();

    {
        let game = GameController::spawn(PriceFeed::new(), sqlite_repository(&path), ROUND);
        game.claim_identity("bob").await.unwrap();
        play(&game, Prediction::Down, 5.0, 4.0).await;
        play(&game, Prediction::Down, 4.0, 4.5).await;
    }

    let saved = sqlite_repository(&path).load();
    assert_eq!(saved.user.unwrap().handle, "@bob");
    assert_eq!(saved.stats.total_games, 2);
    assert_eq!(saved.stats.down_wins, 1);
    assert_eq!(saved.stats.down_losses, 1);
    assert_eq!(saved.history.len(), 2);

    // A restarted controller continues from the saved aggregate
    let game = GameController::spawn(PriceFeed::new(), sqlite_repository(&path), ROUND);
    play(&game, Prediction::Up, 1.0, 2.0).await;
    let snapshot = game.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.total_games, 3);
    assert_eq!(snapshot.stats.max_streak, 1);

    // Logout clears the identity but keeps the record
    game.logout().await.unwrap();
    let saved = sqlite_repository(&path).load();
    assert!(saved.user.is_none());
    assert_eq!(saved.history.len(), 3);

    let _ = std::fs::remove_file(&path);
}
