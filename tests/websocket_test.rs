//! Unit tests for WebSocket messages

use bnb3s::services::GameEvent;
use bnb3s::types::{
    ClientMessage, GameRecord, GameResult, PlayerStats, Prediction, ServerMessage, StartOutcome,
    Trend,
};

#[test]
fn test_client_message_start_round_parsing() {
    let json = r#"{"type":"start_round","prediction":"DOWN"}"#;
    let msg: ClientMessage = serde_json::from_str(json).unwrap();

    match msg {
        ClientMessage::StartRound { prediction } => assert_eq!(prediction, Prediction::Down),
        _ => panic!("Expected StartRound message"),
    }
}

#[test]
fn test_client_message_get_state_parsing() {
    let msg: ClientMessage = serde_json::from_str(r#"{"type":"get_state"}"#).unwrap();
    assert!(matches!(msg, ClientMessage::GetState));
}

#[test]
fn test_client_message_rejects_bad_prediction() {
    let json = r#"{"type":"start_round","prediction":"up"}"#;
    assert!(serde_json::from_str::<ClientMessage>(json).is_err());
}

#[test]
fn test_client_message_unknown_type() {
    let json = r#"{"type":"subscribe","assets":["bnb"]}"#;
    assert!(serde_json::from_str::<ClientMessage>(json).is_err());
}

#[test]
fn test_server_message_price_serialization() {
    let msg = ServerMessage::Price {
        price: 612.34,
        trend: Trend::Up,
    };
    let value = serde_json::to_value(&msg).unwrap();

    assert_eq!(value["type"], "price");
    assert_eq!(value["price"], 612.34);
    assert_eq!(value["trend"], "UP");
}

#[test]
fn test_server_message_from_settlement_event() {
    let record = GameRecord {
        id: "r1".to_string(),
        timestamp: 1_700_000_000_000,
        prediction: Prediction::Up,
        start_price: 100.0,
        end_price: 99.5,
        result: GameResult::Loss,
    };
    let stats = PlayerStats {
        total_games: 1,
        losses: 1,
        up_count: 1,
        up_losses: 1,
        ..PlayerStats::default()
    };

    let msg = ServerMessage::from(GameEvent::RoundSettled { record, stats });
    let value = serde_json::to_value(&msg).unwrap();

    assert_eq!(value["type"], "round_settled");
    assert_eq!(value["record"]["result"], "LOSS");
    assert_eq!(value["record"]["startPrice"], 100.0);
    assert_eq!(value["record"]["endPrice"], 99.5);
    assert_eq!(value["stats"]["upLosses"], 1);
}

#[test]
fn test_server_message_user_changed_logout() {
    let msg = ServerMessage::from(GameEvent::UserChanged(None));
    let value = serde_json::to_value(&msg).unwrap();

    assert_eq!(value["type"], "user_changed");
    assert!(value["user"].is_null());
}

#[test]
fn test_server_message_start_result() {
    let msg = ServerMessage::StartResult {
        outcome: StartOutcome::AlreadyPlaying,
    };
    let value = serde_json::to_value(&msg).unwrap();

    assert_eq!(value["type"], "start_result");
    assert_eq!(value["outcome"]["status"], "already_playing");
}

#[test]
fn test_server_message_error() {
    let msg = ServerMessage::Error {
        error: "Invalid message".to_string(),
    };
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains(r#""type":"error""#));
    assert!(json.contains(r#""error":"Invalid message""#));
}
