//! Integration tests for the HTTP query surface.
//!
//! Tests health, ping, and room listing against an in-process router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use roshambo::RoomRegistry;
use roshambo_server::api::{AppState, create_router};
use serde_json::{Value, json};
use tower::ServiceExt; // For `oneshot` method

/// Helper to create test server sharing a registry with the test
fn create_test_server() -> (axum::Router, AppState) {
    let state = AppState::new(RoomRegistry::default());
    let app = create_router(state.clone());
    (app, state)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_ping_endpoint() {
    let (app, _) = create_test_server();

    let (status, body) = get_json(app, "/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "pong"}));
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_server();

    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["rooms"], 0);
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/ping")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me");
}

// ============================================================================
// Room Query Tests
// ============================================================================

#[tokio::test]
async fn test_list_rooms_empty() {
    let (app, _) = create_test_server();

    let (status, body) = get_json(app, "/api/rooms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"rooms": []}));
}

#[tokio::test]
async fn test_list_and_inspect_rooms() {
    let (app, state) = create_test_server();

    let mut receivers = Vec::new();
    for (room, name) in [("lobby", "alice"), ("lobby", "alice"), ("annex", "carol")] {
        let (transport, outbound) = state.registry.transport();
        state
            .registry
            .add_player(room, Some(name), transport)
            .await
            .unwrap();
        receivers.push(outbound);
    }

    let (status, body) = get_json(app.clone(), "/api/rooms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"rooms": ["annex", "lobby"]}));

    let (status, body) = get_json(app.clone(), "/api/rooms/lobby").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room_id"], "lobby");
    assert_eq!(body["game_state"], "playing");
    assert_eq!(body["round_results"], json!([]));

    let names: Vec<&str> = body["players"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["alice", "alice-1"]);

    let (_, body) = get_json(app, "/health").await;
    assert_eq!(body["rooms"], 2);
}

#[tokio::test]
async fn test_unknown_room_is_404() {
    let (app, _) = create_test_server();

    let (status, body) = get_json(app, "/api/rooms/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Room not found"}));
}

#[tokio::test]
async fn test_singular_room_path_serves_snapshot() {
    let (app, state) = create_test_server();

    let (transport, _outbound) = state.registry.transport();
    state
        .registry
        .add_player("r1", Some("alice"), transport)
        .await
        .unwrap();

    let (status, plural) = get_json(app.clone(), "/api/rooms/r1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, singular) = get_json(app.clone(), "/api/room/r1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(singular, plural);
    assert_eq!(singular["players"][0]["username"], "alice");

    let (status, body) = get_json(app, "/api/room/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Room not found"}));
}

#[tokio::test]
async fn test_room_snapshot_includes_round_history() {
    let (app, state) = create_test_server();

    let mut players = Vec::new();
    for name in ["alice", "bob"] {
        let (transport, outbound) = state.registry.transport();
        let joined = state
            .registry
            .add_player("duel", Some(name), transport)
            .await
            .unwrap();
        players.push((joined.player_id, outbound));
    }

    state
        .registry
        .submit_choice("duel", players[0].0, "paper")
        .await
        .unwrap();
    state
        .registry
        .submit_choice("duel", players[1].0, "rock")
        .await
        .unwrap();

    let (_, body) = get_json(app, "/api/rooms/duel").await;
    assert_eq!(
        body["round_results"],
        json!([{"winner": "alice", "choices": {"alice": "paper", "bob": "rock"}}])
    );
    assert!(body["players"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["choice"].is_null()));
}
