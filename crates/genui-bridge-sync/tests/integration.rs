//! Sync client integration tests — run against a real local HTTP server.
//!
//! Run with: `cargo test -p genui-bridge-sync --test integration`

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use genui_bridge_sync::{MessageSync, SyncClient, SyncError};

#[derive(Clone, Default)]
struct Recorded {
    calls: Arc<Mutex<Vec<(String, String, Value)>>>,
}

async fn update_message(
    State(recorded): State<Recorded>,
    Path((chat_id, message_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != "Bearer good-token" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not authenticated" })),
        );
    }

    recorded
        .calls
        .lock()
        .unwrap()
        .push((chat_id.clone(), message_id.clone(), body.clone()));

    (
        StatusCode::OK,
        Json(json!({ "id": message_id, "chat_id": chat_id, "content": body["content"] })),
    )
}

/// Start a stub chat backend and return its API base URL.
async fn start_stub_backend(recorded: Recorded) -> String {
    let app = Router::new()
        .route(
            "/api/v1/chats/{chat_id}/messages/{message_id}",
            post(update_message),
        )
        .with_state(recorded);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}/api/v1")
}

#[tokio::test]
async fn test_sync_success_returns_ack_body() {
    let recorded = Recorded::default();
    let base = start_stub_backend(recorded.clone()).await;
    let client = SyncClient::new(&base);

    let ack = client
        .sync_message_edit("good-token", "chat-1", "msg-9", "edited text")
        .await
        .expect("sync should succeed");

    assert_eq!(ack["id"], "msg-9");
    assert_eq!(ack["content"], "edited text");

    let calls = recorded.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "chat-1");
    assert_eq!(calls[0].1, "msg-9");
    assert_eq!(calls[0].2, json!({ "content": "edited text" }));
}

#[tokio::test]
async fn test_sync_rejected_carries_parsed_error_body() {
    let recorded = Recorded::default();
    let base = start_stub_backend(recorded.clone()).await;
    let client = SyncClient::new(&base);

    let err = client
        .sync_message_edit("bad-token", "chat-1", "msg-9", "edited")
        .await
        .expect_err("bad token should be rejected");

    match err {
        SyncError::Rejected { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body["detail"], "Not authenticated");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert!(recorded.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_unknown_route_is_rejected() {
    let base = start_stub_backend(Recorded::default()).await;
    let client = SyncClient::new(&format!("{base}/missing"));

    let err = client
        .sync_message_edit("good-token", "chat-1", "msg-9", "edited")
        .await
        .expect_err("unknown route should fail");
    assert!(matches!(err, SyncError::Rejected { status: 404, .. }));
}

#[tokio::test]
async fn test_sync_transport_failure() {
    // Grab a free port and release it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = SyncClient::new(&format!("http://127.0.0.1:{port}/api/v1"));

    let err = client
        .sync_message_edit("good-token", "chat-1", "msg-9", "edited")
        .await
        .expect_err("connection should be refused");
    assert!(matches!(err, SyncError::Transport(_)));
}
