//! Route tests driving the router directly.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wordbank_core::{Conversation, ListRegistry, LookupCache, ReviewConfig, SqliteSnapshotStore, Vocabulary};
use wordbank_dictionary::LexiconNormalizer;
use wordbank_server::{create_server, AppState, MAX_DOCUMENT_BYTES};

const LEXICON: &str = "cats\tcat\t12\ncat\tcat\t12\nrunning\trun\t40\nquokka\tquokka\t0.2\n";

fn app() -> Router {
    let normalizer = LexiconNormalizer::parse(LEXICON).unwrap();
    let store = Arc::new(SqliteSnapshotStore::in_memory().unwrap());
    let conversation = Conversation::new(
        Arc::new(ListRegistry::new(store)),
        Arc::new(LookupCache::new(Arc::new(normalizer))),
        ReviewConfig::default(),
        Vocabulary::default(),
    );
    create_server(AppState::new(Arc::new(conversation)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn message(username: &str, text: &str) -> Request<Body> {
    Request::post(format!("/users/{}/messages", username))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "text": text }).to_string()))
        .unwrap()
}

fn document(username: &str, text: &str) -> Request<Body> {
    Request::post(format!("/users/{}/documents", username))
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(text.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["lists"], 0);
    assert_eq!(body["dictionary"], "lexicon");
    assert_eq!(body["cached_lookups"], 0);
}

#[tokio::test]
async fn test_start_message() {
    let app = app();
    let (status, body) = send(&app, message("alice", "/start")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["replies"][0].as_str().unwrap().contains("send me a file"));
}

#[tokio::test]
async fn test_document_then_answer() {
    let app = app();

    let (status, body) = send(&app, document("alice", "cats\nrunning\nquokka\nxyzzy\ncat\n")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added"], json!(["cat", "run"]));
    assert_eq!(body["replies"][0], "New words: 2");
    let shown = body["replies"][1].as_str().unwrap().to_string();
    assert!(shown == "cat" || shown == "run");

    let (_, body) = send(&app, message("alice", "y")).await;
    let next = body["replies"][0].as_str().unwrap();
    assert_ne!(next, shown);

    let (status, body) = send(&app, Request::get("/users/alice/stats").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["repeat"], 1);
    assert_eq!(body["new"], 1);
    assert_eq!(body["summary"], "new: 1, repeat: 1");
}

#[tokio::test]
async fn test_concurrent_documents_for_different_learners() {
    let app = app();

    let uploads: Vec<_> = ["alice", "bob"]
        .into_iter()
        .map(|username| {
            let app = app.clone();
            tokio::spawn(async move { send(&app, document(username, "cats\nrunning\n")).await })
        })
        .collect();
    for upload in uploads {
        let (status, body) = upload.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["replies"][0], "New words: 2");
    }

    let (_, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(body["lists"], 2);
    assert_eq!(body["cached_lookups"], 2);
}

#[tokio::test]
async fn test_oversized_document_is_rejected() {
    let app = app();
    let text = "cats\n".repeat(MAX_DOCUMENT_BYTES / 5 + 1);

    let response = app.oneshot(document("alice", &text)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_stats_for_unknown_user() {
    let app = app();
    let (status, body) = send(&app, Request::get("/users/nobody/stats").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_snapshot() {
    let app = app();
    send(&app, document("alice", "cats\n")).await;
    send(&app, document("bob", "running\n")).await;

    let (status, body) = send(&app, Request::post("/snapshot").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lists_saved"], 2);
    assert_eq!(body["lookups_saved"], 2);
    assert_eq!(body["lists_failed"], json!([]));
}
