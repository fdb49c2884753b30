#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;

use trivia_api::db::queries::questions::create_question;
use trivia_api::db::{run_migrations, NewQuestion, SqliteStore};
use trivia_api::server::app::build_router;

/// In-memory database with migrations applied. A single connection keeps the data alive.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite opens");
    run_migrations(&pool).await.expect("migrations apply");
    pool
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = test_pool().await;
    let app = build_router(Arc::new(SqliteStore::new(pool.clone())));
    (app, pool)
}

/// Inserts `(question, category)` pairs and returns their ids in order.
pub async fn seed_questions(pool: &SqlitePool, rows: &[(&str, i64)]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(rows.len());
    for (text, category) in rows {
        let new = NewQuestion {
            question: text.to_string(),
            answer: format!("answer to {text}"),
            category: *category,
            difficulty: 3,
        };
        ids.push(create_question(pool, &new).await.expect("question inserts").id);
    }
    ids
}

pub async fn question_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
        .expect("count query runs")
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds");

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is json")
    };
    (status, json)
}

pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode) {
    assert_eq!(status, expected);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected.as_u16());
    assert!(body["message"].is_string());
}
