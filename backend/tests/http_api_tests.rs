//! End-to-end tests for the HTTP surface, driven through the router.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use climb_log::db::repositories::LocalRepository;
use climb_log::db::FullRepository;
use climb_log::http::{create_router_with_cors, AppState};

fn app(repo: &LocalRepository) -> Router {
    let repo: Arc<dyn FullRepository> = Arc::new(repo.clone());
    create_router_with_cors(AppState::new(repo), None)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

#[tokio::test]
async fn test_health() {
    let repo = LocalRepository::new();
    let (status, body) = get(app(&repo), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_unknown_user_gets_empty_views() {
    let repo = LocalRepository::new();

    let (status, stats) = get(app(&repo), "/api/stats/nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "total_sessions": 0,
            "hardest_boulder": "N/A",
            "hardest_sport": "N/A",
            "hardest_send": "N/A"
        })
    );

    let (status, sessions) = get(app(&repo), "/api/sessions/nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions, json!([]));

    let (_, pyramid) = get(app(&repo), "/api/grade_pyramid/nobody").await;
    assert_eq!(pyramid, json!({}));

    let (_, profile) = get(app(&repo), "/api/profile/nobody").await;
    assert_eq!(profile["total_sessions"], 0);
    assert_eq!(profile["achievements"], json!([]));

    let (_, dashboard) = get(app(&repo), "/api/dashboard/nobody").await;
    assert_eq!(dashboard["current_project"], "N/A");
    assert_eq!(dashboard["recent_sessions"], json!([]));
}

#[tokio::test]
async fn test_save_session_then_read_views() {
    let repo = LocalRepository::new();
    let (status, body) = post(
        app(&repo),
        "/api/session",
        json!({
            "userName": "ana",
            "sessionName": "Tuesday board",
            "climbs": [
                {"Discipline": "Bouldering", "Grade": "V5", "Timestamp": "2024-05-14 18:00:00", "AscentType": "Send"},
                {"Discipline": "Bouldering", "Grade": "V5", "AscentType": "Flash"},
                {"discipline": "Bouldering", "grade": "V7", "ascent_type": "Attempt"},
                {"Discipline": "Sport Climbing", "Grade": "6b+", "Gym": "Vital"}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["climbs_saved"], 4);
    assert_eq!(body["session_name"], "Tuesday board");
    assert_eq!(repo.climb_count(), 4);

    let (_, stats) = get(app(&repo), "/api/stats/ana").await;
    assert_eq!(stats["total_sessions"], 1);
    assert_eq!(stats["hardest_boulder"], "V5");
    assert_eq!(stats["hardest_sport"], "6b+");
    assert_eq!(stats["hardest_send"], "6b+");

    let (_, pyramid) = get(app(&repo), "/api/grade_pyramid/ana").await;
    assert_eq!(pyramid, json!({"V5": 2, "6b+": 1}));

    let (_, sessions) = get(app(&repo), "/api/sessions/ana?order=recent").await;
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["session_name"], "Tuesday board");
    assert_eq!(sessions[0]["climbs"].as_array().unwrap().len(), 4);
    assert_eq!(sessions[0]["total_climbs"], 4);
    assert!(sessions[0]["climbs"][0].get("notes").unwrap().is_null());

    let (_, dashboard) = get(app(&repo), "/api/dashboard/ana").await;
    assert_eq!(dashboard["current_project"], "V7");
    assert_eq!(dashboard["recent_sessions"][0]["name"], "Tuesday board");

    // Another user's data stays separate.
    let (_, other) = get(app(&repo), "/api/stats/bob").await;
    assert_eq!(other["total_sessions"], 0);
}

#[tokio::test]
async fn test_save_session_validation_errors() {
    let repo = LocalRepository::new();

    let (status, body) = post(app(&repo), "/api/session", json!({"userName": "ana"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("climbs"));

    let (status, body) = post(
        app(&repo),
        "/api/session",
        json!({"climbs": [{"Discipline": "Bouldering", "Grade": "V1"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("userName"));

    assert_eq!(repo.climb_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let repo = LocalRepository::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(&repo).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_order_is_bad_request() {
    let repo = LocalRepository::new();
    let (status, body) = get(app(&repo), "/api/sessions/ana?order=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    let (status, body) = get(app(&repo), "/api/stats/ana").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "STORE_UNAVAILABLE");

    let (status, _) = post(
        app(&repo),
        "/api/session",
        json!({"userName": "ana", "climbs": [{"Discipline": "Bouldering", "Grade": "V1"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_live_session_flow() {
    let repo = LocalRepository::new();

    let (status, started) = post(
        app(&repo),
        "/api/session/start",
        json!({"userName": "ana", "location": "Boulderwelt"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let session_id = started["session_id"].as_i64().unwrap();
    assert!(started["start_time"].is_string());

    let (status, logged) = post(
        app(&repo),
        "/api/climb",
        json!({
            "session_id": session_id,
            "climbing_type": "Bouldering",
            "grade": "V3",
            "ascent_type": "Send",
            "notes": "heel hook"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(logged["climb_id"].is_i64());

    let (status, ended) = post(app(&repo), "/api/session/end", json!({"session_id": session_id})).await;
    assert_eq!(status, StatusCode::OK);
    let first_end = ended["end_time"].clone();
    assert!(first_end.is_string());

    let (status, again) = post(app(&repo), "/api/session/end", json!({"session_id": session_id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["end_time"], first_end);

    let (_, sessions) = get(app(&repo), "/api/sessions/ana").await;
    assert_eq!(sessions[0]["session_name"], "Boulderwelt");
    assert_eq!(sessions[0]["session"], session_id);
    assert_eq!(sessions[0]["hardest_climb"], "V3");
}

#[tokio::test]
async fn test_dashboard_lists_session_before_first_climb() {
    let repo = LocalRepository::new();
    let (status, started) = post(
        app(&repo),
        "/api/session/start",
        json!({"userName": "ana", "location": "Boulderwelt"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, dashboard) = get(app(&repo), "/api/dashboard/ana").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_sessions"], 1);
    assert_eq!(dashboard["recent_sessions"][0]["id"], started["session_id"]);
    assert_eq!(dashboard["recent_sessions"][0]["name"], "Boulderwelt");
    assert_eq!(dashboard["recent_sessions"][0]["location"], "Boulderwelt");
}

#[tokio::test]
async fn test_log_climb_into_missing_session_is_400() {
    let repo = LocalRepository::new();
    let (status, body) = post(
        app(&repo),
        "/api/climb",
        json!({"session_id": 9, "grade": "V3", "ascent_type": "Send"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_end_unknown_session_is_ok() {
    let repo = LocalRepository::new();
    let (status, body) = post(app(&repo), "/api/session/end", json!({"session_id": 123})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["end_time"].is_null());

    let (status, _) = post(app(&repo), "/api/session/end", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
