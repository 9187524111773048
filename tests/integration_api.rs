#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use cell_sim::api::{AppState, router};

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let req = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .expect("request builds");
    let resp = app.clone().oneshot(req).await.expect("router responds");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn full_session_flow_over_http() {
    let state = Arc::new(AppState::new(common::empty_session()));
    let app = router(Arc::clone(&state));

    let (status, json) = send(&app, "POST", "/cells", Some(r#"{"chemistry":"LFP","count":2}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["cell_ids"], serde_json::json!(["cell_1_lfp", "cell_2_lfp"]));

    for _ in 0..3 {
        let (status, _) = send(&app, "POST", "/simulation/tick", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, history) = send(&app, "GET", "/history?cell_id=cell_2_lfp", None).await;
    let rows = history.as_array().expect("history is an array");
    assert_eq!(rows.len(), 3);
    for row in rows {
        let v = row["voltage"].as_f64().expect("voltage is a number");
        assert!((2.8..=3.6).contains(&v));
    }

    let (status, json) = send(&app, "POST", "/tasks", Some(r#"{"kind":"IDLE","time_seconds":1800}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = json["task_id"].as_str().expect("task id").to_string();

    let (status, _) = send(&app, "POST", &format!("/tasks/{task_id}/start"), None).await;
    assert_eq!(status, StatusCode::OK);
    for _ in 0..100 {
        state.lock().advance_progress();
    }

    let (_, summary) = send(&app, "GET", "/summary", None).await;
    assert_eq!(summary["active_cells"], 2);
    assert_eq!(summary["ticks"], 3);
    assert_eq!(summary["history_records"], 6);
    assert_eq!(summary["completed_tasks"], 1);

    let (status, _) = send(&app, "DELETE", &format!("/tasks/{task_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, tasks) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(tasks.as_array().map(Vec::len), Some(0));

    let (status, _) = send(&app, "DELETE", "/cells", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, summary) = send(&app, "GET", "/summary", None).await;
    assert_eq!(summary["active_cells"], 0);
    assert_eq!(summary["history_records"], 0);
    assert_eq!(summary["avg_voltage"], Value::Null);
}

#[tokio::test]
async fn start_pause_toggle_running_flag() {
    let app = router(Arc::new(AppState::new(common::empty_session())));

    let (_, json) = send(&app, "POST", "/simulation/start", None).await;
    assert_eq!(json["running"], true);
    let (_, json) = send(&app, "POST", "/simulation/pause", None).await;
    assert_eq!(json["running"], false);
}

#[tokio::test]
async fn clear_history_resets_tick_counter() {
    let state = Arc::new(AppState::new(common::session_with_cells(0, 1)));
    let app = router(Arc::clone(&state));
    send(&app, "POST", "/simulation/tick", None).await;

    let (status, _) = send(&app, "DELETE", "/history", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.lock().tick_count(), 0);
    assert_eq!(state.lock().cells().len(), 1);
}

#[tokio::test]
async fn bad_requests_are_reported_as_json() {
    let app = router(Arc::new(AppState::new(common::empty_session())));

    let (status, json) = send(&app, "POST", "/cells", Some(r#"{"chemistry":"LFP","count":0}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("count")));

    let (status, json) = send(&app, "POST", "/tasks/task_4/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "task not found: task_4");
}
