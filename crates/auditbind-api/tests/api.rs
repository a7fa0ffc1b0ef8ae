//! End-to-end API tests driving the router with `oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use auditbind_api::{AppState, build_app};
use auditbind_core::config::AppConfig;
use auditbind_core::types::ContentType;
use auditbind_signals::Signal;

const CONFIG: &str = r#"
[audit]
user_model = "auth.User"

[[audit.models]]
model = "blog.Article"
exclude_fields = ["views"]

[[auth.users]]
token = "alice-token"
username = "alice"

[[auth.users]]
token = "rev-token"
username = "rev"
permissions = ["review_article"]

[[auth.users]]
token = "gone-token"
username = "gone"
is_active = false
"#;

fn state() -> AppState {
    AppState::new(AppConfig::from_toml(CONFIG).unwrap()).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.5, 10.0.0.1");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn stamping_receivers(state: &AppState) -> usize {
    state
        .binding
        .bus
        .receiver_count(Signal::PreSave, &ContentType::log_entry())
}

#[tokio::test]
async fn test_health() {
    let app = build_app(state());
    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_authenticated_save_is_stamped() {
    let state = state();
    let app = build_app(state.clone());

    let (status, body) = send(
        &app,
        "PUT",
        "/api/records/blog/Article/1",
        Some("alice-token"),
        Some(json!({ "fields": { "title": "draft", "views": 3 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fields"]["title"], "draft");

    let (status, body) = send(
        &app,
        "GET",
        "/api/entries?app=blog&model=article&pk=1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["actor"]["username"], "alice");
    assert_eq!(entries[0]["remote_addr"], "203.0.113.5");
    assert!(entries[0]["changes"].get("views").is_none());
    assert_eq!(stamping_receivers(&state), 0);
}

#[tokio::test]
async fn test_anonymous_save_has_no_actor() {
    let app = build_app(state());
    send(
        &app,
        "PUT",
        "/api/records/blog/article/1",
        None,
        Some(json!({ "fields": { "title": "draft" } })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/entries", None, None).await;
    assert!(body["data"][0]["actor"].is_null());
}

#[tokio::test]
async fn test_rejected_credentials() {
    let app = build_app(state());

    let (status, _) = send(&app, "GET", "/api/health", Some("nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/health", Some("gone-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_model_is_not_found() {
    let app = build_app(state());
    let (status, body) = send(&app, "GET", "/api/records/blog/comment/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "App 'blog' doesn't have a 'comment' model");
}

#[tokio::test]
async fn test_entry_filter_requires_app_and_model() {
    let app = build_app(state());
    let (status, _) = send(&app, "GET", "/api/entries?app=blog", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_is_logged() {
    let app = build_app(state());
    send(
        &app,
        "PUT",
        "/api/records/blog/article/1",
        Some("alice-token"),
        Some(json!({ "fields": { "title": "bye" } })),
    )
    .await;

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/records/blog/article/1",
        Some("alice-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/records/blog/article/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/entries", None, None).await;
    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions.len(), 2);
    assert!(actions.contains(&"delete"));
}

async fn draft_entry_id(app: &Router) -> String {
    send(
        app,
        "PUT",
        "/api/records/blog/article/1",
        Some("alice-token"),
        Some(json!({ "fields": { "title": "draft" } })),
    )
    .await;
    let (_, body) = send(app, "GET", "/api/entries", None, None).await;
    body["data"][0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_reviewer_applies_staged_changes() {
    let state = state();
    let app = build_app(state.clone());
    let id = draft_entry_id(&app).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/entries/{id}/changes"),
        Some("rev-token"),
        Some(json!({ "changes": { "title": { "old": "draft", "new": "final" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reviewer"]["username"], "rev");
    assert_eq!(body["data"]["actor"]["username"], "alice");

    let (_, body) = send(&app, "GET", "/api/records/blog/article/1", None, None).await;
    assert_eq!(body["data"]["fields"]["title"], "final");

    // The correcting save is not audited.
    assert_eq!(state.store.entry_count(), 1);
    assert_eq!(stamping_receivers(&state), 0);
}

#[tokio::test]
async fn test_non_reviewer_cannot_stage_changes() {
    let app = build_app(state());
    let id = draft_entry_id(&app).await;
    let forged = json!({ "changes": { "title": { "old": "forged", "new": "forged" } } });

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/entries/{id}/changes"),
        Some("alice-token"),
        Some(forged.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/entries/{id}/changes"),
        None,
        Some(forged),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send(&app, "GET", &format!("/api/entries/{id}"), None, None).await;
    assert_eq!(body["data"]["changes"]["title"]["new"], "draft");
    assert!(body["data"]["reviewer"].is_null());

    let (_, body) = send(&app, "GET", "/api/records/blog/article/1", None, None).await;
    assert_eq!(body["data"]["fields"]["title"], "draft");
}

#[tokio::test]
async fn test_reviewer_delete_is_logged() {
    let state = state();
    let app = build_app(state.clone());
    draft_entry_id(&app).await;

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/records/blog/article/1",
        Some("rev-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/records/blog/article/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/entries", None, None).await;
    let entries = body["data"].as_array().unwrap();
    let deleted = entries
        .iter()
        .find(|e| e["action"] == "delete")
        .unwrap();
    assert_eq!(deleted["actor"]["username"], "rev");
    assert!(deleted["reviewer"].is_null());
    assert_eq!(stamping_receivers(&state), 0);
}

#[tokio::test]
async fn test_reviewer_update_is_logged_once() {
    let state = state();
    let app = build_app(state.clone());
    draft_entry_id(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/records/blog/article/1",
        Some("rev-token"),
        Some(json!({ "fields": { "title": "final" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fields"]["title"], "final");

    let (_, body) = send(&app, "GET", "/api/entries", None, None).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let updates: Vec<&Value> = entries.iter().filter(|e| e["action"] == "update").collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["actor"]["username"], "rev");
    assert_eq!(updates[0]["reviewer"]["username"], "rev");
    assert_eq!(updates[0]["changes"]["title"]["new"], "final");
    assert_eq!(stamping_receivers(&state), 0);
}

#[tokio::test]
async fn test_review_of_deleted_object_fails() {
    let state = state();
    let app = build_app(state.clone());
    let id = draft_entry_id(&app).await;
    send(&app, "DELETE", "/api/records/blog/article/1", None, None).await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/entries/{id}/changes"),
        Some("rev-token"),
        Some(json!({ "changes": { "title": { "old": "draft", "new": "final" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(stamping_receivers(&state), 0);
}
