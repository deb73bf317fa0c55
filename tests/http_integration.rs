//! HTTP surface tests
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use form_results_dispatch::config::Settings;
use form_results_dispatch::server::{create_app, AppState, API_KEY_HEADER};

fn app_with(settings: Settings) -> Router {
    create_app(AppState::new(settings))
}

fn app() -> Router {
    app_with(Settings::default())
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn seed(app: &Router, published: bool) {
    let (status, _) = call(
        app,
        Method::POST,
        "/api/v1/forms",
        Some(json!({ "id": "survey", "name": "Survey" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(
        app,
        Method::POST,
        "/api/v1/artifacts",
        Some(json!({
            "id": "thanks",
            "name": "Thanks",
            "subject": "Thank you",
            "body": "Hi {formfield=fname}, you said {formfield=q1}.",
            "published": published,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn batch_body() -> Value {
    json!({
        "event": {
            "id": "77",
            "context": "email.send.form.results",
            "properties": { "email": "thanks" },
            "parent": { "type": "form.field_value", "properties": { "form": "survey" } }
        },
        "contacts": [
            { "id": "ann", "address": "ann@example.com", "owner_id": "agent-1" },
            { "id": "bob", "address": "bob@example.com" },
            { "id": "cid", "primary_identifier": "Cid" }
        ]
    })
}

#[tokio::test]
async fn test_health_and_actions() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["actions"], 1);

    let (status, body) = call(&app, Method::GET, "/api/v1/actions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actions"][0]["key"], "email.send.form.results");
    assert_eq!(body["actions"][0]["channel"], "email");
}

#[tokio::test]
async fn test_batch_round_trip() {
    let app = app();
    seed(&app, true).await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/forms/survey/submissions",
        Some(json!({ "recipient_id": "ann", "answers": { "fname": "Ann" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, Method::POST, "/api/v1/batches", Some(batch_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handled"], true);
    assert_eq!(body["report"]["outcomes"]["ann"]["status"], "passed");
    assert_eq!(
        body["report"]["outcomes"]["bob"]["status"],
        "skipped_no_submission"
    );
    assert_eq!(body["report"]["outcomes"]["cid"]["status"], "passed_with_note");
    assert_eq!(
        body["report"]["outcomes"]["cid"]["reason"],
        "contact has no deliverable address"
    );
    assert_eq!(body["context"]["pending"], json!(["bob"]));
    assert_eq!(body["context"]["passed"], json!(["ann"]));
    assert_eq!(body["context"]["channel"], json!(["email", "thanks"]));

    let (status, body) = call(&app, Method::GET, "/api/v1/outbox", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["messages"][0]["content"], "Hi Ann, you said .");
    assert_eq!(body["messages"][0]["credentials"]["owner_id"], "agent-1");

    let (_, body) = call(&app, Method::GET, "/stats", None).await;
    assert_eq!(body["batches"]["batches_processed"], 1);
    assert_eq!(body["outbox"]["messages"], 1);
}

#[tokio::test]
async fn test_unpublished_artifact_fails_batch() {
    let app = app();
    seed(&app, false).await;

    let (status, body) = call(&app, Method::POST, "/api/v1/batches", Some(batch_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fatal"]["code"], "ARTIFACT_UNAVAILABLE");
    assert_eq!(
        body["context"]["failed_all"],
        "artifact not found or not published"
    );
    assert_eq!(body["context"]["pending"], json!([]));

    let (status, _) = call(&app, Method::POST, "/api/v1/artifacts/thanks/publish", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::POST, "/api/v1/batches", Some(batch_body())).await;
    assert!(body.get("fatal").is_none());
}

#[tokio::test]
async fn test_unknown_action_is_not_handled() {
    let app = app();
    let mut body = batch_body();
    body["event"]["context"] = json!("sms.send");

    let (status, body) = call(&app, Method::POST, "/api/v1/batches", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handled"], false);
    assert_eq!(body["context"]["pending"], json!(["ann", "bob", "cid"]));
}

#[tokio::test]
async fn test_catalog_errors() {
    let app = app();
    seed(&app, true).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/forms",
        Some(json!({ "id": "survey", "name": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/forms/nope/submissions",
        Some(json!({ "recipient_id": "ann" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/artifacts",
        Some(json!({ "id": "bad id!", "name": "x", "body": "y" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = call(&app, Method::DELETE, "/api/v1/artifacts/thanks", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::GET, "/api/v1/artifacts/thanks", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_do_not_contact_reported_as_failure() {
    let app = app();
    seed(&app, true).await;
    call(
        &app,
        Method::POST,
        "/api/v1/forms/survey/submissions",
        Some(json!({ "recipient_id": "ann", "answers": { "fname": "Ann" } })),
    )
    .await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/outbox/do-not-contact",
        Some(json!({ "address": "ann@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = call(&app, Method::POST, "/api/v1/batches", Some(batch_body())).await;
    assert_eq!(body["report"]["outcomes"]["ann"]["status"], "failed");
    assert_eq!(
        body["context"]["failed"]["ann"],
        "contact is on the do-not-contact list"
    );
}

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let mut settings = Settings::default();
    settings.api.key = Some("secret".to_string());
    let app = app_with(settings);

    let (status, _) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::GET, "/api/v1/forms", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/forms")
        .header(API_KEY_HEADER, "secret")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/api/v1/forms")
        .header(API_KEY_HEADER, "wrong")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
