mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;
use uuid::Uuid;

use brandkit_api::capabilities::FailingGenerationCapability;

/// Create a session against the built-in automotive template, returning
/// `(session_id, template_id)`.
async fn create_automotive_session(app: Router, user: Uuid) -> (String, String) {
    let template = common::find_template_by_industry(app.clone(), user, "automotive").await;
    let template_id = template["id"].as_str().unwrap().to_string();

    let response = common::send_json(
        app,
        "POST",
        "/api/v1/sessions",
        user,
        json!({
            "templateId": template_id,
            "selectedStyle": "modern",
            "colorPalette": ["#1a1a2e", "#e94560"]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = common::body_json(response).await;
    assert_eq!(json["data"]["status"], "in-progress");
    let session_id = json["data"]["id"].as_str().unwrap().to_string();
    (session_id, template_id)
}

async fn put_answer(
    app: Router,
    user: Uuid,
    session_id: &str,
    question_id: &str,
    value: serde_json::Value,
) -> axum::response::Response {
    common::send_json(
        app,
        "PUT",
        &format!("/api/v1/sessions/{session_id}/answers/{question_id}"),
        user,
        json!({ "value": value }),
    )
    .await
}

#[tokio::test]
async fn session_endpoints_require_auth() {
    let app = common::build_test_app();

    let response = common::get(app, &format!("/api/v1/sessions/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_session_with_unknown_template_is_404() {
    let app = common::build_test_app();
    let user = Uuid::new_v4();

    let response = common::send_json(
        app,
        "POST",
        "/api/v1/sessions",
        user,
        json!({
            "templateId": Uuid::new_v4(),
            "selectedStyle": "modern"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn automotive_flow_generates_a_completed_session() {
    let app = common::build_test_app();
    let user = Uuid::new_v4();
    let (session_id, template_id) = create_automotive_session(app.clone(), user).await;

    let response = put_answer(
        app.clone(),
        user,
        &session_id,
        "businessName",
        json!("Joe's Garage"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_answer(
        app.clone(),
        user,
        &session_id,
        "services",
        json!(["repairs", "detailing"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_answer(app.clone(), user, &session_id, "tone", json!("bold")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = common::post_empty(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/generate"),
        user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    let session = &body["data"];
    assert_eq!(session["status"], "completed");
    assert_eq!(session["templateId"], template_id.as_str());

    let assets = session["generatedAssets"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["kind"], "background");

    // Multi-value answers join with ", "; every placeholder is resolved.
    let prompt = assets[0]["prompt"].as_str().unwrap();
    assert!(prompt.contains("Joe's Garage"));
    assert!(prompt.contains("repairs, detailing"));
    assert!(prompt.contains("bold"));
    assert!(!prompt.contains('{'));
}

#[tokio::test]
async fn generate_without_required_answer_leaves_session_open() {
    let app = common::build_test_app();
    let user = Uuid::new_v4();
    let (session_id, _) = create_automotive_session(app.clone(), user).await;

    // businessName is required and never answered.
    let response = common::post_empty(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/generate"),
        user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["code"], "MISSING_REQUIRED_ANSWER");
    assert!(body["error"].as_str().unwrap().contains("businessName"));

    // The failure is recoverable: session is still open and can be retried.
    let response = common::get_auth(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}"),
        user,
    )
    .await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["status"], "in-progress");
    assert!(body["data"]["generatedAssets"].as_array().unwrap().is_empty());

    // Fill in the answers and the same session generates fine.
    put_answer(app.clone(), user, &session_id, "businessName", json!("Joe's Garage")).await;
    put_answer(app.clone(), user, &session_id, "services", json!(["repairs"])).await;
    put_answer(app.clone(), user, &session_id, "tone", json!("friendly")).await;
    let response = common::post_empty(
        app,
        &format!("/api/v1/sessions/{session_id}/generate"),
        user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn answer_shape_must_match_question_kind() {
    let app = common::build_test_app();
    let user = Uuid::new_v4();
    let (session_id, _) = create_automotive_session(app.clone(), user).await;

    // Array answer for a text question.
    let response = put_answer(
        app.clone(),
        user,
        &session_id,
        "businessName",
        json!(["Joe's Garage"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["code"], "ANSWER_VALIDATION");

    // Scalar answer for a multiselect question.
    let response = put_answer(app, user, &session_id, "services", json!("repairs")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn option_answers_must_come_from_the_option_list() {
    let app = common::build_test_app();
    let user = Uuid::new_v4();
    let (session_id, _) = create_automotive_session(app.clone(), user).await;

    let response = put_answer(app.clone(), user, &session_id, "tone", json!("sarcastic")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_answer(
        app,
        user,
        &session_id,
        "services",
        json!(["repairs", "skydiving"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_question_id_rejected() {
    let app = common::build_test_app();
    let user = Uuid::new_v4();
    let (session_id, _) = create_automotive_session(app.clone(), user).await;

    let response = put_answer(app, user, &session_id, "favouriteColour", json!("teal")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn foreign_session_access_is_forbidden() {
    let app = common::build_test_app();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let (session_id, _) = create_automotive_session(app.clone(), owner).await;

    let response = common::get_auth(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}"),
        intruder,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_answer(app, intruder, &session_id, "businessName", json!("Hijack")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn generation_failure_drives_session_to_failed() {
    let app = common::build_test_app_with_generator(Arc::new(FailingGenerationCapability));
    let user = Uuid::new_v4();
    let (session_id, _) = create_automotive_session(app.clone(), user).await;

    put_answer(app.clone(), user, &session_id, "businessName", json!("Joe's Garage")).await;
    put_answer(app.clone(), user, &session_id, "services", json!(["repairs"])).await;
    put_answer(app.clone(), user, &session_id, "tone", json!("bold")).await;

    let response = common::post_empty(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/generate"),
        user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = common::body_json(response).await;
    assert_eq!(body["code"], "GENERATION_FAILED");

    let response = common::get_auth(app, &format!("/api/v1/sessions/{session_id}"), user).await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["status"], "failed");
    assert!(body["data"]["failureReason"].is_string());
}

#[tokio::test]
async fn terminal_session_rejects_further_mutation() {
    let app = common::build_test_app();
    let user = Uuid::new_v4();
    let (session_id, _) = create_automotive_session(app.clone(), user).await;

    put_answer(app.clone(), user, &session_id, "businessName", json!("Joe's Garage")).await;
    put_answer(app.clone(), user, &session_id, "services", json!(["tyres"])).await;
    put_answer(app.clone(), user, &session_id, "tone", json!("professional")).await;
    let response = common::post_empty(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/generate"),
        user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Completed sessions take no more answers and cannot regenerate.
    let response = put_answer(
        app.clone(),
        user,
        &session_id,
        "businessName",
        json!("Renamed"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = common::body_json(response).await;
    assert_eq!(body["code"], "SESSION_CLOSED");

    let response = common::post_empty(
        app,
        &format!("/api/v1/sessions/{session_id}/generate"),
        user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
