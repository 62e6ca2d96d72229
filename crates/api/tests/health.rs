mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = common::build_test_app();

    let response = common::get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_check_requires_no_auth() {
    let app = common::build_test_app();

    // No x-user-id header at all.
    let response = common::get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = common::build_test_app();

    let response = common::get(app, "/health").await;
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header missing");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();

    let response = common::get(app, "/definitely/not/a/route").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
