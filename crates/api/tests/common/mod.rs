use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt;

use brandkit_core::capability::{GenerationCapability, UploadCapability};
use brandkit_core::store::SessionStore;
use brandkit_core::template::TemplateRegistry;
use brandkit_core::types::UserId;

use brandkit_api::capabilities::{StubGenerationCapability, StubUploadCapability};
use brandkit_api::config::ServerConfig;
use brandkit_api::router::build_app_router;
use brandkit_api::state::AppState;

/// Boundary used by the multipart request builder.
pub const MULTIPART_BOUNDARY: &str = "brandkit-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and deliberately small upload ceilings so size-limit tests stay cheap.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_image_upload_bytes: 4096,
        max_file_upload_bytes: 8192,
    }
}

/// Build the full application router with all middleware layers and the
/// stub capability providers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app() -> Router {
    build_app(
        test_config(),
        Arc::new(StubUploadCapability),
        Arc::new(StubGenerationCapability),
    )
}

/// Same as [`build_test_app`] but with a caller-supplied generation
/// capability, for exercising generation failure paths.
pub fn build_test_app_with_generator(generator: Arc<dyn GenerationCapability>) -> Router {
    build_app(test_config(), Arc::new(StubUploadCapability), generator)
}

/// Same as [`build_test_app`] but with a caller-supplied upload
/// capability, for exercising upload failure paths.
pub fn build_test_app_with_uploader(uploader: Arc<dyn UploadCapability>) -> Router {
    build_app(test_config(), uploader, Arc::new(StubGenerationCapability))
}

/// Same as [`build_test_app`] but with explicit upload ceilings, for
/// verifying the request-body limit tracks the configured ceilings.
pub fn build_test_app_with_ceilings(max_image_bytes: u64, max_file_bytes: u64) -> Router {
    let mut config = test_config();
    config.max_image_upload_bytes = max_image_bytes;
    config.max_file_upload_bytes = max_file_bytes;
    build_app(
        config,
        Arc::new(StubUploadCapability),
        Arc::new(StubGenerationCapability),
    )
}

fn build_app(
    config: ServerConfig,
    uploader: Arc<dyn UploadCapability>,
    generator: Arc<dyn GenerationCapability>,
) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        templates: Arc::new(RwLock::new(TemplateRegistry::with_builtins())),
        sessions: Arc::new(SessionStore::new()),
        uploader,
        generator,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a GET request as `user_id`.
pub async fn get_auth(app: Router, uri: &str, user_id: UserId) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-user-id", user_id.to_string())
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a JSON request (POST/PUT) as `user_id`.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    user_id: UserId,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-id", user_id.to_string())
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a bodyless POST as `user_id`.
pub async fn post_empty(app: Router, uri: &str, user_id: UserId) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-user-id", user_id.to_string())
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart builder
// ---------------------------------------------------------------------------

/// Build a multipart upload request for `/api/asset-library/upload`.
///
/// Each part is `None` to omit the field entirely, exercising the
/// missing-field responses.
pub fn multipart_upload_request(
    file: Option<(&str, &str, &[u8])>,
    category: Option<&str>,
    user_id: Option<&str>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    if let Some(value) = user_id {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"userId\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(value) = category {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/asset-library/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Domain helpers
// ---------------------------------------------------------------------------

/// Fetch the built-in template for `industry` via the public listing.
pub async fn find_template_by_industry(
    app: Router,
    user_id: UserId,
    industry: &str,
) -> serde_json::Value {
    let response = get_auth(app, "/api/v1/templates", user_id).await;
    let json = body_json(response).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["industry"] == industry)
        .cloned()
        .unwrap_or_else(|| panic!("no built-in template for industry '{industry}'"))
}
