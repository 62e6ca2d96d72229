use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brandkit_core::store::SessionStore;
use brandkit_core::template::TemplateRegistry;

use brandkit_api::capabilities::{StubGenerationCapability, StubUploadCapability};
use brandkit_api::config::ServerConfig;
use brandkit_api::router::build_app_router;
use brandkit_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brandkit_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Template registry ---
    let templates = Arc::new(RwLock::new(TemplateRegistry::with_builtins()));
    tracing::info!("Built-in templates seeded");

    // --- Session store ---
    let sessions = Arc::new(SessionStore::new());

    // --- Capability providers ---
    // Stubs fabricate storage URLs and placeholder assets; swap in real
    // providers here once the storage and generation backends are wired up.
    let uploader = Arc::new(StubUploadCapability);
    let generator = Arc::new(StubGenerationCapability);

    let state = AppState {
        config: Arc::new(config.clone()),
        templates,
        sessions,
        uploader,
        generator,
    };

    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("HOST and PORT must form a valid socket address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "BrandKit API listening");

    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
