mod agent;
mod config;
mod errors;
mod models;
mod routes;
mod service;
mod session;

use axum::{routing::get, Router};
use chrono::TimeDelta;
use lexi_core::persona::CREDENTIAL_VAR;
use lexi_core::SessionConfig;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::agent::GeminiAgentService;
use crate::config::AppConfig;
use crate::routes::api_routes::{get_session_handler, status_handler};
use crate::routes::ws_routes::ws_chat_handler;
use crate::service::chat_service::ChatService;
use crate::session::SessionStore;

type AppService = ChatService<GeminiAgentService>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexi_chat=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();

    // ── Model client ──────────────────────────────────────────────────────────
    let agent = match config.api_key.as_deref() {
        Some(key) => Some(GeminiAgentService::new(key)?),
        None => {
            error!("{CREDENTIAL_VAR} not found; chat turns will be refused until it is set");
            None
        }
    };

    let session_config = SessionConfig::lexi().with_model(&config.model);
    let store = SessionStore::with_idle_ttl(TimeDelta::minutes(config.session_idle_minutes));
    let chat_service: AppService = ChatService::new(store, agent, session_config);

    // ── Router ────────────────────────────────────────────────────────────────
    let mut app = Router::new()
        .route("/ws/chat", get(ws_chat_handler::<GeminiAgentService>))
        .route("/api/status", get(status_handler::<GeminiAgentService>))
        .route("/api/sessions/{id}", get(get_session_handler::<GeminiAgentService>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(chat_service);

    if let Some(dist) = &config.frontend_dist {
        info!("Serving widget from {}", dist.display());
        app = app.fallback_service(ServeDir::new(dist));
    }

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/ (model: {})", config.model);

    axum::serve(listener, app).await?;
    Ok(())
}
