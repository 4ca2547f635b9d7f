//! HTTP API gateway for charla.
//!
//! Exposes the chat pipeline and the HR assistant over REST, with HTTP Basic
//! authentication gating the mutating and domain routes. Built on Axum.
//!
//! Route surface:
//!
//! - `GET  /chat?message=`                    — public chat (plain text)
//! - `POST /chat`                             — authenticated chat (JSON envelope)
//! - `GET  /chat/health`                      — liveness
//! - `GET  /info`                             — version / profile / uptime
//! - `GET  /status`                           — admin diagnostics
//! - `POST /hr-assistant/query`               — free-form HR query
//! - `GET  /hr-assistant/policies?policyName=`
//! - `GET  /hr-assistant/employee/{employeeId}`
//! - `GET  /hr-assistant/benefits?employeeId=`

pub mod api;
pub mod auth;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tracing::info;

use charla_chat::ChatPipeline;
use charla_config::AppConfig;
use charla_core::{Engine, ToolRegistry};
use charla_hr::HrAssistant;

/// Shared application state for the gateway.
///
/// Everything here is established before traffic and read-only afterwards —
/// concurrent handlers need no locking.
pub struct AppState {
    pub pipeline: ChatPipeline,
    pub hr: HrAssistant,
    pub tools: Arc<ToolRegistry>,
    pub engine: Arc<dyn Engine>,
    pub config: AppConfig,
    pub start_time: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - Path/method-based authorization (Basic auth, role-gated)
/// - CORS with restrictive origin policy
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::exact(
            "http://localhost:8080".parse().unwrap(),
        ))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    Router::new()
        .route("/chat", get(api::chat_get).post(api::chat_post))
        .route("/chat/health", get(api::chat_health))
        .route("/info", get(api::info_handler))
        .route("/status", get(api::status_handler))
        .route("/hr-assistant/query", post(api::hr_query))
        .route("/hr-assistant/policies", get(api::hr_policies))
        .route(
            "/hr-assistant/employee/{employee_id}",
            get(api::hr_employee),
        )
        .route("/hr-assistant/benefits", get(api::hr_benefits))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authorize,
        ))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: AppConfig,
    pipeline: ChatPipeline,
    hr: HrAssistant,
    tools: Arc<ToolRegistry>,
    engine: Arc<dyn Engine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = Arc::new(AppState {
        pipeline,
        hr,
        tools,
        engine,
        config,
        start_time: Utc::now(),
    });

    let app = build_router(state);

    info!(addr = %addr, "gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
