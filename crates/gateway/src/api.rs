//! Route handlers for the chat and HR-assistant surfaces.
//!
//! The boundary maps pipeline absence to fixed Spanish error payloads; the
//! underlying failure cause is only visible in the logs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use charla_hr::{QueryRequest, QueryResponse};

use crate::SharedState;

// ── Chat ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChatQueryParams {
    pub message: String,
}

/// `GET /chat?message=` — plain-text chat, public.
pub async fn chat_get(
    State(state): State<SharedState>,
    Query(params): Query<ChatQueryParams>,
) -> Result<String, (StatusCode, String)> {
    info!(message = %params.message, "GET /chat request");

    state.pipeline.process(&params.message).await.ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error al procesar el mensaje".to_string(),
    ))
}

#[derive(Deserialize)]
pub struct ChatMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /chat` — JSON chat envelope, authenticated.
pub async fn chat_post(
    State(state): State<SharedState>,
    Json(payload): Json<ChatMessageRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let message = payload.message.unwrap_or_default();
    info!(message = %message, "POST /chat request");

    if message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(error_envelope("El mensaje no puede estar vacío")),
        );
    }

    match state.pipeline.process(&message).await {
        Some(response) => (StatusCode::OK, Json(success_envelope(&response))),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_envelope("Error al procesar el mensaje")),
        ),
    }
}

fn success_envelope(response: &str) -> serde_json::Value {
    serde_json::json!({
        "response": response,
        "status": "success",
        "timestamp": Utc::now().timestamp_millis(),
    })
}

fn error_envelope(message: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "error",
        "message": message,
        "timestamp": Utc::now().timestamp_millis(),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// `GET /chat/health` — liveness, public.
pub async fn chat_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        service: "charla gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ── Service info / diagnostics ────────────────────────────────────────────

#[derive(Serialize)]
pub struct InfoResponse {
    service: &'static str,
    version: &'static str,
    profile: String,
    uptime_secs: i64,
}

/// `GET /info` — version, active profile, uptime. Public.
pub async fn info_handler(State(state): State<SharedState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        service: "charla gateway",
        version: env!("CARGO_PKG_VERSION"),
        profile: state.config.profile.clone(),
        uptime_secs: (Utc::now() - state.start_time).num_seconds(),
    })
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    version: &'static str,
    profile: String,
    engine: String,
    tools: Vec<String>,
    auth_enabled: bool,
    uptime_secs: i64,
}

/// `GET /status` — admin diagnostics.
pub async fn status_handler(State(state): State<SharedState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        profile: state.config.profile.clone(),
        engine: state.engine.name().to_string(),
        tools: state.tools.names().iter().map(|n| n.to_string()).collect(),
        auth_enabled: state.config.auth.enabled,
        uptime_secs: (Utc::now() - state.start_time).num_seconds(),
    })
}

// ── HR assistant ──────────────────────────────────────────────────────────

/// `POST /hr-assistant/query` — free-form HR query with optional employee id
/// and context.
pub async fn hr_query(
    State(state): State<SharedState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<QueryResponse>)> {
    let request = payload.normalized();
    info!(
        employee_id = ?request.employee_id,
        query = %request.query,
        "HR query received"
    );

    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(QueryResponse::error(&e.to_string(), Utc::now())),
        ));
    }

    state
        .hr
        .process_query(&request)
        .await
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(QueryResponse::error(
                    "Error al procesar la consulta",
                    Utc::now(),
                )),
            )
        })
}

#[derive(Deserialize)]
pub struct PolicyParams {
    #[serde(rename = "policyName")]
    pub policy_name: String,
}

/// `GET /hr-assistant/policies?policyName=`
pub async fn hr_policies(
    State(state): State<SharedState>,
    Query(params): Query<PolicyParams>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    info!(policy = %params.policy_name, "policy query");

    state
        .hr
        .policy_information(&params.policy_name)
        .await
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Error al consultar la política" })),
            )
        })
}

/// `GET /hr-assistant/employee/{employeeId}`
pub async fn hr_employee(
    State(state): State<SharedState>,
    Path(employee_id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    info!(employee_id = %employee_id, "employee info query");

    state
        .hr
        .employee_information(&employee_id)
        .await
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Error al consultar información del empleado"
                })),
            )
        })
}

#[derive(Deserialize)]
pub struct BenefitsParams {
    #[serde(rename = "employeeId")]
    pub employee_id: Option<String>,
}

/// `GET /hr-assistant/benefits?employeeId=` — employee id optional.
pub async fn hr_benefits(
    State(state): State<SharedState>,
    Query(params): Query<BenefitsParams>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    info!(employee_id = ?params.employee_id, "benefits query");

    state
        .hr
        .benefits_information(params.employee_id.as_deref())
        .await
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Error al consultar beneficios" })),
            )
        })
}
