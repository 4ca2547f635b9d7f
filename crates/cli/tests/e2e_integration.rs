//! End-to-end integration tests for the charla gateway.
//!
//! These exercise the full pipeline from HTTP request to engine invocation
//! and back: authorization, validation, enrichment, prompt composition,
//! response shaping, and the uniform absence-to-error mapping.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine as _;
use http_body_util::BodyExt;
use tower::ServiceExt;

use charla_chat::ChatPipeline;
use charla_config::{AppConfig, AuthConfig, UserConfig};
use charla_core::{Engine, EngineError, Prompt};
use charla_gateway::{AppState, SharedState, build_router};
use charla_hr::HrAssistant;

// ── Mock engine ──────────────────────────────────────────────────────────

/// Returns a fixed response (or a fixed failure) and records every prompt.
struct ScriptedEngine {
    response: Option<String>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedEngine {
    fn text(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Some(response.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Engine for ScriptedEngine {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn invoke(&self, prompt: Prompt) -> Result<String, EngineError> {
        self.prompts.lock().unwrap().push(prompt);
        self.response
            .clone()
            .ok_or_else(|| EngineError::Network("backend down".into()))
    }
}

// ── Wiring ───────────────────────────────────────────────────────────────

fn state_with(engine: Arc<ScriptedEngine>, auth_enabled: bool) -> SharedState {
    let tools = Arc::new(charla_tools::default_registry());
    let engine_dyn: Arc<dyn Engine> = engine;
    let pipeline = ChatPipeline::new(engine_dyn.clone());
    let hr = HrAssistant::new(pipeline.clone());

    let config = AppConfig {
        auth: AuthConfig {
            enabled: auth_enabled,
            users: vec![UserConfig {
                name: "ana".into(),
                password: "secreta".into(),
                role: "user".into(),
            }],
        },
        ..AppConfig::default()
    };

    Arc::new(AppState {
        pipeline,
        hr,
        tools,
        engine: engine_dyn,
        config,
        start_time: chrono::Utc::now(),
    })
}

fn basic(user: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
    format!("Basic {encoded}")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ── E2E: HR query pipeline ───────────────────────────────────────────────

#[tokio::test]
async fn e2e_hr_query_with_employee_id() {
    // Scenario: an employee asks about vacation days; the stubbed engine
    // answers; the response carries the tool list and employee metadata.
    let engine = ScriptedEngine::text("Tienes 15 días");
    let app = build_router(state_with(engine.clone(), true));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/hr-assistant/query")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, basic("ana", "secreta"))
                .body(Body::from(
                    r#"{"query": "¿Cuántos días de vacaciones tengo?", "employeeId": "E42"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["response"], "Tienes 15 días");
    assert_eq!(
        json["toolsUsed"],
        serde_json::json!(["employee_data", "company_policies", "benefits_system"])
    );
    assert_eq!(json["metadata"], serde_json::json!({"employeeId": "E42"}));
    assert!(json["timestamp"].is_string());

    // The employee id reached the engine through context enrichment.
    let prompt = engine.last_prompt().unwrap();
    assert_eq!(
        prompt.user_text(),
        "Contexto: employeeId=E42\n\nConsulta: ¿Cuántos días de vacaciones tengo?"
    );
    assert!(prompt.system_text().is_none());
}

#[tokio::test]
async fn e2e_engine_failure_maps_to_500_everywhere() {
    let engine = ScriptedEngine::failing();
    let app = build_router(state_with(engine.clone(), false));

    let chat = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/chat?message=hola")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(chat.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let benefits = app
        .oneshot(
            Request::builder()
                .uri("/hr-assistant/benefits")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(benefits.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(benefits).await;
    assert_eq!(json["error"], "Error al consultar beneficios");

    // The engine was invoked once per request; failure happened after entry.
    assert_eq!(engine.calls(), 2);
}

#[tokio::test]
async fn e2e_policy_lookup_uses_system_instruction() {
    let engine = ScriptedEngine::text("La política de vacaciones dice…");
    let app = build_router(state_with(engine.clone(), false));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/hr-assistant/policies?policyName=vacaciones")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["policyName"], "vacaciones");
    assert_eq!(json["information"], "La política de vacaciones dice…");

    let prompt = engine.last_prompt().unwrap();
    assert!(
        prompt
            .system_text()
            .unwrap()
            .contains("asistente de Recursos Humanos")
    );
    assert_eq!(
        prompt.user_text(),
        "¿Puedes explicarme la política de la empresa sobre: vacaciones?"
    );
}

#[tokio::test]
async fn e2e_benefits_personalized_vs_generic() {
    let engine = ScriptedEngine::text("Beneficios…");
    let app = build_router(state_with(engine.clone(), false));

    app.clone()
        .oneshot(
            Request::builder()
                .uri("/hr-assistant/benefits?employeeId=E1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        engine.last_prompt().unwrap().user_text(),
        "Contexto: employeeId=E1\n\nConsulta: ¿Qué beneficios están disponibles para el empleado E1?"
    );

    app.oneshot(
        Request::builder()
            .uri("/hr-assistant/benefits")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(
        engine.last_prompt().unwrap().user_text(),
        "¿Cuáles son los beneficios disponibles en la empresa?"
    );
}

#[tokio::test]
async fn e2e_employee_summary_flow() {
    let engine = ScriptedEngine::text("Lucía Fernández, Ingeniería, 4 años");
    let app = build_router(state_with(engine.clone(), false));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/hr-assistant/employee/E42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["employeeId"], "E42");
    assert_eq!(json["summary"], "Lucía Fernández, Ingeniería, 4 años");
}

// ── E2E: chat surface and auth gating ────────────────────────────────────

#[tokio::test]
async fn e2e_public_chat_get_and_gated_chat_post() {
    let engine = ScriptedEngine::text("hola desde el motor");
    let app = build_router(state_with(engine.clone(), true));

    // GET /chat is public.
    let get = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/chat?message=hola")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::OK);

    // POST /chat needs credentials.
    let post_anon = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": "hola"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(post_anon.status(), StatusCode::UNAUTHORIZED);

    let post_auth = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, basic("ana", "secreta"))
                .body(Body::from(r#"{"message": "hola"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(post_auth.status(), StatusCode::OK);
    let json = json_body(post_auth).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["response"], "hola desde el motor");
}

#[tokio::test]
async fn e2e_blank_query_never_reaches_the_engine() {
    let engine = ScriptedEngine::text("nunca");
    let app = build_router(state_with(engine.clone(), false));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/hr-assistant/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query": "   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["response"], "Error: La consulta no puede estar vacía");
    assert_eq!(engine.calls(), 0);
}
