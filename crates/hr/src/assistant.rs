//! The HR assistant — domain intents over the message pipeline.

use std::sync::Arc;

use charla_chat::ChatPipeline;
use charla_core::ContextMap;
use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::model::{QueryRequest, QueryResponse};

/// Role-defining instruction for every policy consultation.
const SYSTEM_INSTRUCTION: &str = "\
Eres un asistente de Recursos Humanos profesional y amable.
Tu objetivo es ayudar a los empleados con:
- Consultas sobre políticas de la empresa
- Información sobre beneficios y compensaciones
- Solicitudes de vacaciones y permisos
- Procedimientos administrativos
- Resolución de problemas de RRHH

Siempre mantén un tono profesional pero cercano.
Si no tienes información suficiente, solicita más detalles.
Si la consulta requiere aprobación de un superior, indícalo claramente.";

/// The tool callbacks the assistant reports on successful queries, in the
/// registry's registration order.
pub const DEFAULT_TOOLS: [&str; 3] = ["employee_data", "company_policies", "benefits_system"];

/// Stateless orchestrator that builds domain-specific queries and shapes
/// structured responses. Every operation is absent-propagating: pipeline
/// absence yields an absent domain result.
#[derive(Clone)]
pub struct HrAssistant {
    pipeline: ChatPipeline,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl HrAssistant {
    pub fn new(pipeline: ChatPipeline) -> Self {
        Self::with_clock(pipeline, Arc::new(DefaultClock))
    }

    /// Inject the clock used for response timestamps.
    pub fn with_clock(pipeline: ChatPipeline, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        info!("HR assistant initialized");
        Self { pipeline, clock }
    }

    /// Answer a free-form employee query, enriched with the request's
    /// employee id and extra context when present.
    pub async fn process_query(&self, request: &QueryRequest) -> Option<QueryResponse> {
        let context = Self::build_context(request);

        let response = self
            .pipeline
            .process_with_context(&request.query, Some(&context))
            .await?;

        let mut shaped = QueryResponse::new(response, self.clock.utc())
            .with_tools(DEFAULT_TOOLS.iter().map(|t| t.to_string()).collect());

        if let Some(employee_id) = &request.employee_id {
            shaped = shaped.with_metadata(serde_json::json!({ "employeeId": employee_id }));
        }

        Some(shaped)
    }

    /// Explain a named company policy under the HR system instruction.
    pub async fn policy_information(&self, policy_name: &str) -> Option<serde_json::Value> {
        let query = format!(
            "¿Puedes explicarme la política de la empresa sobre: {policy_name}?"
        );

        let information = self
            .pipeline
            .process_with_system_prompt(&query, SYSTEM_INSTRUCTION)
            .await?;

        Some(serde_json::json!({
            "policyName": policy_name,
            "information": information,
            "timestamp": self.clock.utc(),
        }))
    }

    /// Summarize an employee's record.
    pub async fn employee_information(&self, employee_id: &str) -> Option<serde_json::Value> {
        let query = format!(
            "¿Puedes proporcionarme un resumen de la información del empleado con ID: {employee_id}?"
        );

        let mut context = ContextMap::new();
        context.insert("employeeId".into(), serde_json::json!(employee_id));

        let summary = self
            .pipeline
            .process_with_context(&query, Some(&context))
            .await?;

        Some(serde_json::json!({
            "employeeId": employee_id,
            "summary": summary,
            "timestamp": self.clock.utc(),
        }))
    }

    /// List available benefits — personalized when an employee id is given,
    /// generic otherwise.
    pub async fn benefits_information(
        &self,
        employee_id: Option<&str>,
    ) -> Option<serde_json::Value> {
        let query = match employee_id {
            Some(id) => format!("¿Qué beneficios están disponibles para el empleado {id}?"),
            None => "¿Cuáles son los beneficios disponibles en la empresa?".to_string(),
        };

        let mut context = ContextMap::new();
        if let Some(id) = employee_id {
            context.insert("employeeId".into(), serde_json::json!(id));
        }

        let benefits = self
            .pipeline
            .process_with_context(&query, Some(&context))
            .await?;

        Some(serde_json::json!({
            "benefits": benefits,
            "timestamp": self.clock.utc(),
        }))
    }

    /// Merge the request's optional fields into the enrichment context.
    fn build_context(request: &QueryRequest) -> ContextMap {
        let mut context = ContextMap::new();

        if let Some(employee_id) = &request.employee_id {
            context.insert("employeeId".into(), serde_json::json!(employee_id));
        }

        if let Some(extra) = &request.context {
            context.insert(
                "additionalContext".into(),
                serde_json::Value::Object(extra.clone()),
            );
        }

        context
    }
}
