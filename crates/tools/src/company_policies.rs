//! Company policy handbook tool — stub for the policy repository.

use async_trait::async_trait;
use charla_core::error::ToolError;
use charla_core::tool::{Tool, ToolOutcome};

pub struct CompanyPoliciesTool;

#[async_trait]
impl Tool for CompanyPoliciesTool {
    fn name(&self) -> &str {
        "company_policies"
    }

    fn description(&self) -> &str {
        "Busca el texto de una política de la empresa por nombre o tema: vacaciones, trabajo remoto, permisos, código de conducta."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "policy": {
                    "type": "string",
                    "description": "El nombre o tema de la política a consultar"
                }
            },
            "required": ["policy"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let policy = arguments["policy"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'policy' argument".into()))?;

        Ok(ToolOutcome {
            call_id: String::new(),
            output: lookup(policy).to_string(),
        })
    }
}

fn lookup(policy: &str) -> &'static str {
    let topic = policy.to_lowercase();

    // Keyword matching over the handbook topics; unknown topics fall back to
    // a pointer at the full handbook.
    let handbook: Vec<(&[&str], &str)> = vec![
        (
            &["vacacion", "vacation"],
            "Política de vacaciones: cada empleado dispone de 22 días laborables al año, \
             ampliables con la antigüedad. Las solicitudes se presentan con al menos dos \
             semanas de antelación y requieren aprobación del responsable directo.",
        ),
        (
            &["remoto", "teletrabajo", "remote"],
            "Política de trabajo remoto: se permiten hasta tres días de teletrabajo por \
             semana previo acuerdo con el equipo. Los puestos con atención presencial \
             quedan excluidos.",
        ),
        (
            &["permiso", "licencia"],
            "Política de permisos: los permisos retribuidos cubren mudanza (1 día), \
             matrimonio (15 días) y nacimiento o adopción según la legislación vigente. \
             Cualquier otro permiso requiere aprobación de RRHH.",
        ),
        (
            &["conducta", "etica"],
            "Código de conducta: se espera un trato respetuoso y profesional. Los \
             incumplimientos se comunican de forma confidencial al canal de ética.",
        ),
    ];

    for (keywords, text) in &handbook {
        if keywords.iter().any(|k| topic.contains(k)) {
            return text;
        }
    }

    "No hay una política específica registrada con ese nombre. El manual completo del \
     empleado está disponible en el portal interno de RRHH."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn vacation_policy_found() {
        let tool = CompanyPoliciesTool;
        let outcome = tool
            .execute(serde_json::json!({"policy": "vacaciones"}))
            .await
            .unwrap();

        assert!(outcome.output.contains("22 días"));
    }

    #[tokio::test]
    async fn remote_work_policy_found_by_keyword() {
        let tool = CompanyPoliciesTool;
        let outcome = tool
            .execute(serde_json::json!({"policy": "trabajo remoto"}))
            .await
            .unwrap();

        assert!(outcome.output.contains("teletrabajo"));
    }

    #[tokio::test]
    async fn unknown_policy_falls_back() {
        let tool = CompanyPoliciesTool;
        let outcome = tool
            .execute(serde_json::json!({"policy": "mascotas en la oficina"}))
            .await
            .unwrap();

        assert!(outcome.output.contains("portal interno"));
    }

    #[tokio::test]
    async fn missing_policy_returns_error() {
        let tool = CompanyPoliciesTool;
        let result = tool.execute(serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
