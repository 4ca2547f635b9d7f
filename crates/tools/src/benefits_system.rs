//! Benefits catalog tool — stub for the benefits platform.

use async_trait::async_trait;
use charla_core::error::ToolError;
use charla_core::tool::{Tool, ToolOutcome};

pub struct BenefitsSystemTool;

#[async_trait]
impl Tool for BenefitsSystemTool {
    fn name(&self) -> &str {
        "benefits_system"
    }

    fn description(&self) -> &str {
        "Lista los beneficios disponibles en la empresa, opcionalmente personalizados para un empleado concreto."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "employee_id": {
                    "type": "string",
                    "description": "Identificador del empleado para personalizar la respuesta (opcional)"
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let employee_id = arguments["employee_id"].as_str();

        let mut benefits = vec![
            "Seguro médico privado para el empleado y su familia directa",
            "Tarjeta restaurante de 11 € por día trabajado",
            "Presupuesto anual de formación de 1.500 €",
            "Plan de pensiones con aportación de la empresa del 3%",
        ];

        // Seniority perks only make sense for an identified employee.
        if employee_id.is_some() {
            benefits.push("Días adicionales de vacaciones por antigüedad (consultar nómina)");
        }

        let catalog = serde_json::json!({
            "employee_id": employee_id,
            "benefits": benefits,
        });

        Ok(ToolOutcome {
            call_id: String::new(),
            output: serde_json::to_string_pretty(&catalog).unwrap_or_default(),
        })
    }
}
