//! Employee directory tool — stub for the HR information system.
//!
//! In production this would query the HR database. The stub returns mock
//! employee records so the assistant can be tested end-to-end.

use async_trait::async_trait;
use charla_core::error::ToolError;
use charla_core::tool::{Tool, ToolOutcome};

pub struct EmployeeDataTool;

#[async_trait]
impl Tool for EmployeeDataTool {
    fn name(&self) -> &str {
        "employee_data"
    }

    fn description(&self) -> &str {
        "Consulta los datos básicos de un empleado: nombre, departamento, antigüedad y días de vacaciones disponibles."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "employee_id": {
                    "type": "string",
                    "description": "El identificador del empleado, por ejemplo E42"
                }
            },
            "required": ["employee_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let employee_id = arguments["employee_id"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'employee_id' argument".into()))?;

        let record = lookup(employee_id);
        let output = serde_json::to_string_pretty(&record).unwrap_or_default();

        Ok(ToolOutcome {
            call_id: String::new(),
            output,
        })
    }
}

#[derive(Clone, serde::Serialize)]
struct EmployeeRecord {
    employee_id: String,
    name: String,
    department: String,
    years_of_service: u32,
    vacation_days_available: u32,
}

fn lookup(employee_id: &str) -> EmployeeRecord {
    let directory = vec![
        EmployeeRecord {
            employee_id: "E42".into(),
            name: "Lucía Fernández".into(),
            department: "Ingeniería".into(),
            years_of_service: 4,
            vacation_days_available: 15,
        },
        EmployeeRecord {
            employee_id: "E7".into(),
            name: "Marcos Herrera".into(),
            department: "Ventas".into(),
            years_of_service: 2,
            vacation_days_available: 12,
        },
        EmployeeRecord {
            employee_id: "E123".into(),
            name: "Carmen Ruiz".into(),
            department: "Finanzas".into(),
            years_of_service: 9,
            vacation_days_available: 22,
        },
    ];

    directory
        .iter()
        .find(|r| r.employee_id == employee_id)
        .cloned()
        // Unknown ids get a generic record so the model always has something
        // concrete to answer with.
        .unwrap_or_else(|| EmployeeRecord {
            employee_id: employee_id.to_string(),
            name: "Empleado sin registro detallado".into(),
            department: "General".into(),
            years_of_service: 1,
            vacation_days_available: 10,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_employee_returns_record() {
        let tool = EmployeeDataTool;
        let outcome = tool
            .execute(serde_json::json!({"employee_id": "E42"}))
            .await
            .unwrap();

        assert!(outcome.output.contains("Lucía Fernández"));
        assert!(outcome.output.contains("Ingeniería"));
    }

    #[tokio::test]
    async fn unknown_employee_gets_generic_record() {
        let tool = EmployeeDataTool;
        let outcome = tool
            .execute(serde_json::json!({"employee_id": "E999"}))
            .await
            .unwrap();

        assert!(outcome.output.contains("E999"));
        assert!(outcome.output.contains("General"));
    }

    #[tokio::test]
    async fn missing_employee_id_returns_error() {
        let tool = EmployeeDataTool;
        let result = tool.execute(serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn tool_descriptor() {
        let tool = EmployeeDataTool;
        let descriptor = tool.descriptor();
        assert_eq!(descriptor.name, "employee_data");
        assert!(descriptor.description.contains("empleado"));
    }
}
