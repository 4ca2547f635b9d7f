//! Request and response value objects for the HR assistant.

use charla_core::ContextMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An inbound HR query.
///
/// `query` is trimmed on construction and must be non-blank; `employee_id`
/// and `context` are independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextMap>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryRequestError {
    #[error("La consulta no puede estar vacía")]
    BlankQuery,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().trim().to_string(),
            employee_id: None,
            context: None,
        }
    }

    pub fn with_employee(query: impl Into<String>, employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::new(query)
        }
    }

    /// Apply the canonical trimming to a request that arrived over the wire.
    pub fn normalized(mut self) -> Self {
        self.query = self.query.trim().to_string();
        self
    }

    /// The boundary-side non-blank invariant.
    pub fn validate(&self) -> Result<(), QueryRequestError> {
        if self.query.trim().is_empty() {
            return Err(QueryRequestError::BlankQuery);
        }
        Ok(())
    }
}

/// A shaped HR response: text plus timestamp, tool list, and metadata.
///
/// Built fresh per request and never mutated after construction; timestamps
/// are always supplied explicitly so shaping stays deterministic under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub response: String,

    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_used: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl QueryResponse {
    pub fn new(response: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            response: response.into(),
            timestamp,
            tools_used: None,
            metadata: None,
        }
    }

    pub fn with_tools(mut self, tools_used: Vec<String>) -> Self {
        self.tools_used = Some(tools_used);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The fixed error shape the boundary returns on pipeline absence.
    pub fn error(message: &str, timestamp: DateTime<Utc>) -> Self {
        Self::new(format!("Error: {message}"), timestamp)
    }
}
