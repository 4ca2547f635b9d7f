//! HR-assistant domain layer for charla.
//!
//! A higher-level consumer of the message pipeline: turns domain intents
//! (policy lookup, employee lookup, benefits lookup, free-form queries) into
//! pipeline calls and shapes structured responses with metadata.

pub mod assistant;
pub mod model;

pub use assistant::{DEFAULT_TOOLS, HrAssistant};
pub use model::{QueryRequest, QueryRequestError, QueryResponse};
