//! # Charla Core
//!
//! Domain types, traits, and error definitions for the charla assistant
//! gateway. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The engine (text generation + tool execution) and every tool callback are
//! defined as traits here. Implementations live in their respective crates.
//! This enables:
//! - Swapping the engine backend via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod engine;
pub mod error;
pub mod message;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use engine::Engine;
pub use error::{EngineError, Error, Result, ToolError};
pub use message::{ContextMap, Message, MessageToolCall, Prompt, Role};
pub use tool::{Tool, ToolCall, ToolDescriptor, ToolOutcome, ToolRegistry};
