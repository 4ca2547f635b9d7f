//! Engine backends for charla.
//!
//! An engine is the opaque capability the pipeline invokes: prompt in, final
//! text out, tool callbacks executed internally along the way. The only
//! production backend is OpenAI-compatible, which covers OpenAI, OpenRouter,
//! Ollama, vLLM, and any endpoint speaking `/v1/chat/completions`.

pub mod openai_compat;

use std::sync::Arc;

use charla_config::AppConfig;
use charla_core::{Engine, ToolRegistry};

pub use openai_compat::OpenAiCompatEngine;

/// Build the configured engine with the discovered tools bound into it.
pub fn build_from_config(config: &AppConfig, tools: Arc<ToolRegistry>) -> Arc<dyn Engine> {
    Arc::new(OpenAiCompatEngine::from_config(&config.engine, tools))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let engine = build_from_config(&config, Arc::new(ToolRegistry::new()));
        assert_eq!(engine.name(), "openai-compat");
    }
}
