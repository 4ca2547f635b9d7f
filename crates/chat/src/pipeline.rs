//! The message pipeline: validation → composition → invocation → extraction.

use std::sync::Arc;

use charla_core::{ContextMap, Engine, Prompt};
use tracing::{debug, error, warn};

use crate::compose::compose;
use crate::enrich::enrich;
use crate::extract::extract;

/// Stateless orchestrator over the engine-invocation capability.
///
/// All three call shapes share the same total contract: blank input, engine
/// failure, and blank output all yield `None`. Nothing is retained between
/// calls.
#[derive(Clone)]
pub struct ChatPipeline {
    engine: Arc<dyn Engine>,
}

impl ChatPipeline {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Process a plain message: no system instruction, no enrichment.
    pub async fn process(&self, message: &str) -> Option<String> {
        if !Self::validate(message) {
            return None;
        }

        debug!(message, "processing message");
        self.invoke(compose(message, None)).await
    }

    /// Process a message enriched with caller-supplied context.
    ///
    /// `None` or an empty map behaves exactly like [`process`](Self::process).
    pub async fn process_with_context(
        &self,
        message: &str,
        context: Option<&ContextMap>,
    ) -> Option<String> {
        if !Self::validate(message) {
            return None;
        }

        debug!(message, ?context, "processing message with context");

        let enriched = match context {
            Some(ctx) => enrich(message, ctx),
            None => message.to_string(),
        };

        self.invoke(compose(&enriched, None)).await
    }

    /// Process a message under a role-defining system instruction.
    ///
    /// The message itself is passed raw — enrichment and system instructions
    /// are independent call shapes.
    pub async fn process_with_system_prompt(
        &self,
        message: &str,
        system_instruction: &str,
    ) -> Option<String> {
        if !Self::validate(message) {
            return None;
        }

        debug!(message, "processing message with system instruction");
        self.invoke(compose(message, Some(system_instruction))).await
    }

    /// Re-check the caller-side non-blank invariant at pipeline entry.
    fn validate(message: &str) -> bool {
        if message.trim().is_empty() {
            warn!("attempt to process a blank message");
            return false;
        }
        true
    }

    async fn invoke(&self, prompt: Prompt) -> Option<String> {
        match self.engine.invoke(prompt).await {
            Ok(raw) => {
                debug!(response = %raw, "engine returned");
                extract(Some(raw))
            }
            Err(e) => {
                error!(error = %e, engine = self.engine.name(), "engine invocation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charla_core::EngineError;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed response and records every prompt it sees.
    struct RecordingEngine {
        response: String,
        prompts: Mutex<Vec<Prompt>>,
        calls: AtomicUsize,
    }

    impl RecordingEngine {
        fn new(response: &str) -> Self {
            Self {
                response: response.into(),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn last_prompt(&self) -> Option<Prompt> {
            self.prompts.lock().unwrap().last().cloned()
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Engine for RecordingEngine {
        fn name(&self) -> &str {
            "recording"
        }

        async fn invoke(&self, prompt: Prompt) -> Result<String, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt);
            Ok(self.response.clone())
        }
    }

    struct FailingEngine;

    #[async_trait::async_trait]
    impl Engine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        async fn invoke(&self, _prompt: Prompt) -> Result<String, EngineError> {
            Err(EngineError::Network("connection refused".into()))
        }
    }

    fn pipeline_with(engine: Arc<RecordingEngine>) -> ChatPipeline {
        ChatPipeline::new(engine)
    }

    #[tokio::test]
    async fn process_returns_engine_text() {
        let engine = Arc::new(RecordingEngine::new("Tienes 15 días"));
        let pipeline = pipeline_with(engine.clone());

        let result = pipeline.process("hola").await;
        assert_eq!(result.as_deref(), Some("Tienes 15 días"));
        assert_eq!(engine.call_count(), 1);
    }

    #[tokio::test]
    async fn blank_message_short_circuits_before_engine() {
        let engine = Arc::new(RecordingEngine::new("nunca"));
        let pipeline = pipeline_with(engine.clone());

        assert_eq!(pipeline.process("").await, None);
        assert_eq!(pipeline.process("   ").await, None);
        assert_eq!(pipeline.process("\n\t").await, None);
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_engine_output_is_absent() {
        let engine = Arc::new(RecordingEngine::new("   "));
        let pipeline = pipeline_with(engine.clone());

        assert_eq!(pipeline.process("hola").await, None);
        assert_eq!(engine.call_count(), 1);
    }

    #[tokio::test]
    async fn engine_failure_converges_to_absence() {
        let pipeline = ChatPipeline::new(Arc::new(FailingEngine));
        assert_eq!(pipeline.process("hola").await, None);
    }

    #[tokio::test]
    async fn process_composes_plain_user_prompt() {
        let engine = Arc::new(RecordingEngine::new("ok"));
        let pipeline = pipeline_with(engine.clone());

        pipeline.process("hola").await;
        let prompt = engine.last_prompt().unwrap();
        assert!(prompt.system_text().is_none());
        assert_eq!(prompt.user_text(), "hola");
    }

    #[tokio::test]
    async fn context_is_enriched_into_the_user_unit() {
        let engine = Arc::new(RecordingEngine::new("ok"));
        let pipeline = pipeline_with(engine.clone());

        let mut ctx = ContextMap::new();
        ctx.insert("employeeId".into(), json!("E42"));
        pipeline.process_with_context("resumen", Some(&ctx)).await;

        let prompt = engine.last_prompt().unwrap();
        assert_eq!(
            prompt.user_text(),
            "Contexto: employeeId=E42\n\nConsulta: resumen"
        );
    }

    #[tokio::test]
    async fn missing_context_behaves_like_plain_process() {
        let engine = Arc::new(RecordingEngine::new("ok"));
        let pipeline = pipeline_with(engine.clone());

        pipeline.process_with_context("hola", None).await;
        assert_eq!(engine.last_prompt().unwrap().user_text(), "hola");

        pipeline
            .process_with_context("hola", Some(&ContextMap::new()))
            .await;
        assert_eq!(engine.last_prompt().unwrap().user_text(), "hola");
    }

    #[tokio::test]
    async fn system_instruction_is_not_enriched() {
        let engine = Arc::new(RecordingEngine::new("ok"));
        let pipeline = pipeline_with(engine.clone());

        pipeline
            .process_with_system_prompt("hola", "Eres un asistente de RRHH")
            .await;

        let prompt = engine.last_prompt().unwrap();
        assert_eq!(prompt.system_text(), Some("Eres un asistente de RRHH"));
        assert_eq!(prompt.user_text(), "hola");
    }

    #[tokio::test]
    async fn blank_message_with_context_short_circuits() {
        let engine = Arc::new(RecordingEngine::new("nunca"));
        let pipeline = pipeline_with(engine.clone());

        let mut ctx = ContextMap::new();
        ctx.insert("clave".into(), json!("valor"));
        assert_eq!(pipeline.process_with_context("  ", Some(&ctx)).await, None);
        assert_eq!(
            pipeline.process_with_system_prompt("", "sistema").await,
            None
        );
        assert_eq!(engine.call_count(), 0);
    }
}
