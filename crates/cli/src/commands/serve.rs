//! `charla serve` — start the HTTP gateway.

use std::sync::Arc;

use charla_chat::ChatPipeline;
use charla_config::AppConfig;
use charla_hr::HrAssistant;
use tracing::info;

pub async fn run(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    // Tool discovery happens exactly once, before any request traffic.
    let tools = Arc::new(charla_tools::default_registry());
    let discovered = charla_tools::discover(&tools);

    let engine = charla_engine::build_from_config(&config, tools.clone());
    let pipeline = ChatPipeline::new(engine.clone());
    let hr = HrAssistant::new(pipeline.clone());

    log_startup_info(&config, discovered.len());

    charla_gateway::start(config, pipeline, hr, tools, engine).await
}

/// Report the effective runtime once wiring is complete.
fn log_startup_info(config: &AppConfig, tool_count: usize) {
    let separator = "=".repeat(60);

    info!("{separator}");
    info!("  charla gateway initialized");
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "  Address: http://{}:{}",
        config.server.host, config.server.port
    );
    info!("  Active profile: {}", config.profile);
    info!("{separator}");

    info!("Enabled features:");
    if config.has_api_key() {
        info!("- Engine API key ✓");
    }
    if config.auth.enabled {
        info!("- HTTP Basic auth ({} users) ✓", config.auth.users.len());
    }
    info!("- Tool callbacks ({tool_count}) ✓");
}
