//! `charla doctor` — diagnose configuration and backend health.

use std::sync::Arc;

use charla_config::AppConfig;
use charla_core::ToolRegistry;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 charla doctor — system diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ⚠️  No config file at {} — using defaults", config_path.display());
        Some(AppConfig::load()?)
    };

    if let Some(config) = config {
        if config.has_api_key() {
            println!("  ✅ Engine API key configured");
        } else {
            println!("  ⚠️  No API key — set CHARLA_API_KEY or engine.api_key");
            issues += 1;
        }

        if config.auth.enabled {
            println!("  ✅ HTTP Basic auth enabled ({} users)", config.auth.users.len());
        } else {
            println!("  ⚠️  Auth disabled — all routes are open");
        }

        // Reachability check against the configured backend.
        let engine = charla_engine::build_from_config(&config, Arc::new(ToolRegistry::new()));
        match engine.health_check().await {
            Ok(true) => println!("  ✅ Engine backend reachable"),
            Ok(false) => {
                println!("  ⚠️  Engine backend responded with an error");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Engine backend unreachable: {e}");
                issues += 1;
            }
        }
    }

    let tool_count = charla_tools::default_registry().len();
    println!("  ✅ {tool_count} tool callbacks registered");

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
