//! Vayama server
//!
//! Entry point: configuration, logging, the planner driver and the HTTP server.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vayama::config::{AppConfig, LoggingConfig};
use vayama::llm::GeminiDriver;
use vayama::server::start_server;

/// Initialize tracing (M-LOG-STRUCTURED). `RUST_LOG` wins over the
/// configured filter.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(fmt::layer().json().with_target(true)).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = Arc::new(AppConfig::load().context("failed to load configuration")?);
    init_tracing(&config.logging)?;

    if config.llm.api_key.is_none() {
        warn!("No Gemini API key configured; planner replies will fall back to the apology");
    }

    let driver = Arc::new(GeminiDriver::new(config.llm_settings()).context("failed to build LLM client")?);
    info!(model = %config.llm.model, "Planner driver ready");

    start_server(config, driver).await
}
