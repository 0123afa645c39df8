//! Endoscreen: Endometriosis symptom screening
//!
//! Main entry point for the web server.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use endoscreen::adapters::sanitize::SanitizingMakeWriter;
use endoscreen::application::SklearnPredictionService;
use endoscreen::config::{LogMode, ServerConfig};
use endoscreen::web;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    // Initialize logging.
    let (writer, _guard) = match config.log_mode {
        LogMode::File => {
            if let Some(parent) = config.log_file.parent() {
                // Best-effort: don't fail startup just because the directory is missing.
                let _ = std::fs::create_dir_all(parent);
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)
                .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Endoscreen...");

    let service = SklearnPredictionService::load(&config.model_dir, config.require_manifest)
        .with_context(|| format!("Failed to load models from {:?}", config.model_dir))?;

    let app = web::router(Arc::new(service));
    web::serve(config.bind_addr, app).await?;

    tracing::info!("Endoscreen shutdown complete.");
    Ok(())
}
