mod bootstrap;
mod health;
pub mod routes;

use std::time::Duration;

use anyhow::Result;
use outfitter_core::config::{AppConfig, LoadOptions};
use tracing::{info, warn};

fn init_logging(config: &AppConfig) {
    use outfitter_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        parsing_method = if app.parser.uses_llm() { "gemini_ai" } else { "rules" },
        "outfitter-server listening"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    let state = routes::AppState {
        catalog: app.catalog.clone(),
        directory: app.directory.clone(),
        parser: app.parser.clone(),
    };

    tokio::select! {
        result = async {
            axum::serve(listener, routes::router(state))
                .with_graceful_shutdown(shutdown_signal())
                .await
        } => {
            result?;
            info!(
                event_name = "system.server.stopped",
                correlation_id = "shutdown",
                "outfitter-server stopped cleanly"
            );
        }
        () = forced_shutdown(grace) => {
            warn!(
                event_name = "system.server.forced_shutdown",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "graceful shutdown window elapsed, exiting"
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "shutdown signal received, draining connections"
    );
}

async fn forced_shutdown(grace: Duration) {
    let _ = tokio::signal::ctrl_c().await;
    tokio::time::sleep(grace).await;
}
