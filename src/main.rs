mod api;
mod config;
mod db;
mod error;
mod extractor;
mod pipeline;
mod results;
mod types;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::{router, ApiState, HealthState};
use crate::config::Config;
use crate::error::{AppError, Result};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup ---
    let pool = db::connect(&cfg.db).await?;
    db::migrate(&pool).await?;
    info!("Database ready");

    // --- HTTP API server ---
    let health = Arc::new(HealthState::new());
    let api_state = ApiState {
        pool: pool.clone(),
        health: Arc::clone(&health),
    };
    let app = router(api_state, &cfg.static_dir);
    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}, static files from {}", cfg.static_dir);

    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // --- Startup scrape: one run, awaited, independent of the listener ---
    if cfg.scrape_on_startup {
        pipeline::startup_run(&cfg, &pool, &health).await;
    } else {
        health.mark_skipped();
        info!("SCRAPE_ON_STARTUP disabled, serving stored results only");
    }

    server
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))??;

    pool.close().await;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
