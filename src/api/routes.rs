use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::AnyPool;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::api::health::{HealthState, ScrapeSnapshot};
use crate::error::AppError;
use crate::results::grouped_results;
use crate::types::GroupedCard;

#[derive(Clone)]
pub struct ApiState {
    pub pool: AnyPool,
    pub health: Arc<HealthState>,
}

/// JSON routes plus static assets from `static_dir` for everything else.
pub fn router(state: ApiState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/results", get(get_results))
        .route("/health", get(get_health))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub scrape: ScrapeSnapshot,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_results(State(state): State<ApiState>) -> Result<Json<Vec<GroupedCard>>, AppError> {
    let cards = grouped_results(&state.pool).await?;
    Ok(Json(cards))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let (status, database) = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => ("ok", "ok"),
        Err(e) => {
            tracing::warn!("Health check query failed: {e}");
            ("degraded", "unreachable")
        }
    };

    Json(HealthResponse {
        status,
        database,
        scrape: state.health.snapshot(),
    })
}
