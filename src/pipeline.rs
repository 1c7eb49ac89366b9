use sqlx::AnyPool;
use tracing::{error, info};

use crate::api::HealthState;
use crate::config::Config;
use crate::db::writer::ResultWriter;
use crate::error::Result;
use crate::extractor::{BrowserlessRenderer, Extractor};
use crate::types::SaveReport;

/// Scrape the page once and persist whatever is new.
/// Extraction failures abort before the store is touched.
pub async fn run_once(extractor: &Extractor, writer: &ResultWriter) -> Result<SaveReport> {
    let cards = extractor.extract().await?;
    let prize_count: usize = cards.iter().map(|c| c.results.len()).sum();
    info!(cards = cards.len(), prizes = prize_count, "Scraped data ready to persist");
    writer.save(&cards).await
}

/// The one scrape run triggered at process start. Its outcome is logged and
/// recorded for /health; it never fails the process.
pub async fn startup_run(cfg: &Config, pool: &AnyPool, health: &HealthState) {
    info!("Starting scrape of {}", cfg.target_url);

    let outcome = match BrowserlessRenderer::new(&cfg.browserless_url, cfg.browserless_token.as_deref()) {
        Ok(renderer) => {
            let extractor = Extractor::new(Box::new(renderer), cfg.target_url.clone());
            let writer = ResultWriter::new(pool.clone());
            run_once(&extractor, &writer).await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(report) => {
            info!("Scrape run finished: {report}");
            health.record_success(report);
        }
        Err(e) => {
            error!("Scrape run failed: {e}");
            health.record_failure(&e);
        }
    }
}
