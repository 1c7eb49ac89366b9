pub mod browser;
pub mod parse;

pub use browser::{BrowserlessRenderer, PageRenderer, WaitFor};
pub use parse::parse_cards;

use tracing::{debug, info, warn};

use crate::config::{CARD_SELECTOR, SELECTOR_TIMEOUT_MS};
use crate::error::{AppError, Result};
use crate::types::ResultCard;

/// Loads the results page and turns its cards into records.
pub struct Extractor {
    renderer: Box<dyn PageRenderer>,
    target_url: String,
    wait: WaitFor,
}

impl Extractor {
    pub fn new(renderer: Box<dyn PageRenderer>, target_url: impl Into<String>) -> Self {
        Self {
            renderer,
            target_url: target_url.into(),
            wait: WaitFor {
                selector: CARD_SELECTOR.to_string(),
                timeout_ms: SELECTOR_TIMEOUT_MS,
            },
        }
    }

    pub async fn extract(&self) -> Result<Vec<ResultCard>> {
        info!(
            url = %self.target_url,
            renderer = self.renderer.name(),
            "Rendering results page"
        );
        let html = self.renderer.render(&self.target_url, &self.wait).await?;

        let cards = parse_cards(&html);
        if cards.is_empty() {
            // The renderer returned a page, but the card container never showed up in it.
            warn!(url = %self.target_url, bytes = html.len(), "No result cards in rendered page");
            return Err(AppError::Timeout {
                selector: self.wait.selector.clone(),
                timeout_ms: self.wait.timeout_ms,
            });
        }

        for card in &cards {
            debug!(
                title = %card.title,
                time = %card.time,
                results = card.results.len(),
                "Extracted card"
            );
        }
        info!("Collected {} cards from {}", cards.len(), self.target_url);
        Ok(cards)
    }
}
