use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::config::RENDER_REQUEST_TIMEOUT_SECS;
use crate::error::{AppError, Result};

/// What the browser must see before the page counts as loaded.
#[derive(Debug, Clone)]
pub struct WaitFor {
    pub selector: String,
    pub timeout_ms: u64,
}

impl WaitFor {
    fn timeout_error(&self) -> AppError {
        AppError::Timeout {
            selector: self.selector.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Produces the fully rendered HTML of a page.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, wait: &WaitFor) -> Result<String>;
    fn name(&self) -> &str;
}

// --- Browserless renderer ---

/// Headless Chrome behind the Browserless `/content` API.
pub struct BrowserlessRenderer {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessRenderer {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RENDER_REQUEST_TIMEOUT_SECS))
            .build()?;

        info!(base_url, "Using BrowserlessRenderer");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }
}

#[async_trait]
impl PageRenderer for BrowserlessRenderer {
    async fn render(&self, url: &str, wait: &WaitFor) -> Result<String> {
        let endpoint = format!("{}/content", self.base_url);
        let body = serde_json::json!({
            "url": url,
            "gotoOptions": { "waitUntil": "networkidle2" },
            "waitForSelector": { "selector": wait.selector, "timeout": wait.timeout_ms },
        });

        let mut req = self.client.post(&endpoint).json(&body);
        if let Some(ref token) = self.token {
            req = req.query(&[("token", token)]);
        }

        debug!(url, endpoint = %endpoint, "Requesting rendered page");
        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return Err(wait.timeout_error()),
            Err(e) => return Err(AppError::Navigation(format!("{url}: {e}"))),
        };

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(url, status = status.as_u16(), "Render request failed");
            return Err(classify_failure(status, &message, url, wait));
        }

        resp.text()
            .await
            .map_err(|e| AppError::Navigation(format!("{url}: failed to read rendered page: {e}")))
    }

    fn name(&self) -> &str {
        "browserless"
    }
}

/// Map a failed render response onto the extraction error taxonomy.
/// Browserless reports a selector wait that ran out either as 408 or as a
/// puppeteer `TimeoutError` in the body.
pub fn classify_failure(status: StatusCode, message: &str, url: &str, wait: &WaitFor) -> AppError {
    let lower = message.to_lowercase();
    if status == StatusCode::REQUEST_TIMEOUT
        || lower.contains("timeouterror")
        || lower.contains("waiting for selector")
        || lower.contains("timed out")
    {
        return wait.timeout_error();
    }
    let message = message.trim();
    if message.is_empty() {
        AppError::Navigation(format!("{url}: status {}", status.as_u16()))
    } else {
        AppError::Navigation(format!("{url}: status {}: {message}", status.as_u16()))
    }
}
