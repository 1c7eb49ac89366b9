//! Shared state for the /health endpoint.
//! Written once by the startup scrape run, read by the API.

use std::sync::atomic::{AtomicI64, AtomicU64, AtomicU8, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use crate::types::SaveReport;

const PENDING: u8 = 0;
const OK: u8 = 1;
const FAILED: u8 = 2;
const SKIPPED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeState {
    Pending,
    Ok,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeSnapshot {
    pub state: ScrapeState,
    /// Unix seconds when the run finished (None until it has).
    pub finished_at: Option<i64>,
    pub inserted: u64,
    pub duplicates: u64,
    pub error: Option<String>,
}

/// Outcome of the startup scrape run.
pub struct HealthState {
    state: AtomicU8,
    finished_at_secs: AtomicI64,
    inserted: AtomicU64,
    duplicates: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(PENDING),
            finished_at_secs: AtomicI64::new(0),
            inserted: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            last_error: Mutex::new(None),
        }
    }

    pub fn record_success(&self, report: SaveReport) {
        self.inserted.store(report.inserted, Ordering::Relaxed);
        self.duplicates.store(report.duplicates, Ordering::Relaxed);
        self.finish(OK);
    }

    pub fn record_failure(&self, err: &dyn std::fmt::Display) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(err.to_string());
        }
        self.finish(FAILED);
    }

    pub fn mark_skipped(&self) {
        self.state.store(SKIPPED, Ordering::Relaxed);
    }

    fn finish(&self, state: u8) {
        self.finished_at_secs
            .store(chrono::Utc::now().timestamp(), Ordering::Relaxed);
        self.state.store(state, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScrapeSnapshot {
        let state = match self.state.load(Ordering::Relaxed) {
            OK => ScrapeState::Ok,
            FAILED => ScrapeState::Failed,
            SKIPPED => ScrapeState::Skipped,
            _ => ScrapeState::Pending,
        };
        let finished_at = match self.finished_at_secs.load(Ordering::Relaxed) {
            0 => None,
            ts => Some(ts),
        };
        ScrapeSnapshot {
            state,
            finished_at,
            inserted: self.inserted.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            error: self.last_error.lock().ok().and_then(|e| e.clone()),
        }
    }
}
