//! Translation metrics for a single sync run.
//!
//! Counts provider traffic so a run can report how many requests were made,
//! how many batches failed and how much text came back translated.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider counters owned by one client.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of requests sent to the translation service
    api_calls: AtomicUsize,

    /// Number of requests whose batch contributed nothing
    api_failures: AtomicUsize,

    /// Number of texts submitted across all batches
    texts_requested: AtomicUsize,

    /// Number of texts that received a usable translation
    texts_translated: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request carrying `texts` strings.
    pub fn record_api_call(&self, texts: usize) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
        self.texts_requested.fetch_add(texts, Ordering::Relaxed);
    }

    /// Record a failed batch.
    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record texts that came back translated.
    pub fn record_translated(&self, texts: usize) {
        self.texts_translated.fetch_add(texts, Ordering::Relaxed);
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    pub fn texts_requested(&self) -> usize {
        self.texts_requested.load(Ordering::Relaxed)
    }

    pub fn texts_translated(&self) -> usize {
        self.texts_translated.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let calls = self.api_calls();
        let failures = self.api_failures();
        let api_success_rate = if calls > 0 {
            (calls.saturating_sub(failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        let requested = self.texts_requested();
        let translated = self.texts_translated();

        MetricsReport {
            api_calls: calls,
            api_failures: failures,
            api_success_rate,
            texts_requested: requested,
            texts_translated: translated,
            texts_fallback: requested.saturating_sub(translated),
        }
    }
}

/// Snapshot of the provider counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Number of API calls made
    pub api_calls: usize,

    /// Number of API failures
    pub api_failures: usize,

    /// API success rate as a percentage (0-100)
    pub api_success_rate: f64,

    /// Number of texts sent to the provider
    pub texts_requested: usize,

    /// Number of texts with a usable translation
    pub texts_translated: usize,

    /// Number of texts left to fall back to their source text
    pub texts_fallback: usize,
}
