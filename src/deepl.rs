use crate::config::Config;
use crate::i18n::{map_locale_code, TranslationMetrics, TranslationValidator};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Maximum number of texts per DeepL request
pub const BATCH_SIZE: usize = 50;

/// Pause between consecutive batches to stay under DeepL's rate limit
pub const BATCH_DELAY: Duration = Duration::from_millis(100);

/// Number of texts included in debug logs per batch
const SAMPLE_TEXTS: usize = 3;

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to send request to DeepL API: {0}")]
    Request(#[from] reqwest::Error),
    #[error("DeepL API error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse DeepL response: {0}")]
    Parse(#[source] reqwest::Error),
    #[error("DeepL returned {actual} translations for {expected} texts")]
    LengthMismatch { expected: usize, actual: usize },
}

/// DeepL's `source_lang` takes a bare language (`EN`), not a variant (`EN-GB`).
fn source_language(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Client for the DeepL v2 translate endpoint.
pub struct DeeplClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    batch_delay: Duration,
    metrics: TranslationMetrics,
}

impl DeeplClient {
    pub fn new(api_key: String, endpoint: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            batch_delay: BATCH_DELAY,
            metrics: TranslationMetrics::new(),
        })
    }

    /// Build a client from configuration; `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.deepl_api_key.clone() else {
            return Ok(None);
        };

        Self::new(
            api_key,
            config.deepl_endpoint().to_string(),
            Duration::from_secs(config.deepl_timeout_secs),
        )
        .map(Some)
    }

    /// Set the pause between batches
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    /// Translate `texts` and map each original to its translation.
    ///
    /// Texts are sent in batches of [`BATCH_SIZE`]. A batch that fails for any
    /// reason contributes nothing; callers fall back to the original text for
    /// anything missing from the result.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> HashMap<String, String> {
        let mut translations = HashMap::new();
        if texts.is_empty() {
            return translations;
        }

        let source_code = map_locale_code(source_locale);
        let target_code = map_locale_code(target_locale);
        let batches: Vec<&[String]> = texts.chunks(BATCH_SIZE).collect();
        let total = batches.len();

        info!(
            "Translating {} texts from {} to {} ({} batches)",
            texts.len(),
            source_code,
            target_code,
            total
        );

        for (index, batch) in batches.iter().enumerate() {
            let progress = index + 1;
            debug!(
                "[{}/{}] Sending {} texts, first: {:?}",
                progress,
                total,
                batch.len(),
                &batch[..batch.len().min(SAMPLE_TEXTS)]
            );

            self.metrics.record_api_call(batch.len());
            match self
                .request_batch(batch, source_language(&source_code), &target_code)
                .await
            {
                Ok(translated) => {
                    let mut received = 0;
                    for (original, text) in batch.iter().zip(translated) {
                        if text.is_empty() {
                            continue;
                        }

                        let validation = TranslationValidator::validate(original, &text);
                        if validation.has_warnings() {
                            warn!(
                                "Translation of {:?} to {}: {:?}",
                                original, target_code, validation.warnings
                            );
                        }

                        translations.insert(original.clone(), text);
                        received += 1;
                    }
                    self.metrics.record_translated(received);
                    debug!("[{}/{}] Received {} translations", progress, total, received);
                }
                Err(e) => {
                    self.metrics.record_api_failure();
                    warn!(
                        "[{}/{}] Batch of {} texts to {} failed, keeping source text: {}",
                        progress,
                        total,
                        batch.len(),
                        target_code,
                        e
                    );
                }
            }

            if progress < total {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        translations
    }

    /// Send one batch and return translations in submission order.
    async fn request_batch(
        &self,
        batch: &[String],
        source_code: &str,
        target_code: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(batch.len() + 3);
        form.push(("auth_key", self.api_key.as_str()));
        form.push(("source_lang", source_code));
        form.push(("target_lang", target_code));
        form.extend(batch.iter().map(|text| ("text", text.as_str())));

        let response = self.client.post(&self.endpoint).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::Status { status, body });
        }

        let parsed: TranslateResponse = response.json().await.map_err(ProviderError::Parse)?;

        // Results are matched by position, so a short or long answer can't be trusted.
        if parsed.translations.len() != batch.len() {
            return Err(ProviderError::LengthMismatch {
                expected: batch.len(),
                actual: parsed.translations.len(),
            });
        }

        Ok(parsed.translations.into_iter().map(|t| t.text).collect())
    }
}
