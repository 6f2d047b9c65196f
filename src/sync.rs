//! Translation sync pipeline.
//!
//! One run scans the configured sources for keys, rewrites the source-locale
//! catalog, then fills every target-locale catalog with translations for the
//! keys it is missing. Locales are processed one after another; a catalog file
//! is only written once its content has been fully computed.

use crate::catalog::{self, Catalog, CatalogError, ReconcilePolicy};
use crate::config::Config;
use crate::deepl::{DeeplClient, ProviderError};
use crate::extractor;
use crate::i18n::MetricsReport;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// Per-run overrides on top of [`Config`].
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Directories to scan instead of the configured ones
    pub scan_paths: Option<Vec<PathBuf>>,
    /// File extensions to scan instead of the configured ones
    pub extensions: Option<Vec<String>>,
    pub policy: ReconcilePolicy,
    /// Target locales requested explicitly, replacing the configured defaults
    pub target_locales: Option<Vec<String>>,
    /// Re-translate every key, not just the missing ones
    pub force: bool,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(
        "translation to {} was requested but DEEPL_API_KEY is not configured",
        .locales.join(", ")
    )]
    MissingCredential { locales: Vec<String> },
    #[error("failed to write {}: {source}", .path.display())]
    WriteCatalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// What happened to the translation step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationOutcome {
    Completed,
    NoTargets,
    Disabled,
    MissingCredential,
    ClientUnavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocaleReport {
    pub locale: String,
    pub path: PathBuf,
    /// Entries in the written catalog
    pub total_keys: usize,
    /// Keys sent to the provider
    pub missing: usize,
    /// Keys that came back translated
    pub translated: usize,
    pub written: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub source_locale: String,
    pub source_path: PathBuf,
    pub source_keys: usize,
    pub translation: TranslationOutcome,
    pub locales: Vec<LocaleReport>,
    pub metrics: MetricsReport,
}

/// Location of a locale's catalog inside the lang directory.
pub fn catalog_path(lang_dir: &Path, locale: &str) -> PathBuf {
    lang_dir.join(format!("{}.json", locale))
}

/// Target locales for this run: explicit ones win over configured defaults.
/// Blanks, duplicates and the source locale itself are dropped.
pub fn target_locales(config: &Config, options: &SyncOptions) -> Vec<String> {
    let requested = options
        .target_locales
        .as_ref()
        .unwrap_or(&config.target_locales);

    let mut locales: Vec<String> = Vec::new();
    for locale in requested.iter().map(|l| l.trim()) {
        if locale.is_empty() || locale.eq_ignore_ascii_case(&config.source_locale) {
            continue;
        }
        if !locales.iter().any(|l| l.eq_ignore_ascii_case(locale)) {
            locales.push(locale.to_string());
        }
    }
    locales
}

/// Keys of `source` that need a provider round-trip for one target locale.
/// An empty existing value counts as missing.
pub fn missing_keys(source: &Catalog, existing: &Catalog, force: bool) -> Vec<String> {
    source
        .keys()
        .filter(|key| force || existing.get(*key).map_or(true, String::is_empty))
        .cloned()
        .collect()
}

/// Fold provider results into a target catalog.
///
/// Each missing key gets the provider's translation when there is one, keeps
/// its existing value otherwise, and falls back to its own text last. No value
/// in the result is empty.
pub fn merge_translations(
    existing: Catalog,
    missing: &[String],
    translations: &HashMap<String, String>,
) -> Catalog {
    let mut merged = existing;
    for key in missing {
        match translations.get(key) {
            Some(text) => {
                merged.insert(key.clone(), text.clone());
            }
            None => {
                merged.entry(key.clone()).or_insert_with(|| key.clone());
            }
        }
    }
    catalog::fill_empty_values(&mut merged);
    merged
}

enum ClientChoice {
    Ready(DeeplClient),
    Skip(TranslationOutcome),
}

/// Decide whether targets can be translated with the configured client.
///
/// Only a missing key for explicitly requested locales is an error; any other
/// unavailable client skips translation with a warning.
fn choose_client(
    built: Result<Option<DeeplClient>, ProviderError>,
    targets: &[String],
    explicit: bool,
) -> Result<ClientChoice, SyncError> {
    match built {
        Ok(Some(client)) => Ok(ClientChoice::Ready(client)),
        Ok(None) if explicit => Err(SyncError::MissingCredential {
            locales: targets.to_vec(),
        }),
        Ok(None) => {
            warn!(
                "DEEPL_API_KEY is not set, skipping translation for {}",
                targets.join(", ")
            );
            Ok(ClientChoice::Skip(TranslationOutcome::MissingCredential))
        }
        Err(e) => {
            warn!(
                "DeepL client unavailable, skipping translation for {}: {}",
                targets.join(", "),
                e
            );
            Ok(ClientChoice::Skip(TranslationOutcome::ClientUnavailable))
        }
    }
}

/// Run one full sync.
///
/// The source catalog is always written before any translation happens, so a
/// [`SyncError::MissingCredential`] still leaves it up to date.
pub async fn run_sync(config: &Config, options: &SyncOptions) -> Result<SyncReport, SyncError> {
    info!("Scanning for translations...");
    info!("Mode: {}", options.policy.description());

    let scan_paths: Vec<PathBuf> = options
        .scan_paths
        .as_ref()
        .unwrap_or(&config.scan_paths)
        .iter()
        .map(|path| config.resolve(path))
        .collect();
    let extensions = options.extensions.as_ref().unwrap_or(&config.extensions);
    let keys = extractor::scan_paths(&scan_paths, extensions);

    let lang_dir = config.resolve(&config.lang_path);
    let source_path = catalog_path(&lang_dir, &config.source_locale);
    let existing = catalog::load(&source_path);
    let source_catalog = catalog::reconcile(&keys, &existing, options.policy);

    info!("Write {}.json", config.source_locale);
    catalog::save(&source_path, &source_catalog).map_err(|source| SyncError::WriteCatalog {
        path: source_path.clone(),
        source,
    })?;

    let mut report = SyncReport {
        source_locale: config.source_locale.clone(),
        source_path,
        source_keys: source_catalog.len(),
        translation: TranslationOutcome::Completed,
        locales: Vec::new(),
        metrics: MetricsReport::default(),
    };

    let targets = target_locales(config, options);
    if targets.is_empty() {
        info!("No target locales, skipping translation");
        report.translation = TranslationOutcome::NoTargets;
        return Ok(report);
    }

    if !config.translation_enabled {
        info!(
            "Translation is disabled (AUTO_TRANSLATION_ENABLED), skipping {}",
            targets.join(", ")
        );
        report.translation = TranslationOutcome::Disabled;
        return Ok(report);
    }

    let explicit = options.target_locales.is_some();
    let client = match choose_client(DeeplClient::from_config(config), &targets, explicit)? {
        ClientChoice::Ready(client) => client,
        ClientChoice::Skip(outcome) => {
            report.translation = outcome;
            return Ok(report);
        }
    };

    for locale in &targets {
        let locale_report = sync_locale(
            &client,
            &config.source_locale,
            locale,
            &lang_dir,
            &source_catalog,
            options.force,
        )
        .await;
        report.locales.push(locale_report);
    }

    report.metrics = client.metrics().report();
    info!("Done!");
    Ok(report)
}

async fn sync_locale(
    client: &DeeplClient,
    source_locale: &str,
    locale: &str,
    lang_dir: &Path,
    source_catalog: &Catalog,
    force: bool,
) -> LocaleReport {
    let path = catalog_path(lang_dir, locale);
    let existing = catalog::load(&path);
    let missing = missing_keys(source_catalog, &existing, force);

    info!(
        "{}: {} of {} keys need translation",
        locale,
        missing.len(),
        source_catalog.len()
    );

    let translations = client.translate_batch(&missing, source_locale, locale).await;
    let translated = missing
        .iter()
        .filter(|key| translations.contains_key(*key))
        .count();
    if translated < missing.len() {
        warn!(
            "{}: {} keys kept their source text",
            locale,
            missing.len() - translated
        );
    }

    let merged = merge_translations(existing, &missing, &translations);

    info!("Write {}.json", locale);
    let written = match catalog::save(&path, &merged) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to write {}: {}", path.display(), e);
            false
        }
    };

    LocaleReport {
        locale: locale.to_string(),
        path,
        total_keys: merged.len(),
        missing: missing.len(),
        translated,
        written,
    }
}
