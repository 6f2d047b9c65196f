use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

const DEEPL_FREE_API_URL: &str = "https://api-free.deepl.com/v2/translate";
const DEEPL_PRO_API_URL: &str = "https://api.deepl.com/v2/translate";

#[derive(Debug, Clone)]
pub struct Config {
    // Locales
    pub source_locale: String,
    pub target_locales: Vec<String>,
    pub translation_enabled: bool,

    // Paths
    pub base_path: PathBuf,
    pub lang_path: PathBuf,
    pub scan_paths: Vec<PathBuf>,
    pub extensions: Vec<String>,

    // DeepL
    pub deepl_api_key: Option<String>,
    pub deepl_free_api: bool,
    pub deepl_timeout_secs: u64,
    pub deepl_api_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Locales
            source_locale: std::env::var("AUTO_TRANSLATION_SOURCE_LOCALE")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "en".to_string()),
            target_locales: std::env::var("AUTO_TRANSLATION_TARGET_LOCALES")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            translation_enabled: env_bool("AUTO_TRANSLATION_ENABLED", true)?,

            // Paths
            base_path: std::env::var("AUTO_TRANSLATION_BASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            lang_path: std::env::var("AUTO_TRANSLATION_LANG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("lang")),
            scan_paths: split_list(
                &std::env::var("AUTO_TRANSLATION_SCAN_PATHS")
                    .unwrap_or_else(|_| "app,resources/views,resources/js/pages".to_string()),
            )
            .into_iter()
            .map(PathBuf::from)
            .collect(),
            extensions: split_list(
                &std::env::var("AUTO_TRANSLATION_EXTENSIONS")
                    .unwrap_or_else(|_| ".blade.php,.vue".to_string()),
            ),

            // DeepL
            deepl_api_key: std::env::var("DEEPL_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            deepl_free_api: env_bool("DEEPL_FREE_API", true)?,
            deepl_timeout_secs: match std::env::var("DEEPL_TIMEOUT") {
                Ok(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("DEEPL_TIMEOUT must be a number of seconds, got '{}'", v))?,
                Err(_) => 10,
            },
            deepl_api_url: std::env::var("DEEPL_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }

    /// The DeepL translate endpoint for the configured tier.
    pub fn deepl_endpoint(&self) -> &str {
        match &self.deepl_api_url {
            Some(url) => url,
            None if self.deepl_free_api => DEEPL_FREE_API_URL,
            None => DEEPL_PRO_API_URL,
        }
    }

    /// Resolve a configured path against the project base path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

/// Split a comma-separated list, dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_bool(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(v) if v.trim().is_empty() => Ok(default),
        Ok(v) => match parse_bool(&v) {
            Some(b) => Ok(b),
            None => bail!("{} must be a boolean, got '{}'", name, v),
        },
        Err(_) => Ok(default),
    }
}
