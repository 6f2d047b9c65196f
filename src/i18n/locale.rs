//! Locale code mapping: application locales to DeepL language codes.
//!
//! Applications name locales the way their framework does (`en`, `pt_BR`,
//! `de-AT`). DeepL expects its own uppercase codes (`EN`, `PT-BR`, `DE`). This
//! module holds the lookup table and the normalisation rules that bridge the
//! two. DeepL rejects the bare `EN` and `PT` target codes, so those languages
//! map to a default regional variant.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Lookup table from lowercase application locale to DeepL code.
///
/// Initialised once on first access and immutable thereafter.
pub struct LocaleCodes {
    codes: HashMap<&'static str, &'static str>,
}

/// Global table instance (initialized lazily)
static CODES: OnceLock<LocaleCodes> = OnceLock::new();

impl LocaleCodes {
    /// Get the global locale table.
    pub fn get() -> &'static LocaleCodes {
        CODES.get_or_init(|| LocaleCodes {
            codes: default_codes().into_iter().collect(),
        })
    }

    /// Look up a normalised (lowercase, `-` separated) locale.
    pub fn lookup(&self, locale: &str) -> Option<&'static str> {
        self.codes.get(locale).copied()
    }

    /// Map an application locale to the code DeepL expects.
    ///
    /// The exact locale wins; otherwise a regional variant falls back to its
    /// language (`en-US` maps like `en`). Unknown locales come back uppercased.
    pub fn map(&self, locale: &str) -> String {
        let normalized = locale.trim().to_lowercase().replace('_', "-");

        if let Some(code) = self.lookup(&normalized) {
            return code.to_string();
        }

        if let Some((language, _region)) = normalized.split_once('-') {
            if let Some(code) = self.lookup(language) {
                return code.to_string();
            }
        }

        locale.trim().to_uppercase()
    }
}

/// Map an application locale to a DeepL language code.
pub fn map_locale_code(locale: &str) -> String {
    LocaleCodes::get().map(locale)
}

/// Languages and regional variants DeepL distinguishes.
fn default_codes() -> Vec<(&'static str, &'static str)> {
    vec![
        ("bg", "BG"),
        ("cs", "CS"),
        ("da", "DA"),
        ("de", "DE"),
        ("el", "EL"),
        ("en", "EN-GB"),
        ("en-gb", "EN-GB"),
        ("es", "ES"),
        ("et", "ET"),
        ("fi", "FI"),
        ("fr", "FR"),
        ("hu", "HU"),
        ("id", "ID"),
        ("it", "IT"),
        ("ja", "JA"),
        ("ko", "KO"),
        ("lt", "LT"),
        ("lv", "LV"),
        ("nb", "NB"),
        ("no", "NB"),
        ("nl", "NL"),
        ("pl", "PL"),
        ("pt", "PT-PT"),
        ("pt-br", "PT-BR"),
        ("pt-pt", "PT-PT"),
        ("ro", "RO"),
        ("ru", "RU"),
        ("sk", "SK"),
        ("sl", "SL"),
        ("sv", "SV"),
        ("tr", "TR"),
        ("uk", "UK"),
        ("zh", "ZH"),
        ("zh-hans", "ZH-HANS"),
        ("zh-hant", "ZH-HANT"),
    ]
}
