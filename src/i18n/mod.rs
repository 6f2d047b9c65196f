//! Locale and translation-quality support.
//!
//! # Architecture
//!
//! - `locale`: maps application locale identifiers to DeepL language codes
//! - `metrics`: per-run counters for provider traffic
//! - `validator`: placeholder preservation checks on received translations
//!
//! # Example
//!
//! ```rust,ignore
//! use auto_translation::i18n::map_locale_code;
//!
//! assert_eq!(map_locale_code("en-US"), "EN-GB");
//! assert_eq!(map_locale_code("pt_BR"), "PT-BR");
//! ```

mod locale;
mod metrics;
mod validator;

pub use locale::{map_locale_code, LocaleCodes};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use validator::{TranslationValidator, ValidationReport};
