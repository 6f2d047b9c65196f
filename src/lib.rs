//! Scan application sources for translatable strings and keep per-locale
//! JSON catalogs in sync, filling new keys through DeepL.

pub mod catalog;
pub mod config;
pub mod deepl;
pub mod extractor;
pub mod i18n;
pub mod sync;
