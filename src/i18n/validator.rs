//! Translation quality validation module.
//!
//! Keys carry placeholders that the application substitutes at render time
//! (`:name` replacements and `$variable` interpolations). A machine
//! translation that drops or renames one produces a broken string, so every
//! received translation is checked against its source.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing warnings about a translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean
    pub fn is_clean(&self) -> bool {
        !self.has_warnings()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

static REPLACEMENT_REGEX: OnceLock<Regex> = OnceLock::new();
static VARIABLE_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate that a translation preserves the placeholders of the original.
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let orig_replacements = Self::extract_replacements(original);
        let trans_replacements = Self::extract_replacements(translated);
        if orig_replacements != trans_replacements {
            report.warnings.push(format!(
                "Replacement mismatch: original has {:?}, translation has {:?}",
                orig_replacements, trans_replacements
            ));
        }

        let orig_variables = Self::extract_variables(original);
        let trans_variables = Self::extract_variables(translated);
        if orig_variables != trans_variables {
            report.warnings.push(format!(
                "Variable mismatch: original has {:?}, translation has {:?}",
                orig_variables, trans_variables
            ));
        }

        report
    }

    /// Extract all `:name` replacements, sorted
    fn extract_replacements(text: &str) -> Vec<String> {
        let regex = REPLACEMENT_REGEX
            .get_or_init(|| Regex::new(r":[A-Za-z_][A-Za-z0-9_]*").unwrap());

        Self::collect_sorted(regex, text)
    }

    /// Extract all `$variable` interpolations, sorted
    fn extract_variables(text: &str) -> Vec<String> {
        let regex =
            VARIABLE_REGEX.get_or_init(|| Regex::new(r"\$[A-Za-z_][A-Za-z0-9_]*").unwrap());

        Self::collect_sorted(regex, text)
    }

    // Word order changes between languages, so only the multiset is compared.
    fn collect_sorted(regex: &Regex, text: &str) -> Vec<String> {
        let mut found: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        found.sort();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Replacement Extraction Tests ====================

    #[test]
    fn test_extract_replacements_single() {
        let found = TranslationValidator::extract_replacements("Welcome, :name!");
        assert_eq!(found, vec![":name"]);
    }

    #[test]
    fn test_extract_replacements_ignores_times_and_punctuation() {
        let found = TranslationValidator::extract_replacements("Note: opens at 10:30");
        assert!(found.is_empty());
    }

    #[test]
    fn test_extract_replacements_sorted() {
        let found = TranslationValidator::extract_replacements(":count items for :attribute");
        assert_eq!(found, vec![":attribute", ":count"]);
    }

    // ==================== Variable Extraction Tests ====================

    #[test]
    fn test_extract_variables() {
        let found = TranslationValidator::extract_variables("This has a $variable");
        assert_eq!(found, vec!["$variable"]);
    }

    #[test]
    fn test_extract_variables_ignores_prices() {
        let found = TranslationValidator::extract_variables("Only $5 today");
        assert!(found.is_empty());
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_preserved_placeholders() {
        let report =
            TranslationValidator::validate("Hello :name, you have $count", "Hallo :name, du hast $count");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_reordered_placeholders_are_fine() {
        let report = TranslationValidator::validate(":a before :b", ":b vor :a");
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_translated_replacement() {
        let report = TranslationValidator::validate("Hello :name", "Hallo :namen");
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("Replacement mismatch"));
    }

    #[test]
    fn test_validate_dropped_variable() {
        let report = TranslationValidator::validate("This has a $variable", "Das hat eine Variable");
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("Variable mismatch"));
    }

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_warnings());
    }
}
