use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Call-site patterns, each with exactly one capture group for the literal.
///
/// Plain calls accept the literal followed by `)` or `,` so arguments after
/// the key (replacements, counts) don't hide it.
const CALL_PATTERNS: &[&str] = &[
    r#"__\(\s*['"](.+?)['"]\s*[),]"#,
    r#"trans\(\s*['"](.+?)['"]\s*[),]"#,
    r#"trans_choice\(\s*['"](.+?)['"]\s*,"#,
    r#"@lang\(\s*['"](.+?)['"]\s*\)"#,
    r#"\{\{\s*__\(\s*['"](.+?)['"]\s*\)\s*\}\}"#,
    r#"\{\{__\(\s*['"](.+?)['"]\s*\)\}\}"#,
    r#"\{\{\s*trans\(\s*['"](.+?)['"]\s*\)\s*\}\}"#,
    r#"\{\{trans\(\s*['"](.+?)['"]\s*\)\}\}"#,
];

static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn patterns() -> &'static [Regex] {
    PATTERNS.get_or_init(|| {
        CALL_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern).unwrap())
            .collect()
    })
}

/// Dotted keys without whitespace (`auth.failed`) point into PHP group files,
/// not literal strings.
pub fn is_reference_key(key: &str) -> bool {
    key.contains('.') && !key.chars().any(char::is_whitespace)
}

/// Extract translation keys from one file's contents.
pub fn extract(contents: &str) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();

    for regex in patterns() {
        for captures in regex.captures_iter(contents) {
            if let Some(literal) = captures.get(1) {
                let key = literal.as_str();
                if !key.is_empty() && !is_reference_key(key) {
                    keys.insert(key.to_string());
                }
            }
        }
    }

    keys
}

/// Normalise configured extensions to a leading-dot form.
fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| ext.trim())
        .filter(|ext| !ext.is_empty())
        .map(|ext| {
            if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{}", ext)
            }
        })
        .collect()
}

/// Whether a file should be scanned. An empty extension list accepts everything.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }

    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
}

/// Collect every file under `roots` matching `extensions`, in sorted order.
///
/// Missing roots and unreadable entries are logged and skipped.
pub fn collect_files(roots: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let extensions = normalize_extensions(extensions);
    let mut files = Vec::new();

    for root in roots {
        if !root.exists() {
            warn!("Scan path does not exist, skipping: {}", root.display());
            continue;
        }

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && matches_extension(entry.path(), &extensions) {
                files.push(entry.into_path());
            }
        }
    }

    files
}

/// Scan a file tree and return the sorted, de-duplicated key set.
pub fn scan_paths(roots: &[PathBuf], extensions: &[String]) -> BTreeSet<String> {
    info!("Scan directories for files");
    let files = collect_files(roots, extensions);
    info!("Scan {} files", files.len());

    let mut keys = BTreeSet::new();
    let mut skipped = 0;

    for file in &files {
        match std::fs::read_to_string(file) {
            Ok(contents) => {
                let found = extract(&contents);
                debug!("{}: {} keys", file.display(), found.len());
                keys.extend(found);
            }
            Err(e) => {
                skipped += 1;
                warn!("Skipping unreadable file {}: {}", file.display(), e);
            }
        }
    }

    info!(
        "Extraction complete: {} unique keys from {} files ({} skipped)",
        keys.len(),
        files.len() - skipped,
        skipped
    );

    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn keys(contents: &str) -> Vec<String> {
        extract(contents).into_iter().collect()
    }

    // ==================== Call-Site Tests ====================

    #[test]
    fn test_extract_plain_calls() {
        let found = keys(r#"<?php echo __('Hello World'); $x = trans("Goodbye", ['a' => 1]);"#);
        assert_eq!(found, vec!["Goodbye", "Hello World"]);
    }

    #[test]
    fn test_extract_trans_choice_and_lang_directive() {
        let found = keys("trans_choice('One apple|Many apples', $n) @lang('This is a test')");
        assert_eq!(found, vec!["One apple|Many apples", "This is a test"]);
    }

    #[test]
    fn test_extract_template_interpolation() {
        let contents = r#"
<h1>{{ __('Hello World') }}</h1>
<p>{{__('No Spaces')}}</p>
<p>{{ trans('Welcome to our application') }}</p>
<p>{{trans('No Spaces Trans')}}</p>
"#;
        assert_eq!(
            keys(contents),
            vec![
                "Hello World",
                "No Spaces",
                "No Spaces Trans",
                "Welcome to our application"
            ]
        );
    }

    #[test]
    fn test_extract_keeps_placeholders_verbatim() {
        let contents = r#"{{ __('This has a $variable') }} {{ __('This has a :placeholder') }}"#;
        assert_eq!(
            keys(contents),
            vec!["This has a $variable", "This has a :placeholder"]
        );
    }

    #[test]
    fn test_extract_deduplicates() {
        let found = keys("__('Save') __('Save') {{ __('Save') }}");
        assert_eq!(found, vec!["Save"]);
    }

    #[test]
    fn test_extract_ignores_unquoted_arguments() {
        assert!(extract("__($key) trans(CONSTANT)").is_empty());
    }

    #[test]
    fn test_extract_no_matches() {
        assert!(extract("<div>plain markup</div>").is_empty());
    }

    // ==================== Dotted-Key Tests ====================

    #[test]
    fn test_dotted_reference_key_excluded() {
        let found = keys("{{ __('auth.failed') }} trans('validation.required')");
        assert!(found.is_empty());
    }

    #[test]
    fn test_dotted_sentence_retained() {
        let found = keys(r#"__("Hello. World") __('Two. Sentences.')"#);
        assert_eq!(found, vec!["Hello. World", "Two. Sentences."]);
    }

    #[test]
    fn test_is_reference_key() {
        assert!(is_reference_key("auth.failed"));
        assert!(is_reference_key("Done."));
        assert!(!is_reference_key("Hello. World"));
        assert!(!is_reference_key("Hello World"));
    }

    // ==================== Extension Tests ====================

    #[test]
    fn test_matches_multi_dot_extension() {
        let exts = vec![".blade.php".to_string()];
        assert!(matches_extension(Path::new("views/home.blade.php"), &exts));
        assert!(!matches_extension(Path::new("app/Http/Kernel.php"), &exts));
    }

    #[test]
    fn test_matches_empty_extension_list() {
        assert!(matches_extension(Path::new("anything.txt"), &[]));
    }

    #[test]
    fn test_normalize_extensions_adds_dot() {
        let normalized = normalize_extensions(&["vue".to_string(), " .php ".to_string(), "".to_string()]);
        assert_eq!(normalized, vec![".vue", ".php"]);
    }

    // ==================== File Tree Tests ====================

    #[test]
    fn test_scan_paths_filters_and_merges() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let views = temp_dir.path().join("views");
        std::fs::create_dir_all(views.join("nested")).expect("create dirs");

        std::fs::write(views.join("a.blade.php"), "{{ __('Alpha') }}").expect("write");
        std::fs::write(views.join("nested/b.vue"), "trans('Beta')").expect("write");
        std::fs::write(views.join("c.txt"), "__('Ignored')").expect("write");

        let found = scan_paths(
            &[views],
            &[".blade.php".to_string(), "vue".to_string()],
        );

        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_scan_paths_skips_missing_root_and_bad_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let views = temp_dir.path().join("views");
        std::fs::create_dir_all(&views).expect("create dirs");

        std::fs::write(views.join("good.php"), "__('Kept')").expect("write");
        std::fs::write(views.join("bad.php"), [0xff, 0xfe, 0x00]).expect("write");

        let found = scan_paths(
            &[temp_dir.path().join("missing"), views],
            &[".php".to_string()],
        );

        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["Kept"]);
    }

    #[test]
    fn test_collect_files_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for name in ["c.php", "a.php", "b.php"] {
            std::fs::write(temp_dir.path().join(name), "").expect("write");
        }

        let files = collect_files(&[temp_dir.path().to_path_buf()], &[]);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.php", "b.php", "c.php"]);
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_dotted_keys_never_extracted(key in "[a-z]{1,8}(\\.[a-z_]{1,8}){1,3}") {
            let contents = format!("__('{}') {{{{ trans('{}') }}}}", key, key);
            prop_assert!(extract(&contents).is_empty());
        }

        #[test]
        fn prop_plain_literals_extracted(key in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]") {
            let contents = format!("<p>{{{{ __('{}') }}}}</p>", key);
            prop_assert!(extract(&contents).contains(&key));
        }

        #[test]
        fn prop_extracted_keys_are_non_empty(contents in ".{0,200}") {
            for key in extract(&contents) {
                prop_assert!(!key.is_empty());
                prop_assert!(!is_reference_key(&key));
            }
        }
    }
}
