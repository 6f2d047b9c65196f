use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Source text to translated text for one locale. Sorted by key.
pub type Catalog = BTreeMap<String, String>;

/// How freshly extracted keys are merged into a persisted catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Keep only keys still used in the sources.
    #[default]
    ReplaceUnused,
    /// Keep every existing entry and add new keys.
    Additive,
}

impl ReconcilePolicy {
    pub fn description(&self) -> &'static str {
        match self {
            ReconcilePolicy::ReplaceUnused => "Only keeping translations that are actually used",
            ReconcilePolicy::Additive => "Adding new translations to existing ones",
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Merge extracted keys with an existing catalog.
///
/// New keys are seeded with their own text. Existing values are never
/// overwritten, except empty ones, which fall back to the key text.
pub fn reconcile(keys: &BTreeSet<String>, existing: &Catalog, policy: ReconcilePolicy) -> Catalog {
    match policy {
        ReconcilePolicy::ReplaceUnused => keys
            .iter()
            .map(|key| {
                let value = existing
                    .get(key)
                    .filter(|value| !value.is_empty())
                    .cloned()
                    .unwrap_or_else(|| key.clone());
                (key.clone(), value)
            })
            .collect(),
        ReconcilePolicy::Additive => {
            let mut catalog = existing.clone();
            for key in keys {
                catalog.entry(key.clone()).or_insert_with(|| key.clone());
            }
            fill_empty_values(&mut catalog);
            catalog
        }
    }
}

/// Replace every empty value with its key text.
pub fn fill_empty_values(catalog: &mut Catalog) {
    for (key, value) in catalog.iter_mut() {
        if value.is_empty() {
            *value = key.clone();
        }
    }
}

/// Read a catalog file.
pub fn read(path: &Path) -> Result<Catalog, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load a catalog, treating a missing or corrupt file as empty.
pub fn load(path: &Path) -> Catalog {
    if !path.exists() {
        return Catalog::new();
    }

    match read(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(
                "Ignoring unreadable catalog {} ({}), starting from empty",
                path.display(),
                e
            );
            Catalog::new()
        }
    }
}

/// Render a catalog the way Laravel writes lang JSON: 4-space indent,
/// unescaped unicode, trailing newline.
pub fn to_json(catalog: &Catalog) -> Result<String, CatalogError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    catalog.serialize(&mut serializer)?;
    buf.push(b'\n');

    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Overwrite a catalog file, creating its directory when needed.
pub fn save(path: &Path, catalog: &Catalog) -> Result<(), CatalogError> {
    let json = to_json(catalog)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}
