use crate::error::{Result, StyleError};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../../catalog/style-catalog.json");

/// One named regional cooking style a user can land on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub id: String,
    pub label: String,
    pub cuisine: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    schema_version: u32,
    styles: Vec<StyleEntry>,
}

/// The active style catalog. Orders entries by cuisine then label so
/// inference and search are deterministic regardless of source order.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    styles: Vec<StyleEntry>,
}

impl StyleCatalog {
    /// Catalog shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_bytes(BUILTIN_CATALOG.as_bytes())
            .unwrap_or_else(|e| panic!("builtin style catalog is invalid: {e}"))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let file: CatalogFile = serde_json::from_slice(bytes)?;
        if file.schema_version != 1 {
            return Err(StyleError::UnsupportedSchema(file.schema_version));
        }
        if file.styles.is_empty() {
            return Err(StyleError::EmptyCatalog);
        }
        let mut styles = file.styles;
        styles.sort_by(|a, b| a.cuisine.cmp(&b.cuisine).then_with(|| a.label.cmp(&b.label)));
        Ok(Self { styles })
    }

    pub fn styles(&self) -> &[StyleEntry] {
        &self.styles
    }

    pub fn get(&self, id: &str) -> Option<&StyleEntry> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_catalog_loads_and_sorts() {
        let catalog = StyleCatalog::builtin();
        assert!(catalog.len() >= 20);
        let cuisines: Vec<&str> = catalog.styles().iter().map(|s| s.cuisine.as_str()).collect();
        let mut sorted = cuisines.clone();
        sorted.sort();
        assert_eq!(cuisines, sorted);
    }

    #[test]
    fn lookup_by_id() {
        let catalog = StyleCatalog::builtin();
        let entry = catalog.get("it-sicilian").expect("sicilian entry");
        assert_eq!(entry.cuisine, "Italian");
        assert_eq!(entry.region.as_deref(), Some("Sicilian"));
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let raw = br#"{"schema_version": 2, "styles": [{"id": "x", "label": "X", "cuisine": "Y"}]}"#;
        assert!(matches!(
            StyleCatalog::from_bytes(raw),
            Err(StyleError::UnsupportedSchema(2))
        ));
    }

    #[test]
    fn custom_catalog_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{
                "schema_version": 1,
                "styles": [
                    { "id": "gr-custom", "label": "Island Table", "cuisine": "Greek", "aliases": ["island"] }
                ]
            }"#,
        )
        .unwrap();

        let catalog = StyleCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("gr-custom").unwrap().region, None);

        let missing = StyleCatalog::from_path(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(StyleError::CatalogIo(_))));
    }

    #[test]
    fn rejects_empty_catalog() {
        let raw = br#"{"schema_version": 1, "styles": []}"#;
        assert!(matches!(
            StyleCatalog::from_bytes(raw),
            Err(StyleError::EmptyCatalog)
        ));
    }
}
