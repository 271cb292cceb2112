//! Read-only tip/product catalog
//!
//! The catalog is display data rendered next to the chat. The core never
//! mutates it: entries come either from the built-in table or from a
//! user-supplied YAML file that replaces it wholesale.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::config::schema::CatalogConfig;
use crate::error::{Error, Result};

/// Catalog entry kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Product,
    EcoTip,
    Swap,
}

impl EntryKind {
    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Product => "Product",
            EntryKind::EcoTip => "Eco Tip",
            EntryKind::Swap => "Swap",
        }
    }
}

/// One display row in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub emoji: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
}

/// Read-only collection of tips, products, and swaps
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create a catalog from the built-in entries
    pub fn builtin() -> Self {
        let yaml = include_str!("catalog.yaml");
        let entries =
            serde_yaml::from_str(yaml).expect("Failed to parse built-in catalog entries");
        Self { entries }
    }

    /// Load a catalog from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("cannot read {}: {}", path.display(), e)))?;
        let entries: Vec<CatalogEntry> = serde_yaml::from_str(&content)?;
        debug!("Loaded {} catalog entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Load per configuration: a configured file replaces the built-ins
    pub fn load(config: &CatalogConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// All entries in declaration order
    pub fn all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries of one kind, in declaration order
    pub fn of_kind(&self, kind: EntryKind) -> Vec<&CatalogEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin();
        assert!(!catalog.all().is_empty());
    }

    #[test]
    fn test_builtin_covers_all_kinds() {
        let catalog = Catalog::builtin();
        assert!(!catalog.of_kind(EntryKind::Product).is_empty());
        assert!(!catalog.of_kind(EntryKind::EcoTip).is_empty());
        assert!(!catalog.of_kind(EntryKind::Swap).is_empty());
    }

    #[test]
    fn test_of_kind_filters() {
        let catalog = Catalog::builtin();
        for entry in catalog.of_kind(EntryKind::Swap) {
            assert_eq!(entry.kind, EntryKind::Swap);
        }
    }

    #[test]
    fn test_file_replaces_builtin() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.yaml");
        std::fs::write(
            &path,
            r#"
- type: eco_tip
  emoji: "🚿"
  title: "Shorter Showers"
  description: "Cutting two minutes saves around ten gallons of water."
"#,
        )
        .unwrap();

        let config = CatalogConfig {
            path: Some(path.to_string_lossy().to_string()),
        };
        let catalog = Catalog::load(&config).unwrap();
        assert_eq!(catalog.all().len(), 1);
        assert_eq!(catalog.all()[0].title, "Shorter Showers");
        assert!(catalog.all()[0].link.is_none());
    }

    #[test]
    fn test_missing_file_is_catalog_error() {
        let config = CatalogConfig {
            path: Some("/nonexistent/catalog.yaml".to_string()),
        };
        let err = Catalog::load(&config).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }
}
