use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default catalog location, resolved against the working directory.
pub const DEFAULT_CATALOG_FILE: &str = "ports.json";

/// One `ports.json` entry: a short service name plus a longer description.
/// Both fields are optional in the wild.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Read-only mapping from `"<port>/tcp"` keys to service entries, loaded once
/// before the scan starts and never written afterwards.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    entries: HashMap<String, ServiceEntry>,
}

impl ServiceCatalog {
    /// Parse catalog JSON of the form
    /// `{ "80/tcp": { "name": "http", "description": "HTTP" }, ... }`.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let entries: HashMap<String, ServiceEntry> =
            serde_json::from_str(s).context("catalog is not a map of \"<port>/tcp\" entries")?;
        Ok(Self { entries })
    }

    /// Load a catalog from a file path. Errors if the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read catalog file: {}", path.as_ref().display()))?;
        Self::from_json_str(&content)
    }

    /// Load a catalog, or return an empty one if the file is missing,
    /// unreadable, or malformed. Lookup misses fall back to an
    /// "Unknown service" label at presentation time, so an empty catalog
    /// only degrades the output.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(catalog) => {
                log::debug!(
                    "loaded {} service entries from {}",
                    catalog.len(),
                    path.as_ref().display()
                );
                catalog
            }
            Err(e) => {
                log::debug!("no usable catalog at {}: {e:#}", path.as_ref().display());
                Self::default()
            }
        }
    }

    /// Human-readable description for a TCP port, if the catalog has one.
    pub fn describe(&self, port: u16) -> Option<&str> {
        self.entries
            .get(&format!("{port}/tcp"))
            .and_then(|entry| entry.description.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
