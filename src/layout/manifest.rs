// src/layout/manifest.rs

//! Per-directory collection manifest
//!
//! Every collected package directory carries a `collection.toml` describing
//! what was collected into it and how each repack went. The manifest is
//! bookkeeping only: the installer reads archives by glob and never consults
//! it.
//!
//! ```toml
//! name = "curl"
//! distribution = "bionic"
//! architecture = "amd64"
//! version = "7.58.0-2ubuntu3"
//! collected_at = "2026-10-18T09:12:44Z"
//!
//! [[dependencies]]
//! name = "libcurl4"
//! group = 0
//! outcome = "ok"
//! ```

use crate::error::{Error, Result};
use crate::layout::PackageKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the manifest inside a package directory
pub const MANIFEST_FILE: &str = "collection.toml";

/// One touched dependency alternative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDependency {
    pub name: String,
    /// Index of the dependency group the alternative came from
    pub group: usize,
    /// Rendered repack outcome ("ok", "exit code 1", ...)
    pub outcome: String,
}

/// Contents of `collection.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionManifest {
    pub name: String,
    pub distribution: String,
    pub architecture: String,
    pub version: String,
    pub collected_at: DateTime<Utc>,
    #[serde(default)]
    pub dependencies: Vec<ManifestDependency>,
}

impl CollectionManifest {
    pub fn new(key: &PackageKey, version: impl Into<String>) -> Self {
        Self {
            name: key.name.clone(),
            distribution: key.distribution.clone(),
            architecture: key.architecture.clone(),
            version: version.into(),
            collected_at: Utc::now(),
            dependencies: Vec::new(),
        }
    }

    /// Key recorded in the manifest
    pub fn key(&self) -> PackageKey {
        PackageKey::new(&self.name, &self.distribution, &self.architecture)
    }

    /// Write the manifest into `dir`, replacing any previous one
    pub fn write(&self, dir: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Manifest(format!("Failed to serialize manifest: {}", e)))?;
        fs::write(dir.join(MANIFEST_FILE), content)?;
        Ok(())
    }

    /// Read the manifest from `dir`
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Manifest(format!("Failed to parse {}: {}", path.display(), e)))
    }
}
