// src/distro.rs

//! Distribution label resolution
//!
//! The distribution label is resolved once per run and shared by every
//! package collected in that run.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the os-release file
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Which os-release field provides the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionField {
    /// `ID` (e.g. "ubuntu", "debian")
    #[default]
    Id,
    /// `VERSION_CODENAME` (e.g. "bionic", "bookworm")
    Codename,
}

impl DistributionField {
    fn key(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Codename => "VERSION_CODENAME",
        }
    }
}

/// Source of the distribution label
pub trait DistributionResolver {
    fn current_distribution(&self) -> Result<String>;
}

/// A label fixed by configuration
#[derive(Debug, Clone)]
pub struct FixedDistribution(pub String);

impl DistributionResolver for FixedDistribution {
    fn current_distribution(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Resolver reading an os-release file
#[derive(Debug, Clone)]
pub struct OsReleaseResolver {
    path: PathBuf,
    field: DistributionField,
}

impl OsReleaseResolver {
    pub fn new(field: DistributionField) -> Self {
        Self::with_path(OS_RELEASE_PATH, field)
    }

    pub fn with_path(path: impl AsRef<Path>, field: DistributionField) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            field,
        }
    }
}

impl DistributionResolver for OsReleaseResolver {
    fn current_distribution(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let label = parse_os_release_field(&content, self.field.key()).ok_or_else(|| {
            Error::Config(format!(
                "{} has no {} entry",
                self.path.display(),
                self.field.key()
            ))
        })?;

        debug!("Resolved distribution '{}' from {}", label, self.path.display());
        Ok(label)
    }
}

/// Extract one `KEY=value` entry from os-release content
fn parse_os_release_field(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.trim().strip_prefix(key)?.strip_prefix('=')?;
        let value = value.trim().trim_matches('"').trim_matches('\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}
