// src/layout/mod.rs

//! Output tree layout
//!
//! ```text
//! pkgs/
//!   curl_bionic_amd64/
//!     collection.toml
//!     libcurl4_7.58.0-2ubuntu3_amd64.deb
//!     libc6_2.27-3ubuntu1_amd64.deb
//! ```
//!
//! The output root is created once and never removed. Each immediate
//! subdirectory is named by a [`PackageKey`].

mod key;
pub mod manifest;

pub use key::{FIELD_SEPARATOR, LayoutParseError, PackageKey};
pub use manifest::{CollectionManifest, MANIFEST_FILE, ManifestDependency};

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the output root directory placed next to the executable
pub const OUTPUT_DIR_NAME: &str = "pkgs";

/// Extension of the archives collected into package directories
pub const ARCHIVE_EXTENSION: &str = "deb";

/// An immediate entry of the output root, parsed or not
#[derive(Debug, Clone)]
pub struct ScannedEntry {
    pub file_name: String,
    pub path: PathBuf,
    pub key: std::result::Result<PackageKey, LayoutParseError>,
}

/// The collected-package tree
#[derive(Debug, Clone)]
pub struct OutputRoot {
    path: PathBuf,
}

impl OutputRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default output root: `pkgs` next to the running executable
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let exe_dir = exe.parent().ok_or_else(|| {
            Error::Config(format!(
                "Executable path has no parent directory: {}",
                exe.display()
            ))
        })?;
        Ok(Self::new(exe_dir.join(OUTPUT_DIR_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the output root if it does not exist yet
    pub fn ensure(&self) -> Result<()> {
        if !self.path.is_dir() {
            debug!("Creating output root {}", self.path.display());
            fs::create_dir_all(&self.path)?;
        }
        Ok(())
    }

    /// Directory for a package key (not created)
    pub fn package_dir(&self, key: &PackageKey) -> PathBuf {
        self.path.join(key.dir_name())
    }

    /// Create the directory for a package key; existing directories are fine
    pub fn ensure_package_dir(&self, key: &PackageKey) -> Result<PathBuf> {
        let dir = self.package_dir(key);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// List the immediate entries of the output root, sorted by name
    pub fn scan(&self) -> Result<Vec<ScannedEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let key = PackageKey::parse(&file_name);
            entries.push(ScannedEntry {
                file_name,
                path: entry.path(),
                key,
            });
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }
}

/// Archives in a package directory, sorted
pub fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        ARCHIVE_EXTENSION
    );

    let mut archives = Vec::new();
    for entry in glob::glob(&pattern).map_err(|e| Error::Glob(e.to_string()))? {
        let path = entry.map_err(|e| Error::Glob(e.to_string()))?;
        if path.is_file() {
            archives.push(path);
        }
    }

    archives.sort();
    Ok(archives)
}
