// src/config.rs

//! Configuration file
//!
//! All keys are optional; a missing default file means built-in defaults.
//!
//! ```toml
//! # debcollect.toml
//! output_root = "/srv/offline/pkgs"
//! distribution_field = "codename"
//! timeout_secs = 600
//! force = true
//! repack_command = ["fakeroot", "-u", "dpkg-repack"]
//! install_command = ["dpkg", "-i", "-E", "-G"]
//! ```

use crate::distro::DistributionField;
use crate::error::{Error, Result};
use crate::tools::dpkg::DEFAULT_INSTALL_COMMAND;
use crate::tools::repack::DEFAULT_REPACK_COMMAND;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// File name looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "debcollect.toml";

fn default_force() -> bool {
    true
}

fn default_repack_command() -> Vec<String> {
    DEFAULT_REPACK_COMMAND.iter().map(|s| s.to_string()).collect()
}

fn default_install_command() -> Vec<String> {
    DEFAULT_INSTALL_COMMAND.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output tree; `pkgs` next to the executable when unset
    #[serde(default)]
    pub output_root: Option<PathBuf>,

    /// Fixed distribution label, bypassing os-release
    #[serde(default)]
    pub distribution: Option<String>,

    #[serde(default)]
    pub distribution_field: DistributionField,

    /// os-release file to read the label from; `/etc/os-release` when unset
    #[serde(default)]
    pub os_release_path: Option<PathBuf>,

    /// Per-invocation timeout for external tools; unset means wait forever
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Pass force flags to the installer
    #[serde(default = "default_force")]
    pub force: bool,

    #[serde(default = "default_repack_command")]
    pub repack_command: Vec<String>,

    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: None,
            distribution: None,
            distribution_field: DistributionField::default(),
            os_release_path: None,
            timeout_secs: None,
            force: default_force(),
            repack_command: default_repack_command(),
            install_command: default_install_command(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicitly named configuration file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Default configuration path: next to the executable
    pub fn default_path() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        Ok(exe
            .parent()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.repack_command.is_empty() {
            return Err(Error::Config("repack_command must not be empty".to_string()));
        }
        if self.install_command.is_empty() {
            return Err(Error::Config("install_command must not be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self
            .distribution
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            return Err(Error::Config("distribution must not be empty".to_string()));
        }
        Ok(())
    }
}
