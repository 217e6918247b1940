// src/index/apt.rs

//! Package index backed by the system apt cache
//!
//! Uses the `apt-cache` command-line tool:
//! - `apt-cache policy <name>` for existence and the candidate version
//! - `apt-cache show <name>=<version>` for the candidate's control fields
//! - `dpkg --print-architecture` for the native architecture

use super::{CandidateVersion, PackageDescriptor, PackageIndex, parse_dependency_field};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::process::Command;
use std::sync::OnceLock;
use tracing::debug;

/// Architecture value of architecture-independent packages
const ARCH_ALL: &str = "all";

/// Candidate line of `apt-cache policy` output
#[derive(Debug, Clone, PartialEq, Eq)]
enum PolicyCandidate {
    /// Package unknown to the cache
    Unknown,
    /// Known, but nothing installable
    None,
    Version(String),
}

/// Index answering lookups from `apt-cache`
#[derive(Debug, Default)]
pub struct AptCacheIndex {
    native_arch: OnceLock<String>,
}

impl AptCacheIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Native architecture of the host, queried once
    fn native_architecture(&self) -> Result<&str> {
        if let Some(arch) = self.native_arch.get() {
            return Ok(arch.as_str());
        }

        let output = Command::new("dpkg")
            .arg("--print-architecture")
            .output()
            .map_err(|e| Error::Index(format!("Failed to run dpkg: {}. Is dpkg installed?", e)))?;

        if !output.status.success() {
            return Err(Error::Index(format!(
                "dpkg --print-architecture failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let arch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(self.native_arch.get_or_init(|| arch).as_str())
    }

    fn policy(&self, name: &str) -> Result<PolicyCandidate> {
        let output = Command::new("apt-cache")
            .args(["policy", name])
            .output()
            .map_err(|e| {
                Error::Index(format!("Failed to run apt-cache: {}. Is apt installed?", e))
            })?;

        if !output.status.success() {
            return Err(Error::Index(format!(
                "apt-cache policy {} failed: {}",
                name,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(parse_policy(&String::from_utf8_lossy(&output.stdout)))
    }

    fn show(&self, name: &str, version: &str) -> Result<HashMap<String, String>> {
        let output = Command::new("apt-cache")
            .args(["show", &format!("{}={}", name, version)])
            .output()
            .map_err(|e| Error::Index(format!("Failed to run apt-cache: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Index(format!(
                "apt-cache show {}={} failed: {}",
                name,
                version,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        select_stanza(&stdout, version).ok_or_else(|| {
            Error::Index(format!("No control record for {}={}", name, version))
        })
    }
}

impl PackageIndex for AptCacheIndex {
    fn lookup(&self, name: &str) -> Result<Option<PackageDescriptor>> {
        debug!("Querying apt cache for {}", name);

        let version = match self.policy(name)? {
            PolicyCandidate::Unknown => return Ok(None),
            PolicyCandidate::None => return Err(Error::NoCandidate(name.to_string())),
            PolicyCandidate::Version(version) => version,
        };

        let fields = self.show(name, &version)?;

        let architecture = match fields.get("Architecture").map(String::as_str) {
            Some(ARCH_ALL) | None => self.native_architecture()?.to_string(),
            Some(arch) => arch.to_string(),
        };

        let mut dependencies = Vec::new();
        for field in ["Pre-Depends", "Depends"] {
            if let Some(value) = fields.get(field) {
                dependencies.extend(parse_dependency_field(value));
            }
        }

        debug!(
            "{} {} ({}): {} dependency group(s)",
            name,
            version,
            architecture,
            dependencies.len()
        );

        Ok(Some(PackageDescriptor {
            name: name.to_string(),
            architecture,
            candidate: CandidateVersion {
                version,
                dependencies,
            },
        }))
    }
}

/// Extract the candidate from `apt-cache policy` output
fn parse_policy(output: &str) -> PolicyCandidate {
    for line in output.lines() {
        if let Some(value) = line.trim().strip_prefix("Candidate:") {
            let value = value.trim();
            return if value.is_empty() || value == "(none)" {
                PolicyCandidate::None
            } else {
                PolicyCandidate::Version(value.to_string())
            };
        }
    }
    PolicyCandidate::Unknown
}

/// Split control output into stanzas of `Field -> value`
///
/// Continuation lines are appended to the previous field with a newline.
fn parse_stanzas(output: &str) -> Vec<HashMap<String, String>> {
    let mut stanzas = Vec::new();
    let mut current: HashMap<String, String> = HashMap::new();
    let mut last_field: Option<String> = None;

    for line in output.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
            last_field = None;
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(value) = last_field.as_ref().and_then(|f| current.get_mut(f)) {
                value.push('\n');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((field, value)) = line.split_once(':') {
            let field = field.trim().to_string();
            current.insert(field.clone(), value.trim().to_string());
            last_field = Some(field);
        }
    }

    if !current.is_empty() {
        stanzas.push(current);
    }
    stanzas
}

/// First stanza for `version`, or the first stanza at all
fn select_stanza(output: &str, version: &str) -> Option<HashMap<String, String>> {
    let mut stanzas = parse_stanzas(output);
    let position = stanzas
        .iter()
        .position(|s| s.get("Version").map(String::as_str) == Some(version))
        .unwrap_or(0);
    (position < stanzas.len()).then(|| stanzas.swap_remove(position))
}
