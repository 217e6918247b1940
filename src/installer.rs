// src/installer.rs

//! Installing previously collected packages
//!
//! Scans the immediate entries of the output root. Entries whose name is not
//! a valid [`PackageKey`] are reported and skipped. Directories whose key
//! names a requested package have all their archives handed to the native
//! installer in a single invocation.

use crate::context::Context;
use crate::error::Error;
use crate::layout::{PackageKey, list_archives};
use crate::tools::InvocationOutcome;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A problem met while installing, attributed to one output-root entry
#[derive(Debug)]
pub enum InstallIssue {
    /// Entry name does not follow the layout convention
    InvalidEntry { entry: String },
    /// Matching entry is a plain file
    NotADirectory { entry: String },
    /// Matching directory holds no archives
    NoArchives { entry: String },
    /// Entry could not be read
    Entry { entry: String, error: Error },
    /// The installer reported failure
    Install {
        entry: String,
        outcome: InvocationOutcome,
    },
}

impl fmt::Display for InstallIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEntry { entry } => {
                write!(f, "{}", Error::InvalidDirectoryName(entry.clone()))
            }
            Self::NotADirectory { entry } => write!(f, "{} is not a directory", entry),
            Self::NoArchives { entry } => write!(f, "no archives in {}", entry),
            Self::Entry { entry, error } => write!(f, "{}: {}", entry, error),
            Self::Install { entry, outcome } => {
                write!(f, "installing from {} failed: {}", entry, outcome)
            }
        }
    }
}

/// One installer invocation
#[derive(Debug, Clone)]
pub struct InstalledDirectory {
    pub key: PackageKey,
    pub dir: PathBuf,
    pub archives: Vec<PathBuf>,
    pub outcome: InvocationOutcome,
}

/// Result of an installation pass
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<InstalledDirectory>,
    /// Valid entries for packages that were not requested
    pub skipped: usize,
    /// Requested names without any collected directory
    pub unmatched: Vec<String>,
    pub issues: Vec<InstallIssue>,
}

impl InstallReport {
    pub fn succeeded(&self) -> usize {
        self.installed.iter().filter(|d| d.outcome.is_success()).count()
    }

    pub fn invalid_entries(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter_map(|issue| match issue {
                InstallIssue::InvalidEntry { entry } => Some(entry.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Install the collected packages named in `names`
///
/// Fails only when the output root itself cannot be listed.
pub fn install<S: AsRef<str>>(ctx: &Context<'_>, names: &[S]) -> Result<InstallReport, Error> {
    let mut report = InstallReport::default();
    let mut matched = vec![false; names.len()];

    for entry in ctx.output.scan()? {
        let key = match entry.key {
            Ok(key) => key,
            Err(reason) => {
                warn!("Invalid directory name {}: {}", entry.file_name, reason);
                report.issues.push(InstallIssue::InvalidEntry {
                    entry: entry.file_name,
                });
                continue;
            }
        };

        if !names.iter().any(|n| n.as_ref() == key.name) {
            debug!("Skipping {} (not requested)", entry.file_name);
            report.skipped += 1;
            continue;
        }
        for (found, name) in matched.iter_mut().zip(names) {
            if name.as_ref() == key.name {
                *found = true;
            }
        }

        if !entry.path.is_dir() {
            report.issues.push(InstallIssue::NotADirectory {
                entry: entry.file_name,
            });
            continue;
        }

        let archives = match list_archives(&entry.path) {
            Ok(archives) if archives.is_empty() => {
                warn!("No archives in {}", entry.path.display());
                report.issues.push(InstallIssue::NoArchives {
                    entry: entry.file_name,
                });
                continue;
            }
            Ok(archives) => archives,
            Err(error) => {
                report.issues.push(InstallIssue::Entry {
                    entry: entry.file_name,
                    error,
                });
                continue;
            }
        };

        info!(
            "Installing {} archive(s) from {}",
            archives.len(),
            entry.path.display()
        );
        let outcome = ctx.installer.install(&archives, ctx.force, &entry.path);
        if !outcome.is_success() {
            warn!("Installing from {} failed: {}", entry.file_name, outcome);
            report.issues.push(InstallIssue::Install {
                entry: entry.file_name.clone(),
                outcome: outcome.clone(),
            });
        }

        report.installed.push(InstalledDirectory {
            key,
            dir: entry.path,
            archives,
            outcome,
        });
    }

    for (name, found) in names.iter().zip(&matched) {
        if !found {
            warn!("No collected directory for {}", name.as_ref());
            report.unmatched.push(name.as_ref().to_string());
        }
    }

    Ok(report)
}
