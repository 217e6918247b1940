// src/collector.rs

//! Collecting packages and their direct dependencies
//!
//! For each requested name, in order:
//!
//! 1. Look the package up in the index; unknown names are reported and
//!    skipped.
//! 2. Build its [`PackageKey`] from the name, the run's distribution label,
//!    and the package architecture, and make sure the directory exists.
//! 3. Repack every alternative of every dependency group of the candidate
//!    into that directory. All alternatives are collected, not just the one a
//!    resolver would pick.
//! 4. Write the directory's [`CollectionManifest`]. A failed write is
//!    reported but keeps the package and its repack results in the report.
//!
//! A failure only affects the item it belongs to; the batch always runs to
//! the end.

use crate::context::Context;
use crate::error::Error;
use crate::layout::{CollectionManifest, ManifestDependency, PackageKey};
use crate::tools::InvocationOutcome;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A problem met while collecting, attributed to one item
#[derive(Debug)]
pub enum CollectIssue {
    /// The requested package itself could not be processed
    Package { name: String, error: Error },
    /// Repacking one dependency failed
    Repack {
        package: String,
        dependency: String,
        outcome: InvocationOutcome,
    },
    /// The package was collected but its manifest could not be written
    Manifest { package: String, error: Error },
}

impl fmt::Display for CollectIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package { error, .. }
                if matches!(error, Error::NotFound(_) | Error::NoCandidate(_)) =>
            {
                write!(f, "{}", error)
            }
            Self::Package { name, error } => write!(f, "'{}': {}", name, error),
            Self::Repack {
                package,
                dependency,
                outcome,
            } => write!(
                f,
                "repack of '{}' (dependency of '{}') failed: {}",
                dependency, package, outcome
            ),
            Self::Manifest { package, error } => {
                write!(f, "writing manifest for '{}' failed: {}", package, error)
            }
        }
    }
}

/// One repack attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyResult {
    pub name: String,
    pub group: usize,
    pub outcome: InvocationOutcome,
}

/// A requested package that reached the repack stage
#[derive(Debug, Clone)]
pub struct CollectedPackage {
    pub key: PackageKey,
    pub dir: PathBuf,
    pub version: String,
    pub dependencies: Vec<DependencyResult>,
}

impl CollectedPackage {
    pub fn all_succeeded(&self) -> bool {
        self.dependencies.iter().all(|d| d.outcome.is_success())
    }
}

/// Result of a collection pass
#[derive(Debug, Default)]
pub struct CollectReport {
    pub packages: Vec<CollectedPackage>,
    /// Every dependency name handed to the repack tool, in order
    pub touched: Vec<String>,
    pub issues: Vec<CollectIssue>,
}

impl CollectReport {
    pub fn repacked(&self) -> usize {
        self.dependency_results().filter(|d| d.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.dependency_results().filter(|d| !d.outcome.is_success()).count()
    }

    /// Requested names reported as unknown to the index
    pub fn not_found(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter_map(|issue| match issue {
                CollectIssue::Package {
                    error: Error::NotFound(name),
                    ..
                } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn dependency_results(&self) -> impl Iterator<Item = &DependencyResult> {
        self.packages.iter().flat_map(|p| p.dependencies.iter())
    }
}

/// Collect `names` into the output tree
pub fn collect<S: AsRef<str>>(ctx: &Context<'_>, names: &[S]) -> CollectReport {
    let mut report = CollectReport::default();

    for name in names {
        let name = name.as_ref();
        match collect_one(ctx, name, &mut report) {
            Ok(package) => {
                info!(
                    "Collected {} into {} ({} dependency archive(s))",
                    name,
                    package.dir.display(),
                    package.dependencies.len()
                );
                if let Err(error) = write_manifest(&package) {
                    warn!("Cannot write manifest for {}: {}", name, error);
                    report.issues.push(CollectIssue::Manifest {
                        package: name.to_string(),
                        error,
                    });
                }
                report.packages.push(package);
            }
            Err(error) => {
                warn!("Skipping {}: {}", name, error);
                report.issues.push(CollectIssue::Package {
                    name: name.to_string(),
                    error,
                });
            }
        }
    }

    report
}

fn collect_one(
    ctx: &Context<'_>,
    name: &str,
    report: &mut CollectReport,
) -> Result<CollectedPackage, Error> {
    let descriptor = ctx
        .index
        .lookup(name)?
        .ok_or_else(|| Error::NotFound(name.to_string()))?;

    let key = PackageKey::new(name, &ctx.distribution, &descriptor.architecture);
    let dir = ctx.output.ensure_package_dir(&key)?;
    debug!("Collecting {} {} into {}", name, descriptor.candidate.version, dir.display());

    let mut package = CollectedPackage {
        key,
        dir,
        version: descriptor.candidate.version.clone(),
        dependencies: Vec::new(),
    };

    for (group, alternatives) in descriptor.candidate.dependencies.iter().enumerate() {
        for dependency in &alternatives.alternatives {
            report.touched.push(dependency.clone());

            let outcome = ctx.repacker.repack(dependency, &package.dir);
            if outcome.is_success() {
                debug!("  [OK] {}", dependency);
            } else {
                warn!("  [FAIL] {}: {}", dependency, outcome);
                report.issues.push(CollectIssue::Repack {
                    package: name.to_string(),
                    dependency: dependency.clone(),
                    outcome: outcome.clone(),
                });
            }

            package.dependencies.push(DependencyResult {
                name: dependency.clone(),
                group,
                outcome,
            });
        }
    }

    Ok(package)
}

fn write_manifest(package: &CollectedPackage) -> Result<(), Error> {
    let mut manifest = CollectionManifest::new(&package.key, &package.version);
    manifest.dependencies = package
        .dependencies
        .iter()
        .map(|d| ManifestDependency {
            name: d.name.clone(),
            group: d.group,
            outcome: d.outcome.to_string(),
        })
        .collect();
    manifest.write(&package.dir)
}
