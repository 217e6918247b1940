// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use debcollect::{
    CandidateVersion, Context, DependencyGroup, Error, InvocationOutcome, NativeInstaller,
    OutputRoot, PackageDescriptor, PackageIndex, Repacker, Result,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// In-memory package index
#[derive(Default)]
pub struct MemoryIndex {
    packages: HashMap<String, PackageDescriptor>,
    without_candidate: HashSet<String>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package with the given dependency groups
    pub fn with_package(mut self, name: &str, arch: &str, groups: &[&[&str]]) -> Self {
        let dependencies = groups
            .iter()
            .map(|group| DependencyGroup::new(group.iter().copied()))
            .collect();
        self.packages.insert(
            name.to_string(),
            PackageDescriptor {
                name: name.to_string(),
                architecture: arch.to_string(),
                candidate: CandidateVersion {
                    version: "1.0-1".to_string(),
                    dependencies,
                },
            },
        );
        self
    }

    /// Add a package the index knows but cannot install
    pub fn with_uninstallable(mut self, name: &str) -> Self {
        self.without_candidate.insert(name.to_string());
        self
    }
}

impl PackageIndex for MemoryIndex {
    fn lookup(&self, name: &str) -> Result<Option<PackageDescriptor>> {
        if self.without_candidate.contains(name) {
            return Err(Error::NoCandidate(name.to_string()));
        }
        Ok(self.packages.get(name).cloned())
    }
}

/// Repacker that writes `<name>_1.0_all.deb` into the output directory
#[derive(Default)]
pub struct RecordingRepacker {
    pub calls: RefCell<Vec<(String, PathBuf)>>,
    failing: HashSet<String>,
}

impl RecordingRepacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make repacking `name` fail with exit code 1
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(n, _)| n.clone()).collect()
    }
}

impl Repacker for RecordingRepacker {
    fn repack(&self, package: &str, output_dir: &Path) -> InvocationOutcome {
        self.calls
            .borrow_mut()
            .push((package.to_string(), output_dir.to_path_buf()));

        if self.failing.contains(package) {
            return InvocationOutcome::Failed { code: Some(1) };
        }
        match fs::write(output_dir.join(format!("{}_1.0_all.deb", package)), b"!<arch>\n") {
            Ok(()) => InvocationOutcome::Success,
            Err(e) => InvocationOutcome::SpawnFailed(e.to_string()),
        }
    }
}

/// Installer that records the archives it was given
#[derive(Default)]
pub struct RecordingInstaller {
    pub calls: RefCell<Vec<(Vec<PathBuf>, bool, PathBuf)>>,
    pub outcome: Option<InvocationOutcome>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(outcome: InvocationOutcome) -> Self {
        Self {
            calls: RefCell::default(),
            outcome: Some(outcome),
        }
    }
}

impl NativeInstaller for RecordingInstaller {
    fn install(&self, archives: &[PathBuf], force: bool, working_dir: &Path) -> InvocationOutcome {
        self.calls
            .borrow_mut()
            .push((archives.to_vec(), force, working_dir.to_path_buf()));
        self.outcome.clone().unwrap_or(InvocationOutcome::Success)
    }
}

/// Create an empty output root in a temp dir.
///
/// Returns (TempDir, OutputRoot) - keep the TempDir alive to prevent cleanup.
pub fn setup_output_root() -> (TempDir, OutputRoot) {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = OutputRoot::new(temp_dir.path().join("pkgs"));
    root.ensure().unwrap();
    (temp_dir, root)
}

pub fn context<'a>(
    root: &OutputRoot,
    distribution: &str,
    index: &'a dyn PackageIndex,
    repacker: &'a dyn Repacker,
    installer: &'a dyn NativeInstaller,
) -> Context<'a> {
    Context::new(root.clone(), distribution, index, repacker, installer)
}

/// Names of the immediate entries of `dir`, sorted
pub fn entry_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
