// src/tools/repack.rs

//! Rebuilding archives from installed packages

use super::{InvocationOutcome, ToolRunner, tool_available};
use std::path::Path;
use tracing::debug;

/// Default repack command; the package name is appended
pub const DEFAULT_REPACK_COMMAND: &[&str] = &["fakeroot", "-u", "dpkg-repack"];

/// Rebuilds an installable archive for an installed package
pub trait Repacker {
    /// Write the archive for `package` into `output_dir`
    fn repack(&self, package: &str, output_dir: &Path) -> InvocationOutcome;
}

/// `dpkg-repack` under `fakeroot`
#[derive(Debug, Clone)]
pub struct DpkgRepack {
    command: Vec<String>,
    runner: ToolRunner,
}

impl DpkgRepack {
    pub fn new(runner: ToolRunner) -> Self {
        Self::with_command(
            DEFAULT_REPACK_COMMAND.iter().map(|s| s.to_string()).collect(),
            runner,
        )
    }

    pub fn with_command(command: Vec<String>, runner: ToolRunner) -> Self {
        Self { command, runner }
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Whether the repack program is on PATH
    pub fn is_available(&self) -> bool {
        tool_available(&self.command)
    }
}

impl Repacker for DpkgRepack {
    fn repack(&self, package: &str, output_dir: &Path) -> InvocationOutcome {
        debug!("Repacking {} into {}", package, output_dir.display());
        self.runner.run(package, &self.command, &[package], output_dir)
    }
}
