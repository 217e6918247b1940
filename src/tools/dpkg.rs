// src/tools/dpkg.rs

//! Installing collected archives with dpkg

use super::{InvocationOutcome, ToolRunner, tool_available};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default install command; force flags and archive paths are appended
pub const DEFAULT_INSTALL_COMMAND: &[&str] = &["dpkg", "-i", "-E", "-G"];

/// Flags that make dpkg ignore dependency problems and overwrite files
/// owned by other packages
pub const FORCE_FLAGS: &[&str] = &["--force-depends", "--force-overwrite"];

/// Installs a set of archives
pub trait NativeInstaller {
    /// Install `archives`, running from `working_dir`
    fn install(&self, archives: &[PathBuf], force: bool, working_dir: &Path)
    -> InvocationOutcome;
}

/// `dpkg -i`
#[derive(Debug, Clone)]
pub struct DpkgInstaller {
    command: Vec<String>,
    runner: ToolRunner,
}

impl DpkgInstaller {
    pub fn new(runner: ToolRunner) -> Self {
        Self::with_command(
            DEFAULT_INSTALL_COMMAND.iter().map(|s| s.to_string()).collect(),
            runner,
        )
    }

    pub fn with_command(command: Vec<String>, runner: ToolRunner) -> Self {
        Self { command, runner }
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Whether the install program is on PATH
    pub fn is_available(&self) -> bool {
        tool_available(&self.command)
    }

    /// Arguments appended to the command for one invocation
    fn arguments(archives: &[PathBuf], force: bool) -> Vec<String> {
        let mut args: Vec<String> = Vec::with_capacity(archives.len() + FORCE_FLAGS.len());
        if force {
            args.extend(FORCE_FLAGS.iter().map(|s| s.to_string()));
        }
        args.extend(archives.iter().map(|p| p.to_string_lossy().into_owned()));
        args
    }
}

impl NativeInstaller for DpkgInstaller {
    fn install(
        &self,
        archives: &[PathBuf],
        force: bool,
        working_dir: &Path,
    ) -> InvocationOutcome {
        debug!(
            "Installing {} archive(s) from {} (force={})",
            archives.len(),
            working_dir.display(),
            force
        );
        let label = working_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "install".to_string());
        let args = Self::arguments(archives, force);
        self.runner.run(&label, &self.command, &args, working_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_arguments_with_force() {
        let archives = vec![PathBuf::from("/pkgs/foo_bionic_amd64/foo_1.0_amd64.deb")];
        assert_eq!(
            DpkgInstaller::arguments(&archives, true),
            vec![
                "--force-depends",
                "--force-overwrite",
                "/pkgs/foo_bionic_amd64/foo_1.0_amd64.deb"
            ]
        );
        assert_eq!(
            DpkgInstaller::arguments(&archives, false),
            vec!["/pkgs/foo_bionic_amd64/foo_1.0_amd64.deb"]
        );
    }

    #[test]
    fn test_install_passes_archives() {
        // Stand-in command that records its arguments
        let dir = TempDir::new().unwrap();
        let installer = DpkgInstaller::with_command(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                r#"echo "$@" > args.txt"#.to_string(),
                "dpkg".to_string(),
            ],
            ToolRunner::new(),
        );
        let archive = dir.path().join("foo_1.0_amd64.deb");

        let outcome = installer.install(&[archive.clone()], true, dir.path());
        assert!(outcome.is_success());

        let recorded = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert_eq!(
            recorded.trim(),
            format!("--force-depends --force-overwrite {}", archive.display())
        );
    }
}
