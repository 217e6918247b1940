// src/tools/mod.rs

//! External tool invocation
//!
//! Both flows drive external programs: the repack tool while collecting and
//! the native installer while installing. Every invocation:
//!
//! - runs with an explicit working directory (`Command::current_dir`), so the
//!   process-wide working directory is never touched
//! - has stdin nulled and its output captured and logged
//! - may be bounded by a timeout (off unless configured)
//! - yields an [`InvocationOutcome`] that callers record in their reports

pub mod dpkg;
pub mod repack;

pub use dpkg::{DpkgInstaller, NativeInstaller};
pub use repack::{DpkgRepack, Repacker};

use std::ffi::OsStr;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Result of running an external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Exited with status 0
    Success,
    /// Exited non-zero; `None` when killed by a signal
    Failed { code: Option<i32> },
    /// Killed after exceeding the configured timeout
    TimedOut { after: Duration },
    /// Could not be started at all
    SpawnFailed(String),
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for InvocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "ok"),
            Self::Failed { code: Some(code) } => write!(f, "exit code {}", code),
            Self::Failed { code: None } => write!(f, "terminated by signal"),
            Self::TimedOut { after } => write!(f, "timed out after {}s", after.as_secs()),
            Self::SpawnFailed(reason) => write!(f, "failed to start: {}", reason),
        }
    }
}

/// Runs argv-style commands in a given directory
#[derive(Debug, Clone, Default)]
pub struct ToolRunner {
    timeout: Option<Duration>,
}

impl ToolRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every invocation by `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `argv` followed by `extra_args` inside `working_dir`
    ///
    /// `label` prefixes the logged output lines.
    pub fn run<S: AsRef<OsStr>>(
        &self,
        label: &str,
        argv: &[String],
        extra_args: &[S],
        working_dir: &Path,
    ) -> InvocationOutcome {
        let Some((program, args)) = argv.split_first() else {
            return InvocationOutcome::SpawnFailed("empty command".to_string());
        };

        debug!(
            "Executing in {}: {} {:?} (+{} args)",
            working_dir.display(),
            program,
            args,
            extra_args.len()
        );

        let mut child = match Command::new(program)
            .args(args)
            .args(extra_args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return InvocationOutcome::SpawnFailed(format!("{}: {}", program, e)),
        };

        // Drained concurrently so a chatty child never blocks on a full pipe
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!("[{}] {} timed out after {}s", label, program, timeout.as_secs());
                    return InvocationOutcome::TimedOut { after: timeout };
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return InvocationOutcome::SpawnFailed(format!("{}: {}", program, e));
                }
            },
            None => match child.wait() {
                Ok(status) => status,
                Err(e) => return InvocationOutcome::SpawnFailed(format!("{}: {}", program, e)),
            },
        };

        for line in String::from_utf8_lossy(&collect_output(stdout)).lines() {
            debug!("[{}] {}", label, line);
        }
        for line in String::from_utf8_lossy(&collect_output(stderr)).lines() {
            warn!("[{}] {}", label, line);
        }

        if status.success() {
            InvocationOutcome::Success
        } else {
            InvocationOutcome::Failed {
                code: status.code(),
            }
        }
    }
}

/// Read a child pipe to the end on its own thread
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn collect_output(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Check whether the program of an argv prefix can be found
pub fn tool_available(argv: &[String]) -> bool {
    match argv.first() {
        Some(program) if program.contains('/') => Path::new(program).exists(),
        Some(program) => which::which(program).is_ok(),
        None => false,
    }
}
