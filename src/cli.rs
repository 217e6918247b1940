// src/cli.rs
//! CLI definitions for debcollect
//!
//! ```text
//! debcollect -c curl wget        # collect curl and wget with their dependencies
//! debcollect -i curl             # install what was collected for curl
//! debcollect -i curl -c wget     # install runs first, then collect
//! ```

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "debcollect")]
#[command(author = "debcollect Contributors")]
#[command(version)]
#[command(
    about = "Collect Debian packages with their dependencies, install them later",
    long_about = None
)]
pub struct Cli {
    /// Collect packages and their dependencies
    #[arg(short = 'c', value_name = "NAME", num_args = 0..)]
    pub collect: Option<Vec<String>>,

    /// Install previously collected packages
    #[arg(short = 'i', value_name = "NAME", num_args = 0..)]
    pub install: Option<Vec<String>>,

    /// Configuration file (default: debcollect.toml next to the executable)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output root (default: pkgs next to the executable)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Distribution label to use instead of /etc/os-release
    #[arg(long, value_name = "LABEL")]
    pub distribution: Option<String>,

    /// Kill repack/install invocations running longer than SECS
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Do not pass --force-depends/--force-overwrite to dpkg
    #[arg(long)]
    pub no_force: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
