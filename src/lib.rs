// src/lib.rs

//! debcollect
//!
//! Collects installed Debian packages and their direct dependencies into a
//! directory tree that can be carried to another machine, and installs
//! previously collected packages from that tree.
//!
//! # Layout
//!
//! - One output root (`pkgs/` next to the executable by default)
//! - One directory per collected package, named `name_distribution_arch`
//! - Archives (`*.deb`) plus a `collection.toml` manifest inside each
//!
//! # Flows
//!
//! - [`collector::collect`]: look up each package, repack every dependency
//!   alternative of its candidate version into the package directory
//! - [`installer::install`]: find directories of the requested packages and
//!   hand their archives to dpkg
//!
//! Both flows take an explicit [`Context`] and report per-item failures
//! instead of aborting.

pub mod cli;
pub mod collector;
pub mod config;
pub mod context;
pub mod distro;
mod error;
pub mod index;
pub mod installer;
pub mod interrupt;
pub mod layout;
pub mod tools;

pub use collector::{CollectIssue, CollectReport, CollectedPackage, collect};
pub use config::Config;
pub use context::Context;
pub use distro::{DistributionField, DistributionResolver, FixedDistribution, OsReleaseResolver};
pub use error::{Error, Result};
pub use index::{AptCacheIndex, CandidateVersion, DependencyGroup, PackageDescriptor, PackageIndex};
pub use installer::{InstallIssue, InstallReport, install};
pub use layout::{CollectionManifest, LayoutParseError, OutputRoot, PackageKey};
pub use tools::{DpkgInstaller, DpkgRepack, InvocationOutcome, NativeInstaller, Repacker, ToolRunner};
