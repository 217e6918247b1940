// src/context.rs

//! Explicit run context
//!
//! Everything the flows need is carried here and passed by reference:
//! the output tree, the distribution label resolved at startup, the package
//! index, and the two external tools. Nothing is read from process-global
//! state such as the current working directory.

use crate::index::PackageIndex;
use crate::layout::OutputRoot;
use crate::tools::{NativeInstaller, Repacker};

pub struct Context<'a> {
    pub output: OutputRoot,
    /// Shared by every package collected in this run
    pub distribution: String,
    pub index: &'a dyn PackageIndex,
    pub repacker: &'a dyn Repacker,
    pub installer: &'a dyn NativeInstaller,
    /// Pass force flags to the installer
    pub force: bool,
}

impl<'a> Context<'a> {
    pub fn new(
        output: OutputRoot,
        distribution: impl Into<String>,
        index: &'a dyn PackageIndex,
        repacker: &'a dyn Repacker,
        installer: &'a dyn NativeInstaller,
    ) -> Self {
        Self {
            output,
            distribution: distribution.into(),
            index,
            repacker,
            installer,
            force: true,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
