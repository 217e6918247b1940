// src/index/mod.rs

//! Package index queries
//!
//! The collector needs three facts about a requested package: whether the
//! index knows it, its architecture, and the dependency groups of its
//! candidate version. [`PackageIndex`] is that seam; [`apt::AptCacheIndex`]
//! answers it from the system apt cache.

pub mod apt;

pub use apt::AptCacheIndex;

use crate::error::Result;

/// One dependency slot: any alternative satisfies it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyGroup {
    pub alternatives: Vec<String>,
}

impl DependencyGroup {
    pub fn new<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alternatives: alternatives.into_iter().map(Into::into).collect(),
        }
    }
}

/// The version the index would install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateVersion {
    pub version: String,
    /// Pre-Depends groups followed by Depends groups
    pub dependencies: Vec<DependencyGroup>,
}

/// What the index knows about a requested package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub architecture: String,
    pub candidate: CandidateVersion,
}

/// Read access to the system package index
pub trait PackageIndex {
    /// Look up `name`
    ///
    /// Returns `Ok(None)` when the index does not know the package and
    /// [`Error::NoCandidate`](crate::Error::NoCandidate) when it knows it but
    /// has no installable version.
    fn lookup(&self, name: &str) -> Result<Option<PackageDescriptor>>;
}

/// Parse a `Depends`-style field into dependency groups
///
/// ```text
/// libc6 (>= 2.17), libcurl4 (= 7.58.0-2ubuntu3), zlib1g | libz1
/// ```
///
/// becomes `[[libc6], [libcurl4], [zlib1g, libz1]]`.
pub fn parse_dependency_field(field: &str) -> Vec<DependencyGroup> {
    field
        .split(',')
        .map(|group| {
            DependencyGroup::new(group.split('|').filter_map(bare_package_name))
        })
        .filter(|group| !group.alternatives.is_empty())
        .collect()
}

/// Strip version constraints, architecture qualifiers and restriction lists
fn bare_package_name(relation: &str) -> Option<String> {
    let token = relation
        .trim()
        .split(|c: char| c.is_whitespace() || matches!(c, '(' | '[' | '<'))
        .next()?;
    let name = token.split(':').next()?;
    (!name.is_empty()).then(|| name.to_string())
}
