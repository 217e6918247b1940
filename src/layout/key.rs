// src/layout/key.rs

//! Package directory keys
//!
//! A collected package lives in a directory named after the triple
//! `(name, distribution, architecture)` joined by underscores:
//!
//! ```text
//! curl_bionic_amd64
//! ```
//!
//! Fields are escaped before joining so that a field containing `_` cannot
//! be confused with the separator: `%` becomes `%25` and `_` becomes `%5F`.
//! Fields with neither character encode to themselves, so trees written by
//! earlier collectors parse unchanged.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the three key fields
pub const FIELD_SEPARATOR: &str = "_";

/// Number of fields in a directory key
const FIELD_COUNT: usize = 3;

/// Reasons a directory name is not a valid package key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutParseError {
    #[error("expected 3 '_'-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid escape sequence '{sequence}' in field {index}")]
    InvalidEscape { index: usize, sequence: String },
}

/// Identity of a collected package directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageKey {
    pub name: String,
    pub distribution: String,
    pub architecture: String,
}

impl PackageKey {
    pub fn new(
        name: impl Into<String>,
        distribution: impl Into<String>,
        architecture: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            distribution: distribution.into(),
            architecture: architecture.into(),
        }
    }

    /// Directory name for this key
    pub fn dir_name(&self) -> String {
        [&self.name, &self.distribution, &self.architecture]
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(FIELD_SEPARATOR)
    }

    /// Parse a directory name back into a key
    pub fn parse(dir_name: &str) -> Result<Self, LayoutParseError> {
        let fields: Vec<&str> = dir_name.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(LayoutParseError::FieldCount {
                found: fields.len(),
            });
        }

        // Empty fields are valid: older collectors wrote `curl__amd64` when
        // the distribution was unknown
        let mut decoded = Vec::with_capacity(FIELD_COUNT);
        for (index, field) in fields.iter().enumerate() {
            decoded.push(unescape_field(field, index)?);
        }

        let architecture = decoded.pop().unwrap_or_default();
        let distribution = decoded.pop().unwrap_or_default();
        let name = decoded.pop().unwrap_or_default();
        Ok(Self {
            name,
            distribution,
            architecture,
        })
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

impl FromStr for PackageKey {
    type Err = LayoutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn escape_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '%' => out.push_str("%25"),
            '_' => out.push_str("%5F"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_field(field: &str, index: usize) -> Result<String, LayoutParseError> {
    let mut out = String::with_capacity(field.len());
    let mut rest = field;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let sequence: String = rest[pos..].chars().take(3).collect();
        match sequence.to_ascii_uppercase().as_str() {
            "%25" => out.push('%'),
            "%5F" => out.push('_'),
            _ => return Err(LayoutParseError::InvalidEscape { index, sequence }),
        }
        rest = &rest[pos + sequence.len()..];
    }
    out.push_str(rest);

    Ok(out)
}
