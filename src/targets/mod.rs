// src/targets/mod.rs
// =============================================================================
// This module describes WHAT we fetch.
//
// A request target is an opaque address (a path plus an already-encoded
// query string) pointing at the search API. We never build query strings
// ourselves: targets are written down once, in a preset or a config file,
// and passed into the pipeline as an ordered list.
//
// Submodules:
// - presets: the built-in target lists
//
// Rust concepts:
// - Newtype-style wrappers: TargetList guarantees "never empty"
// - thiserror: Small typed error enums
// =============================================================================

mod presets;

pub use presets::{preset, DEFAULT_PRESET};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// One address on the search API, plus a label for logs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestTarget {
    /// Human-readable label, only used in logs and error messages
    pub name: String,
    /// Relative path with query string, or an absolute http(s) URL
    pub path: String,
}

impl RequestTarget {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    // Resolves this target against the API base URL
    //
    // Relative paths are joined onto the base; absolute URLs pass through
    // untouched because Url::join ignores the base for them.
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.path)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("target list '{0}' is empty")]
    Empty(String),
    #[error("unknown preset '{0}' (available: {1})")]
    UnknownPreset(String, String),
}

// An ordered, non-empty list of request targets
//
// The order here is the order of the final aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetList {
    name: String,
    targets: Vec<RequestTarget>,
}

impl TargetList {
    pub fn new(name: impl Into<String>, targets: Vec<RequestTarget>) -> Result<Self, TargetError> {
        let name = name.into();
        if targets.is_empty() {
            return Err(TargetError::Empty(name));
        }
        Ok(Self { name, targets })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RequestTarget> {
        self.targets.iter()
    }
}

impl<'a> IntoIterator for &'a TargetList {
    type Item = &'a RequestTarget;
    type IntoIter = std::slice::Iter<'a, RequestTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
