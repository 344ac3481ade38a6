//! Assertion and rendering error types.

use std::collections::BTreeSet;

use thiserror::Error;

/// Rendering errors.
#[derive(Error, Debug)]
pub enum FreezeError {
    /// Canonical JSON serialization failed.
    #[error("canonical JSON rendering failed: {0}")]
    CanonicalJson(String),
}

/// Failed structural comparison. The message embeds the diff.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertionError {
    /// The narrow renderings differ.
    #[error("difference: \n{diff}")]
    Difference {
        /// Unified diff of the two renderings.
        diff: String,
    },
    /// The frozen forms differ and so do their flattened path sets.
    #[error(
        "path sets differ (only left: {}, only right: {}): \n{diff}",
        .only_left.len(),
        .only_right.len()
    )]
    PathSetDifference {
        /// Paths present only on the left side.
        only_left: BTreeSet<String>,
        /// Paths present only on the right side.
        only_right: BTreeSet<String>,
        /// Unified diff of the sorted path lists.
        diff: String,
    },
    /// The frozen forms differ but their path sets are identical.
    #[error("frozen forms differ but flattened paths are equal, comparison inconclusive: \n{diff}")]
    Inconclusive {
        /// Unified diff of the annotated dumps.
        diff: String,
    },
}

impl AssertionError {
    /// Diff text carried by every variant.
    pub fn diff(&self) -> &str {
        match self {
            AssertionError::Difference { diff }
            | AssertionError::PathSetDifference { diff, .. }
            | AssertionError::Inconclusive { diff } => diff,
        }
    }
}
