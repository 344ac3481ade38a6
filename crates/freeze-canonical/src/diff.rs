//! Structural diffs and assertion helpers.
//!
//! Both sides are frozen with stringification (so any input is comparable),
//! optionally sorted, rendered one leaf per line, and compared with a line
//! based unified diff.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffOp, DiffTag};
use tracing::debug;

use crate::dump::dump;
use crate::errors::AssertionError;
use crate::flatten::flatten;
use crate::format::{vformat, vformat_dump};
use crate::freeze::freeze_stringified;
use crate::sort::{recursive_sort, sort_dump};
use crate::value::Value;

/// Default number of context lines around a change.
pub const DEFAULT_CONTEXT: usize = 5;

/// Diff settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Unchanged lines shown around each change.
    pub context: usize,
    /// Stable-sort both sides first, making the diff order independent.
    pub sort: bool,
    /// Keep two-element composites in order while sorting.
    pub assume_key: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
            sort: false,
            assume_key: false,
        }
    }
}

impl DiffOptions {
    /// Options with sorting enabled.
    pub fn sorted() -> Self {
        Self {
            sort: true,
            ..Self::default()
        }
    }
}

/// Line based unified diff of two texts. Empty when they are equal.
pub fn unified_diff(left: &str, right: &str, context: usize) -> String {
    let old: Vec<&str> = left.split('\n').collect();
    let new: Vec<&str> = right.split('\n').collect();
    let ops = capture_diff_slices(Algorithm::Myers, &old, &new);
    let groups: Vec<Vec<DiffOp>> = group_diff_ops(ops, context)
        .into_iter()
        .filter(|group| group.iter().any(|op| op.tag() != DiffTag::Equal))
        .collect();
    if groups.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = vec!["--- ".to_string(), "+++ ".to_string()];
    for group in &groups {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        lines.push(format!(
            "@@ -{} +{} @@",
            hunk_range(first.old_range().start, last.old_range().end),
            hunk_range(first.new_range().start, last.new_range().end)
        ));
        for op in group {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => lines.extend(old[old_range].iter().map(|l| format!(" {}", l))),
                DiffTag::Delete => lines.extend(old[old_range].iter().map(|l| format!("-{}", l))),
                DiffTag::Insert => lines.extend(new[new_range].iter().map(|l| format!("+{}", l))),
                DiffTag::Replace => {
                    lines.extend(old[old_range].iter().map(|l| format!("-{}", l)));
                    lines.extend(new[new_range].iter().map(|l| format!("+{}", l)));
                }
            }
        }
    }
    lines.join("\n")
}

/// `start,length` with 1-based start; a single line omits the length and
/// an empty range points at the line before it.
fn hunk_range(start: usize, end: usize) -> String {
    let length = end - start;
    match length {
        1 => format!("{}", start + 1),
        0 => format!("{},0", start),
        _ => format!("{},{}", start + 1, length),
    }
}

/// Unified diff of the narrow renderings of two frozen values.
pub fn tree_diff(left: &Value, right: &Value, options: &DiffOptions) -> String {
    let render = |value: &Value| {
        let frozen = freeze_stringified(value);
        if options.sort {
            vformat(&recursive_sort(&frozen, options.assume_key))
        } else {
            vformat(&frozen)
        }
    };
    let diff = unified_diff(&render(left), &render(right), options.context);
    debug!(lines = diff.lines().count(), sort = options.sort, "tree diff computed");
    diff
}

/// Unified diff of the narrow renderings of two annotated dumps, so type
/// and identity changes show up as well.
pub fn dump_diff(left: &Value, right: &Value, options: &DiffOptions) -> String {
    let render = |value: &Value| {
        let dumped = dump(value);
        if options.sort {
            vformat_dump(&sort_dump(&dumped))
        } else {
            vformat_dump(&dumped)
        }
    };
    let diff = unified_diff(&render(left), &render(right), options.context);
    debug!(lines = diff.lines().count(), sort = options.sort, "dump diff computed");
    diff
}

/// Fails with the tree diff when it is not empty.
pub fn check_tree_diff(left: &Value, right: &Value, options: &DiffOptions) -> Result<(), AssertionError> {
    let diff = tree_diff(left, right, options);
    if diff.is_empty() {
        Ok(())
    } else {
        Err(AssertionError::Difference { diff })
    }
}

/// Panics with the tree diff when it is not empty.
#[track_caller]
pub fn tree_diff_assert(left: &Value, right: &Value, options: &DiffOptions) {
    if let Err(err) = check_tree_diff(left, right, options) {
        panic!("{}", err);
    }
}

/// Compares frozen forms directly.
///
/// In deterministic mode the frozen forms are compared as they are; otherwise
/// both are stable-sorted first. On mismatch the flattened path sets are
/// compared to localise the difference. When the path sets agree, the
/// deterministic comparison is reported as inconclusive and the sorted one
/// falls back to a dump diff.
pub fn check_frozen_equal(left: &Value, right: &Value, deterministic: bool) -> Result<(), AssertionError> {
    let canonical = |value: &Value| {
        let frozen = freeze_stringified(value);
        if deterministic {
            frozen
        } else {
            recursive_sort(&frozen, false)
        }
    };
    if canonical(left) == canonical(right) {
        return Ok(());
    }

    let left_paths: BTreeSet<String> = flatten(left, true).into_iter().collect();
    let right_paths: BTreeSet<String> = flatten(right, true).into_iter().collect();
    let only_left: BTreeSet<String> = left_paths.difference(&right_paths).cloned().collect();
    let only_right: BTreeSet<String> = right_paths.difference(&left_paths).cloned().collect();
    if !only_left.is_empty() || !only_right.is_empty() {
        let join = |paths: &BTreeSet<String>| paths.iter().cloned().collect::<Vec<_>>().join("\n");
        let diff = unified_diff(&join(&left_paths), &join(&right_paths), DEFAULT_CONTEXT);
        debug!(only_left = only_left.len(), only_right = only_right.len(), "path sets differ");
        return Err(AssertionError::PathSetDifference {
            only_left,
            only_right,
            diff,
        });
    }

    if deterministic {
        debug!("frozen forms differ but path sets are equal");
        Err(AssertionError::Inconclusive {
            diff: dump_diff(left, right, &DiffOptions::default()),
        })
    } else {
        Err(AssertionError::Difference {
            diff: dump_diff(left, right, &DiffOptions::sorted()),
        })
    }
}

/// Panics unless the frozen forms are equal.
#[track_caller]
pub fn frozen_equal_assert(left: &Value, right: &Value, deterministic: bool) {
    if let Err(err) = check_frozen_equal(left, right, deterministic) {
        panic!("{}", err);
    }
}
