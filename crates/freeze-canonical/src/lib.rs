//! Structural canonicalization of arbitrary object graphs.
//!
//! Values of any shape (nested lists, tuples, sets, mappings, attribute
//! bearing objects, opaque handles, even cyclic graphs) are frozen into an
//! immutable tree of tuples and primitive leaves. The frozen form is
//! comparable, orderable and hashable, which gives structural equality and
//! content hashes without custom equality code, annotated dumps for
//! debugging, and line-based diffs between two graphs.
//!
//! Every operation is a single synchronous traversal; identity bookkeeping
//! is created per call and dropped on return.
//!
#![deny(missing_docs)]

/// Type classification with tri-state capability probes.
pub mod classify;
/// Traversal-based ordering of frozen trees.
pub mod compare;
/// Structural diffs and assertion helpers.
pub mod diff;
/// Annotated dumps with identity markers.
pub mod dump;
/// Error types.
pub mod errors;
/// Flattening into root-to-leaf path strings.
pub mod flatten;
/// Narrow pretty printing.
pub mod format;
/// The canonicalizer.
pub mod freeze;
/// Frozen node types.
pub mod frozen;
/// Content hashes.
pub mod hash;
/// Attribute extraction.
pub mod items;
/// JSON rendering of frozen trees.
pub mod json;
mod registry;
/// Stable sorting.
pub mod sort;
/// Input model.
pub mod value;

pub use classify::{classify, Probe, Shape};
pub use compare::{canonical_cmp, traversal_cmp, traverse, TraversalOrder};
pub use diff::{
    check_frozen_equal, check_tree_diff, dump_diff, frozen_equal_assert, tree_diff,
    tree_diff_assert, unified_diff, DiffOptions,
};
pub use dump::{dump, Dumped, Marker};
pub use errors::{AssertionError, FreezeError};
pub use flatten::{flatten, flatten_frozen};
pub use format::{vformat, vformat_dump};
pub use freeze::{freeze, freeze_stringified, freeze_with, CycleCheck, FreezeOptions, Freezer};
pub use frozen::{Frozen, OpaqueRef};
pub use hash::{
    recursive_digest, recursive_hash, recursive_hash_and_digest, stable_digest, stable_hash,
    stable_hash_and_digest, DigestAlg, Fingerprint,
};
pub use items::{object_to_items, object_to_map};
pub use sort::{recursive_sort, sort_dump};
pub use value::{Class, Describe, Float, Identity, Leaf, Object, Opaque, Value};
