//! Traversal-based ordering of frozen trees.
//!
//! Two trees are compared by walking both breadth-first, left to right, and
//! comparing the textual representation of corresponding leaves. The first
//! differing leaf decides; a tree whose leaves run out first sorts first.
//! Trees with identical leaf sequences fall back to their structural order.

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::frozen::Frozen;

/// Breadth-first iterator over the leaves of a frozen tree.
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    queue: VecDeque<&'a Frozen>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Frozen;

    fn next(&mut self) -> Option<&'a Frozen> {
        while let Some(node) = self.queue.pop_front() {
            match node.children() {
                Some(children) => self.queue.extend(children.iter()),
                None => return Some(node),
            }
        }
        None
    }
}

/// Leaves of `node`, breadth-first, left to right.
pub fn traverse(node: &Frozen) -> Leaves<'_> {
    Leaves {
        queue: VecDeque::from([node]),
    }
}

/// Order over frozen trees by leaf representation alone.
///
/// Distinct shapes can share a leaf sequence, e.g. `((1, 2), (3,))` and
/// `((1,), (2, 3))`; use [`canonical_cmp`] where a total order is needed.
pub fn traversal_cmp(left: &Frozen, right: &Frozen) -> Ordering {
    let mut lhs = traverse(left);
    let mut rhs = traverse(right);
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => match a.repr().cmp(&b.repr()) {
                Ordering::Equal => continue,
                decided => return decided,
            },
        }
    }
}

/// Total order: [`traversal_cmp`], then the structural order of [`Frozen`].
pub fn canonical_cmp(left: &Frozen, right: &Frozen) -> Ordering {
    traversal_cmp(left, right).then_with(|| left.cmp(right))
}

/// Wrapper whose `Ord` is [`canonical_cmp`], usable as a sort key.
#[derive(Debug, Clone, Copy)]
pub struct TraversalOrder<'a>(pub &'a Frozen);

impl PartialEq for TraversalOrder<'_> {
    fn eq(&self, other: &Self) -> bool {
        canonical_cmp(self.0, other.0) == Ordering::Equal
    }
}

impl Eq for TraversalOrder<'_> {}

impl PartialOrd for TraversalOrder<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TraversalOrder<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(self.0, other.0)
    }
}
