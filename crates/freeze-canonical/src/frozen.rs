//! Canonical frozen nodes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::{Leaf, Value};

/// Immutable, purely structural form of a value.
///
/// `Items` is what mappings and attribute-bearing objects freeze to; every
/// child of an `Items` node is a two-element `Tuple` holding key and value.
///
/// Equality, ordering and hashing are structural: an `Items` node equals a
/// `Tuple` with the same children, matching their shared rendering.
#[derive(Debug, Clone)]
pub enum Frozen {
    /// Primitive leaf.
    Leaf(Leaf),
    /// Live reference to a value that was neither stringified nor expanded.
    Opaque(OpaqueRef),
    /// Ordered composite.
    Tuple(Vec<Frozen>),
    /// Ordered key/value pairs.
    Items(Vec<Frozen>),
}

impl Frozen {
    /// String leaf.
    pub fn str(s: impl Into<String>) -> Self {
        Frozen::Leaf(Leaf::Str(s.into()))
    }

    /// Integer leaf.
    pub fn int(i: i64) -> Self {
        Frozen::Leaf(Leaf::Int(i))
    }

    /// Tuple from children.
    pub fn tuple(children: impl IntoIterator<Item = Frozen>) -> Self {
        Frozen::Tuple(children.into_iter().collect())
    }

    /// Two-element tuple.
    pub fn pair(key: Frozen, value: Frozen) -> Self {
        Frozen::Tuple(vec![key, value])
    }

    /// Children of composites; `None` for leaves and opaque references.
    pub fn children(&self) -> Option<&[Frozen]> {
        match self {
            Frozen::Tuple(children) | Frozen::Items(children) => Some(children),
            Frozen::Leaf(_) | Frozen::Opaque(_) => None,
        }
    }

    /// True for leaves and opaque references.
    pub fn is_leaf(&self) -> bool {
        self.children().is_none()
    }

    /// Number of children; zero for leaves.
    pub fn len(&self) -> usize {
        self.children().map_or(0, <[Frozen]>::len)
    }

    /// True for leaves and empty composites.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for a two-element tuple.
    pub fn is_pair(&self) -> bool {
        self.as_pair().is_some()
    }

    /// Key and value of a two-element tuple.
    pub fn as_pair(&self) -> Option<(&Frozen, &Frozen)> {
        match self {
            Frozen::Tuple(children) if children.len() == 2 => Some((&children[0], &children[1])),
            _ => None,
        }
    }

    /// Compact textual form. Leaves use [`Leaf::repr`].
    pub fn repr(&self) -> String {
        self.to_string()
    }

    /// Leaf text with strings unquoted; composites use [`Frozen::repr`].
    pub fn text(&self) -> String {
        match self {
            Frozen::Leaf(leaf) => leaf.text(),
            Frozen::Opaque(reference) => reference.text(),
            composite => composite.repr(),
        }
    }
}

impl Frozen {
    fn rank(&self) -> u8 {
        match self {
            Frozen::Leaf(_) => 0,
            Frozen::Opaque(_) => 1,
            Frozen::Tuple(_) | Frozen::Items(_) => 2,
        }
    }
}

impl PartialEq for Frozen {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Frozen::Leaf(a), Frozen::Leaf(b)) => a == b,
            (Frozen::Opaque(a), Frozen::Opaque(b)) => a == b,
            _ => match (self.children(), other.children()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Frozen {}

impl Hash for Frozen {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Frozen::Leaf(leaf) => leaf.hash(state),
            Frozen::Opaque(reference) => reference.hash(state),
            Frozen::Tuple(children) | Frozen::Items(children) => children.hash(state),
        }
    }
}

impl PartialOrd for Frozen {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frozen {
    // Leaves, then opaque references, then composites by their children.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Frozen::Leaf(a), Frozen::Leaf(b)) => a.cmp(b),
            (Frozen::Opaque(a), Frozen::Opaque(b)) => a.cmp(b),
            _ => match (self.children(), other.children()) {
                (Some(a), Some(b)) => a.cmp(b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl fmt::Display for Frozen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frozen::Leaf(leaf) => f.write_str(&leaf.repr()),
            Frozen::Opaque(reference) => f.write_str(&reference.text()),
            Frozen::Tuple(children) | Frozen::Items(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                if children.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<Leaf> for Frozen {
    fn from(leaf: Leaf) -> Self {
        Frozen::Leaf(leaf)
    }
}

/// Identity-compared handle on an unexpanded value.
#[derive(Clone)]
pub struct OpaqueRef {
    value: Value,
}

impl OpaqueRef {
    pub(crate) fn new(value: Value) -> Self {
        Self { value }
    }

    /// The referenced value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// String form of the referenced value.
    pub fn text(&self) -> String {
        self.value.opaque_text()
    }

    fn address(&self) -> Option<crate::value::Identity> {
        self.value.identity()
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueRef({})", self.text())
    }
}

impl PartialEq for OpaqueRef {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for OpaqueRef {}

impl Hash for OpaqueRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl PartialOrd for OpaqueRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpaqueRef {
    // Text first so the order is reproducible; identity only breaks ties.
    fn cmp(&self, other: &Self) -> Ordering {
        self.text()
            .cmp(&other.text())
            .then_with(|| self.address().cmp(&other.address()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_tuple_notation() {
        let node = Frozen::tuple([
            Frozen::int(1),
            Frozen::tuple([Frozen::str("a")]),
            Frozen::tuple([]),
        ]);
        assert_eq!(node.to_string(), "(1, ('a',), ())");
    }

    #[test]
    fn opaque_references_compare_by_identity() {
        let first = Value::opaque("handle", Some("h".into()));
        let second = Value::opaque("handle", Some("h".into()));
        let a = OpaqueRef::new(first.clone());
        assert_eq!(a, OpaqueRef::new(first));
        assert_ne!(a, OpaqueRef::new(second));
    }

    #[test]
    fn pair_detection_requires_two_children() {
        assert!(Frozen::pair(Frozen::int(1), Frozen::int(2)).as_pair().is_some());
        assert!(Frozen::tuple([Frozen::int(1)]).as_pair().is_none());
        assert!(Frozen::Items(vec![Frozen::int(1), Frozen::int(2)]).as_pair().is_none());
    }

    #[test]
    fn items_equal_tuple_with_same_children() {
        use std::collections::hash_map::DefaultHasher;

        let entry = Frozen::pair(Frozen::str("a"), Frozen::int(1));
        let items = Frozen::Items(vec![entry.clone()]);
        let tuple = Frozen::tuple([entry]);
        assert_eq!(items, tuple);
        assert_eq!(items.cmp(&tuple), Ordering::Equal);

        let digest = |node: &Frozen| {
            let mut hasher = DefaultHasher::new();
            node.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(digest(&items), digest(&tuple));
    }

    #[test]
    fn structural_order_puts_leaves_before_composites() {
        let leaf = Frozen::int(7);
        let empty = Frozen::tuple([]);
        assert!(leaf < empty);
        assert!(Frozen::tuple([Frozen::int(1)]) < Frozen::tuple([Frozen::int(1), Frozen::int(0)]));
        assert_ne!(empty, Frozen::tuple([Frozen::tuple([])]));
    }
}
