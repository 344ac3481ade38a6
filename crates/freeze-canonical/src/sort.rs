//! Stable, order-independent sorting of frozen and dumped trees.

use crate::compare::canonical_cmp;
use crate::dump::Dumped;
use crate::frozen::Frozen;

/// Recursively sorts every composite of a frozen tree.
///
/// Children are sorted before their parent so comparisons see canonical
/// descendants. Entries of `Items` nodes move as whole pairs; inside a pair
/// only the key and the value themselves are sorted. With `assume_key`, any
/// two-element tuple is treated the same way and keeps its order.
pub fn recursive_sort(node: &Frozen, assume_key: bool) -> Frozen {
    match node {
        Frozen::Leaf(_) | Frozen::Opaque(_) => node.clone(),
        Frozen::Tuple(children) => {
            let mut sorted: Vec<Frozen> = children
                .iter()
                .map(|child| recursive_sort(child, assume_key))
                .collect();
            if !(assume_key && sorted.len() == 2) {
                sorted.sort_by(canonical_cmp);
            }
            Frozen::Tuple(sorted)
        }
        Frozen::Items(entries) => {
            let mut sorted: Vec<Frozen> = entries
                .iter()
                .map(|entry| sort_entry(entry, assume_key))
                .collect();
            sorted.sort_by(canonical_cmp);
            Frozen::Items(sorted)
        }
    }
}

fn sort_entry(entry: &Frozen, assume_key: bool) -> Frozen {
    match entry.as_pair() {
        Some((key, value)) => Frozen::pair(
            recursive_sort(key, assume_key),
            recursive_sort(value, assume_key),
        ),
        None => recursive_sort(entry, assume_key),
    }
}

/// Recursively sorts an annotated dump.
///
/// The identity marker of an annotated node stays in front; only its payload
/// is sorted. Mapping entries are ordered by their (key, value) pair.
pub fn sort_dump(node: &Dumped) -> Dumped {
    match node {
        Dumped::Leaf(_) | Dumped::Marker(_) | Dumped::Opaque(_) => node.clone(),
        Dumped::Annotated(parts) => {
            let mut parts = parts.clone();
            if let Some(payload) = parts.pop() {
                parts.push(sort_dump(&payload));
            }
            Dumped::Annotated(parts)
        }
        Dumped::List(items) => Dumped::List(sort_by_traversal(
            items.iter().map(sort_dump).collect(),
            Dumped::to_frozen,
        )),
        Dumped::Tuple(items) => Dumped::Tuple(sort_by_traversal(
            items.iter().map(sort_dump).collect(),
            Dumped::to_frozen,
        )),
        Dumped::Mapping(entries) => Dumped::Mapping(sort_by_traversal(
            entries
                .iter()
                .map(|(key, value)| (sort_dump(key), sort_dump(value)))
                .collect(),
            |(key, value)| Frozen::pair(key.to_frozen(), value.to_frozen()),
        )),
    }
}

fn sort_by_traversal<T>(items: Vec<T>, key: impl Fn(&T) -> Frozen) -> Vec<T> {
    let mut keyed: Vec<(Frozen, T)> = items.into_iter().map(|item| (key(&item), item)).collect();
    keyed.sort_by(|a, b| canonical_cmp(&a.0, &b.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freeze::freeze;
    use crate::value::Value;

    #[test]
    fn mapping_pairs_are_not_swapped() {
        let value = Value::list([
            Value::from(3),
            Value::from(1),
            Value::map([("c", "c"), ("a", "b"), ("b", "a")]),
        ]);
        assert_eq!(
            recursive_sort(&freeze(&value), false).to_string(),
            "((('a', 'b'), ('b', 'a'), ('c', 'c')), 1, 3)"
        );
    }

    #[test]
    fn plain_pairs_are_sorted_unless_assuming_keys() {
        let value = Value::list([Value::tuple(["b", "a"])]);
        let frozen = freeze(&value);
        assert_eq!(recursive_sort(&frozen, false).to_string(), "(('a', 'b'),)");
        assert_eq!(recursive_sort(&frozen, true).to_string(), "(('b', 'a'),)");
    }

    #[test]
    fn siblings_with_shared_leaves_sort_independently_of_order() {
        let forward = Frozen::tuple([
            Frozen::tuple([]),
            Frozen::tuple([Frozen::tuple([])]),
        ]);
        let backward = Frozen::tuple([
            Frozen::tuple([Frozen::tuple([])]),
            Frozen::tuple([]),
        ]);
        assert_eq!(
            recursive_sort(&forward, false),
            recursive_sort(&backward, false)
        );

        let x = Value::list([
            Value::tuple([Value::tuple([1, 2]), Value::tuple([3])]),
            Value::tuple([Value::tuple([1]), Value::tuple([2, 3])]),
        ]);
        let y = Value::list([
            Value::tuple([Value::tuple([1]), Value::tuple([2, 3])]),
            Value::tuple([Value::tuple([1, 2]), Value::tuple([3])]),
        ]);
        let (sorted_x, sorted_y) = (
            recursive_sort(&freeze(&x), false),
            recursive_sort(&freeze(&y), false),
        );
        assert_eq!(sorted_x, sorted_y);
        assert_eq!(sorted_x.to_string(), sorted_y.to_string());
    }

    #[test]
    fn dump_marker_stays_in_front() {
        let dumped = crate::dump::dump(&Value::map([("b", 1), ("a", 2)]));
        let sorted = sort_dump(&dumped);
        match sorted {
            Dumped::Annotated(parts) => {
                assert!(matches!(parts[0], Dumped::Marker(_)));
                match &parts[1] {
                    Dumped::Mapping(entries) => {
                        assert_eq!(entries[0].0.to_frozen(), Frozen::str("a"));
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
