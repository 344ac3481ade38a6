//! Flattening of frozen trees into root-to-leaf path strings.

use crate::freeze::freeze_stringified;
use crate::frozen::Frozen;
use crate::sort::recursive_sort;
use crate::value::Value;

/// Segment emitted for an empty composite.
pub const EMPTY_SEGMENT: &str = "<empty>";

/// Separator between path segments.
pub const PATH_SEPARATOR: &str = "/";

/// Freezes with stringification, sorts, and flattens.
pub fn flatten(value: &Value, assume_key: bool) -> Vec<String> {
    let frozen = recursive_sort(&freeze_stringified(value), assume_key);
    flatten_frozen(&frozen, assume_key)
}

/// Paths of every leaf of `node`, depth-first.
///
/// Entries of `Items` nodes, and with `assume_key` every two-element tuple,
/// are key/value pairs: the key emits a path of its own and then prefixes
/// the paths of the value, without a positional index. All other children
/// get their position as a segment.
pub fn flatten_frozen(node: &Frozen, assume_key: bool) -> Vec<String> {
    let mut flattener = Flattener {
        assume_key,
        path: Vec::new(),
        out: Vec::new(),
    };
    flattener.node(node);
    flattener.out
}

struct Flattener {
    assume_key: bool,
    path: Vec<String>,
    out: Vec<String>,
}

impl Flattener {
    fn emit(&mut self, last: &str) {
        let mut path = self.path.join(PATH_SEPARATOR);
        if !path.is_empty() {
            path.push_str(PATH_SEPARATOR);
        }
        path.push_str(last);
        self.out.push(path);
    }

    fn node(&mut self, node: &Frozen) {
        let Some(children) = node.children() else {
            self.emit(&node.text());
            return;
        };
        if children.is_empty() {
            self.emit(EMPTY_SEGMENT);
            return;
        }
        if self.assume_key {
            if let Some((key, value)) = node.as_pair() {
                self.pair(key, value);
                return;
            }
        }
        let entries_are_pairs = matches!(node, Frozen::Items(_)) || self.assume_key;
        for (index, child) in children.iter().enumerate() {
            match child.as_pair() {
                Some((key, value)) if entries_are_pairs => self.pair(key, value),
                _ => {
                    self.path.push(index.to_string());
                    self.node(child);
                    self.path.pop();
                }
            }
        }
    }

    fn pair(&mut self, key: &Frozen, value: &Frozen) {
        let key = key.text();
        self.emit(&key);
        self.path.push(key);
        self.node(value);
        self.path.pop();
    }
}
