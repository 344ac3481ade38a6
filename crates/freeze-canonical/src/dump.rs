//! Annotated dumps for human inspection.
//!
//! A dump keeps type and identity information next to every container and
//! marks revisited containers instead of expanding them again. Once the
//! whole graph has been walked, a clean-up pass flags the first encounter of
//! every revisited container as a target and removes markers that carry no
//! information (plain lists and tuples that are not targets).

use std::fmt;

use tracing::trace;

use crate::classify::{classify, Shape};
use crate::frozen::Frozen;
use crate::items::{value_children, value_items};
use crate::registry::Registry;
use crate::value::{Leaf, Value};

/// Identity and type metadata heading an annotated node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Type label, e.g. `<map>`.
    pub type_name: String,
    /// Per-dump identity token.
    pub token: u64,
    /// Set by the clean-up pass when the node is revisited elsewhere.
    pub is_target: bool,
    /// False for plain lists and tuples, whose type is obvious from the brackets.
    pub is_visible: bool,
}

impl Marker {
    /// Text shown for the marker.
    pub fn label(&self) -> String {
        if self.is_target {
            format!("T: {} at 0x{:X}", self.type_name, self.token)
        } else {
            self.type_name.clone()
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.label())
    }
}

/// Node of an annotated dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dumped {
    /// Primitive leaf, including `R: …` stand-ins for revisited containers.
    Leaf(Leaf),
    /// Identity marker; only ever the first element of `Annotated`.
    Marker(Marker),
    /// Marker followed by the payload.
    Annotated(Vec<Dumped>),
    /// List payload (lists and sets).
    List(Vec<Dumped>),
    /// Tuple payload.
    Tuple(Vec<Dumped>),
    /// Mapping payload (maps and objects).
    Mapping(Vec<(Dumped, Dumped)>),
    /// String form of an opaque value.
    Opaque(String),
}

impl Dumped {
    /// Freezes the dump. Markers freeze to their type label so equal
    /// content of equal types freezes equal.
    pub fn to_frozen(&self) -> Frozen {
        match self {
            Dumped::Leaf(leaf) => Frozen::Leaf(leaf.clone()),
            Dumped::Marker(marker) => Frozen::str(marker.type_name.clone()),
            Dumped::Opaque(text) => Frozen::str(text.clone()),
            Dumped::Annotated(items) | Dumped::List(items) | Dumped::Tuple(items) => {
                Frozen::Tuple(items.iter().map(Dumped::to_frozen).collect())
            }
            Dumped::Mapping(entries) => Frozen::Items(
                entries
                    .iter()
                    .map(|(key, value)| Frozen::pair(key.to_frozen(), value.to_frozen()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Dumped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dumped::Leaf(leaf) => f.write_str(&leaf.repr()),
            Dumped::Marker(marker) => write!(f, "{}", marker),
            Dumped::Opaque(text) => f.write_str(text),
            Dumped::Annotated(items) | Dumped::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Dumped::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Dumped::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Dumped]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Dumps any value into an annotated tree. Terminates on cyclic input.
pub fn dump(value: &Value) -> Dumped {
    let mut registry = Registry::new();
    let raw = dump_node(value, &mut registry);
    clean_up(raw, &registry)
}

fn dump_node(value: &Value, registry: &mut Registry) -> Dumped {
    let identity = match value {
        Value::Leaf(leaf) => return Dumped::Leaf(leaf.clone()),
        other => other.identity(),
    };
    let Some(identity) = identity else {
        return Dumped::Opaque(value.opaque_text());
    };
    let token = registry.token(identity);
    if !registry.visit(token) && is_reference_on_revisit(value) {
        registry.mark_duplicate(token);
        trace!(token, type_name = %value.type_name(), "dump reached a container twice");
        return Dumped::Leaf(Leaf::Str(format!(
            "R: <{}> at 0x{:X}",
            value.type_name(),
            token
        )));
    }
    let marker = Marker {
        type_name: format!("<{}>", value.type_name()),
        token,
        is_target: false,
        is_visible: !matches!(value, Value::List(_) | Value::Tuple(_)),
    };
    let payload = match classify(value) {
        Shape::Slotted | Shape::Mapping => Dumped::Mapping(
            value_items(value, true)
                .iter()
                .map(|(key, item)| {
                    let key = dump_node(key, registry);
                    (key, dump_node(item, registry))
                })
                .collect(),
        ),
        Shape::Sequence => {
            let children = value_children(value)
                .iter()
                .map(|child| dump_node(child, registry))
                .collect();
            match value {
                Value::Tuple(_) => Dumped::Tuple(children),
                _ => Dumped::List(children),
            }
        }
        Shape::Null | Shape::Leaf | Shape::Opaque => Dumped::Opaque(value.opaque_text()),
    };
    Dumped::Annotated(vec![Dumped::Marker(marker), payload])
}

/// Containers that turn into `R:` stand-ins when met again. Tuples and
/// opaque values are expanded again; neither can lead back into itself.
fn is_reference_on_revisit(value: &Value) -> bool {
    matches!(
        value,
        Value::List(_) | Value::Set(_) | Value::Map(_) | Value::Object(_)
    )
}

fn clean_up(node: Dumped, registry: &Registry) -> Dumped {
    match node {
        Dumped::Annotated(mut parts) => {
            if let Some(Dumped::Marker(marker)) = parts.first_mut() {
                marker.is_target = registry.is_duplicate(marker.token);
                if !(marker.is_target || marker.is_visible) {
                    parts.remove(0);
                }
            }
            let mut parts: Vec<Dumped> = parts
                .into_iter()
                .map(|part| clean_up(part, registry))
                .collect();
            if parts.len() == 1 {
                if let Some(only) = parts.pop() {
                    return only;
                }
            }
            Dumped::Annotated(parts)
        }
        Dumped::List(items) => Dumped::List(clean_all(items, registry)),
        Dumped::Tuple(items) => Dumped::Tuple(clean_all(items, registry)),
        Dumped::Mapping(entries) => Dumped::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (clean_up(key, registry), clean_up(value, registry)))
                .collect(),
        ),
        leaf => leaf,
    }
}

fn clean_all(items: Vec<Dumped>, registry: &Registry) -> Vec<Dumped> {
    items
        .into_iter()
        .map(|item| clean_up(item, registry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Class, Object};
    use std::rc::Rc;

    #[test]
    fn list_markers_are_removed_and_map_markers_kept() {
        let value = Value::list([Value::from(1), Value::map([("a", "b")])]);
        assert_eq!(dump(&value).to_string(), r#"[1, ["<map>", {'a': 'b'}]]"#);
    }

    #[test]
    fn self_reference_is_marked() {
        let list = Value::list(Vec::<Value>::new());
        list.push(list.clone());
        assert_eq!(
            dump(&list).to_string(),
            r#"["T: <list> at 0x1", ['R: <list> at 0x1']]"#
        );
    }

    #[test]
    fn shared_object_is_flagged_without_a_cycle() {
        let class = Rc::new(Class::new("Slots").with_slots(["a"]));
        let shared = Value::object(Object::new(class).with("a", "slot"));
        let value = Value::list([shared.clone(), Value::from(1), Value::list([shared, Value::from("banane")])]);
        assert_eq!(
            dump(&value).to_string(),
            r#"[["T: <Slots> at 0x2", {'a': 'slot'}], 1, ['R: <Slots> at 0x2', 'banane']]"#
        );
    }

    #[test]
    fn repeated_tuples_are_expanded() {
        let pair = Value::tuple([1, 2]);
        let value = Value::list([pair.clone(), pair]);
        assert_eq!(dump(&value).to_string(), "[(1, 2), (1, 2)]");
    }

    #[test]
    fn none_leaves_pass_through() {
        let value = Value::tuple([Value::none(), Value::tuple([Value::none(), Value::none()])]);
        assert_eq!(dump(&value).to_string(), "(null, (null, null))");
    }

    #[test]
    fn frozen_dumps_distinguish_types() {
        let first = Rc::new(Class::new("First"));
        let second = Rc::new(Class::new("Second"));
        let a = Value::object(Object::new(first.clone()).with("a", 1));
        let b = Value::object(Object::new(first).with("a", 1));
        let c = Value::object(Object::new(second).with("a", 1));
        assert_eq!(dump(&a).to_frozen(), dump(&b).to_frozen());
        assert_ne!(dump(&a).to_frozen(), dump(&c).to_frozen());
    }
}
