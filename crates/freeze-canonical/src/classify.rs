//! Decides which traversal rule applies to a value.
//!
//! Each capability is an explicit probe answering yes, no, or "does not
//! apply to this kind of value". [`classify`] walks the probes in a fixed
//! precedence order and stops at the first `Yes`.

use crate::value::{Leaf, Value};

/// Result of a capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe<T> {
    /// The value has the capability.
    Yes(T),
    /// The value could have it but does not.
    No,
    /// The capability does not exist for this kind of value.
    Inapplicable,
}

impl<T> Probe<T> {
    /// True for [`Probe::Yes`].
    pub fn is_yes(&self) -> bool {
        matches!(self, Probe::Yes(_))
    }
}

/// Traversal rule selected for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `None` passes through unchanged.
    Null,
    /// Primitive or string-like leaf.
    Leaf,
    /// Object with fixed attribute declarations somewhere in its hierarchy.
    Slotted,
    /// Mapping or object with a dynamic attribute dictionary.
    Mapping,
    /// Ordered or unordered sequence.
    Sequence,
    /// Nothing can be extracted.
    Opaque,
}

/// Number of slot names declared across the value's class hierarchy.
pub fn probe_slots(value: &Value) -> Probe<usize> {
    match value {
        Value::Object(object) => {
            let object = object.borrow();
            let count: usize = object
                .class()
                .hierarchy()
                .iter()
                .map(|class| class.slots().len())
                .sum();
            if count > 0 {
                Probe::Yes(count)
            } else {
                Probe::No
            }
        }
        Value::Opaque(_) => Probe::No,
        _ => Probe::Inapplicable,
    }
}

/// Number of entries reachable as key/value items.
pub fn probe_mapping(value: &Value) -> Probe<usize> {
    match value {
        Value::Map(entries) => Probe::Yes(entries.borrow().len()),
        Value::Object(object) => match object.borrow().dict() {
            Some(dict) => Probe::Yes(dict.len()),
            None => Probe::No,
        },
        Value::Opaque(_) => Probe::No,
        _ => Probe::Inapplicable,
    }
}

/// Length of values that have one.
pub fn probe_length(value: &Value) -> Probe<usize> {
    match value {
        Value::Leaf(Leaf::Str(s)) => Probe::Yes(s.chars().count()),
        Value::Leaf(Leaf::Bytes(b)) => Probe::Yes(b.len()),
        Value::Leaf(_) => Probe::Inapplicable,
        Value::List(items) | Value::Set(items) => Probe::Yes(items.borrow().len()),
        Value::Tuple(items) => Probe::Yes(items.len()),
        Value::Map(entries) => Probe::Yes(entries.borrow().len()),
        Value::Object(_) | Value::Opaque(_) => Probe::No,
    }
}

/// Picks the traversal rule for `value`.
pub fn classify(value: &Value) -> Shape {
    match value {
        Value::Leaf(Leaf::None) => return Shape::Null,
        Value::Leaf(_) => return Shape::Leaf,
        _ => {}
    }
    if probe_slots(value).is_yes() {
        Shape::Slotted
    } else if probe_mapping(value).is_yes() {
        Shape::Mapping
    } else if probe_length(value).is_yes() {
        Shape::Sequence
    } else {
        Shape::Opaque
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Class, Object};
    use std::rc::Rc;

    #[test]
    fn precedence_follows_capabilities() {
        let slotted = Rc::new(Class::new("Slots").with_slots(["a"]));
        let plain = Rc::new(Class::new("Plain"));

        assert_eq!(classify(&Value::none()), Shape::Null);
        assert_eq!(classify(&Value::from("abc")), Shape::Leaf);
        assert_eq!(classify(&Value::from(1.5)), Shape::Leaf);
        assert_eq!(classify(&Value::object(Object::new(slotted).with_dict())), Shape::Slotted);
        assert_eq!(classify(&Value::object(Object::new(plain))), Shape::Mapping);
        assert_eq!(classify(&Value::map([("a", 1)])), Shape::Mapping);
        assert_eq!(classify(&Value::tuple([1, 2])), Shape::Sequence);
        assert_eq!(classify(&Value::set([1])), Shape::Sequence);
        assert_eq!(classify(&Value::opaque("fn", None)), Shape::Opaque);
    }

    #[test]
    fn object_without_slots_is_an_empty_mapping() {
        let bare = Rc::new(Class::new("Bare").with_slots(Vec::<String>::new()));
        let value = Value::object(Object::new(bare));
        assert_eq!(classify(&value), Shape::Mapping);
        assert_eq!(probe_mapping(&value), Probe::Yes(0));
        assert_eq!(probe_slots(&value), Probe::No);
        assert_eq!(probe_length(&value), Probe::No);
    }

    #[test]
    fn leaves_do_not_answer_attribute_probes() {
        let leaf = Value::from(3);
        assert_eq!(probe_slots(&leaf), Probe::Inapplicable);
        assert_eq!(probe_mapping(&leaf), Probe::Inapplicable);
        assert_eq!(probe_length(&Value::from("ab")), Probe::Yes(2));
    }
}
