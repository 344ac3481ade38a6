//! Attribute extraction for objects and mappings.

use crate::value::{Object, Value};

/// Converts an object to `(name, value)` items.
///
/// Dictionary entries come first, in assignment order. Then every slot name
/// declared anywhere in the class hierarchy is looked up and appended, even
/// when the dictionary already produced an entry of the same name. Slots
/// that were never assigned are skipped.
pub fn object_to_items(object: &Object) -> Vec<(String, Value)> {
    let mut items: Vec<(String, Value)> = object.dict().map(<[_]>::to_vec).unwrap_or_default();
    for class in object.class().hierarchy() {
        for name in class.slots() {
            if let Some(value) = object.get(name) {
                items.push((name.clone(), value));
            }
        }
    }
    items
}

/// Like [`object_to_items`] but keyed: later entries overwrite earlier ones
/// of the same name while keeping the first position.
pub fn object_to_map(object: &Object) -> Vec<(String, Value)> {
    let mut map: Vec<(String, Value)> = Vec::new();
    for (name, value) in object_to_items(object) {
        match map.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => map.push((name, value)),
        }
    }
    map
}

/// Key/value items of a mapping or object; empty for everything else.
///
/// `keyed` selects [`object_to_map`] over [`object_to_items`] for objects.
pub(crate) fn value_items(value: &Value, keyed: bool) -> Vec<(Value, Value)> {
    match value {
        Value::Map(entries) => entries.borrow().clone(),
        Value::Object(object) => {
            let object = object.borrow();
            let items = if keyed {
                object_to_map(&object)
            } else {
                object_to_items(&object)
            };
            items
                .into_iter()
                .map(|(name, value)| (Value::from(name), value))
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Children of a sequence; empty for everything else.
pub(crate) fn value_children(value: &Value) -> Vec<Value> {
    match value {
        Value::List(items) | Value::Set(items) => items.borrow().clone(),
        Value::Tuple(items) => items.to_vec(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Class, Leaf};
    use std::rc::Rc;

    fn names(items: &[(String, Value)]) -> Vec<&str> {
        items.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn slots_follow_dictionary_entries() {
        let base = Rc::new(Class::new("Base").with_slots(["b"]));
        let class = Rc::new(Class::new("Derived").with_slots(["a"]).with_base(base));
        let object = Object::new(class)
            .with_dict()
            .with("extra", 1)
            .with("a", "slot")
            .with("b", 2);
        assert_eq!(names(&object_to_items(&object)), vec!["extra", "a", "b"]);
    }

    #[test]
    fn name_declared_twice_is_repeated() {
        let base = Rc::new(Class::new("Base").with_slots(["a"]));
        let child = Rc::new(Class::new("Child").with_slots(["a"]).with_base(base));
        let object = Object::new(child).with("a", 5);
        assert_eq!(names(&object_to_items(&object)), vec!["a", "a"]);
        assert_eq!(object_to_map(&object).len(), 1);
    }

    #[test]
    fn unset_slots_are_skipped() {
        let class = Rc::new(Class::new("Sparse").with_slots(["a", "b"]));
        let object = Object::new(class).with("b", 1);
        let items = object_to_items(&object);
        assert_eq!(names(&items), vec!["b"]);
        assert!(matches!(items[0].1, Value::Leaf(Leaf::Int(1))));
    }
}
