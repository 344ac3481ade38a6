//! Input model for traversals.
//!
//! Arbitrary object graphs enter the library as [`Value`] trees. Leaves are
//! plain data; every other variant is reference counted so that the same
//! container can appear in several places (shared references) or inside
//! itself (cycles). Containers that can be mutated after construction use
//! `RefCell`, which is what makes self-referential graphs constructible.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::frozen::Frozen;

/// Primitive leaf values. Leaves are terminal in every traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Leaf {
    /// Absence of a value.
    None,
    /// Boolean leaf.
    Bool(bool),
    /// Signed integer leaf.
    Int(i64),
    /// Floating point leaf with a total order.
    Float(Float),
    /// Text leaf.
    Str(String),
    /// Byte-string leaf.
    Bytes(Vec<u8>),
}

impl Leaf {
    /// Textual representation compared by the traversal comparator.
    ///
    /// Strings are single-quoted so that `'1'` and `1` never collide.
    pub fn repr(&self) -> String {
        match self {
            Leaf::None => "null".to_string(),
            Leaf::Bool(b) => b.to_string(),
            Leaf::Int(i) => i.to_string(),
            Leaf::Float(f) => format!("{:?}", f.0),
            Leaf::Str(s) => quote_str(s),
            Leaf::Bytes(b) => quote_bytes(b),
        }
    }

    /// Text used as a path segment: strings unquoted, everything else as [`Leaf::repr`].
    pub fn text(&self) -> String {
        match self {
            Leaf::Str(s) => s.clone(),
            other => other.repr(),
        }
    }

    /// Name of the leaf's type as shown in stand-ins and markers.
    pub fn type_name(&self) -> &'static str {
        match self {
            Leaf::None => "none",
            Leaf::Bool(_) => "bool",
            Leaf::Int(_) => "int",
            Leaf::Float(_) => "float",
            Leaf::Str(_) => "str",
            Leaf::Bytes(_) => "bytes",
        }
    }
}

fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push_str("b'");
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('\'');
    out
}

/// `f64` with bit-pattern equality and `total_cmp` ordering, so frozen trees
/// can be `Eq`, `Ord` and `Hash`.
#[derive(Debug, Clone, Copy)]
pub struct Float(pub f64);

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Float {}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Allocation identity of a shared value. Only meaningful while the graph is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    fn of<T: ?Sized>(ptr: *const T) -> Self {
        Identity(ptr as *const () as usize)
    }
}

/// A type declaration: name, fixed attribute names (slots) and base classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    name: String,
    slots: Vec<String>,
    bases: Vec<Rc<Class>>,
}

impl Class {
    /// Declares a class without slots or bases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
            bases: Vec::new(),
        }
    }

    /// Adds fixed attribute names.
    pub fn with_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots.extend(slots.into_iter().map(Into::into));
        self
    }

    /// Adds a base class; bases are searched left to right.
    pub fn with_base(mut self, base: Rc<Class>) -> Self {
        self.bases.push(base);
        self
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slots declared directly on this class.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// This class followed by its ancestors, depth-first, each class once.
    pub fn hierarchy(&self) -> Vec<&Class> {
        let mut out: Vec<&Class> = Vec::new();
        let mut stack: Vec<&Class> = vec![self];
        while let Some(class) = stack.pop() {
            if out.iter().any(|seen| std::ptr::eq(*seen, class)) {
                continue;
            }
            out.push(class);
            for base in class.bases.iter().rev() {
                stack.push(base);
            }
        }
        out
    }

    /// True if any class in the hierarchy declares a slot.
    pub fn declares_slots(&self) -> bool {
        self.hierarchy().iter().any(|class| !class.slots.is_empty())
    }

    fn declares(&self, name: &str) -> bool {
        self.hierarchy()
            .iter()
            .any(|class| class.slots.iter().any(|slot| slot == name))
    }
}

/// Instance of a [`Class`].
///
/// An object owns an optional dynamic attribute dictionary and the values of
/// its declared slots. Classes that declare slots get no dictionary unless
/// [`Object::with_dict`] asks for one.
#[derive(Debug, Clone)]
pub struct Object {
    class: Rc<Class>,
    dict: Option<Vec<(String, Value)>>,
    slot_values: Vec<(String, Value)>,
}

impl Object {
    /// Creates an empty instance.
    pub fn new(class: Rc<Class>) -> Self {
        let dict = if class.declares_slots() {
            None
        } else {
            Some(Vec::new())
        };
        Self {
            class,
            dict,
            slot_values: Vec::new(),
        }
    }

    /// Ensures the instance has a dynamic attribute dictionary.
    pub fn with_dict(mut self) -> Self {
        if self.dict.is_none() {
            self.dict = Some(Vec::new());
        }
        self
    }

    /// Builder form of [`Object::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Assigns an attribute. Declared slots are stored as slots, anything
    /// else goes to the dictionary. Returns `false` when the object has
    /// neither a matching slot nor a dictionary.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        let name = name.into();
        let value = value.into();
        if self.class.declares(&name) {
            upsert(&mut self.slot_values, name, value);
            return true;
        }
        match self.dict.as_mut() {
            Some(dict) => {
                upsert(dict, name, value);
                true
            }
            None => false,
        }
    }

    /// Attribute lookup: slots first, then the dictionary.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.slot_values
            .iter()
            .chain(self.dict.iter().flatten())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// The instance's class.
    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    /// Dynamic attributes in assignment order, if the object has a dictionary.
    pub fn dict(&self) -> Option<&[(String, Value)]> {
        self.dict.as_deref()
    }
}

fn upsert(entries: &mut Vec<(String, Value)>, name: String, value: Value) {
    match entries.iter_mut().find(|(key, _)| *key == name) {
        Some(entry) => entry.1 = value,
        None => entries.push((name, value)),
    }
}

/// A value the classifier cannot look into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    type_name: String,
    repr: Option<String>,
}

impl Opaque {
    /// Creates an opaque value, optionally with its own textual form.
    pub fn new(type_name: impl Into<String>, repr: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            repr,
        }
    }

    /// Type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// String form used when stringifying.
    pub fn text(&self) -> String {
        self.repr
            .clone()
            .unwrap_or_else(|| format!("<{} object>", self.type_name))
    }
}

/// Capability implemented by domain types that want to be frozen, dumped or
/// diffed: describe yourself as a type name plus ordered named fields.
pub trait Describe {
    /// Type name shown in dumps.
    fn type_name(&self) -> String;

    /// Fields in declaration order.
    fn fields(&self) -> Vec<(String, Value)>;
}

/// Traversal input: a leaf or a shared node.
#[derive(Clone)]
pub enum Value {
    /// Primitive leaf.
    Leaf(Leaf),
    /// Mutable ordered sequence.
    List(Rc<RefCell<Vec<Value>>>),
    /// Immutable ordered sequence.
    Tuple(Rc<[Value]>),
    /// Unordered collection, kept in insertion order.
    Set(Rc<RefCell<Vec<Value>>>),
    /// Key/value mapping in insertion order.
    Map(Rc<RefCell<Vec<(Value, Value)>>>),
    /// Attribute-bearing object.
    Object(Rc<RefCell<Object>>),
    /// Unrecognised value.
    Opaque(Rc<Opaque>),
}

impl Value {
    /// The `None` leaf.
    pub fn none() -> Self {
        Value::Leaf(Leaf::None)
    }

    /// Byte-string leaf.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Leaf(Leaf::Bytes(bytes.into()))
    }

    /// New list.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(Rc::new(RefCell::new(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    /// New tuple.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// New set.
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Set(Rc::new(RefCell::new(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    /// New mapping.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(Rc::new(RefCell::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )))
    }

    /// Wraps an object.
    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    /// New opaque value.
    pub fn opaque(type_name: impl Into<String>, repr: Option<String>) -> Self {
        Value::Opaque(Rc::new(Opaque::new(type_name, repr)))
    }

    /// Adapts a [`Describe`] implementor into an object with a dictionary.
    pub fn describe<T: Describe + ?Sized>(item: &T) -> Self {
        let class = Rc::new(Class::new(item.type_name()));
        let mut object = Object::new(class);
        for (name, value) in item.fields() {
            object.set(name, value);
        }
        Value::object(object)
    }

    /// Appends to a list or set. Returns `false` for other variants.
    pub fn push(&self, item: impl Into<Value>) -> bool {
        match self {
            Value::List(items) | Value::Set(items) => {
                items.borrow_mut().push(item.into());
                true
            }
            _ => false,
        }
    }

    /// Inserts into a mapping, or assigns an attribute when the key is a
    /// string and `self` is an object. Returns `false` otherwise.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> bool {
        let key = key.into();
        match self {
            Value::Map(entries) => {
                let value = value.into();
                let mut entries = entries.borrow_mut();
                match entries.iter_mut().find(|(k, _)| same_key(k, &key)) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
                true
            }
            Value::Object(object) => match key {
                Value::Leaf(Leaf::Str(name)) => object.borrow_mut().set(name, value),
                _ => false,
            },
            _ => false,
        }
    }

    /// Identity of shared nodes; `None` for leaves.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Leaf(_) => None,
            Value::List(rc) | Value::Set(rc) => Some(Identity::of(Rc::as_ptr(rc))),
            Value::Tuple(rc) => Some(Identity::of(Rc::as_ptr(rc))),
            Value::Map(rc) => Some(Identity::of(Rc::as_ptr(rc))),
            Value::Object(rc) => Some(Identity::of(Rc::as_ptr(rc))),
            Value::Opaque(rc) => Some(Identity::of(Rc::as_ptr(rc))),
        }
    }

    /// Type name shown in stand-ins and dump markers.
    pub fn type_name(&self) -> String {
        match self {
            Value::Leaf(leaf) => leaf.type_name().to_string(),
            Value::List(_) => "list".to_string(),
            Value::Tuple(_) => "tuple".to_string(),
            Value::Set(_) => "set".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Object(object) => object.borrow().class().name().to_string(),
            Value::Opaque(opaque) => opaque.type_name().to_string(),
        }
    }

    /// String form of a value nothing can be extracted from.
    pub fn opaque_text(&self) -> String {
        match self {
            Value::Leaf(leaf) => leaf.text(),
            Value::Opaque(opaque) => opaque.text(),
            other => format!("<{} object>", other.type_name()),
        }
    }
}

fn same_key(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Leaf(x), Value::Leaf(y)) => x == y,
        _ => a.identity() == b.identity(),
    }
}

impl fmt::Debug for Value {
    // Shallow on purpose: graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Leaf(leaf) => write!(f, "{}", leaf.repr()),
            Value::Opaque(opaque) => write!(f, "{}", opaque.text()),
            other => write!(f, "<{} {:?}>", other.type_name(), other.identity()),
        }
    }
}

impl From<Leaf> for Value {
    fn from(leaf: Leaf) -> Self {
        Value::Leaf(leaf)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Leaf(Leaf::Bool(b))
    }
}

macro_rules! int_into_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(i: $ty) -> Self {
                    Value::Leaf(Leaf::Int(i64::from(i)))
                }
            }
        )*
    };
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Leaf(Leaf::Float(Float(f)))
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Leaf(Leaf::Float(Float(f64::from(f))))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Leaf(Leaf::Str(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Leaf(Leaf::Str(s))
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or_else(Value::none, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::map(map)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::none(),
            Json::Bool(b) => Value::from(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::from(i),
                None => Value::from(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::from(s.as_str()),
            Json::Array(items) => Value::list(items.iter().map(Value::from)),
            Json::Object(map) => Value::map(
                map.iter()
                    .map(|(key, value)| (Value::from(key.as_str()), Value::from(value))),
            ),
        }
    }
}

impl From<&Frozen> for Value {
    fn from(frozen: &Frozen) -> Self {
        match frozen {
            Frozen::Leaf(leaf) => Value::Leaf(leaf.clone()),
            Frozen::Opaque(reference) => reference.value().clone(),
            Frozen::Tuple(children) => Value::tuple(children.iter().map(Value::from)),
            Frozen::Items(entries) => Value::map(entries.iter().map(|entry| match entry.as_pair() {
                Some((key, value)) => (Value::from(key), Value::from(value)),
                None => (Value::from(entry), Value::none()),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_lists_each_class_once() {
        let root = Rc::new(Class::new("Root").with_slots(["r"]));
        let left = Rc::new(Class::new("Left").with_base(root.clone()));
        let right = Rc::new(Class::new("Right").with_base(root));
        let leaf = Class::new("Leaf").with_base(left).with_base(right);
        let names: Vec<&str> = leaf.hierarchy().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Leaf", "Left", "Root", "Right"]);
        assert!(leaf.declares_slots());
    }

    #[test]
    fn slotted_object_rejects_unknown_attribute() {
        let class = Rc::new(Class::new("Point").with_slots(["x", "y"]));
        let mut point = Object::new(class);
        assert!(point.set("x", 1));
        assert!(!point.set("z", 3));
        assert!(point.dict().is_none());
        assert!(point.with_dict().set("z", 3));
    }

    #[test]
    fn self_referential_list_is_constructible() {
        let list = Value::list(Vec::<Value>::new());
        assert!(list.push(list.clone()));
        match &list {
            Value::List(items) => {
                assert_eq!(items.borrow()[0].identity(), list.identity());
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn leaf_repr_quotes_strings() {
        assert_eq!(Leaf::Str("a'b".into()).repr(), r"'a\'b'");
        assert_eq!(Leaf::Int(3).repr(), "3");
        assert_eq!(Leaf::Bytes(vec![b'a', 0]).repr(), r"b'a\x00'");
        assert_eq!(Leaf::Str("a".into()).text(), "a");
    }

    #[test]
    fn json_documents_become_lists_and_maps() {
        let json = serde_json::json!({"a": [1, 2.5, null, true]});
        match Value::from(&json) {
            Value::Map(entries) => {
                let entries = entries.borrow();
                assert_eq!(entries.len(), 1);
                assert!(matches!(&entries[0].1, Value::List(items) if items.borrow().len() == 4));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
