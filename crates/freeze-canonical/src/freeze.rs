//! The canonicalizer: rewrites any [`Value`] into a [`Frozen`] tree.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::classify::{classify, Shape};
use crate::frozen::{Frozen, OpaqueRef};
use crate::items::{value_children, value_items};
use crate::registry::Registry;
use crate::value::{Leaf, Value};

/// How revisited containers are detected while freezing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleCheck {
    /// No detection; a cyclic input does not terminate.
    Off,
    /// Replace a container only when it is reached again from inside itself.
    #[default]
    Ancestors,
    /// Replace every container reached a second time, shared or cyclic.
    Visited,
}

/// Canonicalizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FreezeOptions {
    /// Replace values that are not primitive leaves by their string form.
    pub stringify: bool,
    /// Revisit detection.
    pub cycles: CycleCheck,
}

/// Canonicalizer that turns values into frozen trees.
#[derive(Debug, Clone, Default)]
pub struct Freezer {
    options: FreezeOptions,
}

impl Freezer {
    /// Creates a canonicalizer for the provided options.
    pub fn new(options: FreezeOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &FreezeOptions {
        &self.options
    }

    /// Freezes one value. Identity bookkeeping lives only for this call.
    pub fn freeze(&self, value: &Value) -> Frozen {
        let mut registry = Registry::new();
        self.freeze_node(value, &mut registry)
    }

    fn freeze_node(&self, value: &Value, registry: &mut Registry) -> Frozen {
        if let Value::Leaf(leaf) = value {
            return Frozen::Leaf(leaf.clone());
        }
        let token = match (self.options.cycles, value.identity()) {
            (CycleCheck::Off, _) | (_, None) => None,
            (_, Some(_)) if !is_guarded(value) => None,
            (_, Some(identity)) => Some(registry.token(identity)),
        };
        if let Some(token) = token {
            let revisit = match self.options.cycles {
                CycleCheck::Visited => !registry.visit(token),
                CycleCheck::Ancestors => !registry.enter(token),
                CycleCheck::Off => false,
            };
            if revisit {
                trace!(token, type_name = %value.type_name(), "replacing revisited container");
                return Frozen::Leaf(Leaf::Str(stand_in(value, token)));
            }
        }
        let frozen = self.freeze_shape(value, registry);
        if let (Some(token), CycleCheck::Ancestors) = (token, self.options.cycles) {
            registry.leave(token);
        }
        frozen
    }

    fn freeze_shape(&self, value: &Value, registry: &mut Registry) -> Frozen {
        match classify(value) {
            Shape::Slotted | Shape::Mapping => Frozen::Items(
                value_items(value, false)
                    .iter()
                    .map(|(key, item)| {
                        let key = self.freeze_node(key, registry);
                        Frozen::pair(key, self.freeze_node(item, registry))
                    })
                    .collect(),
            ),
            Shape::Sequence => Frozen::Tuple(
                value_children(value)
                    .iter()
                    .map(|child| self.freeze_node(child, registry))
                    .collect(),
            ),
            Shape::Null | Shape::Leaf | Shape::Opaque => {
                if self.options.stringify {
                    Frozen::Leaf(Leaf::Str(value.opaque_text()))
                } else {
                    Frozen::Opaque(OpaqueRef::new(value.clone()))
                }
            }
        }
    }
}

/// Containers that can take part in a cycle. Tuples are immutable and
/// opaque values have no children, so neither needs a stand-in.
fn is_guarded(value: &Value) -> bool {
    matches!(
        value,
        Value::List(_) | Value::Set(_) | Value::Map(_) | Value::Object(_)
    )
}

pub(crate) fn stand_in(value: &Value, token: u64) -> String {
    format!("<{}> at 0x{:X}", value.type_name(), token)
}

/// Freezes with default options: no stringification, back-edge detection.
pub fn freeze(value: &Value) -> Frozen {
    Freezer::default().freeze(value)
}

/// Freezes with stringification so the result holds no live references.
pub fn freeze_stringified(value: &Value) -> Frozen {
    freeze_with(
        value,
        FreezeOptions {
            stringify: true,
            ..FreezeOptions::default()
        },
    )
}

/// Freezes with explicit options.
pub fn freeze_with(value: &Value, options: FreezeOptions) -> Frozen {
    Freezer::new(options).freeze(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_reference_is_kept_in_ancestor_mode() {
        let shared = Value::list([1, 2]);
        let outer = Value::list([shared.clone(), shared]);
        assert_eq!(freeze(&outer).to_string(), "((1, 2), (1, 2))");
    }

    #[test]
    fn shared_reference_becomes_stand_in_in_visited_mode() {
        let shared = Value::list([1, 2]);
        let outer = Value::list([shared.clone(), shared]);
        let options = FreezeOptions {
            stringify: false,
            cycles: CycleCheck::Visited,
        };
        assert_eq!(
            freeze_with(&outer, options).to_string(),
            "((1, 2), '<list> at 0x2')"
        );
    }

    #[test]
    fn cycle_terminates() {
        let list = Value::list(Vec::<Value>::new());
        list.push(list.clone());
        list.push(3);
        assert_eq!(freeze(&list).to_string(), "('<list> at 0x1', 3)");
    }

    #[test]
    fn repeated_tuple_is_not_replaced() {
        let pair = Value::tuple([1, 2]);
        let outer = Value::list([pair.clone(), pair]);
        let options = FreezeOptions {
            stringify: false,
            cycles: CycleCheck::Visited,
        };
        assert_eq!(freeze_with(&outer, options).to_string(), "((1, 2), (1, 2))");
    }

    #[test]
    fn opaque_values_stay_live_unless_stringified() {
        let handle = Value::opaque("socket", None);
        let outer = Value::list([handle.clone()]);
        match freeze(&outer) {
            Frozen::Tuple(children) => {
                assert!(matches!(&children[0], Frozen::Opaque(r) if r.value().identity() == handle.identity()));
            }
            other => panic!("unexpected {}", other),
        }
        assert_eq!(freeze_stringified(&outer).to_string(), "('<socket object>',)");
    }
}
