//! Narrow pretty printing: one leaf per line.
//!
//! Nested structure produces one line per leaf so that a line-based unified
//! diff points at individual leaves. A child is indented to the column just
//! after its parent's opening bracket, and closing brackets are attached to
//! the last child.

use crate::dump::Dumped;
use crate::frozen::Frozen;

/// Renders a frozen tree one leaf per line.
pub fn vformat(node: &Frozen) -> String {
    let mut out = String::new();
    write_frozen(node, 0, &mut out);
    out
}

/// Renders an annotated dump one leaf per line.
pub fn vformat_dump(node: &Dumped) -> String {
    let mut out = String::new();
    write_dumped(node, 0, &mut out);
    out
}

fn separator(indent: usize, out: &mut String) {
    out.push_str(",\n");
    out.extend(std::iter::repeat(' ').take(indent));
}

fn write_frozen(node: &Frozen, indent: usize, out: &mut String) {
    let children = match node.children() {
        Some(children) => children,
        None => {
            out.push_str(&node.repr());
            return;
        }
    };
    out.push('(');
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            separator(indent + 1, out);
        }
        write_frozen(child, indent + 1, out);
    }
    if children.len() == 1 {
        out.push(',');
    }
    out.push(')');
}

fn write_sequence(items: &[Dumped], brackets: (char, char), indent: usize, out: &mut String) {
    out.push(brackets.0);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            separator(indent + 1, out);
        }
        write_dumped(item, indent + 1, out);
    }
    if brackets.0 == '(' && items.len() == 1 {
        out.push(',');
    }
    out.push(brackets.1);
}

fn write_dumped(node: &Dumped, indent: usize, out: &mut String) {
    match node {
        Dumped::Leaf(_) | Dumped::Marker(_) | Dumped::Opaque(_) => out.push_str(&node.to_string()),
        Dumped::Annotated(items) | Dumped::List(items) => write_sequence(items, ('[', ']'), indent, out),
        Dumped::Tuple(items) => write_sequence(items, ('(', ')'), indent, out),
        Dumped::Mapping(entries) => {
            out.push('{');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    separator(indent + 1, out);
                }
                let key = key.to_string();
                out.push_str(&key);
                out.push_str(": ");
                write_dumped(value, indent + 1 + key.chars().count() + 2, out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::dump;
    use crate::value::Value;

    #[test]
    fn nested_tuples_indent_one_column_per_level() {
        let node = Frozen::tuple([
            Frozen::int(1),
            Frozen::tuple([Frozen::str("a"), Frozen::str("b")]),
            Frozen::tuple([]),
        ]);
        assert_eq!(vformat(&node), "(1,\n ('a',\n  'b'),\n ())");
    }

    #[test]
    fn single_element_tuple_keeps_comma() {
        let node = Frozen::tuple([Frozen::tuple([Frozen::int(3)])]);
        assert_eq!(vformat(&node), "((3,),)");
    }

    #[test]
    fn leaf_renders_alone() {
        assert_eq!(vformat(&Frozen::str("x")), "'x'");
    }

    #[test]
    fn mapping_values_align_after_key() {
        let value = Value::map([("a", Value::list([1, 2]))]);
        assert_eq!(
            vformat_dump(&dump(&value)),
            "[\"<map>\",\n {'a': [1,\n        2]}]"
        );
    }
}
