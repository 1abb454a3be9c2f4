//! Indented tree dump, consumed by `ferrocc_driver`'s `--debug-ast` flag.

use crate::{Arena, NodeId, Payload};
use std::fmt::Write as _;

/// Renders `root`'s subtree as an indented tree, one node per line, with
/// each node's kind and a short rendering of its salient payload data.
pub fn dump(arena: &Arena, root: NodeId) -> String {
    let mut out = String::new();
    dump_node(arena, root, 0, &mut out);
    out
}

fn dump_node(arena: &Arena, id: NodeId, depth: usize, out: &mut String) {
    let node = arena.get(id);
    let _ = writeln!(
        out,
        "{:indent$}{:?}{payload} @ {loc}",
        "",
        node.kind,
        indent = depth * 2,
        payload = payload_suffix(&node.payload),
        loc = node.location,
    );
    for &child in &node.children {
        dump_node(arena, child, depth + 1, out);
    }
}

fn payload_suffix(payload: &Payload) -> String {
    match payload {
        Payload::None => String::new(),
        Payload::Name(name) => format!(" `{name}`"),
        Payload::Integer { value, is_unsigned, long_count } => {
            format!(" {value}{}{}", if *is_unsigned { "u" } else { "" }, "l".repeat(*long_count as usize))
        }
        Payload::Float { value, is_float } => {
            format!(" {value}{}", if *is_float { "f" } else { "" })
        }
        Payload::Str(s) => format!(" {s:?}"),
        Payload::Char(c) => format!(" '{}'", char::from_u32(*c).unwrap_or('\u{fffd}')),
        Payload::Decl { name, .. } => format!(" `{name}`"),
        Payload::Tag { name } => name.as_deref().map(|n| format!(" `{n}`")).unwrap_or_default(),
        Payload::Field { name } => format!(" `{name}`"),
        Payload::EnumConstant { name } => format!(" `{name}`"),
        Payload::Type { name, .. } => format!(" `{name}`"),
        Payload::ArrayType { is_variable_length } => {
            if *is_variable_length { " (VLA)".to_string() } else { String::new() }
        }
        Payload::FunctionType { is_variadic } => {
            if *is_variadic { " (variadic)".to_string() } else { String::new() }
        }
        Payload::Binary { op } => format!(" `{op}`"),
        Payload::Unary { op } => format!(" `{op}`"),
        Payload::Member { field } => format!(" `.{field}`"),
        Payload::Call => String::new(),
        Payload::TypeOperand => String::new(),
        Payload::Conditional => String::new(),
        Payload::Designated { field } => field.as_deref().map(|f| format!(" `.{f}`")).unwrap_or_default(),
        Payload::GenericAssoc { is_default } => {
            if *is_default { " default".to_string() } else { String::new() }
        }
        Payload::StaticAssert { message } => format!(" {message:?}"),
        Payload::Asm { template, .. } => format!(" {template:?}"),
        Payload::Attribute { raw } => format!(" ({raw})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeKind;
    use ferrocc_diag::SourceLocation;

    #[test]
    fn dump_renders_one_line_per_node_with_indentation() {
        let mut arena = Arena::new();
        let loc = SourceLocation::new(0, 1, 1, 0);
        let lit = arena.push(
            NodeKind::IntegerLiteral,
            loc,
            Payload::Integer { value: 42, is_unsigned: false, long_count: 0 },
        );
        let ret = arena.push(NodeKind::ReturnStmt, loc, Payload::None);
        arena.add_child(ret, lit);

        let text = dump(&arena, ret);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ReturnStmt"));
        assert!(lines[1].starts_with("  IntegerLiteral 42"));
    }
}
