//! Debug renderings of the AST: an indented text dump for tests and the
//! CLI, and a Graphviz export the pass manager writes after passes.

use std::fmt::Write;

use super::{Ast, AttrKind, AttrValue, NodeId, NodeKind};
use crate::sema::SymbolTable;

/// Indented one-line-per-node rendering.
pub fn text_dump(ast: &Ast) -> String {
    let mut out = String::new();
    dump_node(ast, ast.root(), 0, &mut out);
    out
}

fn dump_node(ast: &Ast, id: NodeId, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&node_label(ast, id));
    out.push('\n');
    for child in ast.child_ids(id) {
        dump_node(ast, child, depth + 1, out);
    }
}

fn node_label(ast: &Ast, id: NodeId) -> String {
    let kind = ast.kind(id);
    match kind {
        NodeKind::Integer { value, is_char } => {
            if *is_char {
                match char::from_u32(*value as u32) {
                    Some(c) => format!("Integer '{c}'"),
                    None => format!("Integer '\\{value}'"),
                }
            } else {
                format!("Integer {value}")
            }
        }
        NodeKind::Boolean { value } => format!("Boolean {value}"),
        NodeKind::Binary { op, .. } => format!("Binary {}", op.symbol()),
        NodeKind::Import { module } => format!("Import '{module}'"),
        NodeKind::Subprocedure {
            name, parameter, ..
        }
        | NodeKind::Function {
            name, parameter, ..
        } => match parameter {
            Some(param) => format!("{} '{name}' param='{param}'", kind.type_name()),
            None => format!("{} '{name}'", kind.type_name()),
        },
        _ => match kind.name() {
            Some(name) => format!("{} '{name}'", kind.type_name()),
            None => kind.type_name().to_string(),
        },
    }
}

/// Graphviz rendering with an attribute filter: only the listed attribute
/// kinds appear in node labels.
pub fn graphviz(ast: &Ast, symbols: Option<&SymbolTable>, attrs: &[AttrKind]) -> String {
    let mut out = String::from("digraph ast {\n    node [shape=box, fontname=\"monospace\"];\n");
    emit_vertex(ast, ast.root(), symbols, attrs, &mut out);
    out.push_str("}\n");
    out
}

fn emit_vertex(
    ast: &Ast,
    id: NodeId,
    symbols: Option<&SymbolTable>,
    attrs: &[AttrKind],
    out: &mut String,
) {
    let mut label = node_label(ast, id);
    for attr in ast.node(id).attrs.iter() {
        if !attrs.contains(&attr.kind()) {
            continue;
        }
        label.push_str("\\n");
        label.push_str(&attr_label(attr, symbols));
    }
    let _ = writeln!(out, "    n{} [label=\"{}\"];", id.as_u32(), escape(&label));
    for child in ast.child_ids(id) {
        let _ = writeln!(out, "    n{} -> n{};", id.as_u32(), child.as_u32());
        emit_vertex(ast, child, symbols, attrs, out);
    }
}

fn attr_label(attr: &AttrValue, symbols: Option<&SymbolTable>) -> String {
    match attr {
        AttrValue::Symbol(id) => match symbols {
            Some(table) => format!("sym: {}", table.symbol(*id).name),
            None => "sym".to_string(),
        },
        AttrValue::ScopeInfo(info) => format!("scope: {}", info.id),
        AttrValue::ConstFold(folded) => format!("const: {}", folded.value),
        AttrValue::ControlContext(target) => format!("ctx: n{}", target.as_u32()),
    }
}

fn escape(label: &str) -> String {
    label.replace('"', "\\\"")
}
