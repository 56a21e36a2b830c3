//! Shared helpers for the in-crate test modules.

use crate::{AnalyzedUnit, CompileOptions, compile};

pub const TEST_FILE: &str = "test.hrl";

/// Full pipeline with optimization, collecting every diagnostic.
pub fn analyzed(source: &str) -> AnalyzedUnit {
    compile(
        TEST_FILE,
        source,
        CompileOptions {
            optimize: true,
            fail_fast: false,
        },
    )
    .expect("source parses")
}

/// Final phase only (no optimistic passes).
pub fn analyzed_no_opt(source: &str) -> AnalyzedUnit {
    compile(
        TEST_FILE,
        source,
        CompileOptions {
            optimize: false,
            fail_fast: false,
        },
    )
    .expect("source parses")
}

/// Full pipeline in fail-fast mode.
pub fn analyzed_fail_fast(source: &str) -> AnalyzedUnit {
    compile(TEST_FILE, source, CompileOptions::default()).expect("source parses")
}

/// Diagnostic codes in emission order.
pub fn codes(unit: &AnalyzedUnit) -> Vec<u16> {
    unit.diagnostics.iter().map(|d| d.kind().code()).collect()
}

/// Nodes reachable from the root matching a predicate, in preorder.
pub fn find_nodes(
    ast: &crate::ast::Ast,
    pred: impl Fn(&crate::ast::NodeKind) -> bool,
) -> Vec<crate::ast::NodeId> {
    fn collect(
        ast: &crate::ast::Ast,
        id: crate::ast::NodeId,
        pred: &impl Fn(&crate::ast::NodeKind) -> bool,
        out: &mut Vec<crate::ast::NodeId>,
    ) {
        if pred(ast.kind(id)) {
            out.push(id);
        }
        for child in ast.child_ids(id) {
            collect(ast, child, pred, out);
        }
    }
    let mut out = Vec::new();
    collect(ast, ast.root(), &pred, &mut out);
    out
}

/// The single node matching a predicate.
pub fn find_node(
    ast: &crate::ast::Ast,
    pred: impl Fn(&crate::ast::NodeKind) -> bool,
) -> crate::ast::NodeId {
    let found = find_nodes(ast, pred);
    assert_eq!(found.len(), 1, "expected exactly one matching node");
    found[0]
}

/// Statement ids of the named subroutine's body block.
pub fn body_statements(unit: &AnalyzedUnit, name: &str) -> Vec<crate::ast::NodeId> {
    use crate::ast::NodeKind;
    let def = find_node(&unit.ast, |k| {
        k.is_subroutine() && k.name() == Some(name)
    });
    let body = match unit.ast.kind(def) {
        NodeKind::Subprocedure { body, .. } | NodeKind::Function { body, .. } => *body,
        _ => unreachable!(),
    };
    match unit.ast.kind(body) {
        NodeKind::Block { statements } => statements.clone(),
        _ => vec![body],
    }
}

/// Asserts the unit compiled without diagnostics and returns it.
pub fn expect_clean(source: &str) -> AnalyzedUnit {
    let unit = analyzed(source);
    assert!(
        unit.is_valid() && unit.diagnostics.is_empty(),
        "expected a clean compile, got:\n{}",
        unit.printer().render()
    );
    unit
}
