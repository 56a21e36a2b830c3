use indoc::indoc;

use crate::ast::{Ast, AttrKind, dump};
use crate::diagnostics::DiagnosticKind;
use crate::sema::clear_symbol_table::ClearSymbolTablePass;
use crate::sema::strip_attributes::StripAttributesPass;
use crate::sema::{PassManager, SymbolTable};
use crate::test_utils::{TEST_FILE, analyzed, analyzed_fail_fast, analyzed_no_opt, codes, find_nodes};

/// Scope id and bound symbol name of every reachable node, in preorder.
fn attr_snapshot(ast: &Ast, symbols: &SymbolTable) -> Vec<(String, Option<String>)> {
    find_nodes(ast, |_| true)
        .into_iter()
        .map(|id| {
            let scope = ast
                .scope_info(id)
                .map(|info| info.id.to_string())
                .unwrap_or_default();
            let symbol = ast.symbol(id).map(|s| symbols.symbol(s).name.clone());
            (scope, symbol)
        })
        .collect()
}

#[test]
fn collect_all_gathers_every_error() {
    let unit = analyzed("sub start() { outbox(a); outbox(b); }");
    assert_eq!(codes(&unit), vec![3002, 3002]);
    assert_eq!(unit.status, Err(DiagnosticKind::SymbolUndefined));
}

#[test]
fn fail_fast_stops_after_the_failing_pass() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            outbox(zzz);
            return 1;
        }
    "});
    // The invalid return value never gets checked: symbol analysis fails
    // first and the pipeline stops there.
    assert_eq!(codes(&unit), vec![3002]);
}

#[test]
fn collect_all_reaches_later_passes() {
    let unit = analyzed(indoc! {"
        sub start() {
            outbox(zzz);
            return 1;
        }
    "});
    let codes = codes(&unit);
    assert!(codes.contains(&3002));
    assert!(codes.contains(&3013));
    // The status keeps the first fatal id.
    assert_eq!(unit.status, Err(DiagnosticKind::SymbolUndefined));
}

#[test]
fn diagnostics_keep_global_emission_order() {
    let unit = analyzed(indoc! {"
        let g = 1;
        sub start() {
            let g = 2;
            outbox(g);
            return;
            outbox(0);
        }
    "});
    // Shadow warning from symbol analysis, then dead code from elimination;
    // the final phase re-reports nothing.
    assert_eq!(codes(&unit), vec![3006, 3008]);
}

#[test]
fn disabling_optimization_skips_rewrites() {
    let unit = analyzed_no_opt("sub start() { outbox(1 + 2); }");
    assert_eq!(unit.status, Ok(()));

    let binaries = find_nodes(&unit.ast, |k| {
        matches!(k, crate::ast::NodeKind::Binary { .. })
    });
    assert_eq!(binaries.len(), 1, "no folding without optimization");
    assert!(unit.ast.const_fold(binaries[0]).is_none());
}

#[test]
fn optimization_rewrites_and_reannotates() {
    let unit = analyzed("sub start() { outbox(1 + 2); }");
    assert_eq!(unit.status, Ok(()));
    assert!(
        find_nodes(&unit.ast, |k| matches!(k, crate::ast::NodeKind::Binary { .. })).is_empty()
    );
    // The final phase re-attached symbols after the strip.
    let call = find_nodes(&unit.ast, |k| {
        matches!(k, crate::ast::NodeKind::Invocation { .. })
    })[0];
    assert!(unit.ast.symbol(call).is_some());
}

#[test]
fn final_phase_is_idempotent() {
    let source = indoc! {"
        let base = 3;
        function scaled(n) {
            if (n > 0) { return n * base; }
            return 0;
        }
        sub start() {
            outbox(scaled(inbox()));
        }
    "};
    let unit = analyzed_no_opt(source);
    assert_eq!(unit.status, Ok(()));
    let before = attr_snapshot(&unit.ast, &unit.symbols);

    // Reset the analysis state and run the final phase again over the same
    // tree.
    let mut manager = PassManager::new(unit.ast, TEST_FILE);
    manager.add_pass(Box::new(ClearSymbolTablePass::new()));
    manager.add_pass(Box::new(StripAttributesPass::new(vec![
        AttrKind::Symbol,
        AttrKind::ScopeInfo,
    ])));
    manager.add_default_pipeline(false);
    assert_eq!(manager.run(true), Ok(()));

    let (ast, symbols, diagnostics) = manager.into_artifacts();
    assert!(!diagnostics.has_errors());
    assert_eq!(before, attr_snapshot(&ast, &symbols));
}

#[test]
fn graphviz_dump_carries_filtered_attributes() {
    let unit = analyzed_no_opt("sub start() { let x = 1; outbox(x); }");
    let dot = dump::graphviz(
        &unit.ast,
        Some(&unit.symbols),
        &[AttrKind::Symbol, AttrKind::ScopeInfo],
    );
    assert!(dot.starts_with("digraph ast {"));
    assert!(dot.contains("scope: glb.start"));
    assert!(dot.contains("sym: x"));

    let without_attrs = dump::graphviz(&unit.ast, Some(&unit.symbols), &[]);
    assert!(!without_attrs.contains("scope:"));
}

#[test]
fn clean_program_produces_no_diagnostics() {
    let unit = analyzed(indoc! {"
        init floor[0] = 10;
        sub start() {
            let total = floor[0];
            let n = inbox();
            while (n != 0) {
                total = total + n;
                n = inbox();
            }
            outbox(total);
        }
    "});
    assert!(unit.diagnostics.is_empty());
    assert_eq!(unit.status, Ok(()));
}
