use indoc::indoc;

use crate::ast::NodeKind;
use crate::diagnostics::{DiagnosticKind, Severity};
use crate::sema::ScopeId;
use crate::test_utils::{analyzed_fail_fast, analyzed_no_opt, codes, expect_clean, find_nodes};

#[test]
fn redefinition_in_the_same_scope() {
    let unit = analyzed_fail_fast("function f() { let x; let x; }");

    assert_eq!(codes(&unit), vec![3001]);
    assert_eq!(unit.status, Err(DiagnosticKind::SymbolRedefined));

    let diag = unit.diagnostics.iter().next().unwrap();
    assert_eq!(diag.notes.len(), 1, "chained note points at the original");
    assert_eq!(diag.notes[0].message, "Original defined in");
    // The note points at the first `let x`, which sits before the error site.
    let note_range = diag.notes[0].range.expect("note has a range");
    let err_range = diag.range().expect("error has a range");
    assert!(note_range.start() < err_range.start());
}

#[test]
fn subroutine_redefinition() {
    let unit = analyzed_fail_fast(indoc! {"
        sub go() { outbox(1); }
        sub go() { outbox(2); }
    "});
    assert_eq!(codes(&unit), vec![3001]);
}

#[test]
fn undefined_variable_reference() {
    let unit = analyzed_fail_fast("sub start() { outbox(x); }");
    assert_eq!(codes(&unit), vec![3002]);
    assert_eq!(unit.status, Err(DiagnosticKind::SymbolUndefined));
}

#[test]
fn undefined_subroutine_invocation() {
    let unit = analyzed_fail_fast("sub start() { launch(); }");
    assert_eq!(codes(&unit), vec![3002]);
}

#[test]
fn forward_reference_resolves() {
    expect_clean(indoc! {"
        sub start() { greet('h'); }
        sub greet(c) { outbox(c); }
    "});
}

#[test]
fn signature_mismatch_with_forward_reference() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() { greet(1); }
        sub greet() { outbox('h'); }
    "});
    assert_eq!(codes(&unit), vec![3005]);

    let diag = unit.diagnostics.iter().next().unwrap();
    assert!(diag.message().contains("invoked as 'greet(arg)'"));
    assert!(diag.message().contains("defined as 'sub greet()'"));
    assert_eq!(diag.notes[0].message, "originally defined as");
}

#[test]
fn builtin_signature_mismatch_points_at_stdlib() {
    let unit = analyzed_fail_fast("sub start() { inbox(1); }");
    assert_eq!(codes(&unit), vec![3005]);

    let diag = unit.diagnostics.iter().next().unwrap();
    assert_eq!(diag.notes[0].file.as_deref(), Some("@stdlib"));
    assert_eq!(diag.notes[0].range, None);
}

#[test]
fn missing_outbox_argument_is_a_mismatch() {
    let unit = analyzed_fail_fast("sub start() { outbox(); }");
    assert_eq!(codes(&unit), vec![3005]);
}

#[test]
fn shadowing_warns_but_does_not_fail() {
    let unit = analyzed_no_opt(indoc! {"
        let g = 1;
        sub start() {
            let g = 2;
            outbox(g);
        }
    "});
    assert_eq!(codes(&unit), vec![3006]);
    assert_eq!(unit.status, Ok(()));
    let diag = unit.diagnostics.iter().next().unwrap();
    assert_eq!(diag.severity(), Severity::Warning);
    assert_eq!(diag.notes[0].message, "Originally defined in");
}

#[test]
fn sibling_scopes_may_reuse_names() {
    expect_clean(indoc! {"
        sub start() {
            if (inbox()) { let t = 1; outbox(t); }
            else { let t = 2; outbox(t); }
        }
    "});
}

#[test]
fn for_scope_covers_init_cond_update_and_body() {
    expect_clean(indoc! {"
        sub start() {
            for (let i = 0, i < 3, ++i) {
                outbox(i);
            }
        }
    "});
}

#[test]
fn loop_local_is_invisible_after_the_loop() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            for (let i = 0, i < 3, ++i) { outbox(i); }
            outbox(i);
        }
    "});
    assert_eq!(codes(&unit), vec![3002]);
}

#[test]
fn every_reachable_node_is_scope_annotated() {
    let unit = analyzed_no_opt(indoc! {"
        sub start() {
            let x = inbox();
            if (x) { outbox(x); } else { outbox(0); }
            while (x < 3) { outbox(1); }
        }
    "});
    assert_eq!(unit.status, Ok(()));

    for id in crate::test_utils::find_nodes(&unit.ast, |_| true) {
        let info = unit
            .ast
            .scope_info(id)
            .unwrap_or_else(|| panic!("missing scope info on {:?}", unit.ast.kind(id)));
        assert!(
            info.id.as_str() == "glb" || info.id.as_str().starts_with("glb."),
            "scope id rooted at glb: {}",
            info.id
        );
    }
}

#[test]
fn ancestor_scopes_exist_in_the_symbol_table() {
    let unit = expect_clean(indoc! {"
        sub start() {
            let x = 1;
            if (x) { { let y = x; outbox(y); } }
        }
    "});

    for id in find_nodes(&unit.ast, |_| true) {
        let info = unit.ast.scope_info(id).expect("scope info attached");
        for ancestor in info.id.ancestors() {
            assert!(
                unit.symbols.has_scope(&ancestor),
                "ancestor {ancestor} of {} missing from the symbol table",
                info.id
            );
        }
    }
}

#[test]
fn uses_bind_to_the_innermost_symbol() {
    let unit = analyzed_no_opt(indoc! {"
        let v = 1;
        sub start() {
            let v = 2;
            outbox(v);
        }
    "});

    let access = find_nodes(&unit.ast, |k| matches!(k, NodeKind::VariableAccess { .. }))[0];
    let symbol = unit.ast.symbol(access).expect("access is bound");
    assert_eq!(
        unit.symbols.symbol(symbol).scope,
        ScopeId::from_string("glb.start")
    );
}

#[test]
fn definition_sites_are_alive() {
    let unit = expect_clean(indoc! {"
        sub start() {
            let x = 1;
            outbox(x);
        }
    "});

    for id in find_nodes(&unit.ast, |_| true) {
        if let Some(symbol) = unit.ast.symbol(id) {
            let symbol = unit.symbols.symbol(symbol);
            if let Some(site) = symbol.def_site {
                // The definition site is a live node naming the same symbol.
                assert_eq!(unit.ast.kind(site).name(), Some(symbol.name.as_str()));
            }
        }
    }
}
