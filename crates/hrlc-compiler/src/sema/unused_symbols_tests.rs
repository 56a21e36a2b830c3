use indoc::indoc;

use crate::ast::NodeKind;
use crate::diagnostics::Severity;
use crate::test_utils::{analyzed, body_statements, codes, find_nodes};

#[test]
fn unread_local_is_removed_with_a_warning() {
    let unit = analyzed(indoc! {"
        sub start() {
            let ghost;
            outbox(1);
        }
    "});

    assert_eq!(codes(&unit), vec![3014]);
    let diag = unit.diagnostics.iter().next().unwrap();
    assert_eq!(diag.severity(), Severity::Warning);
    assert!(diag.message().contains("'ghost' defined but not used"));
    assert_eq!(unit.status, Ok(()));

    let statements = body_statements(&unit, "start");
    assert_eq!(statements.len(), 1);
    assert!(matches!(
        unit.ast.kind(statements[0]),
        NodeKind::Invocation { .. }
    ));
}

#[test]
fn initialized_but_unread_local_is_removed() {
    let unit = analyzed(indoc! {"
        sub start() {
            let ghost = 42;
            outbox(1);
        }
    "});
    assert_eq!(codes(&unit), vec![3014]);
    assert_eq!(body_statements(&unit, "start").len(), 1);
}

#[test]
fn assignment_without_read_counts_as_a_use() {
    let unit = analyzed(indoc! {"
        sub start() {
            let x;
            x = inbox();
        }
    "});
    assert!(unit.diagnostics.is_empty());
    assert_eq!(body_statements(&unit, "start").len(), 2);
}

#[test]
fn reads_inside_an_initializer_keep_the_read_variable() {
    let unit = analyzed(indoc! {"
        sub start() {
            let a = inbox();
            let b = a + 1;
            outbox(b);
        }
    "});
    assert!(unit.diagnostics.is_empty());
    assert_eq!(body_statements(&unit, "start").len(), 3);
}

#[test]
fn increment_counts_as_a_use() {
    let unit = analyzed(indoc! {"
        sub start() {
            let x = 0;
            outbox(++x);
        }
    "});
    assert!(unit.diagnostics.is_empty());
}

#[test]
fn unused_globals_are_kept() {
    let unit = analyzed(indoc! {"
        let exported = 7;
        sub start() { outbox(1); }
    "});

    assert!(unit.diagnostics.is_empty());
    let globals = find_nodes(&unit.ast, |k| {
        matches!(k, NodeKind::VariableDeclaration { name, .. } if name == "exported")
    });
    assert_eq!(globals.len(), 1);
}

#[test]
fn used_loop_variable_is_kept() {
    let unit = analyzed(indoc! {"
        sub start() {
            for (let i = 0, i < 3, ++i) { outbox(i); }
        }
    "});
    assert!(unit.diagnostics.is_empty());
}
