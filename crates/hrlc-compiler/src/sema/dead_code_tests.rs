use indoc::indoc;

use crate::ast::NodeKind;
use crate::diagnostics::Severity;
use crate::test_utils::{analyzed, body_statements, codes};

#[test]
fn statements_after_return_are_dropped() {
    let unit = analyzed("sub start() { return; outbox(1); }");

    assert_eq!(codes(&unit), vec![3008]);
    let diag = unit.diagnostics.iter().next().unwrap();
    assert_eq!(diag.severity(), Severity::Warning);
    assert!(diag.message().contains("end of control flow"));
    assert_eq!(unit.status, Ok(()));

    let statements = body_statements(&unit, "start");
    assert_eq!(statements.len(), 1);
    assert!(matches!(
        unit.ast.kind(statements[0]),
        NodeKind::Return { .. }
    ));
}

#[test]
fn statements_after_break_and_continue_are_dropped() {
    let unit = analyzed(indoc! {"
        sub start() {
            let n = inbox();
            while (n) {
                break;
                outbox(n);
            }
        }
    "});
    assert_eq!(codes(&unit), vec![3008]);
}

#[test]
fn empty_statements_disappear() {
    let unit = analyzed("sub start() { ; outbox(1); ; }");
    assert!(unit.diagnostics.is_empty());

    let statements = body_statements(&unit, "start");
    assert_eq!(statements.len(), 1);
    assert!(matches!(
        unit.ast.kind(statements[0]),
        NodeKind::Invocation { .. }
    ));
}

#[test]
fn constant_true_if_keeps_only_the_then_branch() {
    let unit = analyzed(indoc! {"
        sub start() {
            if (true) { outbox(1); } else { outbox(2); }
        }
    "});

    assert_eq!(codes(&unit), vec![3008]);
    assert!(
        unit.diagnostics
            .iter()
            .next()
            .unwrap()
            .message()
            .contains("constant true condition")
    );

    let statements = body_statements(&unit, "start");
    assert_eq!(statements.len(), 1);
    // The `if` was replaced by the surviving branch block.
    assert!(matches!(unit.ast.kind(statements[0]), NodeKind::Block { .. }));
}

#[test]
fn constant_false_if_without_else_disappears() {
    let unit = analyzed(indoc! {"
        sub start() {
            if (false) { outbox(1); }
            outbox(2);
        }
    "});

    assert_eq!(codes(&unit), vec![3008]);
    let statements = body_statements(&unit, "start");
    assert_eq!(statements.len(), 1);
    assert!(matches!(
        unit.ast.kind(statements[0]),
        NodeKind::Invocation { .. }
    ));
}

#[test]
fn constant_false_if_keeps_the_else_branch() {
    let unit = analyzed(indoc! {"
        sub start() {
            if (1 > 2) { outbox(1); } else { outbox(2); }
        }
    "});

    assert_eq!(codes(&unit), vec![3008]);
    assert!(
        unit.diagnostics
            .iter()
            .next()
            .unwrap()
            .message()
            .contains("constant false condition")
    );

    let statements = body_statements(&unit, "start");
    assert_eq!(statements.len(), 1);
    assert!(matches!(unit.ast.kind(statements[0]), NodeKind::Block { .. }));
}

#[test]
fn while_false_is_removed() {
    let unit = analyzed(indoc! {"
        sub start() {
            while (false) { outbox(1); }
            outbox(2);
        }
    "});

    assert_eq!(codes(&unit), vec![3008]);
    let statements = body_statements(&unit, "start");
    assert_eq!(statements.len(), 1);
}

#[test]
fn code_after_while_true_is_dropped() {
    let unit = analyzed(indoc! {"
        sub start() {
            while (true) { outbox(inbox()); }
            outbox(0);
        }
    "});

    assert_eq!(codes(&unit), vec![3008]);
    assert!(
        unit.diagnostics
            .iter()
            .next()
            .unwrap()
            .message()
            .contains("after infinite loop")
    );

    let statements = body_statements(&unit, "start");
    assert_eq!(statements.len(), 1);
    assert!(matches!(unit.ast.kind(statements[0]), NodeKind::While { .. }));
}

#[test]
fn live_code_is_untouched() {
    let unit = analyzed(indoc! {"
        sub start() {
            let n = inbox();
            if (n > 0) { outbox(n); } else { outbox(-n); }
        }
    "});
    assert!(unit.diagnostics.is_empty());
    assert_eq!(body_statements(&unit, "start").len(), 2);
}
