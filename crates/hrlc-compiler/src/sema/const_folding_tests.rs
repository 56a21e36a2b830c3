use indoc::indoc;

use crate::ast::NodeKind;
use crate::diagnostics::DiagnosticKind;
use crate::test_utils::{analyzed_fail_fast, codes, expect_clean, find_node, find_nodes};

/// The value expression of the last `outbox(...)` call.
fn outbox_argument(unit: &crate::AnalyzedUnit) -> crate::ast::NodeId {
    let calls = find_nodes(&unit.ast, |k| {
        matches!(k, NodeKind::Invocation { callee, .. } if callee == "outbox")
    });
    let call = *calls.last().expect("an outbox call exists");
    match unit.ast.kind(call) {
        NodeKind::Invocation {
            argument: Some(argument),
            ..
        } => *argument,
        _ => panic!("outbox call has an argument"),
    }
}

#[test]
fn constant_arithmetic_folds_to_a_literal() {
    let unit = expect_clean("sub start() { outbox(2 + 3 * 4); }");
    let argument = outbox_argument(&unit);
    assert_eq!(
        *unit.ast.kind(argument),
        NodeKind::Integer {
            value: 14,
            is_char: false
        }
    );
    let folded = unit.ast.const_fold(argument).expect("literal is annotated");
    assert_eq!(folded.value, 14);
}

#[test]
fn comparisons_fold_to_plain_integers() {
    let unit = expect_clean("sub start() { outbox(('b' > 'a') == true); }");
    let argument = outbox_argument(&unit);
    assert_eq!(
        *unit.ast.kind(argument),
        NodeKind::Integer {
            value: 1,
            is_char: false
        }
    );
}

#[test]
fn char_arithmetic_folds_to_a_plain_integer() {
    // Arithmetic between characters yields an integer, same as at runtime:
    // 'b' - 'a' is the distance 1, not a control character.
    let unit = expect_clean("sub start() { outbox('b' - 'a'); }");
    let argument = outbox_argument(&unit);
    assert_eq!(
        *unit.ast.kind(argument),
        NodeKind::Integer {
            value: 1,
            is_char: false
        }
    );
    let folded = unit.ast.const_fold(argument).expect("folded");
    assert!(!folded.is_char);
}

#[test]
fn char_sum_is_an_integer_usable_in_int_arithmetic() {
    // The folded sum must mix with integers exactly like the unoptimized
    // runtime result would.
    let unit = expect_clean("sub start() { outbox(('a' + 'a') / 2); }");
    let argument = outbox_argument(&unit);
    assert_eq!(
        *unit.ast.kind(argument),
        NodeKind::Integer {
            value: 'a' as i32,
            is_char: false
        }
    );
}

#[test]
fn char_literals_are_not_range_checked() {
    // Wide characters carry code points beyond 999; only integers are bound
    // to the machine range.
    let unit = expect_clean("sub start() { outbox('€'); }");
    let argument = outbox_argument(&unit);
    let folded = unit.ast.const_fold(argument).expect("annotated");
    assert!(folded.is_char);
    assert_eq!(folded.value, '€' as i32);
}

#[test]
fn mixed_char_and_int_does_not_fold() {
    let unit = expect_clean("sub start() { outbox('a' + 1); }");
    let argument = outbox_argument(&unit);
    assert!(matches!(unit.ast.kind(argument), NodeKind::Binary { .. }));
    assert!(unit.ast.const_fold(argument).is_none());
}

#[test]
fn overflow_aborts_the_fold() {
    let unit = analyzed_fail_fast("function start() { let a = 500 + 600; return a; }");
    assert_eq!(codes(&unit), vec![3003]);
    assert_eq!(unit.status, Err(DiagnosticKind::IntegerOverflow));

    // The `+` node survives unfolded.
    let plus = find_node(&unit.ast, |k| matches!(k, NodeKind::Binary { .. }));
    assert!(unit.ast.const_fold(plus).is_none());
}

#[test]
fn division_by_folded_zero_is_reported() {
    let unit = analyzed_fail_fast("function start() { let a = 10 / (5 - 5); return a; }");
    assert_eq!(codes(&unit), vec![3004]);
    assert_eq!(unit.status, Err(DiagnosticKind::DivModByZero));

    let diag = unit.diagnostics.iter().next().unwrap();
    assert!(diag.message().contains("'10 / 0'"));
}

#[test]
fn division_by_literal_zero_with_unfolded_lhs() {
    let unit = analyzed_fail_fast("sub start() { let x = inbox(); outbox(x / 0); }");
    assert_eq!(codes(&unit), vec![3004]);
}

#[test]
fn negative_literal_folds_within_range() {
    let unit = expect_clean("sub start() { outbox(-999); }");
    let argument = outbox_argument(&unit);
    let folded = unit.ast.const_fold(argument).expect("folded");
    assert_eq!(folded.value, -999);
}

#[test]
fn every_folded_value_is_in_range() {
    let unit = expect_clean(indoc! {"
        sub start() {
            outbox(31 * 32 - 30 * 31);
            outbox(999 - 998 + 997 - 996);
        }
    "});
    for id in find_nodes(&unit.ast, |_| true) {
        if let Some(folded) = unit.ast.const_fold(id) {
            assert!((-999..=999).contains(&folded.value));
        }
    }
}

mod algebraic {
    use super::*;
    use crate::ast::NodeKind;

    #[test]
    fn add_zero_dissolves() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(x + 0); }");
        let argument = outbox_argument(&unit);
        assert!(matches!(
            unit.ast.kind(argument),
            NodeKind::VariableAccess { name } if name == "x"
        ));
    }

    #[test]
    fn zero_add_dissolves() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(0 + x); }");
        let argument = outbox_argument(&unit);
        assert!(matches!(
            unit.ast.kind(argument),
            NodeKind::VariableAccess { name } if name == "x"
        ));
    }

    #[test]
    fn sub_zero_dissolves() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(x - 0); }");
        let argument = outbox_argument(&unit);
        assert!(matches!(
            unit.ast.kind(argument),
            NodeKind::VariableAccess { name } if name == "x"
        ));
    }

    #[test]
    fn zero_sub_becomes_negation() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(0 - x); }");
        let argument = outbox_argument(&unit);
        assert!(matches!(unit.ast.kind(argument), NodeKind::Negative { .. }));
    }

    #[test]
    fn mul_zero_becomes_zero() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(x); outbox(x * 0); }");
        let argument = outbox_argument(&unit);
        assert_eq!(
            *unit.ast.kind(argument),
            NodeKind::Integer {
                value: 0,
                is_char: false
            }
        );
    }

    #[test]
    fn mul_one_dissolves() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(1 * x); }");
        let argument = outbox_argument(&unit);
        assert!(matches!(
            unit.ast.kind(argument),
            NodeKind::VariableAccess { name } if name == "x"
        ));
    }

    #[test]
    fn div_one_dissolves() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(x / 1); }");
        let argument = outbox_argument(&unit);
        assert!(matches!(
            unit.ast.kind(argument),
            NodeKind::VariableAccess { name } if name == "x"
        ));
    }

    #[test]
    fn zero_div_becomes_zero() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(x); outbox(0 / x); }");
        let argument = outbox_argument(&unit);
        assert_eq!(
            *unit.ast.kind(argument),
            NodeKind::Integer {
                value: 0,
                is_char: false
            }
        );
    }

    #[test]
    fn mod_one_becomes_zero() {
        let unit = expect_clean("sub start() { let x = inbox(); outbox(x); outbox(x % 1); }");
        let argument = outbox_argument(&unit);
        assert_eq!(
            *unit.ast.kind(argument),
            NodeKind::Integer {
                value: 0,
                is_char: false
            }
        );
    }

    #[test]
    fn mod_by_literal_zero_is_reported() {
        let unit = analyzed_fail_fast("sub start() { let x = inbox(); outbox(x % 0); }");
        assert_eq!(codes(&unit), vec![3004]);
    }
}
