use indoc::indoc;

use crate::diagnostics::DiagnosticKind;
use crate::test_utils::{analyzed_fail_fast, codes, expect_clean};

#[test]
fn use_after_assignment_is_fine() {
    expect_clean(indoc! {"
        sub start() {
            let x;
            x = 1;
            outbox(x);
        }
    "});
}

#[test]
fn initializer_counts_as_assignment() {
    expect_clean(indoc! {"
        sub start() {
            let x = inbox();
            outbox(x);
        }
    "});
}

#[test]
fn plain_use_before_assignment_fails() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            let x;
            outbox(x);
        }
    "});
    assert_eq!(codes(&unit), vec![3007]);
    assert_eq!(unit.status, Err(DiagnosticKind::UseBeforeInit));

    let diag = unit.diagnostics.iter().next().unwrap();
    assert!(diag.message().contains("'x' may be used before assignment"));
    assert_eq!(diag.notes[0].message, "Original defined in");
}

#[test]
fn one_armed_if_does_not_initialize() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            let x;
            if (inbox()) { x = 1; }
            outbox(x);
        }
    "});
    assert_eq!(codes(&unit), vec![3007]);
}

#[test]
fn both_branches_assigning_initializes() {
    expect_clean(indoc! {"
        sub start() {
            let x;
            if (inbox()) { x = 1; } else { x = 2; }
            outbox(x);
        }
    "});
}

#[test]
fn one_branch_missing_assignment_fails() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            let x;
            if (inbox()) { x = 1; } else { outbox(0); }
            outbox(x);
        }
    "});
    assert_eq!(codes(&unit), vec![3007]);
}

#[test]
fn assignment_inside_loop_does_not_escape() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            let x;
            let n = inbox();
            while (n) { x = 1; n = inbox(); }
            outbox(x);
        }
    "});
    assert_eq!(codes(&unit), vec![3007]);
}

#[test]
fn use_inside_the_loop_that_assigns_is_fine() {
    expect_clean(indoc! {"
        sub start() {
            let n = inbox();
            while (n) {
                let d = n % 2;
                outbox(d);
                n = inbox();
            }
        }
    "});
}

#[test]
fn for_init_initializes_the_loop_variable() {
    expect_clean(indoc! {"
        sub start() {
            for (let i = 0, i < 3, ++i) {
                outbox(i);
            }
        }
    "});
}

#[test]
fn increment_of_uninitialized_fails() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            let x;
            ++x;
        }
    "});
    assert_eq!(codes(&unit), vec![3007]);
}

#[test]
fn condition_use_before_assignment_fails() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            let x;
            if (x) { outbox(1); }
        }
    "});
    assert_eq!(codes(&unit), vec![3007]);
}

#[test]
fn parameter_arrives_initialized() {
    expect_clean(indoc! {"
        sub echo(v) { outbox(v); }
        sub start() { echo(inbox()); }
    "});
}

#[test]
fn bare_block_state_flows_out() {
    expect_clean(indoc! {"
        sub start() {
            let x;
            { x = 1; }
            outbox(x);
        }
    "});
}

#[test]
fn block_local_does_not_leak_out() {
    let unit = analyzed_fail_fast(indoc! {"
        sub start() {
            { let y = 1; outbox(y); }
            outbox(y);
        }
    "});
    // The second `y` is not even in scope.
    assert_eq!(codes(&unit), vec![3002]);
}

#[test]
fn global_initializer_counts_for_subroutines() {
    expect_clean(indoc! {"
        let base = 5;
        sub start() { outbox(base); }
    "});
}

#[test]
fn uninitialized_global_read_fails() {
    let unit = analyzed_fail_fast(indoc! {"
        let base;
        sub start() { outbox(base); }
    "});
    assert_eq!(codes(&unit), vec![3007]);
}
