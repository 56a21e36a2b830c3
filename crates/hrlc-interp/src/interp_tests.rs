use indoc::indoc;

use hrlc_compiler::{AnalyzedUnit, CompileOptions, compile};
use hrlc_core::HrmValue;

use super::{Interpreter, RuntimeError};

fn int(v: i32) -> HrmValue {
    HrmValue::int(v).unwrap()
}

fn ch(c: char) -> HrmValue {
    HrmValue::char(c)
}

fn build(source: &str) -> AnalyzedUnit {
    let unit = compile("test.hrl", source, CompileOptions::default()).expect("parses");
    assert!(
        unit.is_valid(),
        "program must analyze cleanly:\n{}",
        unit.printer().render()
    );
    unit
}

fn run(source: &str, input: Vec<HrmValue>) -> Vec<HrmValue> {
    let unit = build(source);
    Interpreter::new(&unit.ast, &unit.symbols)
        .with_input(input)
        .run()
        .expect("program runs")
        .output
}

#[test]
fn echo_program() {
    let output = run(
        "sub start() { outbox(inbox()); }",
        vec![int(7), int(8)],
    );
    assert_eq!(output, vec![int(7)]);
}

#[test]
fn empty_inbox_halts_normally() {
    let output = run(
        indoc! {"
            sub start() {
                while (true) {
                    outbox(inbox());
                }
            }
        "},
        vec![int(1), int(2), int(3)],
    );
    assert_eq!(output, vec![int(1), int(2), int(3)]);
}

#[test]
fn arithmetic_and_variables() {
    let output = run(
        indoc! {"
            sub start() {
                let a = inbox();
                let b = inbox();
                outbox(a * b + 1);
            }
        "},
        vec![int(6), int(7)],
    );
    assert_eq!(output, vec![int(43)]);
}

#[test]
fn character_values_flow_through() {
    let output = run(
        "sub start() { outbox(inbox()); }",
        vec![ch('q')],
    );
    assert_eq!(output, vec![ch('q')]);
}

#[test]
fn floor_init_and_access() {
    let output = run(
        indoc! {"
            init floor[3] = 42;
            sub start() {
                outbox(floor[3]);
                floor[4] = floor[3] + 1;
                outbox(floor[4]);
            }
        "},
        vec![],
    );
    assert_eq!(output, vec![int(42), int(43)]);
}

#[test]
fn globals_initialize_before_start() {
    let output = run(
        indoc! {"
            let base = 10;
            sub start() { outbox(base + inbox()); }
        "},
        vec![int(5)],
    );
    assert_eq!(output, vec![int(15)]);
}

#[test]
fn function_calls_return_values() {
    let output = run(
        indoc! {"
            function double(n) { return n + n; }
            sub start() { outbox(double(inbox())); }
        "},
        vec![int(21)],
    );
    assert_eq!(output, vec![int(42)]);
}

#[test]
fn countdown_loop() {
    let output = run(
        indoc! {"
            sub start() {
                let n = inbox();
                while (n > 0) {
                    outbox(n);
                    n = n - 1;
                }
            }
        "},
        vec![int(3)],
    );
    assert_eq!(output, vec![int(3), int(2), int(1)]);
}

#[test]
fn for_loop_with_update() {
    let output = run(
        "sub start() { for (let i = 1, i <= 3, ++i) { outbox(i); } }",
        vec![],
    );
    assert_eq!(output, vec![int(1), int(2), int(3)]);
}

#[test]
fn break_and_continue() {
    let output = run(
        indoc! {"
            sub start() {
                for (let i = 0, i < 10, ++i) {
                    if (i % 2 == 0) { continue; }
                    if (i > 6) { break; }
                    outbox(i);
                }
            }
        "},
        vec![],
    );
    assert_eq!(output, vec![int(1), int(3), int(5)]);
}

#[test]
fn division_by_zero_at_runtime() {
    let unit = build("sub start() { outbox(10 / inbox()); }");
    let error = Interpreter::new(&unit.ast, &unit.symbols)
        .with_input(vec![int(0)])
        .run()
        .expect_err("division by zero");
    assert_eq!(
        error,
        RuntimeError::Value(hrlc_core::ValueError::DivByZero)
    );
}

#[test]
fn mixing_char_and_int_is_a_runtime_error() {
    let unit = build("sub start() { outbox(inbox() + 1); }");
    let error = Interpreter::new(&unit.ast, &unit.symbols)
        .with_input(vec![ch('a')])
        .run()
        .expect_err("type mismatch");
    assert_eq!(
        error,
        RuntimeError::Value(hrlc_core::ValueError::TypeMismatch)
    );
}

#[test]
fn overflow_is_a_runtime_error() {
    let unit = build("sub start() { outbox(inbox() + 500); }");
    let error = Interpreter::new(&unit.ast, &unit.symbols)
        .with_input(vec![int(600)])
        .run()
        .expect_err("overflow");
    assert_eq!(error, RuntimeError::Value(hrlc_core::ValueError::Overflow));
}

#[test]
fn floor_index_out_of_range() {
    let unit = build(indoc! {"
        init floor_max = 7;
        sub start() { floor[inbox()] = 1; }
    "});
    let error = Interpreter::new(&unit.ast, &unit.symbols)
        .with_input(vec![int(8)])
        .run()
        .expect_err("index out of range");
    assert_eq!(error, RuntimeError::FloorIndexOutOfRange { index: 8, max: 7 });
}

#[test]
fn step_limit_stops_runaway_loops() {
    let unit = build(indoc! {"
        sub start() {
            let n = 0;
            while (true) { n = 1 - n; }
            outbox(n);
        }
    "});
    let error = Interpreter::new(&unit.ast, &unit.symbols)
        .with_step_limit(10_000)
        .run()
        .expect_err("never terminates");
    assert_eq!(error, RuntimeError::StepLimitExceeded);
}

#[test]
fn missing_start_is_reported() {
    let unit = build("sub begin() { outbox(1); }");
    let error = Interpreter::new(&unit.ast, &unit.symbols)
        .run()
        .expect_err("no start");
    assert_eq!(error, RuntimeError::MissingStart);
}

#[test]
fn char_comparison_drives_branches() {
    let output = run(
        indoc! {"
            sub start() {
                let c = inbox();
                if (c == 'x') { outbox(1); } else { outbox(0); }
            }
        "},
        vec![ch('x')],
    );
    assert_eq!(output, vec![int(1)]);
}
