use indoc::indoc;

use super::dump::text_dump;
use super::lower;
use crate::parser::{parse, ptree};

fn lowered_dump(source: &str) -> String {
    let result = parse(source).expect("no fatal parse error");
    assert!(
        result.diagnostics.is_empty(),
        "parse diagnostics: {:?}",
        result
            .diagnostics
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>()
    );
    let unit = ptree::CompilationUnit::cast_root(result.root).expect("compilation unit root");
    text_dump(&lower(&unit))
}

#[test]
fn lowers_compilation_unit_shape() {
    let dump = lowered_dump(indoc! {"
        import stdlib;
        init floor[3] = 42;
        init floor_max = 15;
        let g = 1;
        sub start() { outbox(g); }
    "});
    assert_eq!(
        dump,
        indoc! {"
            CompilationUnit
              Import 'stdlib'
              FloorBoxInit
                FloorAssignment
                  Integer 3
                  Integer 42
              FloorMax
                Integer 15
              VariableDeclaration 'g'
                VariableAssignment 'g'
                  Integer 1
              Subprocedure 'start'
                Block
                  Invocation 'outbox'
                    VariableAccess 'g'
        "}
    );
}

#[test]
fn precedence_shapes_the_tree() {
    let dump = lowered_dump("sub start() { let a = 1 + 2 * 3; outbox(a); }");
    assert_eq!(
        dump,
        indoc! {"
            CompilationUnit
              Subprocedure 'start'
                Block
                  VariableDeclaration 'a'
                    VariableAssignment 'a'
                      Binary +
                        Integer 1
                        Binary *
                          Integer 2
                          Integer 3
                  Invocation 'outbox'
                    VariableAccess 'a'
        "}
    );
}

#[test]
fn left_associativity() {
    let dump = lowered_dump("sub start() { outbox(8 - 4 - 2); }");
    assert_eq!(
        dump,
        indoc! {"
            CompilationUnit
              Subprocedure 'start'
                Block
                  Invocation 'outbox'
                    Binary -
                      Binary -
                        Integer 8
                        Integer 4
                      Integer 2
        "}
    );
}

#[test]
fn parentheses_dissolve() {
    let dump = lowered_dump("sub start() { outbox((1 + 2) * 3); }");
    assert_eq!(
        dump,
        indoc! {"
            CompilationUnit
              Subprocedure 'start'
                Block
                  Invocation 'outbox'
                    Binary *
                      Binary +
                        Integer 1
                        Integer 2
                      Integer 3
        "}
    );
}

#[test]
fn comparison_binds_looser_than_arithmetic() {
    let dump = lowered_dump("sub start() { let ok = 1 + 1 == 2; outbox(ok); }");
    assert_eq!(
        dump,
        indoc! {"
            CompilationUnit
              Subprocedure 'start'
                Block
                  VariableDeclaration 'ok'
                    VariableAssignment 'ok'
                      Binary ==
                        Binary +
                          Integer 1
                          Integer 1
                        Integer 2
                  Invocation 'outbox'
                    VariableAccess 'ok'
        "}
    );
}

#[test]
fn unary_and_char_literals() {
    let dump = lowered_dump("sub start() { let a = -5; let b = !true; let c = +'x'; outbox(a); outbox(b); outbox(c); }");
    assert!(dump.contains("Negative\n            Integer 5"));
    assert!(dump.contains("Not\n            Boolean true"));
    // Unary plus dissolves.
    assert!(dump.contains("VariableAssignment 'c'\n          Integer 'x'"));
}

#[test]
fn for_loop_slots() {
    let dump = lowered_dump("sub start() { for (let i = 0, i < 3, ++i) { outbox(i); } }");
    assert_eq!(
        dump,
        indoc! {"
            CompilationUnit
              Subprocedure 'start'
                Block
                  For
                    VariableDeclaration 'i'
                      VariableAssignment 'i'
                        Integer 0
                    Binary <
                      VariableAccess 'i'
                      Integer 3
                    Increment 'i'
                    Block
                      Invocation 'outbox'
                        VariableAccess 'i'
        "}
    );
}

#[test]
fn if_else_and_return() {
    let dump = lowered_dump("function choose(y) { if (y) { return 1; } else { return 0; } }");
    assert_eq!(
        dump,
        indoc! {"
            CompilationUnit
              Function 'choose' param='y'
                Block
                  If
                    VariableAccess 'y'
                    Block
                      Return
                        Integer 1
                    Block
                      Return
                        Integer 0
        "}
    );
}

#[test]
fn floor_assignment_statement() {
    let dump = lowered_dump("sub start() { floor[1 + 2] = inbox(); }");
    assert_eq!(
        dump,
        indoc! {"
            CompilationUnit
              Subprocedure 'start'
                Block
                  FloorAssignment
                    Binary +
                      Integer 1
                      Integer 2
                    Invocation 'inbox'
        "}
    );
}
