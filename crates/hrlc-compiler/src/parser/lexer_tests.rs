use super::cst::SyntaxKind;
use super::lexer::{lex, token_text};

fn kinds(source: &str) -> Vec<SyntaxKind> {
    lex(source)
        .iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

#[test]
fn keywords_win_over_identifiers() {
    use SyntaxKind::*;
    assert_eq!(
        kinds("let while for function sub"),
        vec![LetKw, WhileKw, ForKw, FunctionKw, SubKw]
    );
}

#[test]
fn identifiers_containing_keywords_stay_identifiers() {
    use SyntaxKind::*;
    assert_eq!(kinds("letter floors whilex"), vec![Ident, Ident, Ident]);
}

#[test]
fn floor_max_is_one_token() {
    use SyntaxKind::*;
    assert_eq!(kinds("floor_max floor"), vec![FloorMaxKw, FloorKw]);
}

#[test]
fn operators_longest_match() {
    use SyntaxKind::*;
    assert_eq!(
        kinds("++ + -- - >= > == = !="),
        vec![
            PlusPlus,
            Plus,
            MinusMinus,
            Minus,
            GreaterEquals,
            Greater,
            EqualsEquals,
            Equals,
            BangEquals
        ]
    );
}

#[test]
fn char_literal_is_distinct_from_integer() {
    use SyntaxKind::*;
    assert_eq!(kinds("'a' 42"), vec![CharLiteral, Integer]);
}

#[test]
fn line_comments_are_trivia() {
    let tokens = lex("let x; // trailing\nlet y;");
    assert!(tokens.iter().any(|t| t.kind == SyntaxKind::LineComment));
    use SyntaxKind::*;
    assert_eq!(
        kinds("let x; // trailing\nlet y;"),
        vec![LetKw, Ident, Semicolon, LetKw, Ident, Semicolon]
    );
}

#[test]
fn garbage_is_coalesced() {
    let source = "let @@@ x;";
    let tokens = lex(source);
    let garbage: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == SyntaxKind::Garbage)
        .collect();
    assert_eq!(garbage.len(), 1);
    assert_eq!(token_text(source, garbage[0]), "@@@");
}

#[test]
fn spans_are_exact() {
    let source = "let abc;";
    let tokens = lex(source);
    let ident = tokens
        .iter()
        .find(|t| t.kind == SyntaxKind::Ident)
        .unwrap();
    assert_eq!(token_text(source, ident), "abc");
    assert_eq!(u32::from(ident.span.start()), 4);
    assert_eq!(u32::from(ident.span.end()), 7);
}
