//! Lexer, parser, and lossless parse tree for HRL.
//!
//! The parser is recursive descent over a span-token stream, building a
//! rowan green tree. Every token, including whitespace, comments, and
//! punctuation, survives in the tree so a formatter can reproduce layout.

mod core;
pub mod cst;
mod grammar;
mod lexer;
pub mod ptree;

#[cfg(test)]
mod lexer_tests;

pub use self::core::{ParseResult, Parser};
pub use cst::{HrlLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TokenSet};
pub use lexer::{Token, lex, token_text};

use crate::diagnostics::Diagnostics;

/// Lexes and parses a source file in one step.
pub fn parse(source: &str) -> Result<ParseResult, crate::Error> {
    let tokens = lex(source);
    let mut diagnostics = Diagnostics::new();
    report_garbage(&tokens, &mut diagnostics);
    Parser::new(source, tokens, diagnostics).parse()
}

fn report_garbage(tokens: &[Token], diagnostics: &mut Diagnostics) {
    for token in tokens {
        if token.kind == SyntaxKind::Garbage {
            diagnostics
                .report(crate::diagnostics::DiagnosticKind::UnrecognizedCharacters, token.span)
                .emit();
        }
    }
}
