//! Top-level items: imports, floor initializers, globals, subroutines.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;

impl Parser<'_> {
    /// `compilation_unit = import* floor_init* (var_decl | function | sub)* EOF`
    pub(crate) fn parse_compilation_unit(&mut self) {
        self.start_node(SyntaxKind::CompilationUnit);

        while self.at(SyntaxKind::ImportKw) && !self.should_stop() {
            self.parse_import_directive();
        }

        let mut saw_floor_max = false;
        while self.at(SyntaxKind::InitKw) && !self.should_stop() {
            match self.peek_nth(1) {
                SyntaxKind::FloorKw => self.parse_floor_box_init(),
                SyntaxKind::FloorMaxKw => {
                    if saw_floor_max {
                        self.error(DiagnosticKind::DuplicateFloorMax);
                    }
                    saw_floor_max = true;
                    self.parse_floor_max_init();
                }
                _ => {
                    self.error_and_bump(
                        DiagnosticKind::ExpectedFloorInit,
                        DiagnosticKind::ExpectedFloorInit.default_message(),
                    );
                }
            }
        }

        while !self.should_stop() {
            match self.peek() {
                SyntaxKind::LetKw => self.parse_var_decl(true),
                SyntaxKind::FunctionKw => self.parse_subroutine(SyntaxKind::FunctionDef),
                SyntaxKind::SubKw => self.parse_subroutine(SyntaxKind::SubprocDef),
                _ => {
                    self.error_and_bump(
                        DiagnosticKind::UnexpectedToken,
                        "expected a variable, function or subprocedure declaration",
                    );
                }
            }
        }

        self.eat_trivia();
        self.finish_node();
    }

    /// `import IDENT ;`
    fn parse_import_directive(&mut self) {
        self.start_node(SyntaxKind::ImportDirective);
        self.bump(); // 'import'
        self.expect(SyntaxKind::Ident, "an identifier (module name)");
        self.expect(SyntaxKind::Semicolon, "';'");
        self.finish_node();
    }

    /// `init floor [ INT ] = INT ;`
    fn parse_floor_box_init(&mut self) {
        self.start_node(SyntaxKind::FloorBoxInit);
        self.bump(); // 'init'
        self.bump(); // 'floor'
        self.expect(SyntaxKind::BracketOpen, "'['");
        self.parse_literal_operand("an integer (floor index)");
        self.expect(SyntaxKind::BracketClose, "']'");
        self.expect(SyntaxKind::Equals, "'='");
        self.parse_literal_operand("an integer (value)");
        self.expect(SyntaxKind::Semicolon, "';'");
        self.finish_node();
    }

    /// `init floor_max = INT ;`
    fn parse_floor_max_init(&mut self) {
        self.start_node(SyntaxKind::FloorMaxInit);
        self.bump(); // 'init'
        self.bump(); // 'floor_max'
        self.expect(SyntaxKind::Equals, "'='");
        self.parse_literal_operand("an integer (floor max value)");
        self.expect(SyntaxKind::Semicolon, "';'");
        self.finish_node();
    }

    fn parse_literal_operand(&mut self, what: &str) {
        if self.at(SyntaxKind::Integer) || self.at(SyntaxKind::CharLiteral) {
            self.start_node(SyntaxKind::IntLiteral);
            self.bump();
            self.finish_node();
        } else {
            self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {what}"));
        }
    }

    /// `(function | sub) IDENT ( IDENT? ) block`
    fn parse_subroutine(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump(); // 'function' | 'sub'
        self.expect(SyntaxKind::Ident, "an identifier (subroutine name)");
        self.expect(SyntaxKind::ParenOpen, "'('");
        if self.at(SyntaxKind::Ident) {
            self.bump(); // formal parameter
        }
        self.expect(SyntaxKind::ParenClose, "')'");
        if self.at(SyntaxKind::BraceOpen) {
            self.parse_statement_block();
        } else {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected '{' (subroutine body)");
            self.recover_until(crate::parser::cst::token_sets::STMT_RECOVERY.union(
                crate::parser::cst::TokenSet::new(&[
                    SyntaxKind::FunctionKw,
                    SyntaxKind::SubKw,
                    SyntaxKind::LetKw,
                ]),
            ));
            if self.at(SyntaxKind::BraceOpen) {
                self.parse_statement_block();
            }
        }
        self.finish_node();
    }

    /// `let IDENT (= expr)?` plus the trailing semicolon in statement position.
    pub(crate) fn parse_var_decl(&mut self, with_semicolon: bool) {
        self.start_node(SyntaxKind::VarDecl);
        self.bump(); // 'let'
        self.expect(SyntaxKind::Ident, "an identifier (variable name)");
        if self.eat(SyntaxKind::Equals) {
            self.parse_expr();
        }
        if with_semicolon {
            self.expect(SyntaxKind::Semicolon, "';'");
        }
        self.finish_node();
    }
}
