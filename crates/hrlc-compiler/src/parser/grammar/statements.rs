//! Statements and statement blocks.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::STATEMENT_FIRST;

impl Parser<'_> {
    /// `{ statement* }`
    pub(crate) fn parse_statement_block(&mut self) {
        self.start_node(SyntaxKind::StatementBlock);
        self.bump(); // '{'
        while !self.at(SyntaxKind::BraceClose) && !self.should_stop() {
            if self.at_set(STATEMENT_FIRST) {
                self.parse_statement();
            } else {
                self.error_and_bump(DiagnosticKind::ExpectedStatement, "expect a statement");
            }
        }
        self.expect(SyntaxKind::BraceClose, "'}'");
        self.finish_node();
    }

    /// `statement = var_decl_stmt | embedded_statement`
    pub(crate) fn parse_statement(&mut self) {
        match self.peek() {
            SyntaxKind::LetKw => self.parse_var_decl(true),
            _ => self.parse_embedded_statement(),
        }
    }

    /// Embedded statements are everything legal inside control structures:
    /// assignments, invocations, loops, selection, return/break/continue,
    /// blocks, and the empty statement.
    pub(crate) fn parse_embedded_statement(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        match self.peek() {
            SyntaxKind::FloorKw => self.parse_floor_assign_statement(),
            SyntaxKind::Ident => self.parse_ident_statement(),
            SyntaxKind::ForKw => self.parse_for_statement(),
            SyntaxKind::WhileKw => self.parse_while_statement(),
            SyntaxKind::IfKw => self.parse_if_statement(),
            SyntaxKind::BraceOpen => self.parse_statement_block(),
            SyntaxKind::ReturnKw => self.parse_return_statement(),
            SyntaxKind::BreakKw => self.parse_break_continue(SyntaxKind::BreakStmt),
            SyntaxKind::ContinueKw => self.parse_break_continue(SyntaxKind::ContinueStmt),
            SyntaxKind::Semicolon => {
                self.start_node(SyntaxKind::EmptyStmt);
                self.bump();
                self.finish_node();
            }
            _ => {
                self.error_and_bump(
                    DiagnosticKind::ExpectedStatement,
                    "expect an embedded statement (iteration/selection/return/empty/break/continue, \
                     an assignment, an invocation, or a statement block)",
                );
            }
        }
        self.exit_recursion();
    }

    /// `floor [ expr ] = expr ;`
    fn parse_floor_assign_statement(&mut self) {
        self.start_node(SyntaxKind::FloorAssign);
        self.parse_floor_access();
        self.expect(SyntaxKind::Equals, "'='");
        self.parse_expr();
        self.expect(SyntaxKind::Semicolon, "';'");
        self.finish_node();
    }

    /// Identifier statements are disambiguated with LL(2): `f(` starts an
    /// invocation, `x =` an assignment.
    fn parse_ident_statement(&mut self) {
        match self.peek_nth(1) {
            SyntaxKind::ParenOpen => {
                self.start_node(SyntaxKind::InvocationStmt);
                self.parse_invocation_expr();
                self.expect(SyntaxKind::Semicolon, "';'");
                self.finish_node();
            }
            SyntaxKind::Equals => {
                self.start_node(SyntaxKind::VarAssign);
                self.bump(); // identifier
                self.bump(); // '='
                self.parse_expr();
                self.expect(SyntaxKind::Semicolon, "';'");
                self.finish_node();
            }
            _ => {
                self.error_and_bump(
                    DiagnosticKind::ExpectedStatement,
                    "expected '(' (invocation) or '=' (assignment) after identifier",
                );
            }
        }
    }

    /// `if ( expr ) embedded (else embedded)?`
    fn parse_if_statement(&mut self) {
        self.start_node(SyntaxKind::IfStmt);
        self.bump(); // 'if'
        self.expect(SyntaxKind::ParenOpen, "'('");
        self.parse_expr();
        self.expect(SyntaxKind::ParenClose, "')'");
        self.parse_embedded_statement();
        if self.eat(SyntaxKind::ElseKw) {
            self.parse_embedded_statement();
        }
        self.finish_node();
    }

    /// `while ( expr ) embedded`
    fn parse_while_statement(&mut self) {
        self.start_node(SyntaxKind::WhileStmt);
        self.bump(); // 'while'
        self.expect(SyntaxKind::ParenOpen, "'('");
        self.parse_expr();
        self.expect(SyntaxKind::ParenClose, "')'");
        self.parse_embedded_statement();
        self.finish_node();
    }

    /// `for ( init? , expr? , expr? ) embedded`
    ///
    /// The init slot is exclusively a variable assignment or a variable
    /// declaration; cond and update are plain expressions. Every stage is
    /// optional.
    fn parse_for_statement(&mut self) {
        self.start_node(SyntaxKind::ForStmt);
        self.bump(); // 'for'
        self.expect(SyntaxKind::ParenOpen, "'('");

        if !self.at(SyntaxKind::Comma) {
            self.start_node(SyntaxKind::ForInit);
            match self.peek() {
                SyntaxKind::LetKw => self.parse_var_decl(false),
                SyntaxKind::Ident if self.peek_nth(1) == SyntaxKind::Equals => {
                    self.start_node(SyntaxKind::VarAssign);
                    self.bump(); // identifier
                    self.bump(); // '='
                    self.parse_expr();
                    self.finish_node();
                }
                _ => {
                    self.error(DiagnosticKind::BadForInit);
                    self.recover_until(crate::parser::cst::TokenSet::new(&[
                        SyntaxKind::Comma,
                        SyntaxKind::ParenClose,
                        SyntaxKind::BraceClose,
                    ]));
                }
            }
            self.finish_node();
        }
        self.expect(SyntaxKind::Comma, "','");

        if !self.at(SyntaxKind::Comma) {
            self.start_node(SyntaxKind::ForCondition);
            self.parse_expr();
            self.finish_node();
        }
        self.expect(SyntaxKind::Comma, "','");

        if !self.at(SyntaxKind::ParenClose) {
            self.start_node(SyntaxKind::ForUpdate);
            self.parse_expr();
            self.finish_node();
        }
        self.expect(SyntaxKind::ParenClose, "')'");

        self.parse_embedded_statement();
        self.finish_node();
    }

    /// `return expr? ;`
    fn parse_return_statement(&mut self) {
        self.start_node(SyntaxKind::ReturnStmt);
        self.bump(); // 'return'
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expr();
        }
        self.expect(SyntaxKind::Semicolon, "';'");
        self.finish_node();
    }

    fn parse_break_continue(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump(); // 'break' | 'continue'
        self.expect(SyntaxKind::Semicolon, "';'");
        self.finish_node();
    }
}
