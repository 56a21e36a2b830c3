//! Expressions: precedence climbing over a fixed operator table.
//!
//! Precedence (high to low): `* / %`, `+ -`, `< <= > >=`, `== !=`, `&`, `|`.
//! All binary operators are left-associative. Unary `++ -- ! + -` bind
//! tighter and take a primary expression as operand.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) {
        self.parse_expr_at(0);
    }

    /// Precedence climbing: each binary operator wraps the checkpointed
    /// left-hand side, and parses its right-hand side at `precedence + 1`
    /// (left associativity).
    fn parse_expr_at(&mut self, min_precedence: i8) {
        if !self.enter_recursion() {
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_unary_expr();

        loop {
            let op = self.peek();
            if !op.is_binary_operator() {
                break;
            }
            let precedence = op.binary_precedence();
            if precedence < min_precedence {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BinaryExpr);
            self.bump(); // operator
            self.parse_expr_at(precedence + 1);
            self.finish_node();
        }
        self.exit_recursion();
    }

    fn parse_unary_expr(&mut self) {
        match self.peek() {
            SyntaxKind::Plus | SyntaxKind::Minus | SyntaxKind::Bang => {
                self.start_node(SyntaxKind::PrefixExpr);
                self.bump(); // operator
                self.parse_primary_expr();
                self.finish_node();
            }
            SyntaxKind::PlusPlus => {
                self.start_node(SyntaxKind::IncrementExpr);
                self.bump();
                self.expect(SyntaxKind::Ident, "an identifier (variable name)");
                self.finish_node();
            }
            SyntaxKind::MinusMinus => {
                self.start_node(SyntaxKind::DecrementExpr);
                self.bump();
                self.expect(SyntaxKind::Ident, "an identifier (variable name)");
                self.finish_node();
            }
            _ => self.parse_primary_expr(),
        }
    }

    fn parse_primary_expr(&mut self) {
        match self.peek() {
            SyntaxKind::TrueKw | SyntaxKind::FalseKw => {
                self.start_node(SyntaxKind::BoolLiteral);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Integer | SyntaxKind::CharLiteral => {
                self.start_node(SyntaxKind::IntLiteral);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::FloorKw => self.parse_floor_access(),
            SyntaxKind::Ident => {
                if self.peek_nth(1) == SyntaxKind::ParenOpen {
                    self.parse_invocation_expr();
                } else {
                    self.start_node(SyntaxKind::NameRef);
                    self.bump();
                    self.finish_node();
                }
            }
            SyntaxKind::ParenOpen => {
                self.start_node(SyntaxKind::ParenExpr);
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::ParenClose, "')'");
                self.finish_node();
            }
            _ => {
                self.error_and_bump(
                    DiagnosticKind::ExpectedExpression,
                    "expect a primary expression (literal/floor access/invocation/parenthesized)",
                );
            }
        }
    }

    /// `floor [ expr ]`
    pub(crate) fn parse_floor_access(&mut self) {
        self.start_node(SyntaxKind::FloorAccess);
        self.bump(); // 'floor'
        self.expect(SyntaxKind::BracketOpen, "'['");
        self.parse_expr();
        self.expect(SyntaxKind::BracketClose, "']'");
        self.finish_node();
    }

    /// `IDENT ( expr? )`, at most one argument.
    pub(crate) fn parse_invocation_expr(&mut self) {
        self.start_node(SyntaxKind::InvocationExpr);
        self.bump(); // callee identifier
        self.bump(); // '('
        if !self.at(SyntaxKind::ParenClose) {
            self.parse_expr();
        }
        self.expect(SyntaxKind::ParenClose, "')'");
        self.finish_node();
    }
}
