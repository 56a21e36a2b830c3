//! Parser state machine and low-level operations.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::cst::{SyntaxKind, SyntaxNode, TokenSet};
use super::lexer::{Token, token_text};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::Error;

const RECURSION_LIMIT: u32 = 512;

#[derive(Debug)]
pub struct ParseResult {
    pub root: SyntaxNode,
    pub diagnostics: Diagnostics,
}

/// Trivia tokens (whitespace, comments) are buffered and flushed as leading
/// trivia when starting a new node. This gives predictable trivia attachment
/// without backtracking.
pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) trivia_buffer: Vec<Token>,
    pub(super) builder: GreenNodeBuilder<'static>,
    pub(super) diagnostics: Diagnostics,
    pub(super) depth: u32,
    pub(super) last_diagnostic_pos: Option<TextSize>,
    fatal_error: Option<Error>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>, diagnostics: Diagnostics) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            trivia_buffer: Vec::with_capacity(4),
            builder: GreenNodeBuilder::new(),
            diagnostics,
            depth: 0,
            last_diagnostic_pos: None,
            fatal_error: None,
        }
    }

    pub fn parse(mut self) -> Result<ParseResult, Error> {
        self.parse_compilation_unit();
        let (green, diagnostics) = self.finish()?;
        Ok(ParseResult {
            root: SyntaxNode::new_root(green),
            diagnostics,
        })
    }

    fn finish(mut self) -> Result<(GreenNode, Diagnostics), Error> {
        if let Some(err) = self.fatal_error {
            return Err(err);
        }
        Ok((self.builder.finish(), self.diagnostics))
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal_error.is_some()
    }

    pub(super) fn eof(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .all(|t| t.kind.is_trivia())
    }

    pub(super) fn should_stop(&self) -> bool {
        self.eof() || self.has_fatal_error()
    }

    /// Current non-trivia token kind, `Error` past the end.
    pub(super) fn peek(&mut self) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    /// LL(k) lookahead past trivia.
    pub(super) fn peek_nth(&mut self, n: usize) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        let mut seen = 0;
        for token in &self.tokens[self.pos..] {
            if token.kind.is_trivia() {
                continue;
            }
            if seen == n {
                return token.kind;
            }
            seen += 1;
        }
        SyntaxKind::Error
    }

    pub(super) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    pub(super) fn at_set(&mut self, set: TokenSet) -> bool {
        set.contains(self.peek())
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.skip_trivia_to_buffer();
        self.tokens.get(self.pos).map_or_else(
            || {
                let end = TextSize::from(self.source.len() as u32);
                TextRange::empty(end)
            },
            |t| t.span,
        )
    }

    /// Flushes pending trivia into the tree at the current position. Used at
    /// the end of the root node so trailing trivia is not lost.
    pub(super) fn eat_trivia(&mut self) {
        self.skip_trivia_to_buffer();
        self.drain_trivia();
    }

    fn skip_trivia_to_buffer(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.trivia_buffer.push(self.tokens[self.pos]);
            self.pos += 1;
        }
    }

    fn drain_trivia(&mut self) {
        for token in self.trivia_buffer.drain(..) {
            let text = token_text(self.source, &token);
            self.builder.token(token.kind.into(), text);
        }
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.drain_trivia();
        self.builder.start_node(kind.into());
    }

    /// Wrap previously-parsed content using checkpoint.
    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia_to_buffer();
        self.drain_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn bump(&mut self) {
        self.skip_trivia_to_buffer();
        assert!(self.pos < self.tokens.len(), "bump called at EOF");
        self.drain_trivia();

        let token = self.tokens[self.pos];
        let text = token_text(self.source, &token);
        self.builder.token(token.kind.into(), text);
        self.pos += 1;
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// On mismatch: emit diagnostic but don't consume (allows parent recovery).
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {what}"));
        false
    }

    /// Emit diagnostic with default message for the kind.
    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        self.error_msg(kind, kind.default_message());
    }

    /// Emit diagnostic with custom message. Consecutive diagnostics at the
    /// same offset are deduplicated.
    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        let pos = range.start();
        if self.last_diagnostic_pos == Some(pos) {
            return;
        }
        self.last_diagnostic_pos = Some(pos);
        self.diagnostics.report(kind, range).message(message).emit();
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        if !self.eof() {
            self.start_node(SyntaxKind::Error);
            self.bump();
            self.finish_node();
        }
    }

    /// Skips tokens until one of `recovery` (or EOF), wrapped in an Error node.
    pub(super) fn recover_until(&mut self, recovery: TokenSet) {
        if self.at_set(recovery) || self.should_stop() {
            return;
        }
        self.start_node(SyntaxKind::Error);
        while !self.at_set(recovery) && !self.should_stop() {
            self.bump();
        }
        self.finish_node();
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.depth >= RECURSION_LIMIT {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(Error::RecursionLimitExceeded);
            }
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
