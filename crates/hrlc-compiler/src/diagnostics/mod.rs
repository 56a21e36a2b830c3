//! Compiler diagnostics infrastructure.
//!
//! A single [`Diagnostics`] collection is threaded through parsing and every
//! semantic pass, so the rendered output preserves global emission order.
//! Chained notes ("originally defined in ...") live on their parent message
//! and render with the parent's id.

mod kind;
mod line_index;
mod printer;


use std::collections::HashSet;

use rowan::TextRange;
use serde::Serialize;

pub use kind::{DiagnosticKind, Severity};
pub use line_index::{LineCol, LineIndex};
pub use printer::DiagnosticsPrinter;

/// A follow-up location chained to a diagnostic, sharing its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub(crate) file: Option<String>,
    pub(crate) range: Option<TextRange>,
    pub(crate) message: String,
}

/// A single diagnostic with location, message, and optional chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) range: Option<TextRange>,
    pub(crate) message: String,
    pub(crate) suggestion: Option<String>,
    pub(crate) notes: Vec<Note>,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn range(&self) -> Option<TextRange> {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Collection of diagnostic messages from parsing and analysis.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
    suppressed: HashSet<u16>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a diagnostic with the kind's default message.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        self.report_at(kind, Some(range))
    }

    /// Starts a diagnostic without a source location (built-in symbols).
    pub fn report_at(
        &mut self,
        kind: DiagnosticKind,
        range: Option<TextRange>,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: Diagnostic {
                kind,
                range,
                message: kind.default_message().to_string(),
                suggestion: None,
                notes: Vec::new(),
            },
        }
    }

    /// Registers an id filter: matching reports are dropped at `emit` time.
    pub fn suppress(&mut self, kind: DiagnosticKind) {
        self.suppressed.insert(kind.code());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.severity() == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|d| d.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Rendering views for machine consumption, in emission order.
    pub fn views<'a>(&'a self, path: &'a str, index: &LineIndex) -> Vec<DiagnosticView<'a>> {
        self.messages
            .iter()
            .map(|d| DiagnosticView::new(d, path, index))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Builder for constructing a diagnostic message.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: Diagnostic,
}

impl DiagnosticBuilder<'_> {
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message.message = msg.into();
        self
    }

    pub fn suggestion(mut self, text: impl Into<String>) -> Self {
        self.message.suggestion = Some(text.into());
        self
    }

    /// Chains a note in the current file.
    pub fn note(mut self, range: TextRange, msg: impl Into<String>) -> Self {
        self.message.notes.push(Note {
            file: None,
            range: Some(range),
            message: msg.into(),
        });
        self
    }

    /// Chains a note pointing into another file (or nowhere, for built-ins).
    pub fn note_in(
        mut self,
        file: impl Into<String>,
        range: Option<TextRange>,
        msg: impl Into<String>,
    ) -> Self {
        self.message.notes.push(Note {
            file: Some(file.into()),
            range,
            message: msg.into(),
        });
        self
    }

    pub fn emit(self) {
        if self
            .diagnostics
            .suppressed
            .contains(&self.message.kind.code())
        {
            return;
        }
        // Re-running a pass over the same tree (the pipeline's final phase
        // repeats the analysis passes) must not double-report.
        if self.diagnostics.messages.contains(&self.message) {
            return;
        }
        self.diagnostics.messages.push(self.message);
    }
}

/// A rendered, serializable snapshot of one diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticView<'a> {
    pub severity: Severity,
    pub code: u16,
    pub file: &'a str,
    pub line: i32,
    pub col: i32,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'a str>,
}

impl<'a> DiagnosticView<'a> {
    fn new(diagnostic: &'a Diagnostic, path: &'a str, index: &LineIndex) -> Self {
        let pos = index.range_start(diagnostic.range);
        Self {
            severity: diagnostic.severity(),
            code: diagnostic.kind.code(),
            file: path,
            line: pos.line,
            col: pos.col,
            message: &diagnostic.message,
            suggestion: diagnostic.suggestion.as_deref(),
        }
    }
}
