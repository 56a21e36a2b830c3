//! Diagnostic rendering.
//!
//! Two output modes share one builder: the plain line format
//! `"<severity>: [E<id>] <file>:<line>:<col>: <message>"` consumed by tests
//! and tooling, and an annotated-source mode for humans.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::line_index::LineIndex;
use super::{Diagnostic, Diagnostics, Severity};

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: &'s str,
    path: &'s str,
    styled: bool,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics, source: &'s str, path: &'s str) -> Self {
        Self {
            diagnostics,
            source,
            path,
            styled: false,
            colored: false,
        }
    }

    /// Renders annotated source excerpts instead of plain lines.
    pub fn styled(mut self, value: bool) -> Self {
        self.styled = value;
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.styled {
            self.format_styled(w)
        } else {
            self.format_plain(w)
        }
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        let index = LineIndex::new(self.source);
        for diag in self.diagnostics.iter() {
            self.format_one_plain(w, diag, &index)?;
        }
        Ok(())
    }

    fn format_one_plain(
        &self,
        w: &mut impl Write,
        diag: &Diagnostic,
        index: &LineIndex,
    ) -> std::fmt::Result {
        let code = diag.kind.code();
        let pos = index.range_start(diag.range);
        writeln!(
            w,
            "{}: [E{code}] {}:{}:{}: {}",
            diag.severity(),
            self.path,
            pos.line,
            pos.col,
            diag.message
        )?;
        if let Some(suggestion) = &diag.suggestion {
            writeln!(w, "    suggestion: {suggestion}")?;
        }
        for note in &diag.notes {
            let file = note.file.as_deref().unwrap_or(self.path);
            // Foreign files are not indexed; their coordinates render as unknown.
            let pos = if note.file.is_none() {
                index.range_start(note.range)
            } else {
                super::LineCol::UNKNOWN
            };
            writeln!(
                w,
                "{}: [E{code}] {file}:{}:{}: {}",
                Severity::Note,
                pos.line,
                pos.col,
                note.message
            )?;
        }
        Ok(())
    }

    fn format_styled(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            let range = match diag.range {
                Some(range) => adjust_range(range, self.source.len()),
                None => 0..0,
            };

            let mut snippet = Snippet::source(self.source).line_start(1).annotation(
                AnnotationKind::Primary
                    .span(range.clone())
                    .label(&diag.message),
            );
            snippet = snippet.path(self.path);

            for note in &diag.notes {
                // Only in-file notes can annotate the snippet.
                if note.file.is_none()
                    && let Some(note_range) = note.range
                {
                    snippet = snippet.annotation(
                        AnnotationKind::Context
                            .span(adjust_range(note_range, self.source.len()))
                            .label(&note.message),
                    );
                }
            }

            let level = severity_to_level(diag.severity());
            let title_group = level.primary_title(&diag.message).element(snippet);

            let mut report: Vec<Group> = vec![title_group];

            if let Some(suggestion) = &diag.suggestion {
                report.push(Group::with_title(Level::HELP.secondary_title(suggestion)));
            }
            for note in &diag.notes {
                if note.file.is_some() || note.range.is_none() {
                    report.push(Group::with_title(Level::NOTE.secondary_title(&note.message)));
                }
            }

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
        Severity::Note => Level::NOTE,
    }
}

fn adjust_range(range: rowan::TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}

impl Diagnostics {
    pub fn printer<'d, 's>(&'d self, source: &'s str, path: &'s str) -> DiagnosticsPrinter<'d, 's> {
        DiagnosticsPrinter::new(self, source, path)
    }
}
