//! Byte-offset to line/column translation.

use rowan::{TextRange, TextSize};

/// One-based line and column, `-1` for unknown coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: i32,
    pub col: i32,
}

impl LineCol {
    pub const UNKNOWN: LineCol = LineCol { line: -1, col: -1 };
}

/// Sorted newline offsets of a source text, for O(log n) position lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self { line_starts }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = u32::from(offset);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineCol {
            line: line as i32 + 1,
            col: (offset - self.line_starts[line]) as i32 + 1,
        }
    }

    pub fn range_start(&self, range: Option<TextRange>) -> LineCol {
        match range {
            Some(range) => self.line_col(range.start()),
            None => LineCol::UNKNOWN,
        }
    }
}
