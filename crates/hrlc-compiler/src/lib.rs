//! HRL compiler frontend: parser, AST, and semantic analysis pipeline.
//!
//! This crate turns HRL source into a validated, annotated, optimized AST
//! plus a symbol table:
//! - `parser` - lexer, lossless parse tree, typed wrappers
//! - `ast` - the semantic tree arena with per-node attribute bags
//! - `sema` - the pass manager and the analysis/optimization passes
//! - `diagnostics` - error collection and rendering
//!
//! Compilation is staged the same way it runs:
//!
//! ```ignore
//! let analyzed = Compiler::new("program.hrl", source)
//!     .parse()?
//!     .analyze(CompileOptions::default())?;
//! ```

pub mod ast;
mod compile;
pub mod diagnostics;
pub mod parser;
pub mod sema;

#[cfg(test)]
pub mod test_utils;

pub use compile::{AnalyzedUnit, CompileOptions, Compiler, ParsedUnit, compile};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};

/// Errors that abort compilation outright (everything recoverable flows
/// through [`Diagnostics`] instead).
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Input nested too deeply for the parser.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    /// The source did not parse; semantic analysis never ran.
    #[error("parsing failed with {} errors", .0.error_count())]
    SyntaxErrors(Diagnostics),
}

/// Result type for compilation stages.
pub type Result<T> = std::result::Result<T, Error>;
