//! Staged compilation facade.

use crate::ast::{Ast, lower};
use crate::diagnostics::{Diagnostics, DiagnosticsPrinter};
use crate::parser::{self, SyntaxNode, ptree};
use crate::sema::{PassManager, PassStatus, SymbolTable};
use crate::{Error, Result};

/// Pipeline configuration.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Run the optimistic phase (folding, dead-code and unused-variable
    /// elimination) before the final analysis phase.
    pub optimize: bool,
    /// Stop at the first failing pass instead of running the whole pipeline.
    pub fail_fast: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            fail_fast: true,
        }
    }
}

/// Entry point: a named source ready to be parsed.
pub struct Compiler {
    filename: String,
    source: String,
}

impl Compiler {
    pub fn new(filename: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source: source.into(),
        }
    }

    pub fn parse(self) -> Result<ParsedUnit> {
        let result = parser::parse(&self.source)?;
        Ok(ParsedUnit {
            filename: self.filename,
            source: self.source,
            root: result.root,
            diagnostics: result.diagnostics,
        })
    }
}

/// A parsed source: lossless tree plus parse diagnostics.
pub struct ParsedUnit {
    filename: String,
    source: String,
    root: SyntaxNode,
    diagnostics: Diagnostics,
}

impl ParsedUnit {
    pub fn syntax(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn compilation_unit(&self) -> Option<ptree::CompilationUnit> {
        ptree::CompilationUnit::cast_root(self.root.clone())
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Lowers to the AST and runs the semantic pipeline. A tree with syntax
    /// errors is never lowered; it comes back as [`Error::SyntaxErrors`].
    pub fn analyze(self, options: CompileOptions) -> Result<AnalyzedUnit> {
        if self.diagnostics.has_errors() {
            return Err(Error::SyntaxErrors(self.diagnostics));
        }
        let unit = self
            .compilation_unit()
            .expect("parser always produces a compilation unit");
        let ast = lower(&unit);

        let mut manager =
            PassManager::new(ast, self.filename.as_str()).with_diagnostics(self.diagnostics);
        manager.add_default_pipeline(options.optimize);
        let status = manager.run(options.fail_fast);
        let (ast, symbols, diagnostics) = manager.into_artifacts();

        Ok(AnalyzedUnit {
            filename: self.filename,
            source: self.source,
            ast,
            symbols,
            diagnostics,
            status,
        })
    }
}

/// The pipeline's output: annotated AST, symbol table, diagnostics, and the
/// aggregate pass status.
pub struct AnalyzedUnit {
    pub filename: String,
    pub source: String,
    pub ast: Ast,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    pub status: PassStatus,
}

impl AnalyzedUnit {
    pub fn is_valid(&self) -> bool {
        self.status.is_ok() && !self.diagnostics.has_errors()
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        self.diagnostics.printer(&self.source, &self.filename)
    }
}

/// Parses and analyzes in one step.
pub fn compile(
    filename: impl Into<String>,
    source: impl Into<String>,
    options: CompileOptions,
) -> Result<AnalyzedUnit> {
    Compiler::new(filename, source).parse()?.analyze(options)
}
