//! Orders and runs the semantic analysis pipeline.

use std::path::PathBuf;

use crate::ast::{Ast, AttrKind, dump};
use crate::diagnostics::Diagnostics;
use crate::sema::clear_symbol_table::ClearSymbolTablePass;
use crate::sema::const_folding::ConstantFoldingPass;
use crate::sema::control_flow::ControlFlowVerificationPass;
use crate::sema::dead_code::DeadCodeEliminationPass;
use crate::sema::pass::{PassContext, PassStatus, SemanticPass, merge_status};
use crate::sema::strip_attributes::StripAttributesPass;
use crate::sema::symbol_analysis::SymbolAnalysisPass;
use crate::sema::unused_symbols::UnusedSymbolEliminationPass;
use crate::sema::use_before_init::UseBeforeInitPass;
use crate::sema::SymbolTable;

struct PassEntry {
    pass: Box<dyn SemanticPass>,
    /// Where to write a Graphviz dump of the AST after this pass, if anywhere.
    graph_path: Option<PathBuf>,
    /// Attribute kinds included in that dump.
    graph_attrs: Vec<AttrKind>,
}

/// Owns the AST, the shared symbol table, and the diagnostics stream, and
/// runs passes strictly in insertion order.
pub struct PassManager {
    ast: Ast,
    symbols: SymbolTable,
    diagnostics: Diagnostics,
    filename: String,
    passes: Vec<PassEntry>,
}

impl PassManager {
    pub fn new(ast: Ast, filename: impl Into<String>) -> Self {
        Self {
            ast,
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
            filename: filename.into(),
            passes: Vec::new(),
        }
    }

    /// Seeds the diagnostics stream (parse output carries over so emission
    /// order stays global).
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn add_pass(&mut self, pass: Box<dyn SemanticPass>) {
        self.passes.push(PassEntry {
            pass,
            graph_path: None,
            graph_attrs: Vec::new(),
        });
    }

    pub fn add_pass_with_graph(
        &mut self,
        pass: Box<dyn SemanticPass>,
        graph_path: PathBuf,
        graph_attrs: Vec<AttrKind>,
    ) {
        self.passes.push(PassEntry {
            pass,
            graph_path: Some(graph_path),
            graph_attrs,
        });
    }

    /// The default pipeline.
    ///
    /// With optimization, an optimistic phase (which may rewrite the tree)
    /// runs first, then the analysis state is reset and the final phase
    /// produces the annotations downstream consumers see. Without
    /// optimization only the final phase runs.
    pub fn add_default_pipeline(&mut self, optimize: bool) {
        if optimize {
            self.add_pass(Box::new(SymbolAnalysisPass::new()));
            self.add_pass(Box::new(UseBeforeInitPass::new()));
            self.add_pass(Box::new(ConstantFoldingPass::new()));
            self.add_pass(Box::new(DeadCodeEliminationPass::new()));
            self.add_pass(Box::new(UnusedSymbolEliminationPass::new()));
            self.add_pass(Box::new(ClearSymbolTablePass::new()));
            self.add_pass(Box::new(StripAttributesPass::new(vec![
                AttrKind::Symbol,
                AttrKind::ScopeInfo,
            ])));
        }
        self.add_pass(Box::new(SymbolAnalysisPass::new()));
        self.add_pass(Box::new(UseBeforeInitPass::new()));
        self.add_pass(Box::new(ControlFlowVerificationPass::new()));
    }

    /// Runs the pipeline. In fail-fast mode the first failing pass stops the
    /// run; otherwise every pass runs and the first fatal status is kept.
    pub fn run(&mut self, fail_fast: bool) -> PassStatus {
        let mut status = Ok(());
        for entry in &mut self.passes {
            let mut ctx = PassContext {
                ast: &mut self.ast,
                symbols: &mut self.symbols,
                diagnostics: &mut self.diagnostics,
                filename: &self.filename,
            };
            let rc = entry.pass.run(&mut ctx);

            if let Some(path) = &entry.graph_path {
                let dot = dump::graphviz(&self.ast, Some(&self.symbols), &entry.graph_attrs);
                // A debug artifact: failing to write it never fails the pass.
                let _ = std::fs::write(path, dot);
            }

            merge_status(&mut status, rc);
            if fail_fast && rc.is_err() {
                return rc;
            }
        }
        status
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Replaces the shared symbol table, e.g. to seed bindings from an
    /// earlier run.
    pub fn set_symbol_table(&mut self, symbols: SymbolTable) {
        self.symbols = symbols;
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_artifacts(self) -> (Ast, SymbolTable, Diagnostics) {
        (self.ast, self.symbols, self.diagnostics)
    }
}
