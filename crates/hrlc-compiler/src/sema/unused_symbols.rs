//! Unused-variable elimination.
//!
//! Two passes over the tree: collection seeds the unused set with every
//! variable symbol declared in the current file and clears entries as uses
//! are encountered; mutation removes declarations that stayed in the set.
//! Globals at the compilation unit are exported and therefore exempt.
//!
//! A declaration's own initializer does not count as a use of the declared
//! variable (otherwise initialized declarations could never be removed),
//! but reads inside the initializer do count for the variables they read.
//! A standalone assignment does count as a use: the analysis cannot see
//! whether a later re-analysis will read the stored value.

use indexmap::IndexSet;

use crate::ast::{NodeId, NodeKind};
use crate::diagnostics::DiagnosticKind;
use crate::sema::pass::{
    AstPass, PassContext, PassStatus, SemanticPass, TreeWalk, apply_child_edit, merge_status,
    walk_children,
};
use crate::sema::symbol::{SymbolId, SymbolKind};

#[derive(PartialEq, Clone, Copy)]
enum Phase {
    Collection,
    Mutation,
}

pub struct UnusedSymbolEliminationPass {
    tree: TreeWalk,
    unused: IndexSet<SymbolId>,
    phase: Phase,
}

impl UnusedSymbolEliminationPass {
    pub fn new() -> Self {
        Self {
            tree: TreeWalk::default(),
            unused: IndexSet::new(),
            phase: Phase::Collection,
        }
    }
}

impl Default for UnusedSymbolEliminationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticPass for UnusedSymbolEliminationPass {
    fn name(&self) -> &'static str {
        "unused-symbol-elimination"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        self.unused = ctx
            .symbols
            .all_symbols()
            .filter(|(_, symbol)| {
                symbol.kind == SymbolKind::Variable && symbol.filename == ctx.filename
            })
            .map(|(id, _)| id)
            .collect();

        let root = ctx.ast.root();

        self.phase = Phase::Collection;
        self.tree.reset();
        let mut status = self.visit_node(ctx, root);

        self.phase = Phase::Mutation;
        self.tree.reset();
        let rc = self.visit_node(ctx, root);
        merge_status(&mut status, rc);
        status
    }
}

impl AstPass for UnusedSymbolEliminationPass {
    fn tree(&mut self) -> &mut TreeWalk {
        &mut self.tree
    }

    fn visit(&mut self, ctx: &mut PassContext<'_>, node: NodeId) -> PassStatus {
        match ctx.ast.kind(node).clone() {
            NodeKind::VariableDeclaration { assignment, .. } => match self.phase {
                Phase::Collection => {
                    // Skip the initializer's own assignment, but count reads
                    // inside its value expression.
                    if let Some(assignment) = assignment
                        && let NodeKind::VariableAssignment { value, .. } =
                            *ctx.ast.kind(assignment)
                    {
                        return self.visit_node(ctx, value);
                    }
                    Ok(())
                }
                Phase::Mutation => {
                    if let Some(symbol) = ctx.ast.symbol(node)
                        && self.unused.contains(&symbol)
                    {
                        self.report_unused(ctx, node);
                        self.tree.request_remove_self();
                    }
                    Ok(())
                }
            },
            NodeKind::VariableAssignment { .. }
            | NodeKind::VariableAccess { .. }
            | NodeKind::Increment { .. }
            | NodeKind::Decrement { .. } => {
                if self.phase == Phase::Collection
                    && let Some(symbol) = ctx.ast.symbol(node)
                {
                    self.unused.shift_remove(&symbol);
                }
                walk_children(self, ctx, node)
            }
            NodeKind::CompilationUnit { subroutines, .. } if self.phase == Phase::Mutation => {
                // Globals are exported; only subroutine bodies are cleaned.
                let mut status = Ok(());
                for subroutine in subroutines {
                    let rc = self.visit_node(ctx, subroutine);
                    merge_status(&mut status, rc);
                    apply_child_edit(self, ctx, node, subroutine);
                }
                status
            }
            _ => walk_children(self, ctx, node),
        }
    }
}

impl UnusedSymbolEliminationPass {
    fn report_unused(&mut self, ctx: &mut PassContext<'_>, node: NodeId) {
        let name = ctx.ast.kind(node).name().unwrap_or_default().to_string();
        ctx.diagnostics
            .report(DiagnosticKind::VarUnused, ctx.ast.span(node))
            .message(format!("Variable '{name}' defined but not used."))
            .emit();
    }
}
