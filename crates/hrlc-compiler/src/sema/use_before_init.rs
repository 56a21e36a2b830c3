//! Use-before-initialization data flow.
//!
//! Forward "definitely assigned" analysis as a tree walk. Every variable
//! symbol keeps a stack of assignment flags, one entry per open scope
//! region; scope entry copies the current flag, scope exit pops it and
//! yields the branch's post-state. `if` merges branch post-states with AND;
//! loops and subroutines traverse their body and then discard it, because
//! the body may never execute.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::ast::{NodeId, NodeKind};
use crate::diagnostics::DiagnosticKind;
use crate::sema::pass::{
    AstPass, PassContext, PassStatus, SemanticPass, TreeWalk, merge_status, walk_children,
};
use crate::sema::scope::ScopeId;
use crate::sema::symbol::SymbolId;

/// Post-state of one branch: the assignment flag of every symbol tracked in
/// the branch's scope region.
type BranchState = IndexMap<SymbolId, bool>;

pub struct UseBeforeInitPass {
    tree: TreeWalk,
    /// Per-symbol stacks of "definitely assigned" flags.
    stacks: HashMap<SymbolId, Vec<bool>>,
    /// Symbols tracked per open scope region, innermost last.
    seen: Vec<IndexSet<SymbolId>>,
    /// First fatal diagnostic; the pass fails fast once set.
    error: Option<DiagnosticKind>,
}

impl UseBeforeInitPass {
    pub fn new() -> Self {
        Self {
            tree: TreeWalk::default(),
            stacks: HashMap::new(),
            seen: Vec::new(),
            error: None,
        }
    }
}

impl Default for UseBeforeInitPass {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticPass for UseBeforeInitPass {
    fn name(&self) -> &'static str {
        "use-before-init"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        self.tree.reset();
        self.stacks.clear();
        self.seen = vec![IndexSet::new()];
        self.error = None;

        let root = ctx.ast.root();
        self.visit_node(ctx, root)
    }
}

impl AstPass for UseBeforeInitPass {
    fn tree(&mut self) -> &mut TreeWalk {
        &mut self.tree
    }

    fn visit(&mut self, ctx: &mut PassContext<'_>, node: NodeId) -> PassStatus {
        if let Some(error) = self.error {
            return Err(error);
        }

        let kind = ctx.ast.kind(node).clone();
        match kind {
            NodeKind::VariableDeclaration { .. } => {
                if let Some(symbol) = ctx.ast.symbol(node) {
                    self.declare(symbol);
                }
                walk_children(self, ctx, node)
            }
            NodeKind::VariableAssignment { .. } => {
                let status = walk_children(self, ctx, node);
                if status.is_ok()
                    && let Some(symbol) = ctx.ast.symbol(node)
                {
                    self.assign(symbol);
                }
                status
            }
            NodeKind::VariableAccess { .. }
            | NodeKind::Increment { .. }
            | NodeKind::Decrement { .. } => match ctx.ast.symbol(node) {
                Some(symbol) => self.check_use(ctx, node, symbol),
                None => Ok(()),
            },
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut status = self.visit_node(ctx, condition);

                let (then_state, rc) =
                    self.with_scope(ctx, |pass, ctx| pass.visit_node(ctx, then_branch));
                merge_status(&mut status, rc);

                let else_state = match else_branch {
                    Some(else_branch) => {
                        let (state, rc) =
                            self.with_scope(ctx, |pass, ctx| pass.visit_node(ctx, else_branch));
                        merge_status(&mut status, rc);
                        state
                    }
                    None => BranchState::new(),
                };

                // A symbol is assigned after the `if` only if both branches
                // assigned it; a missing branch assigns nothing.
                let mut merged = BranchState::new();
                for symbol in then_state.keys().chain(else_state.keys()) {
                    let both = then_state.get(symbol).copied().unwrap_or(false)
                        && else_state.get(symbol).copied().unwrap_or(false);
                    merged.insert(*symbol, both);
                }

                if let Some(scope) = self.node_scope(ctx, node) {
                    self.apply_state(ctx, merged, &scope);
                }
                status
            }
            NodeKind::While { condition, body } => {
                let mut status = self.visit_node(ctx, condition);
                // One traversal for soundness of uses inside; the post-state
                // is discarded because the loop may not execute.
                let (_, rc) = self.with_scope(ctx, |pass, ctx| pass.visit_node(ctx, body));
                merge_status(&mut status, rc);
                status
            }
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => {
                // Init, cond, update, and body share one scope region.
                let (_, status) = self.with_scope(ctx, |pass, ctx| {
                    let mut status = Ok(());
                    for child in [init, condition, update, Some(body)].into_iter().flatten() {
                        let rc = pass.visit_node(ctx, child);
                        merge_status(&mut status, rc);
                    }
                    status
                });
                status
            }
            NodeKind::Block { .. } => {
                if self.parent_owns_block_scope(ctx) {
                    walk_children(self, ctx, node)
                } else {
                    // A bare block always executes, so its post-state flows
                    // into the surrounding scope (minus its own locals).
                    let (state, status) =
                        self.with_scope(ctx, |pass, ctx| walk_children(pass, ctx, node));
                    if let Some(scope) = self.node_scope(ctx, node) {
                        self.apply_state(ctx, state, &scope);
                    }
                    status
                }
            }
            NodeKind::Subprocedure { parameter, body, .. }
            | NodeKind::Function { parameter, body, .. } => {
                let (_, status) = self.with_scope(ctx, |pass, ctx| {
                    if parameter.is_some()
                        && let Some(info) = ctx.ast.scope_info(node)
                    {
                        // The parameter arrives initialized. Its symbol lives
                        // in the subroutine's own scope.
                        let sub_scope = info.id.child(
                            ctx.ast.kind(node).name().unwrap_or_default(),
                        );
                        if let Some(param) = parameter
                            .as_deref()
                            .and_then(|p| ctx.symbols.lookup(&sub_scope, p))
                        {
                            pass.declare(param);
                            pass.assign(param);
                        }
                    }
                    pass.visit_node(ctx, body)
                });
                status
            }
            _ => walk_children(self, ctx, node),
        }
    }
}

impl UseBeforeInitPass {
    fn parent_owns_block_scope(&self, ctx: &PassContext<'_>) -> bool {
        let Some(parent) = self.tree.parent() else {
            return false;
        };
        let parent_kind = ctx.ast.kind(parent);
        parent_kind.is_loop()
            || parent_kind.is_subroutine()
            || matches!(parent_kind, NodeKind::If { .. })
    }

    /// Scope the node itself sits in (attached by symbol analysis).
    fn node_scope(&self, ctx: &PassContext<'_>, node: NodeId) -> Option<ScopeId> {
        ctx.ast.scope_info(node).map(|info| info.id.clone())
    }

    /// Runs `f` inside a fresh scope region and returns its post-state.
    fn with_scope<F>(&mut self, ctx: &mut PassContext<'_>, f: F) -> (BranchState, PassStatus)
    where
        F: FnOnce(&mut Self, &mut PassContext<'_>) -> PassStatus,
    {
        self.scope_enter();
        let status = f(self, ctx);
        (self.scope_exit(), status)
    }

    fn scope_enter(&mut self) {
        let outer = self.seen.last().cloned().unwrap_or_default();
        let mut tracked = IndexSet::new();
        for symbol in outer {
            if let Some(stack) = self.stacks.get_mut(&symbol) {
                let top = *stack.last().expect("stacks in the map are never empty");
                stack.push(top);
                tracked.insert(symbol);
            }
        }
        self.seen.push(tracked);
    }

    fn scope_exit(&mut self) -> BranchState {
        let tracked = self.seen.pop().expect("scope regions are balanced");
        let mut state = BranchState::new();
        for symbol in tracked {
            if let Some(stack) = self.stacks.get_mut(&symbol) {
                if let Some(flag) = stack.pop() {
                    state.insert(symbol, flag);
                }
                if stack.is_empty() {
                    // Declared in the region that just ended.
                    self.stacks.remove(&symbol);
                }
            }
        }
        state
    }

    fn declare(&mut self, symbol: SymbolId) {
        self.stacks.insert(symbol, vec![false]);
        if let Some(top) = self.seen.last_mut() {
            top.insert(symbol);
        }
    }

    fn assign(&mut self, symbol: SymbolId) {
        if let Some(stack) = self.stacks.get_mut(&symbol)
            && let Some(flag) = stack.last_mut()
        {
            *flag = true;
            if let Some(top) = self.seen.last_mut() {
                top.insert(symbol);
            }
        }
    }

    /// Writes a merged branch state back into the current scope region,
    /// dropping symbols that are no longer visible there.
    fn apply_state(&mut self, ctx: &PassContext<'_>, state: BranchState, scope: &ScopeId) {
        for (symbol, flag) in state {
            if !ctx.symbols.visible_in(symbol, scope) {
                continue;
            }
            if let Some(stack) = self.stacks.get_mut(&symbol)
                && let Some(top) = stack.last_mut()
            {
                *top = flag;
                if let Some(tracked) = self.seen.last_mut() {
                    tracked.insert(symbol);
                }
            }
        }
    }

    fn check_use(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        symbol: SymbolId,
    ) -> PassStatus {
        let assigned = self
            .stacks
            .get(&symbol)
            .and_then(|stack| stack.last().copied())
            // Symbols without a record (broken earlier analysis) stay quiet;
            // symbol analysis already reported them.
            .unwrap_or(true);
        if assigned {
            return Ok(());
        }

        let info = ctx.symbols.symbol(symbol);
        let name = info.name.clone();
        let file = info.filename.clone();
        let def_range = info.def_site.map(|site| ctx.ast.span(site));
        ctx.diagnostics
            .report(DiagnosticKind::UseBeforeInit, ctx.ast.span(node))
            .message(format!("Variable '{name}' may be used before assignment."))
            .note_in(file, def_range, "Original defined in")
            .emit();
        self.error = Some(DiagnosticKind::UseBeforeInit);
        Err(DiagnosticKind::UseBeforeInit)
    }
}
