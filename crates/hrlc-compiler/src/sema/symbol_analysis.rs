//! Symbol analysis: scope construction, name binding, signature checks.
//!
//! Walks the tree attaching a `ScopeInfo` attribute to every visited node
//! and a `Symbol` attribute to every declaration and use. Invocations are
//! queued and checked after the walk so forward references work.

use std::collections::VecDeque;

use crate::ast::{NodeId, NodeKind, ScopeInfo};
use crate::diagnostics::DiagnosticKind;
use crate::sema::pass::{
    AstPass, PassContext, PassStatus, SemanticPass, TreeWalk, merge_status, walk_children,
};
use crate::sema::scope::{ScopeKind, ScopeManager};
use crate::sema::symbol::{SymbolId, SymbolKind};

pub struct SymbolAnalysisPass {
    tree: TreeWalk,
    scopes: ScopeManager,
    pending_invocations: VecDeque<NodeId>,
}

impl SymbolAnalysisPass {
    pub fn new() -> Self {
        Self {
            tree: TreeWalk::default(),
            scopes: ScopeManager::new(),
            pending_invocations: VecDeque::new(),
        }
    }
}

impl Default for SymbolAnalysisPass {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticPass for SymbolAnalysisPass {
    fn name(&self) -> &'static str {
        "symbol-analysis"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        self.tree.reset();
        self.scopes = ScopeManager::new();
        self.pending_invocations.clear();

        let root = ctx.ast.root();
        let mut status = self.visit_node(ctx, root);
        let rc = self.check_pending_invocations(ctx);
        merge_status(&mut status, rc);
        status
    }
}

impl AstPass for SymbolAnalysisPass {
    fn tree(&mut self) -> &mut TreeWalk {
        &mut self.tree
    }

    fn visit(&mut self, ctx: &mut PassContext<'_>, node: NodeId) -> PassStatus {
        ctx.ast.set_scope_info(
            node,
            ScopeInfo {
                id: self.scopes.current_id(),
                kind: self.scopes.current_kind(),
            },
        );

        let kind = ctx.ast.kind(node).clone();
        match kind {
            NodeKind::VariableDeclaration { ref name, .. } => {
                let mut status = self.declare_variable(ctx, node, name);
                let rc = walk_children(self, ctx, node);
                merge_status(&mut status, rc);
                status
            }
            NodeKind::VariableAssignment { ref name, .. }
            | NodeKind::VariableAccess { ref name }
            | NodeKind::Increment { ref name }
            | NodeKind::Decrement { ref name } => {
                let mut status = self.bind_use(ctx, node, name);
                let rc = walk_children(self, ctx, node);
                merge_status(&mut status, rc);
                status
            }
            NodeKind::Subprocedure {
                ref name,
                ref parameter,
                body,
            } => self.visit_subroutine(ctx, node, name, parameter.as_deref(), body, false),
            NodeKind::Function {
                ref name,
                ref parameter,
                body,
            } => self.visit_subroutine(ctx, node, name, parameter.as_deref(), body, true),
            NodeKind::Invocation { .. } => {
                self.pending_invocations.push_back(node);
                walk_children(self, ctx, node)
            }
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                // The condition lives in the surrounding scope; each branch
                // gets its own anonymous sibling scope.
                let mut status = self.visit_node(ctx, condition);

                self.enter_anonymous(ctx);
                let rc = self.visit_node(ctx, then_branch);
                merge_status(&mut status, rc);
                self.scopes.exit();

                self.enter_anonymous(ctx);
                if let Some(else_branch) = else_branch {
                    let rc = self.visit_node(ctx, else_branch);
                    merge_status(&mut status, rc);
                }
                self.scopes.exit();

                status
            }
            NodeKind::While { condition, body } => {
                let mut status = self.visit_node(ctx, condition);
                self.enter_anonymous(ctx);
                let rc = self.visit_node(ctx, body);
                merge_status(&mut status, rc);
                self.scopes.exit();
                status
            }
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => {
                // One scope covers init, cond, update, and body, so loop-local
                // declarations are visible to the whole statement.
                let mut status = Ok(());
                self.enter_anonymous(ctx);
                for child in [init, condition, update, Some(body)].into_iter().flatten() {
                    let rc = self.visit_node(ctx, child);
                    merge_status(&mut status, rc);
                }
                self.scopes.exit();
                status
            }
            NodeKind::Block { .. } => {
                let transparent = self.parent_owns_block_scope(ctx);
                if transparent {
                    walk_children(self, ctx, node)
                } else {
                    self.enter_anonymous(ctx);
                    let status = walk_children(self, ctx, node);
                    self.scopes.exit();
                    status
                }
            }
            _ => walk_children(self, ctx, node),
        }
    }
}

impl SymbolAnalysisPass {
    /// Opens an anonymous scope and makes its id observable in the table.
    fn enter_anonymous(&mut self, ctx: &mut PassContext<'_>) {
        self.scopes.enter_anonymous();
        ctx.symbols.ensure_scope(&self.scopes.current_id());
    }

    /// Opens a named (subroutine) scope and makes its id observable.
    fn enter_named(&mut self, ctx: &mut PassContext<'_>, name: &str) {
        self.scopes.enter_named(name, ScopeKind::Subroutine);
        ctx.symbols.ensure_scope(&self.scopes.current_id());
    }

    /// A block nested in if/while/for or a subroutine shares the scope its
    /// parent construct already opened.
    fn parent_owns_block_scope(&self, ctx: &PassContext<'_>) -> bool {
        let Some(parent) = self.tree.parent() else {
            return false;
        };
        let parent_kind = ctx.ast.kind(parent);
        parent_kind.is_loop()
            || parent_kind.is_subroutine()
            || matches!(parent_kind, NodeKind::If { .. })
    }

    fn declare_variable(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        name: &str,
    ) -> PassStatus {
        let scope = self.scopes.current_id();
        let shadowed = ctx
            .symbols
            .lookup_with_ancestors(&scope, name)
            .filter(|(_, found_in)| *found_in != scope);

        match ctx.symbols.define_variable(&scope, name, ctx.filename, node) {
            Ok(symbol) => {
                ctx.ast.set_symbol(node, symbol);
                if let Some((existing, _)) = shadowed
                    && ctx.symbols.symbol(existing).kind == SymbolKind::Variable
                {
                    self.report_shadowing(ctx, node, name, existing);
                }
                Ok(())
            }
            Err(existing) => {
                self.report_redefinition(ctx, node, name, SymbolKind::Variable, existing);
                Err(DiagnosticKind::SymbolRedefined)
            }
        }
    }

    fn bind_use(&mut self, ctx: &mut PassContext<'_>, node: NodeId, name: &str) -> PassStatus {
        let scope = self.scopes.current_id();
        match ctx.symbols.lookup_with_ancestors(&scope, name) {
            Some((symbol, _)) => {
                ctx.ast.set_symbol(node, symbol);
                Ok(())
            }
            None => {
                self.report_undefined(ctx, node, name, SymbolKind::Variable);
                Err(DiagnosticKind::SymbolUndefined)
            }
        }
    }

    fn visit_subroutine(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        name: &str,
        parameter: Option<&str>,
        body: NodeId,
        has_return: bool,
    ) -> PassStatus {
        let scope = self.scopes.current_id();
        let mut status = Ok(());
        match ctx.symbols.define_subroutine(
            &scope,
            name,
            ctx.filename,
            node,
            parameter.is_some(),
            has_return,
        ) {
            Ok(symbol) => ctx.ast.set_symbol(node, symbol),
            Err(existing) => {
                self.report_redefinition(ctx, node, name, SymbolKind::Subroutine, existing);
                status = Err(DiagnosticKind::SymbolRedefined);
            }
        }

        self.enter_named(ctx, name);
        if let Some(param) = parameter {
            let param_scope = self.scopes.current_id();
            // The subroutine node is the parameter's definition site. A clash
            // can only happen when duplicate definitions merged their scopes,
            // and the redefinition error already covers that.
            let _ = ctx
                .symbols
                .define_variable(&param_scope, param, ctx.filename, node);
        }
        let rc = self.visit_node(ctx, body);
        merge_status(&mut status, rc);
        self.scopes.exit();

        status
    }

    fn check_pending_invocations(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        let mut status = Ok(());
        while let Some(node) = self.pending_invocations.pop_front() {
            let NodeKind::Invocation { callee, argument } = ctx.ast.kind(node).clone() else {
                continue;
            };
            let scope = ctx
                .ast
                .scope_info(node)
                .map(|info| info.id.clone())
                .unwrap_or_else(crate::sema::scope::ScopeId::root);

            let Some((symbol, _)) = ctx.symbols.lookup_with_ancestors(&scope, &callee) else {
                self.report_undefined(ctx, node, &callee, SymbolKind::Subroutine);
                merge_status(&mut status, Err(DiagnosticKind::SymbolUndefined));
                continue;
            };
            ctx.ast.set_symbol(node, symbol);

            let def = ctx.symbols.symbol(symbol);
            let node_has_param = argument.is_some();
            if def.has_param != node_has_param {
                let message = format!(
                    "signature mismatch: invoked as '{}({})' but defined as '{}'",
                    callee,
                    if node_has_param { "arg" } else { "" },
                    def.describe_signature(),
                );
                let def_file = def.filename.clone();
                let def_range = def.def_site.map(|site| ctx.ast.span(site));
                ctx.diagnostics
                    .report(DiagnosticKind::SignatureMismatch, ctx.ast.span(node))
                    .message(message)
                    .note_in(def_file, def_range, "originally defined as")
                    .emit();
                merge_status(&mut status, Err(DiagnosticKind::SignatureMismatch));
            }
        }
        status
    }

    fn report_redefinition(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        name: &str,
        kind: SymbolKind,
        existing: SymbolId,
    ) {
        let existing = ctx.symbols.symbol(existing);
        let file = existing.filename.clone();
        let def_range = existing.def_site.map(|site| ctx.ast.span(site));
        ctx.diagnostics
            .report(DiagnosticKind::SymbolRedefined, ctx.ast.span(node))
            .message(format!("Redefinition of {} '{}'.", kind.describe(), name))
            .note_in(file, def_range, "Original defined in")
            .emit();
    }

    fn report_shadowing(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        name: &str,
        existing: SymbolId,
    ) {
        let existing = ctx.symbols.symbol(existing);
        let file = existing.filename.clone();
        let def_range = existing.def_site.map(|site| ctx.ast.span(site));
        ctx.diagnostics
            .report(DiagnosticKind::VarShadowsOuter, ctx.ast.span(node))
            .message(format!(
                "Variable '{name}' shadows a variable from the outer scope."
            ))
            .note_in(file, def_range, "Originally defined in")
            .emit();
    }

    fn report_undefined(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        name: &str,
        kind: SymbolKind,
    ) {
        ctx.diagnostics
            .report(DiagnosticKind::SymbolUndefined, ctx.ast.span(node))
            .message(format!(
                "Undefined reference to '{name}'. The {} '{name}' is not declared before use.",
                kind.describe()
            ))
            .emit();
    }
}
