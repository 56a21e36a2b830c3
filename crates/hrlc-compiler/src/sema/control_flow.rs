//! Control-flow verification.
//!
//! Three properties: `break`/`continue` bind to an enclosing loop inside
//! the same subroutine, `return` binds to its subroutine with the right
//! value shape, and every path through a function body returns a value.
//! Successful bindings leave a `ControlContext` attribute pointing at the
//! enclosing construct.

use crate::ast::{NodeId, NodeKind};
use crate::diagnostics::DiagnosticKind;
use crate::sema::pass::{
    AstPass, PassContext, PassStatus, SemanticPass, TreeWalk, merge_status, walk_children,
};

pub struct ControlFlowVerificationPass {
    tree: TreeWalk,
    /// One "did this region return" flag per open branch.
    return_records: Vec<bool>,
}

impl ControlFlowVerificationPass {
    pub fn new() -> Self {
        Self {
            tree: TreeWalk::default(),
            return_records: Vec::new(),
        }
    }
}

impl Default for ControlFlowVerificationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticPass for ControlFlowVerificationPass {
    fn name(&self) -> &'static str {
        "control-flow-verification"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        self.tree.reset();
        self.return_records.clear();
        let root = ctx.ast.root();
        self.visit_node(ctx, root)
    }
}

impl AstPass for ControlFlowVerificationPass {
    fn tree(&mut self) -> &mut TreeWalk {
        &mut self.tree
    }

    fn visit(&mut self, ctx: &mut PassContext<'_>, node: NodeId) -> PassStatus {
        match ctx.ast.kind(node).clone() {
            NodeKind::Subprocedure { name, body, .. } => {
                self.visit_subroutine(ctx, name, body, false)
            }
            NodeKind::Function { name, body, .. } => self.visit_subroutine(ctx, name, body, true),
            NodeKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                let mut status = Ok(());

                self.return_records.push(false);
                let rc = self.visit_node(ctx, then_branch);
                merge_status(&mut status, rc);
                let then_returned = self.return_records.pop().unwrap_or(false);

                let else_returned = match else_branch {
                    Some(else_branch) => {
                        self.return_records.push(false);
                        let rc = self.visit_node(ctx, else_branch);
                        merge_status(&mut status, rc);
                        self.return_records.pop().unwrap_or(false)
                    }
                    None => false,
                };

                // The statement guarantees a return only when both branches do.
                if then_returned && else_returned {
                    self.mark_returned();
                }
                status
            }
            NodeKind::While { .. } | NodeKind::For { .. } => {
                // A loop body may never execute, so returns inside it do not
                // count towards the enclosing region.
                self.return_records.push(false);
                let status = walk_children(self, ctx, node);
                self.return_records.pop();
                status
            }
            NodeKind::Return { value } => self.visit_return(ctx, node, value.is_some()),
            NodeKind::Break => self.check_loop_control(ctx, node, "break"),
            NodeKind::Continue => self.check_loop_control(ctx, node, "continue"),
            _ => walk_children(self, ctx, node),
        }
    }
}

impl ControlFlowVerificationPass {
    fn mark_returned(&mut self) {
        if let Some(top) = self.return_records.last_mut() {
            *top = true;
        }
    }

    fn visit_subroutine(
        &mut self,
        ctx: &mut PassContext<'_>,
        name: String,
        body: NodeId,
        expects_return: bool,
    ) -> PassStatus {
        self.return_records.push(false);
        let mut status = self.visit_node(ctx, body);
        let returned = self.return_records.pop().unwrap_or(false);

        if expects_return && !returned {
            ctx.diagnostics
                .report(DiagnosticKind::NotAllPathsReturn, ctx.ast.span(body))
                .message(format!(
                    "Not all code paths in function '{name}' return a value."
                ))
                .emit();
            merge_status(&mut status, Err(DiagnosticKind::NotAllPathsReturn));
        }
        status
    }

    fn visit_return(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        has_value: bool,
    ) -> PassStatus {
        // The nearest enclosing subroutine on the ancestor chain is the
        // return's context.
        let enclosing = self
            .tree
            .ancestors()
            .iter()
            .rev()
            .skip(1)
            .copied()
            .find(|&a| ctx.ast.kind(a).is_subroutine());

        let Some(subroutine) = enclosing else {
            ctx.diagnostics
                .report(DiagnosticKind::InvalidReturnContext, ctx.ast.span(node))
                .message(
                    "Invalid 'return' statement. 'return' can only be used inside a function \
                     or subprocedure.",
                )
                .emit();
            return Err(DiagnosticKind::InvalidReturnContext);
        };

        ctx.ast.set_control_context(node, subroutine);
        self.mark_returned();

        let (name, expects_value) = match ctx.ast.kind(subroutine) {
            NodeKind::Function { name, .. } => (name.clone(), true),
            NodeKind::Subprocedure { name, .. } => (name.clone(), false),
            _ => return Ok(()),
        };

        if expects_value && !has_value {
            ctx.diagnostics
                .report(DiagnosticKind::ExpectReturnValue, ctx.ast.span(node))
                .message(format!(
                    "Missing return value in function '{name}'. The function '{name}' is \
                     expected to return a value, but no value is returned."
                ))
                .emit();
            return Err(DiagnosticKind::ExpectReturnValue);
        }
        if !expects_value && has_value {
            ctx.diagnostics
                .report(DiagnosticKind::ReturnValueNotAllowed, ctx.ast.span(node))
                .message(format!(
                    "Invalid return value in subprocedure '{name}'. The subprocedure \
                     '{name}' cannot return a value, but a return value is provided."
                ))
                .emit();
            return Err(DiagnosticKind::ReturnValueNotAllowed);
        }
        Ok(())
    }

    /// Walks the ancestor chain for the nearest loop, stopping at the first
    /// subroutine boundary.
    fn check_loop_control(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        what: &str,
    ) -> PassStatus {
        for &ancestor in self.tree.ancestors().iter().rev().skip(1) {
            let kind = ctx.ast.kind(ancestor);
            if kind.is_loop() {
                ctx.ast.set_control_context(node, ancestor);
                return Ok(());
            }
            if kind.is_subroutine() {
                break;
            }
        }

        ctx.diagnostics
            .report(DiagnosticKind::InvalidLoopControlContext, ctx.ast.span(node))
            .message(format!(
                "Invalid '{what}' statement. '{what}' can only be used inside a loop (for/while)."
            ))
            .emit();
        Err(DiagnosticKind::InvalidLoopControlContext)
    }
}
