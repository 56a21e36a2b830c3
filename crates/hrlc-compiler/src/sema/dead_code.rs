//! Dead-code elimination.
//!
//! Runs after constant folding: removes empty statements, reduces constant
//! `if` statements to their taken branch, drops `while (false)` loops,
//! marks `while (true)` loops as infinite, and truncates statement lists
//! after an early exit or an infinite loop. Everything removed is reported
//! as a dead-code warning; the pass itself never fails.

use std::collections::HashSet;

use rowan::TextRange;

use crate::ast::{NodeId, NodeKind};
use crate::diagnostics::DiagnosticKind;
use crate::sema::pass::{
    AstPass, ChildEdit, PassContext, PassStatus, SemanticPass, TreeWalk, merge_status,
    walk_children,
};

#[derive(Clone, Copy)]
enum DeadCodeReason {
    EndOfFlow,
    ConstantFalse,
    ConstantTrue,
    AfterInfiniteLoop,
}

impl DeadCodeReason {
    fn describe(self) -> &'static str {
        match self {
            DeadCodeReason::EndOfFlow => "end of control flow",
            DeadCodeReason::ConstantFalse => "constant false condition",
            DeadCodeReason::ConstantTrue => "constant true condition",
            DeadCodeReason::AfterInfiniteLoop => "after infinite loop",
        }
    }
}

pub struct DeadCodeEliminationPass {
    tree: TreeWalk,
    /// `while (true)` loops found during this run.
    infinite_loops: HashSet<NodeId>,
}

impl DeadCodeEliminationPass {
    pub fn new() -> Self {
        Self {
            tree: TreeWalk::default(),
            infinite_loops: HashSet::new(),
        }
    }
}

impl Default for DeadCodeEliminationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticPass for DeadCodeEliminationPass {
    fn name(&self) -> &'static str {
        "dead-code-elimination"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        self.tree.reset();
        self.infinite_loops.clear();
        let root = ctx.ast.root();
        self.visit_node(ctx, root)
    }
}

impl AstPass for DeadCodeEliminationPass {
    fn tree(&mut self) -> &mut TreeWalk {
        &mut self.tree
    }

    fn visit(&mut self, ctx: &mut PassContext<'_>, node: NodeId) -> PassStatus {
        match ctx.ast.kind(node).clone() {
            NodeKind::Empty => {
                self.tree.request_remove_self();
                Ok(())
            }
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.visit_if(ctx, node, condition, then_branch, else_branch),
            NodeKind::While { condition, body } => {
                match ctx.ast.const_fold(condition) {
                    Some(folded) if folded.value != 0 => {
                        self.infinite_loops.insert(node);
                    }
                    Some(_) => {
                        // `while (false)` never runs; the whole loop goes.
                        self.report_dead(ctx, ctx.ast.span(body), DeadCodeReason::ConstantFalse);
                        self.tree.request_remove_self();
                        return Ok(());
                    }
                    None => {}
                }
                walk_children(self, ctx, node)
            }
            NodeKind::Block { statements } => self.visit_block(ctx, node, statements),
            _ => walk_children(self, ctx, node),
        }
    }
}

impl DeadCodeEliminationPass {
    fn visit_if(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    ) -> PassStatus {
        let Some(folded) = ctx.ast.const_fold(condition) else {
            return walk_children(self, ctx, node);
        };

        if folded.value != 0 {
            // Constant true: the else branch is dead; the then branch
            // replaces the whole statement.
            if let Some(else_branch) = else_branch {
                self.report_dead(ctx, ctx.ast.span(else_branch), DeadCodeReason::ConstantTrue);
            }
            let status = self.visit_and_apply(ctx, node, then_branch);
            self.promote_branch(ctx, node, |kind| match kind {
                NodeKind::If { then_branch, .. } => Some(*then_branch),
                _ => None,
            });
            status
        } else {
            // Constant false: the then branch is dead; the else branch (if
            // any) replaces the whole statement.
            self.report_dead(ctx, ctx.ast.span(then_branch), DeadCodeReason::ConstantFalse);
            let Some(else_branch) = else_branch else {
                self.tree.request_remove_self();
                return Ok(());
            };
            let status = self.visit_and_apply(ctx, node, else_branch);
            self.promote_branch(ctx, node, |kind| match kind {
                NodeKind::If { else_branch, .. } => *else_branch,
                _ => None,
            });
            status
        }
    }

    /// Visits one child and applies its pending edit to this node's slots.
    fn visit_and_apply(
        &mut self,
        ctx: &mut PassContext<'_>,
        parent: NodeId,
        child: NodeId,
    ) -> PassStatus {
        let status = self.visit_node(ctx, child);
        if let Some(edit) = self.tree.take_edit(child) {
            match edit {
                ChildEdit::Replace(new) => {
                    ctx.ast.replace_child(parent, child, new);
                }
                ChildEdit::Remove => {
                    ctx.ast.remove_child(parent, child);
                }
            }
        }
        status
    }

    /// Replaces this `if` with the surviving branch (re-read from the node,
    /// since the branch's own visit may have rewritten it). A branch that
    /// collapsed to an empty statement removes the `if` entirely.
    fn promote_branch(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        pick: impl FnOnce(&NodeKind) -> Option<NodeId>,
    ) {
        let Some(branch) = pick(ctx.ast.kind(node)) else {
            self.tree.request_remove_self();
            return;
        };
        if matches!(ctx.ast.kind(branch), NodeKind::Empty) {
            self.tree.request_remove_self();
        } else {
            self.tree.request_replace_self(branch);
        }
    }

    fn visit_block(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        statements: Vec<NodeId>,
    ) -> PassStatus {
        let mut status = Ok(());
        let mut kept = Vec::with_capacity(statements.len());
        let last_span = statements
            .last()
            .map(|&s| ctx.ast.span(s))
            .unwrap_or_else(|| ctx.ast.span(node));

        for (i, stmt) in statements.iter().copied().enumerate() {
            let ends_flow = matches!(
                ctx.ast.kind(stmt),
                NodeKind::Return { .. } | NodeKind::Break | NodeKind::Continue
            );
            if ends_flow {
                kept.push(stmt);
                if let Some(&next) = statements.get(i + 1) {
                    let span = TextRange::new(ctx.ast.span(next).start(), last_span.end());
                    self.report_dead(ctx, span, DeadCodeReason::EndOfFlow);
                }
                break;
            }

            let rc = self.visit_node(ctx, stmt);
            merge_status(&mut status, rc);

            let surviving = match self.tree.take_edit(stmt) {
                Some(ChildEdit::Replace(new)) => {
                    kept.push(new);
                    Some(new)
                }
                Some(ChildEdit::Remove) => None,
                None => {
                    kept.push(stmt);
                    Some(stmt)
                }
            };

            // Nothing after an infinite loop runs.
            if let Some(surviving) = surviving
                && self.infinite_loops.contains(&surviving)
                && let Some(&next) = statements.get(i + 1)
            {
                let span = TextRange::new(ctx.ast.span(next).start(), last_span.end());
                self.report_dead(ctx, span, DeadCodeReason::AfterInfiniteLoop);
                break;
            }
        }

        if let NodeKind::Block { statements } = &mut ctx.ast.node_mut(node).kind {
            *statements = kept;
        }
        status
    }

    fn report_dead(&mut self, ctx: &mut PassContext<'_>, span: TextRange, reason: DeadCodeReason) {
        ctx.diagnostics
            .report(DiagnosticKind::DeadCode, span)
            .message(format!(
                "Dead code detected. Code is unreachable due to '{}'.",
                reason.describe()
            ))
            .emit();
    }
}
