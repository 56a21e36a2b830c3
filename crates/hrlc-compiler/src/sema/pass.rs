//! The tree-walking pass framework.
//!
//! Passes communicate only through AST mutations, node attributes, and the
//! shared symbol table. A pass's status is `Err(kind)` carrying the id of
//! the first fatal diagnostic it produced; warnings never fail a pass.
//!
//! ## Deferred mutation
//!
//! A visitor standing on a node may request its own replacement or removal;
//! the request is keyed by the node and fulfilled by the parent right after
//! the child visitor returns ([`walk_children`] does this for the default
//! traversal). Nothing mutates a child list while it is being iterated.

use std::collections::HashMap;

use crate::ast::{Ast, NodeId};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::sema::SymbolTable;

/// `Err` carries the id of the first fatal diagnostic.
pub type PassStatus = Result<(), DiagnosticKind>;

/// Keeps the first fatal status.
pub fn merge_status(status: &mut PassStatus, rc: PassStatus) {
    if status.is_ok() {
        *status = rc;
    }
}

/// Everything a pass may touch while running.
pub struct PassContext<'a> {
    pub ast: &'a mut Ast,
    pub symbols: &'a mut SymbolTable,
    pub diagnostics: &'a mut Diagnostics,
    pub filename: &'a str,
}

/// A mutation requested by a child visitor, applied by its parent.
pub enum ChildEdit {
    Replace(NodeId),
    Remove,
}

/// Ancestor stack plus the pending mutation requests of one traversal.
#[derive(Default)]
pub struct TreeWalk {
    ancestors: Vec<NodeId>,
    edits: HashMap<NodeId, ChildEdit>,
}

impl TreeWalk {
    pub fn enter(&mut self, node: NodeId) {
        self.ancestors.push(node);
    }

    pub fn leave(&mut self) {
        self.ancestors.pop();
    }

    /// The node currently being visited.
    pub fn current(&self) -> NodeId {
        *self.ancestors.last().expect("visit in progress")
    }

    /// The parent of the current node, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.ancestors.len().checked_sub(2).map(|i| self.ancestors[i])
    }

    /// Ancestors from the root down to and including the current node.
    pub fn ancestors(&self) -> &[NodeId] {
        &self.ancestors
    }

    /// Asks the parent to substitute the current node after this visit.
    pub fn request_replace_self(&mut self, replacement: NodeId) {
        self.edits.insert(self.current(), ChildEdit::Replace(replacement));
    }

    /// Asks the parent to drop the current node after this visit.
    pub fn request_remove_self(&mut self) {
        self.edits.insert(self.current(), ChildEdit::Remove);
    }

    pub fn take_edit(&mut self, node: NodeId) -> Option<ChildEdit> {
        self.edits.remove(&node)
    }

    pub fn reset(&mut self) {
        self.ancestors.clear();
        self.edits.clear();
    }
}

/// A tree-walking pass with the default walk-children traversal.
pub trait AstPass: Sized {
    fn tree(&mut self) -> &mut TreeWalk;

    /// Visits one node, maintaining the ancestor stack around it.
    fn visit_node(&mut self, ctx: &mut PassContext<'_>, node: NodeId) -> PassStatus {
        self.tree().enter(node);
        let status = self.visit(ctx, node);
        self.tree().leave();
        status
    }

    /// Per-node behavior; the default just recurses.
    fn visit(&mut self, ctx: &mut PassContext<'_>, node: NodeId) -> PassStatus {
        walk_children(self, ctx, node)
    }
}

/// Visits every child of `node` and applies each child's pending edit after
/// its visitor returns. Statuses accumulate; traversal does not stop early.
pub fn walk_children<P: AstPass>(
    pass: &mut P,
    ctx: &mut PassContext<'_>,
    node: NodeId,
) -> PassStatus {
    let mut status = Ok(());
    for child in ctx.ast.child_ids(node) {
        let rc = pass.visit_node(ctx, child);
        merge_status(&mut status, rc);
        apply_child_edit(pass, ctx, node, child);
    }
    status
}

/// Fulfils a child's replacement/removal request, if one is pending.
pub fn apply_child_edit<P: AstPass>(
    pass: &mut P,
    ctx: &mut PassContext<'_>,
    parent: NodeId,
    child: NodeId,
) {
    if let Some(edit) = pass.tree().take_edit(child) {
        match edit {
            ChildEdit::Replace(new) => {
                ctx.ast.replace_child(parent, child, new);
            }
            ChildEdit::Remove => {
                ctx.ast.remove_child(parent, child);
            }
        }
    }
}

/// A pipeline stage the pass manager can run.
pub trait SemanticPass {
    fn name(&self) -> &'static str;

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus;
}
