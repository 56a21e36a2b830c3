//! The abstract syntax tree.
//!
//! Nodes live in an arena owned by [`Ast`]; a [`NodeId`] is a stable index
//! into it. Symbols and control-context annotations refer back into the tree
//! through ids rather than pointers, which is what keeps the symbol table
//! and the tree from owning each other.
//!
//! Passes rewrite the tree through the deferred-mutation protocol in
//! `sema::pass`: a visitor requests replacement or removal of the node it is
//! standing on, and the parent applies the request after the child visitor
//! returns. The only structural operations the arena itself exposes are
//! [`Ast::replace_child`] and [`Ast::remove_child`].

mod attr;
pub mod dump;
mod lower;

#[cfg(test)]
mod lower_tests;

use rowan::TextRange;

pub use attr::{AttrBag, AttrKind, AttrValue, FoldedValue, ScopeInfo};
pub use lower::lower;

/// Stable index of a node in the [`Ast`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Binary operator tags, one per concrete operator of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
        }
    }
}

/// The node payload: one variant per concrete construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Integer {
        value: i32,
        is_char: bool,
    },
    Boolean {
        value: bool,
    },
    VariableDeclaration {
        name: String,
        /// Initializer, lowered to a nested assignment.
        assignment: Option<NodeId>,
    },
    VariableAssignment {
        name: String,
        value: NodeId,
    },
    VariableAccess {
        name: String,
    },
    Increment {
        name: String,
    },
    Decrement {
        name: String,
    },
    FloorBoxInit {
        assignment: NodeId,
    },
    FloorAssignment {
        index: NodeId,
        value: NodeId,
    },
    FloorAccess {
        index: NodeId,
    },
    Negative {
        operand: NodeId,
    },
    Not {
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Invocation {
        callee: String,
        argument: Option<NodeId>,
    },
    Empty,
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    For {
        init: Option<NodeId>,
        condition: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    Return {
        value: Option<NodeId>,
    },
    Break,
    Continue,
    Block {
        statements: Vec<NodeId>,
    },
    Import {
        module: String,
    },
    FloorMax {
        value: NodeId,
    },
    Subprocedure {
        name: String,
        parameter: Option<String>,
        body: NodeId,
    },
    Function {
        name: String,
        parameter: Option<String>,
        body: NodeId,
    },
    CompilationUnit {
        imports: Vec<NodeId>,
        floor_inits: Vec<NodeId>,
        floor_max: Option<NodeId>,
        globals: Vec<NodeId>,
        subroutines: Vec<NodeId>,
    },
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Integer { .. } => "Integer",
            NodeKind::Boolean { .. } => "Boolean",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableAssignment { .. } => "VariableAssignment",
            NodeKind::VariableAccess { .. } => "VariableAccess",
            NodeKind::Increment { .. } => "Increment",
            NodeKind::Decrement { .. } => "Decrement",
            NodeKind::FloorBoxInit { .. } => "FloorBoxInit",
            NodeKind::FloorAssignment { .. } => "FloorAssignment",
            NodeKind::FloorAccess { .. } => "FloorAccess",
            NodeKind::Negative { .. } => "Negative",
            NodeKind::Not { .. } => "Not",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Invocation { .. } => "Invocation",
            NodeKind::Empty => "Empty",
            NodeKind::If { .. } => "If",
            NodeKind::While { .. } => "While",
            NodeKind::For { .. } => "For",
            NodeKind::Return { .. } => "Return",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::Block { .. } => "Block",
            NodeKind::Import { .. } => "Import",
            NodeKind::FloorMax { .. } => "FloorMax",
            NodeKind::Subprocedure { .. } => "Subprocedure",
            NodeKind::Function { .. } => "Function",
            NodeKind::CompilationUnit { .. } => "CompilationUnit",
        }
    }

    pub fn is_subroutine(&self) -> bool {
        matches!(
            self,
            NodeKind::Subprocedure { .. } | NodeKind::Function { .. }
        )
    }

    pub fn is_loop(&self) -> bool {
        matches!(self, NodeKind::While { .. } | NodeKind::For { .. })
    }

    /// The identifier this node declares or refers to, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::VariableDeclaration { name, .. }
            | NodeKind::VariableAssignment { name, .. }
            | NodeKind::VariableAccess { name }
            | NodeKind::Increment { name }
            | NodeKind::Decrement { name }
            | NodeKind::Subprocedure { name, .. }
            | NodeKind::Function { name, .. } => Some(name),
            NodeKind::Invocation { callee, .. } => Some(callee),
            _ => None,
        }
    }
}

/// A node: payload, source span, and the attribute bag passes annotate.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: TextRange,
    pub attrs: AttrBag,
}

/// The tree arena. Nodes are exclusively owned by their parent starting at
/// [`Ast::root`]; detached nodes (after replacement) simply become
/// unreferenced slots.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn alloc(&mut self, kind: NodeKind, span: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            attrs: AttrBag::default(),
        });
        id
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> TextRange {
        self.node(id).span
    }

    /// Ids of every node slot, live or detached. Pass-level walks start at
    /// the root instead; this is for attribute stripping and debug dumps.
    pub fn all_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Snapshot of the node's direct children in evaluation order.
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        match &self.node(id).kind {
            NodeKind::Integer { .. }
            | NodeKind::Boolean { .. }
            | NodeKind::VariableAccess { .. }
            | NodeKind::Increment { .. }
            | NodeKind::Decrement { .. }
            | NodeKind::Empty
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Import { .. } => {}
            NodeKind::VariableDeclaration { assignment, .. } => out.extend(assignment),
            NodeKind::VariableAssignment { value, .. } => out.push(*value),
            NodeKind::FloorBoxInit { assignment } => out.push(*assignment),
            NodeKind::FloorAssignment { index, value } => {
                out.push(*index);
                out.push(*value);
            }
            NodeKind::FloorAccess { index } => out.push(*index),
            NodeKind::Negative { operand } | NodeKind::Not { operand } => out.push(*operand),
            NodeKind::Binary { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            NodeKind::Invocation { argument, .. } => out.extend(argument),
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(*condition);
                out.push(*then_branch);
                out.extend(else_branch);
            }
            NodeKind::While { condition, body } => {
                out.push(*condition);
                out.push(*body);
            }
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => {
                out.extend(init);
                out.extend(condition);
                out.extend(update);
                out.push(*body);
            }
            NodeKind::Return { value } => out.extend(value),
            NodeKind::Block { statements } => out.extend_from_slice(statements),
            NodeKind::FloorMax { value } => out.push(*value),
            NodeKind::Subprocedure { body, .. } | NodeKind::Function { body, .. } => {
                out.push(*body)
            }
            NodeKind::CompilationUnit {
                imports,
                floor_inits,
                floor_max,
                globals,
                subroutines,
            } => {
                out.extend_from_slice(imports);
                out.extend_from_slice(floor_inits);
                out.extend(floor_max);
                out.extend_from_slice(globals);
                out.extend_from_slice(subroutines);
            }
        }
        out
    }

    /// Swaps `old` for `new` in the parent's child slots. Returns false when
    /// `old` is not a child of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        fn swap(slot: &mut NodeId, old: NodeId, new: NodeId) -> bool {
            if *slot == old {
                *slot = new;
                return true;
            }
            false
        }
        fn swap_opt(slot: &mut Option<NodeId>, old: NodeId, new: NodeId) -> bool {
            if *slot == Some(old) {
                *slot = Some(new);
                return true;
            }
            false
        }
        fn swap_vec(slots: &mut [NodeId], old: NodeId, new: NodeId) -> bool {
            let mut replaced = false;
            for slot in slots.iter_mut() {
                replaced |= swap(slot, old, new);
            }
            replaced
        }

        match &mut self.nodes[parent.index()].kind {
            NodeKind::VariableDeclaration { assignment, .. } => swap_opt(assignment, old, new),
            NodeKind::VariableAssignment { value, .. } => swap(value, old, new),
            NodeKind::FloorBoxInit { assignment } => swap(assignment, old, new),
            NodeKind::FloorAssignment { index, value } => {
                swap(index, old, new) | swap(value, old, new)
            }
            NodeKind::FloorAccess { index } => swap(index, old, new),
            NodeKind::Negative { operand } | NodeKind::Not { operand } => swap(operand, old, new),
            NodeKind::Binary { lhs, rhs, .. } => swap(lhs, old, new) | swap(rhs, old, new),
            NodeKind::Invocation { argument, .. } => swap_opt(argument, old, new),
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                swap(condition, old, new)
                    | swap(then_branch, old, new)
                    | swap_opt(else_branch, old, new)
            }
            NodeKind::While { condition, body } => {
                swap(condition, old, new) | swap(body, old, new)
            }
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => {
                swap_opt(init, old, new)
                    | swap_opt(condition, old, new)
                    | swap_opt(update, old, new)
                    | swap(body, old, new)
            }
            NodeKind::Return { value } => swap_opt(value, old, new),
            NodeKind::Block { statements } => swap_vec(statements, old, new),
            NodeKind::FloorMax { value } => swap(value, old, new),
            NodeKind::Subprocedure { body, .. } | NodeKind::Function { body, .. } => {
                swap(body, old, new)
            }
            NodeKind::CompilationUnit {
                imports,
                floor_inits,
                floor_max,
                globals,
                subroutines,
            } => {
                swap_vec(imports, old, new)
                    | swap_vec(floor_inits, old, new)
                    | swap_opt(floor_max, old, new)
                    | swap_vec(globals, old, new)
                    | swap_vec(subroutines, old, new)
            }
            _ => false,
        }
    }

    /// Detaches `child` from `parent`: list slots drop the entry, optional
    /// slots become `None`, and required statement slots are refilled with a
    /// fresh `Empty` node so the parent stays well-formed.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let span = self.span(child);
        enum Action {
            None,
            NeedEmpty,
            Done,
        }
        let mut action = Action::None;
        {
            let kind = &mut self.nodes[parent.index()].kind;
            match kind {
                NodeKind::VariableDeclaration { assignment, .. } if *assignment == Some(child) => {
                    *assignment = None;
                    action = Action::Done;
                }
                NodeKind::Invocation { argument, .. } if *argument == Some(child) => {
                    *argument = None;
                    action = Action::Done;
                }
                NodeKind::Return { value } if *value == Some(child) => {
                    *value = None;
                    action = Action::Done;
                }
                NodeKind::If { else_branch, .. } if *else_branch == Some(child) => {
                    *else_branch = None;
                    action = Action::Done;
                }
                NodeKind::For {
                    init,
                    condition,
                    update,
                    body,
                } => {
                    if *init == Some(child) {
                        *init = None;
                        action = Action::Done;
                    } else if *condition == Some(child) {
                        *condition = None;
                        action = Action::Done;
                    } else if *update == Some(child) {
                        *update = None;
                        action = Action::Done;
                    } else if *body == child {
                        action = Action::NeedEmpty;
                    }
                }
                NodeKind::Block { statements } => {
                    let before = statements.len();
                    statements.retain(|&s| s != child);
                    if statements.len() != before {
                        action = Action::Done;
                    }
                }
                NodeKind::CompilationUnit {
                    imports,
                    floor_inits,
                    floor_max,
                    globals,
                    subroutines,
                } => {
                    let mut removed = false;
                    for list in [imports, floor_inits, globals, subroutines] {
                        let before = list.len();
                        list.retain(|&s| s != child);
                        removed |= list.len() != before;
                    }
                    if *floor_max == Some(child) {
                        *floor_max = None;
                        removed = true;
                    }
                    if removed {
                        action = Action::Done;
                    }
                }
                NodeKind::If { then_branch, .. } if *then_branch == child => {
                    action = Action::NeedEmpty;
                }
                NodeKind::While { body, .. } if *body == child => {
                    action = Action::NeedEmpty;
                }
                _ => {}
            }
        }
        match action {
            Action::None => false,
            Action::Done => true,
            Action::NeedEmpty => {
                let empty = self.alloc(NodeKind::Empty, span);
                self.replace_child(parent, child, empty)
            }
        }
    }

    /// Copies every attribute from one node onto another (replacement nodes
    /// inherit the annotations of the node they supersede).
    pub fn copy_attrs(&mut self, from: NodeId, to: NodeId) {
        let attrs = self.node(from).attrs.clone();
        self.node_mut(to).attrs.merge_from(attrs);
    }
}
