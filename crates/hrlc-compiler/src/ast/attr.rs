//! Per-node attribute bags.
//!
//! The set of attribute kinds is closed and small, so the bag is a fixed
//! array of optional variants. The enum tag of a stored value always matches
//! its slot; the typed accessors on [`crate::ast::Ast`] are the only way
//! passes read or write attributes.

use super::NodeId;
use crate::sema::{ScopeId, ScopeKind, SymbolId};

/// Closed set of attribute kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum AttrKind {
    /// Bound symbol of a declaration, use, or invocation.
    Symbol = 0,
    /// Scope id + scope kind the node was visited in.
    ScopeInfo = 1,
    /// Compile-time value of a folded expression.
    ConstFold = 2,
    /// Enclosing subroutine or loop of a return/break/continue.
    ControlContext = 3,
}

pub(crate) const ATTR_SLOTS: usize = 4;

/// A folded compile-time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldedValue {
    pub value: i32,
    pub is_char: bool,
}

/// Scope annotation attached during symbol analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeInfo {
    pub id: ScopeId,
    pub kind: ScopeKind,
}

/// An attribute value; its variant must agree with the slot it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Symbol(SymbolId),
    ScopeInfo(ScopeInfo),
    ConstFold(FoldedValue),
    ControlContext(NodeId),
}

impl AttrValue {
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrValue::Symbol(_) => AttrKind::Symbol,
            AttrValue::ScopeInfo(_) => AttrKind::ScopeInfo,
            AttrValue::ConstFold(_) => AttrKind::ConstFold,
            AttrValue::ControlContext(_) => AttrKind::ControlContext,
        }
    }
}

/// Fixed-slot attribute storage.
#[derive(Debug, Clone, Default)]
pub struct AttrBag {
    slots: [Option<AttrValue>; ATTR_SLOTS],
}

impl AttrBag {
    pub fn get(&self, kind: AttrKind) -> Option<&AttrValue> {
        self.slots[kind as usize].as_ref()
    }

    pub fn set(&mut self, value: AttrValue) {
        let kind = value.kind();
        self.slots[kind as usize] = Some(value);
    }

    pub fn remove(&mut self, kind: AttrKind) -> Option<AttrValue> {
        self.slots[kind as usize].take()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Overlays every present attribute of `other` onto `self`.
    pub fn merge_from(&mut self, other: AttrBag) {
        for slot in other.slots.into_iter().flatten() {
            self.set(slot);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrValue> {
        self.slots.iter().flatten()
    }
}

impl super::Ast {
    pub fn symbol(&self, id: NodeId) -> Option<SymbolId> {
        match self.node(id).attrs.get(AttrKind::Symbol) {
            Some(AttrValue::Symbol(sym)) => Some(*sym),
            _ => None,
        }
    }

    pub fn set_symbol(&mut self, id: NodeId, symbol: SymbolId) {
        self.node_mut(id).attrs.set(AttrValue::Symbol(symbol));
    }

    pub fn scope_info(&self, id: NodeId) -> Option<&ScopeInfo> {
        match self.node(id).attrs.get(AttrKind::ScopeInfo) {
            Some(AttrValue::ScopeInfo(info)) => Some(info),
            _ => None,
        }
    }

    pub fn set_scope_info(&mut self, id: NodeId, info: ScopeInfo) {
        self.node_mut(id).attrs.set(AttrValue::ScopeInfo(info));
    }

    pub fn const_fold(&self, id: NodeId) -> Option<FoldedValue> {
        match self.node(id).attrs.get(AttrKind::ConstFold) {
            Some(AttrValue::ConstFold(folded)) => Some(*folded),
            _ => None,
        }
    }

    pub fn set_const_fold(&mut self, id: NodeId, folded: FoldedValue) {
        self.node_mut(id).attrs.set(AttrValue::ConstFold(folded));
    }

    pub fn control_context(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).attrs.get(AttrKind::ControlContext) {
            Some(AttrValue::ControlContext(target)) => Some(*target),
            _ => None,
        }
    }

    pub fn set_control_context(&mut self, id: NodeId, target: NodeId) {
        self.node_mut(id)
            .attrs
            .set(AttrValue::ControlContext(target));
    }

    pub fn remove_attr(&mut self, id: NodeId, kind: AttrKind) {
        self.node_mut(id).attrs.remove(kind);
    }
}
