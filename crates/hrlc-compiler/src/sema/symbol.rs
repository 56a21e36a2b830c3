//! Symbols: named entities resolved during analysis.

use super::scope::ScopeId;
use crate::ast::NodeId;

/// File name under which the built-in library symbols are registered.
pub const BUILTIN_FILE: &str = "@stdlib";

/// A lightweight handle to a symbol in the [`super::SymbolTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Subroutine,
}

impl SymbolKind {
    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Subroutine => "function/subprocedure",
        }
    }
}

/// A named entity. The definition site is a [`NodeId`] back-reference into
/// the AST arena (built-in symbols have none); `has_param`/`has_return` are
/// meaningful for subroutines only.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub filename: String,
    pub def_site: Option<NodeId>,
    /// Scope the symbol was defined in.
    pub scope: ScopeId,
    pub has_param: bool,
    pub has_return: bool,
}

impl Symbol {
    pub fn is_builtin(&self) -> bool {
        self.filename == BUILTIN_FILE
    }

    /// `function f(arg)` / `sub f()` rendering for signature diagnostics.
    pub fn describe_signature(&self) -> String {
        format!(
            "{} {}({})",
            if self.has_return { "function" } else { "sub" },
            self.name,
            if self.has_param { "arg" } else { "" }
        )
    }
}
