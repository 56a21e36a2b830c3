//! Nested-scope symbol table.
//!
//! Maps scope ids to name→symbol bindings. Symbols themselves live in an
//! arena indexed by [`SymbolId`]; the AST refers to them only through ids,
//! so clearing the table between pipeline phases invalidates nothing but
//! the bindings.

use indexmap::IndexMap;

use super::scope::ScopeId;
use super::symbol::{BUILTIN_FILE, Symbol, SymbolId, SymbolKind};
use crate::ast::NodeId;

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: IndexMap<ScopeId, IndexMap<String, SymbolId>>,
}

impl SymbolTable {
    /// An empty table preloaded with the built-in library:
    /// `outbox(arg)` and `inbox() -> value`, owned by `@stdlib`.
    pub fn new() -> Self {
        let mut table = Self {
            symbols: Vec::new(),
            scopes: IndexMap::new(),
        };
        table.seed_builtins();
        table
    }

    fn seed_builtins(&mut self) {
        let root = ScopeId::root();
        self.insert(Symbol {
            kind: SymbolKind::Subroutine,
            name: "outbox".to_string(),
            filename: BUILTIN_FILE.to_string(),
            def_site: None,
            scope: root.clone(),
            has_param: true,
            has_return: false,
        });
        self.insert(Symbol {
            kind: SymbolKind::Subroutine,
            name: "inbox".to_string(),
            filename: BUILTIN_FILE.to_string(),
            def_site: None,
            scope: root,
            has_param: false,
            has_return: true,
        });
    }

    fn insert(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::from_raw(self.symbols.len() as u32);
        self.scopes
            .entry(symbol.scope.clone())
            .or_default()
            .insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        id
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Adds a variable binding. `Err` carries the previously bound symbol of
    /// the same name in the same scope.
    pub fn define_variable(
        &mut self,
        scope: &ScopeId,
        name: &str,
        filename: &str,
        def_site: NodeId,
    ) -> Result<SymbolId, SymbolId> {
        self.define(scope, name, filename, Some(def_site), SymbolKind::Variable, false, false)
    }

    /// Adds a subroutine binding with its signature facts.
    pub fn define_subroutine(
        &mut self,
        scope: &ScopeId,
        name: &str,
        filename: &str,
        def_site: NodeId,
        has_param: bool,
        has_return: bool,
    ) -> Result<SymbolId, SymbolId> {
        self.define(
            scope,
            name,
            filename,
            Some(def_site),
            SymbolKind::Subroutine,
            has_param,
            has_return,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn define(
        &mut self,
        scope: &ScopeId,
        name: &str,
        filename: &str,
        def_site: Option<NodeId>,
        kind: SymbolKind,
        has_param: bool,
        has_return: bool,
    ) -> Result<SymbolId, SymbolId> {
        if let Some(existing) = self.lookup(scope, name) {
            return Err(existing);
        }
        Ok(self.insert(Symbol {
            kind,
            name: name.to_string(),
            filename: filename.to_string(),
            def_site,
            scope: scope.clone(),
            has_param,
            has_return,
        }))
    }

    /// Registers a scope id even before anything is bound in it, so every
    /// scope a traversal produced is observable in the table.
    pub fn ensure_scope(&mut self, scope: &ScopeId) {
        self.scopes.entry(scope.clone()).or_default();
    }

    /// Whether the scope id is known to the table.
    pub fn has_scope(&self, scope: &ScopeId) -> bool {
        self.scopes.contains_key(scope)
    }

    /// Current-scope-only lookup.
    pub fn lookup(&self, scope: &ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes.get(scope)?.get(name).copied()
    }

    /// Ancestor-chain lookup: walks from the scope to the root, returns the
    /// first hit together with the scope it was found in.
    pub fn lookup_with_ancestors(
        &self,
        scope: &ScopeId,
        name: &str,
    ) -> Option<(SymbolId, ScopeId)> {
        for ancestor in scope.ancestors() {
            if let Some(id) = self.lookup(&ancestor, name) {
                return Some((id, ancestor));
            }
        }
        None
    }

    /// Whether the symbol's defining scope makes it visible from `scope`.
    pub fn visible_in(&self, id: SymbolId, scope: &ScopeId) -> bool {
        self.symbol(id).scope.is_ancestor_or_self_of(scope)
    }

    /// All symbols in definition order.
    pub fn all_symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::from_raw(i as u32), s))
    }

    /// Scope ids present in the table, in first-binding order.
    pub fn scope_ids(&self) -> impl Iterator<Item = &ScopeId> {
        self.scopes.keys()
    }

    /// Name→symbol bindings of one scope.
    pub fn bindings(&self, scope: &ScopeId) -> impl Iterator<Item = (&str, SymbolId)> {
        self.scopes
            .get(scope)
            .into_iter()
            .flat_map(|scope| scope.iter().map(|(name, id)| (name.as_str(), *id)))
    }

    /// Drops every user symbol and re-seeds the built-in library.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.scopes.clear();
        self.seed_builtins();
    }
}
