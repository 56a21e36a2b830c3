use super::scope::ScopeId;
use super::symbol::SymbolKind;
use super::symbol_table::SymbolTable;
use crate::ast::NodeId;

fn node(n: u32) -> NodeId {
    NodeId::from_raw(n)
}

#[test]
fn builtins_are_preloaded_at_root() {
    let table = SymbolTable::new();
    let root = ScopeId::root();

    let outbox = table.lookup(&root, "outbox").expect("outbox exists");
    let outbox = table.symbol(outbox);
    assert_eq!(outbox.kind, SymbolKind::Subroutine);
    assert!(outbox.has_param);
    assert!(!outbox.has_return);
    assert!(outbox.is_builtin());

    let inbox = table.lookup(&root, "inbox").expect("inbox exists");
    let inbox = table.symbol(inbox);
    assert!(!inbox.has_param);
    assert!(inbox.has_return);
    assert_eq!(inbox.filename, "@stdlib");
}

#[test]
fn same_scope_redefinition_is_rejected() {
    let mut table = SymbolTable::new();
    let scope = ScopeId::from_string("glb.f");
    let first = table
        .define_variable(&scope, "x", "a.hrl", node(1))
        .expect("first definition");
    let second = table.define_variable(&scope, "x", "a.hrl", node(2));
    assert_eq!(second, Err(first));
}

#[test]
fn ancestor_lookup_walks_to_the_root() {
    let mut table = SymbolTable::new();
    let outer = ScopeId::from_string("glb.f");
    let inner = ScopeId::from_string("glb.f.0.1");
    let sym = table
        .define_variable(&outer, "x", "a.hrl", node(1))
        .expect("definition");

    let (found, found_in) = table
        .lookup_with_ancestors(&inner, "x")
        .expect("visible from inner scope");
    assert_eq!(found, sym);
    assert_eq!(found_in, outer);

    // Built-ins resolve from anywhere.
    assert!(table.lookup_with_ancestors(&inner, "inbox").is_some());
}

#[test]
fn current_scope_lookup_does_not_walk() {
    let mut table = SymbolTable::new();
    let outer = ScopeId::from_string("glb.f");
    let inner = ScopeId::from_string("glb.f.0");
    table
        .define_variable(&outer, "x", "a.hrl", node(1))
        .expect("definition");

    assert!(table.lookup(&inner, "x").is_none());
    assert!(table.lookup(&outer, "x").is_some());
}

#[test]
fn shadowing_in_inner_scope_is_a_distinct_symbol() {
    let mut table = SymbolTable::new();
    let outer = ScopeId::from_string("glb.f");
    let inner = ScopeId::from_string("glb.f.0");
    let outer_sym = table
        .define_variable(&outer, "x", "a.hrl", node(1))
        .expect("outer definition");
    let inner_sym = table
        .define_variable(&inner, "x", "a.hrl", node(2))
        .expect("inner definition");
    assert_ne!(outer_sym, inner_sym);

    let (found, _) = table.lookup_with_ancestors(&inner, "x").expect("resolves");
    assert_eq!(found, inner_sym);
}

#[test]
fn visibility_follows_defining_scope() {
    let mut table = SymbolTable::new();
    let branch = ScopeId::from_string("glb.f.0");
    let sym = table
        .define_variable(&branch, "x", "a.hrl", node(1))
        .expect("definition");

    assert!(table.visible_in(sym, &branch));
    assert!(table.visible_in(sym, &ScopeId::from_string("glb.f.0.2")));
    assert!(!table.visible_in(sym, &ScopeId::from_string("glb.f")));
    assert!(!table.visible_in(sym, &ScopeId::from_string("glb.f.1")));
}

#[test]
fn clear_drops_user_symbols_but_keeps_builtins() {
    let mut table = SymbolTable::new();
    let scope = ScopeId::from_string("glb.f");
    table
        .define_variable(&scope, "x", "a.hrl", node(1))
        .expect("definition");

    table.clear();
    assert!(table.lookup(&scope, "x").is_none());
    assert!(table.lookup(&ScopeId::root(), "inbox").is_some());
    assert!(table.lookup(&ScopeId::root(), "outbox").is_some());
}
