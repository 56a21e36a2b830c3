use super::scope::{ScopeId, ScopeKind, ScopeManager};

#[test]
fn root_scope_is_glb() {
    let scopes = ScopeManager::new();
    assert_eq!(scopes.current_id().as_str(), "glb");
    assert_eq!(scopes.current_kind(), ScopeKind::Global);
}

#[test]
fn named_and_anonymous_nesting() {
    let mut scopes = ScopeManager::new();
    scopes.enter_named("start", ScopeKind::Subroutine);
    assert_eq!(scopes.current_id().as_str(), "glb.start");

    scopes.enter_anonymous();
    assert_eq!(scopes.current_id().as_str(), "glb.start.0");
    scopes.exit();

    scopes.enter_anonymous();
    assert_eq!(scopes.current_id().as_str(), "glb.start.1");

    scopes.enter_anonymous();
    assert_eq!(scopes.current_id().as_str(), "glb.start.1.0");
    scopes.exit();
    scopes.exit();
    scopes.exit();

    assert_eq!(scopes.current_id().as_str(), "glb");
}

#[test]
fn anonymous_counters_are_per_scope() {
    let mut scopes = ScopeManager::new();
    scopes.enter_named("a", ScopeKind::Subroutine);
    scopes.enter_anonymous(); // glb.a.0
    scopes.exit();
    scopes.exit();

    scopes.enter_named("b", ScopeKind::Subroutine);
    scopes.enter_anonymous();
    assert_eq!(scopes.current_id().as_str(), "glb.b.0");
}

#[test]
fn ancestors_longest_prefix_first() {
    let id = ScopeId::from_string("glb.start.0.1");
    let ancestors: Vec<String> = id.ancestors().iter().map(|s| s.to_string()).collect();
    assert_eq!(
        ancestors,
        vec!["glb.start.0.1", "glb.start.0", "glb.start", "glb"]
    );
}

#[test]
fn ancestor_test_respects_dot_boundaries() {
    let outer = ScopeId::from_string("glb.s");
    let inner = ScopeId::from_string("glb.s.0");
    let unrelated = ScopeId::from_string("glb.start");

    assert!(outer.is_ancestor_or_self_of(&inner));
    assert!(outer.is_ancestor_or_self_of(&outer));
    assert!(!outer.is_ancestor_or_self_of(&unrelated));
    assert!(!inner.is_ancestor_or_self_of(&outer));
}

#[test]
fn root_is_ancestor_of_everything() {
    let root = ScopeId::root();
    assert!(root.is_ancestor_or_self_of(&ScopeId::from_string("glb.start.0")));
    assert!(root.is_ancestor_or_self_of(&root));
}
