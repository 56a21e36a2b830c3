//! Hierarchical scope identifiers.
//!
//! A scope id is a dotted path rooted at `glb`: `glb`, `glb.start`,
//! `glb.start.0`, `glb.start.0.1`. Named segments come from subroutines;
//! anonymous segments are integers minted per enclosing scope.

use std::fmt;

/// Root scope name. The built-in library symbols are attached here so every
/// ancestor walk reaches them.
pub const ROOT_SCOPE: &str = "glb";

/// What kind of construct opened a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Subroutine,
    Block,
}

/// A dotted-path scope identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(String);

impl ScopeId {
    pub fn root() -> Self {
        Self(ROOT_SCOPE.to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_SCOPE
    }

    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}.{}", self.0, segment))
    }

    /// The chain from this id to the root, longest prefix first:
    /// `glb.a.0` yields `[glb.a.0, glb.a, glb]`.
    pub fn ancestors(&self) -> Vec<ScopeId> {
        let mut out = Vec::new();
        let mut current: &str = &self.0;
        loop {
            out.push(ScopeId(current.to_string()));
            match current.rfind('.') {
                Some(dot) => current = &current[..dot],
                None => break,
            }
        }
        out
    }

    /// Dot-boundary-aware prefix test: `glb.s` is an ancestor of
    /// `glb.s.0` but not of `glb.start`.
    pub fn is_ancestor_or_self_of(&self, other: &ScopeId) -> bool {
        other.0 == self.0
            || (other.0.len() > self.0.len()
                && other.0.starts_with(&self.0)
                && other.0.as_bytes()[self.0.len()] == b'.')
    }

    /// Depth of the scope: the root has depth 0.
    pub fn depth(&self) -> usize {
        self.0.matches('.').count()
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces scope identifiers during a traversal.
///
/// Re-entering a named scope that already exists is allowed and merges into
/// the same id; duplicate definitions are reported by symbol analysis, not
/// here.
#[derive(Debug)]
pub struct ScopeManager {
    segments: Vec<String>,
    kinds: Vec<ScopeKind>,
    /// One anonymous-id counter per open scope.
    counters: Vec<u32>,
}

impl ScopeManager {
    pub fn new() -> Self {
        Self {
            segments: vec![ROOT_SCOPE.to_string()],
            kinds: vec![ScopeKind::Global],
            counters: vec![0],
        }
    }

    pub fn current_id(&self) -> ScopeId {
        ScopeId(self.segments.join("."))
    }

    pub fn current_kind(&self) -> ScopeKind {
        *self.kinds.last().expect("root scope always open")
    }

    pub fn enter_named(&mut self, name: &str, kind: ScopeKind) {
        self.segments.push(name.to_string());
        self.kinds.push(kind);
        self.counters.push(0);
    }

    pub fn enter_anonymous(&mut self) {
        let counter = self.counters.last_mut().expect("root scope always open");
        let id = *counter;
        *counter += 1;
        self.segments.push(id.to_string());
        self.kinds.push(ScopeKind::Block);
        self.counters.push(0);
    }

    pub fn exit(&mut self) {
        assert!(self.segments.len() > 1, "cannot exit the root scope");
        self.segments.pop();
        self.kinds.pop();
        self.counters.pop();
    }
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}
