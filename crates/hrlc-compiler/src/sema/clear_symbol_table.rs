//! Resets the shared symbol table between pipeline phases.

use crate::sema::pass::{PassContext, PassStatus, SemanticPass};

/// Empties the symbol table, keeping only the built-in library bindings.
/// Symbol attributes on the tree are stripped by the companion
/// [`super::strip_attributes::StripAttributesPass`].
pub struct ClearSymbolTablePass;

impl ClearSymbolTablePass {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClearSymbolTablePass {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticPass for ClearSymbolTablePass {
    fn name(&self) -> &'static str {
        "clear-symbol-table"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        ctx.symbols.clear();
        Ok(())
    }
}
