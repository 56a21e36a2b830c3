//! Removes a configurable set of attribute kinds from every node.

use crate::ast::AttrKind;
use crate::sema::pass::{PassContext, PassStatus, SemanticPass};

pub struct StripAttributesPass {
    kinds: Vec<AttrKind>,
}

impl StripAttributesPass {
    pub fn new(kinds: Vec<AttrKind>) -> Self {
        Self { kinds }
    }
}

impl SemanticPass for StripAttributesPass {
    fn name(&self) -> &'static str {
        "strip-attributes"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        let ids: Vec<_> = ctx.ast.all_ids().collect();
        for id in ids {
            for &kind in &self.kinds {
                ctx.ast.remove_attr(id, kind);
            }
        }
        Ok(())
    }
}
