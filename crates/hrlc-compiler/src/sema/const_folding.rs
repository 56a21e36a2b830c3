//! Constant folding.
//!
//! Bottom-up rewrite: literals annotate themselves, unary and binary nodes
//! fold when their operands are folded, and a handful of one-sided
//! algebraic identities simplify expressions with a single constant
//! operand. Folded binary nodes are replaced by synthesized literals that
//! inherit the span and attributes of the node they supersede.
//!
//! Every produced integer must stay inside the machine range; a fold that
//! would leave it aborts with an overflow diagnostic and leaves the node
//! unfolded.

use hrlc_core::{MAX_INT, MIN_INT};

use crate::ast::{BinaryOp, FoldedValue, NodeId, NodeKind};
use crate::diagnostics::DiagnosticKind;
use crate::sema::pass::{
    AstPass, PassContext, PassStatus, SemanticPass, TreeWalk, merge_status, walk_children,
};

pub struct ConstantFoldingPass {
    tree: TreeWalk,
}

impl ConstantFoldingPass {
    pub fn new() -> Self {
        Self {
            tree: TreeWalk::default(),
        }
    }
}

impl Default for ConstantFoldingPass {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticPass for ConstantFoldingPass {
    fn name(&self) -> &'static str {
        "constant-folding"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> PassStatus {
        self.tree.reset();
        let root = ctx.ast.root();
        self.visit_node(ctx, root)
    }
}

impl AstPass for ConstantFoldingPass {
    fn tree(&mut self) -> &mut TreeWalk {
        &mut self.tree
    }

    fn visit(&mut self, ctx: &mut PassContext<'_>, node: NodeId) -> PassStatus {
        // Children fold first; their replacement literals are already in
        // place when the node inspects its operands.
        let mut status = walk_children(self, ctx, node);

        let rc = match ctx.ast.kind(node).clone() {
            NodeKind::Integer { value, is_char } => {
                // Characters carry raw code points; the machine range binds
                // integers only.
                let rc = if is_char {
                    Ok(())
                } else {
                    self.check_range(ctx, node, value)
                };
                if rc.is_ok() {
                    ctx.ast.set_const_fold(node, FoldedValue { value, is_char });
                }
                rc
            }
            NodeKind::Boolean { value } => {
                ctx.ast.set_const_fold(
                    node,
                    FoldedValue {
                        value: value as i32,
                        is_char: false,
                    },
                );
                Ok(())
            }
            NodeKind::Negative { operand } => self.fold_unary(ctx, node, operand, |v| -v, true),
            NodeKind::Not { operand } => {
                self.fold_unary(ctx, node, operand, |v| (v == 0) as i32, false)
            }
            NodeKind::Binary { op, lhs, rhs } => self.fold_binary(ctx, node, op, lhs, rhs),
            _ => Ok(()),
        };
        merge_status(&mut status, rc);
        status
    }
}

impl ConstantFoldingPass {
    fn check_range(&mut self, ctx: &mut PassContext<'_>, node: NodeId, value: i32) -> PassStatus {
        if (MIN_INT..=MAX_INT).contains(&value) {
            return Ok(());
        }
        ctx.diagnostics
            .report(DiagnosticKind::IntegerOverflow, ctx.ast.span(node))
            .message(format!(
                "Integer overflow detected: the value '{value}' exceeds the allowed range \
                 [-999, 999]. Ensure that the value assigned or computed stays within the \
                 valid limits."
            ))
            .emit();
        Err(DiagnosticKind::IntegerOverflow)
    }

    /// Unary folds only annotate; the node itself stays in the tree.
    fn fold_unary(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        operand: NodeId,
        apply: impl FnOnce(i32) -> i32,
        keep_char: bool,
    ) -> PassStatus {
        let Some(folded) = ctx.ast.const_fold(operand) else {
            return Ok(());
        };
        let value = apply(folded.value);
        let is_char = keep_char && folded.is_char;
        if !is_char {
            self.check_range(ctx, node, value)?;
        }
        ctx.ast.set_const_fold(node, FoldedValue { value, is_char });
        Ok(())
    }

    fn fold_binary(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    ) -> PassStatus {
        let left = ctx.ast.const_fold(lhs);
        let right = ctx.ast.const_fold(rhs);

        match (left, right) {
            (Some(left), Some(right)) => {
                // Mixed char/int never folds; the runtime reports that.
                if left.is_char != right.is_char {
                    return Ok(());
                }
                if matches!(op, BinaryOp::Div | BinaryOp::Mod) && right.value == 0 {
                    return self.report_div_mod_zero(ctx, node, op, Some((left.value, right.value)));
                }
                let value = eval(op, left.value, right.value);
                self.check_range(ctx, node, value)?;

                // Binary results are always plain integers, even between two
                // characters: the machine word's arithmetic works the same way.
                let folded = FoldedValue {
                    value,
                    is_char: false,
                };
                ctx.ast.set_const_fold(node, folded);

                let literal = ctx.ast.alloc(
                    NodeKind::Integer {
                        value,
                        is_char: false,
                    },
                    ctx.ast.span(node),
                );
                ctx.ast.copy_attrs(node, literal);
                self.tree.request_replace_self(literal);
                Ok(())
            }
            (Some(left), None) => self.simplify_left_const(ctx, node, op, left, rhs),
            (None, Some(right)) => self.simplify_right_const(ctx, node, op, right, lhs),
            (None, None) => Ok(()),
        }
    }

    /// Identities with a constant left operand: `0 + x`, `0 - x`, `0 * x`,
    /// `1 * x`, `0 / x`, `0 % x`.
    fn simplify_left_const(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        op: BinaryOp,
        left: FoldedValue,
        rhs: NodeId,
    ) -> PassStatus {
        match (op, left.value) {
            (BinaryOp::Add, 0) => self.tree.request_replace_self(rhs),
            (BinaryOp::Sub, 0) => {
                let negative = ctx
                    .ast
                    .alloc(NodeKind::Negative { operand: rhs }, ctx.ast.span(node));
                ctx.ast.copy_attrs(rhs, negative);
                self.tree.request_replace_self(negative);
            }
            (BinaryOp::Mul, 0) | (BinaryOp::Div, 0) | (BinaryOp::Mod, 0) => {
                self.replace_with_zero(ctx, node);
            }
            (BinaryOp::Mul, 1) => self.tree.request_replace_self(rhs),
            _ => {}
        }
        Ok(())
    }

    /// Identities with a constant right operand: `x + 0`, `x - 0`, `x * 0`,
    /// `x * 1`, `x / 1`, `x % 1`, plus the `x / 0` and `x % 0` errors.
    fn simplify_right_const(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        op: BinaryOp,
        right: FoldedValue,
        lhs: NodeId,
    ) -> PassStatus {
        match (op, right.value) {
            (BinaryOp::Div | BinaryOp::Mod, 0) => {
                return self.report_div_mod_zero(ctx, node, op, None);
            }
            (BinaryOp::Add | BinaryOp::Sub, 0) => self.tree.request_replace_self(lhs),
            (BinaryOp::Mul, 0) => self.replace_with_zero(ctx, node),
            (BinaryOp::Mul | BinaryOp::Div, 1) => self.tree.request_replace_self(lhs),
            (BinaryOp::Mod, 1) => self.replace_with_zero(ctx, node),
            _ => {}
        }
        Ok(())
    }

    /// Replaces the current node with a folded literal `0`.
    fn replace_with_zero(&mut self, ctx: &mut PassContext<'_>, node: NodeId) {
        let zero = ctx.ast.alloc(
            NodeKind::Integer {
                value: 0,
                is_char: false,
            },
            ctx.ast.span(node),
        );
        ctx.ast.copy_attrs(node, zero);
        ctx.ast.set_const_fold(
            zero,
            FoldedValue {
                value: 0,
                is_char: false,
            },
        );
        self.tree.request_replace_self(zero);
    }

    fn report_div_mod_zero(
        &mut self,
        ctx: &mut PassContext<'_>,
        node: NodeId,
        op: BinaryOp,
        operands: Option<(i32, i32)>,
    ) -> PassStatus {
        let what = if op == BinaryOp::Div { "Division" } else { "Mod" };
        let message = match operands {
            Some((a, b)) => format!(
                "{what} by zero detected. The expression '{a} {} {b}' results in undefined \
                 behavior.",
                op.symbol()
            ),
            None => format!("{what} by zero detected. The expression results in undefined behavior."),
        };
        ctx.diagnostics
            .report(DiagnosticKind::DivModByZero, ctx.ast.span(node))
            .message(message)
            .emit();
        Err(DiagnosticKind::DivModByZero)
    }
}

fn eval(op: BinaryOp, a: i32, b: i32) -> i32 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        BinaryOp::And => (a != 0 && b != 0) as i32,
        BinaryOp::Or => (a != 0 || b != 0) as i32,
        BinaryOp::Eq => (a == b) as i32,
        BinaryOp::Ne => (a != b) as i32,
        BinaryOp::Gt => (a > b) as i32,
        BinaryOp::Ge => (a >= b) as i32,
        BinaryOp::Lt => (a < b) as i32,
        BinaryOp::Le => (a <= b) as i32,
    }
}
