//! Parse-tree → AST lowering.
//!
//! Reduces the lossless parse tree to the semantic tree: parentheses and
//! unary plus dissolve, `let x = e` becomes a declaration owning a nested
//! assignment, and statement wrappers collapse into their payload.
//!
//! Lowering requires an error-free parse; the compile facade never lowers a
//! tree that produced syntax errors.

use rowan::TextRange;

use super::{Ast, BinaryOp, NodeId, NodeKind};
use crate::parser::SyntaxKind;
use crate::parser::ptree::{self, Expr, Stmt};

/// Lowers a parsed compilation unit into a fresh AST arena.
pub fn lower(root: &ptree::CompilationUnit) -> Ast {
    let mut lowerer = Lowerer { ast: Ast::new() };
    let root_id = lowerer.lower_compilation_unit(root);
    lowerer.ast.set_root(root_id);
    lowerer.ast
}

struct Lowerer {
    ast: Ast,
}

impl Lowerer {
    fn lower_compilation_unit(&mut self, unit: &ptree::CompilationUnit) -> NodeId {
        let imports = unit
            .imports()
            .map(|import| {
                let module = import
                    .module()
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                self.ast
                    .alloc(NodeKind::Import { module }, import.as_cst().text_range())
            })
            .collect();

        let floor_inits = unit
            .floor_inits()
            .map(|init| self.lower_floor_box_init(&init))
            .collect();

        let floor_max = unit.floor_max().map(|max| {
            let value = self.lower_int_literal(
                max.value().expect("floor_max carries its integer literal"),
            );
            self.ast
                .alloc(NodeKind::FloorMax { value }, max.as_cst().text_range())
        });

        let globals = unit
            .globals()
            .map(|decl| self.lower_var_decl(&decl))
            .collect();

        let subroutines = unit
            .subroutines()
            .map(|def| self.lower_subroutine(&def))
            .collect();

        self.ast.alloc(
            NodeKind::CompilationUnit {
                imports,
                floor_inits,
                floor_max,
                globals,
                subroutines,
            },
            unit.as_cst().text_range(),
        )
    }

    fn lower_floor_box_init(&mut self, init: &ptree::FloorBoxInit) -> NodeId {
        let index = self.lower_int_literal(init.index().expect("floor init carries its index"));
        let value = self.lower_int_literal(init.value().expect("floor init carries its value"));
        let span = init.as_cst().text_range();
        let assignment = self.ast.alloc(NodeKind::FloorAssignment { index, value }, span);
        self.ast.alloc(NodeKind::FloorBoxInit { assignment }, span)
    }

    fn lower_int_literal(&mut self, literal: ptree::IntLiteral) -> NodeId {
        let value = literal.value().expect("integer literal has a value");
        let is_char = literal.is_char();
        self.ast.alloc(
            NodeKind::Integer { value, is_char },
            literal.as_cst().text_range(),
        )
    }

    fn lower_subroutine(&mut self, def: &ptree::SubroutineDef) -> NodeId {
        let name = def
            .name()
            .map(|t| t.text().to_string())
            .unwrap_or_default();
        let parameter = def.parameter().map(|t| t.text().to_string());
        let body = self.lower_block(&def.body().expect("subroutine carries its body"));
        let span = def.as_cst().text_range();
        let kind = if def.has_return() {
            NodeKind::Function {
                name,
                parameter,
                body,
            }
        } else {
            NodeKind::Subprocedure {
                name,
                parameter,
                body,
            }
        };
        self.ast.alloc(kind, span)
    }

    fn lower_block(&mut self, block: &ptree::StatementBlock) -> NodeId {
        let statements = block
            .statements()
            .map(|stmt| self.lower_statement(&stmt))
            .collect();
        self.ast.alloc(
            NodeKind::Block { statements },
            block.as_cst().text_range(),
        )
    }

    fn lower_statement(&mut self, stmt: &Stmt) -> NodeId {
        let span = stmt.as_cst().text_range();
        match stmt {
            Stmt::VarDecl(decl) => self.lower_var_decl(decl),
            Stmt::VarAssign(assign) => self.lower_var_assign(assign),
            Stmt::FloorAssign(assign) => self.lower_floor_assign(assign),
            Stmt::Block(block) => self.lower_block(block),
            Stmt::Empty(_) => self.ast.alloc(NodeKind::Empty, span),
            Stmt::If(stmt) => {
                let condition = self.lower_expr(&stmt.condition().expect("if carries a condition"));
                let then_branch =
                    self.lower_statement(&stmt.then_branch().expect("if carries a then branch"));
                let else_branch = stmt.else_branch().map(|s| self.lower_statement(&s));
                self.ast.alloc(
                    NodeKind::If {
                        condition,
                        then_branch,
                        else_branch,
                    },
                    span,
                )
            }
            Stmt::While(stmt) => {
                let condition =
                    self.lower_expr(&stmt.condition().expect("while carries a condition"));
                let body = self.lower_statement(&stmt.body().expect("while carries a body"));
                self.ast.alloc(NodeKind::While { condition, body }, span)
            }
            Stmt::For(stmt) => {
                let init = stmt.init().map(|s| self.lower_statement(&s));
                let condition = stmt.condition().map(|e| self.lower_expr(&e));
                let update = stmt.update().map(|e| self.lower_expr(&e));
                let body = self.lower_statement(&stmt.body().expect("for carries a body"));
                self.ast.alloc(
                    NodeKind::For {
                        init,
                        condition,
                        update,
                        body,
                    },
                    span,
                )
            }
            Stmt::Return(stmt) => {
                let value = stmt.value().map(|e| self.lower_expr(&e));
                self.ast.alloc(NodeKind::Return { value }, span)
            }
            Stmt::Break(_) => self.ast.alloc(NodeKind::Break, span),
            Stmt::Continue(_) => self.ast.alloc(NodeKind::Continue, span),
            Stmt::Invocation(stmt) => self.lower_invocation(
                &stmt
                    .invocation()
                    .expect("invocation statement carries its expression"),
            ),
        }
    }

    fn lower_var_decl(&mut self, decl: &ptree::VarDecl) -> NodeId {
        let name = decl
            .name()
            .map(|t| t.text().to_string())
            .unwrap_or_default();
        let assignment = decl.initializer().map(|init| {
            let value = self.lower_expr(&init);
            let span = match decl.equals_token() {
                Some(eq) => TextRange::new(eq.text_range().start(), init.as_cst().text_range().end()),
                None => init.as_cst().text_range(),
            };
            self.ast.alloc(
                NodeKind::VariableAssignment {
                    name: name.clone(),
                    value,
                },
                span,
            )
        });
        self.ast.alloc(
            NodeKind::VariableDeclaration { name, assignment },
            decl.as_cst().text_range(),
        )
    }

    fn lower_var_assign(&mut self, assign: &ptree::VarAssign) -> NodeId {
        let name = assign
            .name()
            .map(|t| t.text().to_string())
            .unwrap_or_default();
        let value = self.lower_expr(&assign.value().expect("assignment carries its value"));
        self.ast.alloc(
            NodeKind::VariableAssignment { name, value },
            assign.as_cst().text_range(),
        )
    }

    fn lower_floor_assign(&mut self, assign: &ptree::FloorAssign) -> NodeId {
        let access = assign
            .floor_access()
            .expect("floor assignment carries its access");
        let index = self.lower_expr(&access.index().expect("floor access carries its index"));
        let value = self.lower_expr(&assign.value().expect("floor assignment carries its value"));
        self.ast.alloc(
            NodeKind::FloorAssignment { index, value },
            assign.as_cst().text_range(),
        )
    }

    fn lower_invocation(&mut self, invocation: &ptree::InvocationExpr) -> NodeId {
        let callee = invocation
            .callee()
            .map(|t| t.text().to_string())
            .unwrap_or_default();
        let argument = invocation.argument().map(|e| self.lower_expr(&e));
        self.ast.alloc(
            NodeKind::Invocation { callee, argument },
            invocation.as_cst().text_range(),
        )
    }

    fn lower_expr(&mut self, expr: &Expr) -> NodeId {
        let span = expr.as_cst().text_range();
        match expr {
            Expr::Binary(binary) => {
                let op = binary_op(
                    binary
                        .op_token()
                        .expect("binary expression carries its operator")
                        .kind(),
                );
                let lhs = self.lower_expr(&binary.lhs().expect("binary expression has a lhs"));
                let rhs = self.lower_expr(&binary.rhs().expect("binary expression has a rhs"));
                self.ast.alloc(NodeKind::Binary { op, lhs, rhs }, span)
            }
            Expr::Prefix(prefix) => {
                let operand =
                    self.lower_expr(&prefix.operand().expect("prefix expression has an operand"));
                match prefix
                    .op_token()
                    .expect("prefix expression carries its operator")
                    .kind()
                {
                    // Unary plus is meaningless; it dissolves into the operand.
                    SyntaxKind::Plus => operand,
                    SyntaxKind::Minus => self.ast.alloc(NodeKind::Negative { operand }, span),
                    SyntaxKind::Bang => self.ast.alloc(NodeKind::Not { operand }, span),
                    _ => operand,
                }
            }
            Expr::Increment(inc) => {
                let name = inc
                    .name()
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                self.ast.alloc(NodeKind::Increment { name }, span)
            }
            Expr::Decrement(dec) => {
                let name = dec
                    .name()
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                self.ast.alloc(NodeKind::Decrement { name }, span)
            }
            Expr::FloorAccess(access) => {
                let index =
                    self.lower_expr(&access.index().expect("floor access carries its index"));
                self.ast.alloc(NodeKind::FloorAccess { index }, span)
            }
            Expr::Paren(paren) => {
                // Parentheses only group; they leave no AST node behind.
                self.lower_expr(&paren.inner().expect("parenthesized expression has a body"))
            }
            Expr::Invocation(invocation) => self.lower_invocation(invocation),
            Expr::NameRef(name) => {
                let name = name
                    .name()
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                self.ast.alloc(NodeKind::VariableAccess { name }, span)
            }
            Expr::Int(literal) => self.lower_int_literal(literal.clone()),
            Expr::Bool(literal) => self.ast.alloc(
                NodeKind::Boolean {
                    value: literal.value(),
                },
                span,
            ),
        }
    }
}

fn binary_op(kind: SyntaxKind) -> BinaryOp {
    match kind {
        SyntaxKind::Plus => BinaryOp::Add,
        SyntaxKind::Minus => BinaryOp::Sub,
        SyntaxKind::Star => BinaryOp::Mul,
        SyntaxKind::Slash => BinaryOp::Div,
        SyntaxKind::Percent => BinaryOp::Mod,
        SyntaxKind::Amp => BinaryOp::And,
        SyntaxKind::Pipe => BinaryOp::Or,
        SyntaxKind::EqualsEquals => BinaryOp::Eq,
        SyntaxKind::BangEquals => BinaryOp::Ne,
        SyntaxKind::Greater => BinaryOp::Gt,
        SyntaxKind::GreaterEquals => BinaryOp::Ge,
        SyntaxKind::Less => BinaryOp::Lt,
        SyntaxKind::LessEquals => BinaryOp::Le,
        _ => unreachable!("not a binary operator: {kind:?}"),
    }
}
