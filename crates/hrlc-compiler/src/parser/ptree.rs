//! Typed parse-tree wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors. Cast is
//! infallible for correct `SyntaxKind` - validation happens elsewhere.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ptree_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ptree_node!(CompilationUnit, CompilationUnit);
ptree_node!(ImportDirective, ImportDirective);
ptree_node!(FloorBoxInit, FloorBoxInit);
ptree_node!(FloorMaxInit, FloorMaxInit);
ptree_node!(VarDecl, VarDecl);
ptree_node!(VarAssign, VarAssign);
ptree_node!(FloorAssign, FloorAssign);
ptree_node!(StatementBlock, StatementBlock);
ptree_node!(EmptyStmt, EmptyStmt);
ptree_node!(IfStmt, IfStmt);
ptree_node!(WhileStmt, WhileStmt);
ptree_node!(ForStmt, ForStmt);
ptree_node!(ReturnStmt, ReturnStmt);
ptree_node!(BreakStmt, BreakStmt);
ptree_node!(ContinueStmt, ContinueStmt);
ptree_node!(InvocationStmt, InvocationStmt);
ptree_node!(BinaryExpr, BinaryExpr);
ptree_node!(PrefixExpr, PrefixExpr);
ptree_node!(IncrementExpr, IncrementExpr);
ptree_node!(DecrementExpr, DecrementExpr);
ptree_node!(FloorAccess, FloorAccess);
ptree_node!(ParenExpr, ParenExpr);
ptree_node!(InvocationExpr, InvocationExpr);
ptree_node!(NameRef, NameRef);
ptree_node!(IntLiteral, IntLiteral);
ptree_node!(BoolLiteral, BoolLiteral);
ptree_node!(SubprocDef, SubprocDef);
ptree_node!(FunctionDef, FunctionDef);

fn first_token_of(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

fn ident_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| t.kind() == SyntaxKind::Ident)
}

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Increment(IncrementExpr),
    Decrement(DecrementExpr),
    FloorAccess(FloorAccess),
    Paren(ParenExpr),
    Invocation(InvocationExpr),
    NameRef(NameRef),
    Int(IntLiteral),
    Bool(BoolLiteral),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::BinaryExpr => BinaryExpr::cast(node).map(Expr::Binary),
            SyntaxKind::PrefixExpr => PrefixExpr::cast(node).map(Expr::Prefix),
            SyntaxKind::IncrementExpr => IncrementExpr::cast(node).map(Expr::Increment),
            SyntaxKind::DecrementExpr => DecrementExpr::cast(node).map(Expr::Decrement),
            SyntaxKind::FloorAccess => FloorAccess::cast(node).map(Expr::FloorAccess),
            SyntaxKind::ParenExpr => ParenExpr::cast(node).map(Expr::Paren),
            SyntaxKind::InvocationExpr => InvocationExpr::cast(node).map(Expr::Invocation),
            SyntaxKind::NameRef => NameRef::cast(node).map(Expr::NameRef),
            SyntaxKind::IntLiteral => IntLiteral::cast(node).map(Expr::Int),
            SyntaxKind::BoolLiteral => BoolLiteral::cast(node).map(Expr::Bool),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Binary(n) => n.as_cst(),
            Expr::Prefix(n) => n.as_cst(),
            Expr::Increment(n) => n.as_cst(),
            Expr::Decrement(n) => n.as_cst(),
            Expr::FloorAccess(n) => n.as_cst(),
            Expr::Paren(n) => n.as_cst(),
            Expr::Invocation(n) => n.as_cst(),
            Expr::NameRef(n) => n.as_cst(),
            Expr::Int(n) => n.as_cst(),
            Expr::Bool(n) => n.as_cst(),
        }
    }
}

/// Any statement node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    VarDecl(VarDecl),
    VarAssign(VarAssign),
    FloorAssign(FloorAssign),
    Block(StatementBlock),
    Empty(EmptyStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Invocation(InvocationStmt),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::VarDecl => VarDecl::cast(node).map(Stmt::VarDecl),
            SyntaxKind::VarAssign => VarAssign::cast(node).map(Stmt::VarAssign),
            SyntaxKind::FloorAssign => FloorAssign::cast(node).map(Stmt::FloorAssign),
            SyntaxKind::StatementBlock => StatementBlock::cast(node).map(Stmt::Block),
            SyntaxKind::EmptyStmt => EmptyStmt::cast(node).map(Stmt::Empty),
            SyntaxKind::IfStmt => IfStmt::cast(node).map(Stmt::If),
            SyntaxKind::WhileStmt => WhileStmt::cast(node).map(Stmt::While),
            SyntaxKind::ForStmt => ForStmt::cast(node).map(Stmt::For),
            SyntaxKind::ReturnStmt => ReturnStmt::cast(node).map(Stmt::Return),
            SyntaxKind::BreakStmt => BreakStmt::cast(node).map(Stmt::Break),
            SyntaxKind::ContinueStmt => ContinueStmt::cast(node).map(Stmt::Continue),
            SyntaxKind::InvocationStmt => InvocationStmt::cast(node).map(Stmt::Invocation),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Stmt::VarDecl(n) => n.as_cst(),
            Stmt::VarAssign(n) => n.as_cst(),
            Stmt::FloorAssign(n) => n.as_cst(),
            Stmt::Block(n) => n.as_cst(),
            Stmt::Empty(n) => n.as_cst(),
            Stmt::If(n) => n.as_cst(),
            Stmt::While(n) => n.as_cst(),
            Stmt::For(n) => n.as_cst(),
            Stmt::Return(n) => n.as_cst(),
            Stmt::Break(n) => n.as_cst(),
            Stmt::Continue(n) => n.as_cst(),
            Stmt::Invocation(n) => n.as_cst(),
        }
    }
}

/// A subroutine definition of either flavor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubroutineDef {
    Function(FunctionDef),
    Subproc(SubprocDef),
}

impl SubroutineDef {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FunctionDef => FunctionDef::cast(node).map(SubroutineDef::Function),
            SyntaxKind::SubprocDef => SubprocDef::cast(node).map(SubroutineDef::Subproc),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            SubroutineDef::Function(n) => n.as_cst(),
            SubroutineDef::Subproc(n) => n.as_cst(),
        }
    }

    pub fn has_return(&self) -> bool {
        matches!(self, SubroutineDef::Function(_))
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        ident_tokens(self.as_cst()).next()
    }

    pub fn parameter(&self) -> Option<SyntaxToken> {
        ident_tokens(self.as_cst()).nth(1)
    }

    pub fn body(&self) -> Option<StatementBlock> {
        self.as_cst().children().find_map(StatementBlock::cast)
    }
}

impl CompilationUnit {
    pub fn cast_root(node: SyntaxNode) -> Option<Self> {
        Self::cast(node)
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportDirective> + '_ {
        self.0.children().filter_map(ImportDirective::cast)
    }

    pub fn floor_inits(&self) -> impl Iterator<Item = FloorBoxInit> + '_ {
        self.0.children().filter_map(FloorBoxInit::cast)
    }

    pub fn floor_max(&self) -> Option<FloorMaxInit> {
        self.0.children().find_map(FloorMaxInit::cast)
    }

    pub fn globals(&self) -> impl Iterator<Item = VarDecl> + '_ {
        self.0.children().filter_map(VarDecl::cast)
    }

    pub fn subroutines(&self) -> impl Iterator<Item = SubroutineDef> + '_ {
        self.0.children().filter_map(SubroutineDef::cast)
    }
}

impl ImportDirective {
    pub fn module(&self) -> Option<SyntaxToken> {
        ident_tokens(&self.0).next()
    }
}

impl FloorBoxInit {
    pub fn index(&self) -> Option<IntLiteral> {
        self.0.children().filter_map(IntLiteral::cast).next()
    }

    pub fn value(&self) -> Option<IntLiteral> {
        self.0.children().filter_map(IntLiteral::cast).nth(1)
    }
}

impl FloorMaxInit {
    pub fn value(&self) -> Option<IntLiteral> {
        self.0.children().find_map(IntLiteral::cast)
    }
}

impl VarDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        ident_tokens(&self.0).next()
    }

    pub fn equals_token(&self) -> Option<SyntaxToken> {
        first_token_of(&self.0, SyntaxKind::Equals)
    }

    pub fn initializer(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl VarAssign {
    pub fn name(&self) -> Option<SyntaxToken> {
        ident_tokens(&self.0).next()
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl FloorAssign {
    pub fn floor_access(&self) -> Option<FloorAccess> {
        self.0.children().find_map(FloorAccess::cast)
    }

    pub fn value(&self) -> Option<Expr> {
        // The first Expr child is the floor access itself; the assigned
        // value is the next expression sibling.
        self.0.children().filter_map(Expr::cast).nth(1)
    }
}

impl StatementBlock {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.0.children().filter_map(Stmt::cast)
    }
}

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        self.0.children().filter_map(Stmt::cast).next()
    }

    pub fn else_branch(&self) -> Option<Stmt> {
        self.0.children().filter_map(Stmt::cast).nth(1)
    }
}

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.0.children().find_map(Stmt::cast)
    }
}

impl ForStmt {
    pub fn init(&self) -> Option<Stmt> {
        let init = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::ForInit)?;
        init.children().find_map(Stmt::cast)
    }

    pub fn condition(&self) -> Option<Expr> {
        let cond = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::ForCondition)?;
        cond.children().find_map(Expr::cast)
    }

    pub fn update(&self) -> Option<Expr> {
        let update = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::ForUpdate)?;
        update.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.0.children().find_map(Stmt::cast)
    }
}

impl ReturnStmt {
    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl InvocationStmt {
    pub fn invocation(&self) -> Option<InvocationExpr> {
        self.0.children().find_map(InvocationExpr::cast)
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).next()
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_binary_operator())
    }
}

impl PrefixExpr {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::Plus | SyntaxKind::Minus | SyntaxKind::Bang
                )
            })
    }

    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl IncrementExpr {
    pub fn name(&self) -> Option<SyntaxToken> {
        ident_tokens(&self.0).next()
    }
}

impl DecrementExpr {
    pub fn name(&self) -> Option<SyntaxToken> {
        ident_tokens(&self.0).next()
    }
}

impl FloorAccess {
    pub fn index(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl InvocationExpr {
    pub fn callee(&self) -> Option<SyntaxToken> {
        ident_tokens(&self.0).next()
    }

    pub fn argument(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl NameRef {
    pub fn name(&self) -> Option<SyntaxToken> {
        ident_tokens(&self.0).next()
    }
}

impl IntLiteral {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::Integer | SyntaxKind::CharLiteral))
    }

    pub fn is_char(&self) -> bool {
        self.token()
            .is_some_and(|t| t.kind() == SyntaxKind::CharLiteral)
    }

    /// The literal's integer value; character literals yield their code
    /// point. Values beyond i32 saturate and get rejected by the range
    /// check in constant folding.
    pub fn value(&self) -> Option<i32> {
        let token = self.token()?;
        match token.kind() {
            SyntaxKind::Integer => Some(match token.text().parse::<i64>() {
                Ok(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
                Err(_) => i32::MAX,
            }),
            SyntaxKind::CharLiteral => token.text().chars().nth(1).map(|c| c as i32),
            _ => None,
        }
    }
}

impl BoolLiteral {
    pub fn value(&self) -> bool {
        first_token_of(&self.0, SyntaxKind::TrueKw).is_some()
    }
}
