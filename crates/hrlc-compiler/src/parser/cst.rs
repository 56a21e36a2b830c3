//! Syntax kinds for HRL.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds
//! (from parser). Logos derives token recognition; node kinds lack
//! token/regex attributes. `HrlLang` implements Rowan's `Language` trait for
//! tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("import")]
    ImportKw = 0,

    #[token("return")]
    ReturnKw,

    #[token("let")]
    LetKw,

    #[token("init")]
    InitKw,

    /// `floor_max` is defined before `floor` so the longer keyword wins.
    #[token("floor_max")]
    FloorMaxKw,

    #[token("floor")]
    FloorKw,

    #[token("function")]
    FunctionKw,

    #[token("sub")]
    SubKw,

    #[token("if")]
    IfKw,

    #[token("else")]
    ElseKw,

    #[token("while")]
    WhileKw,

    #[token("for")]
    ForKw,

    #[token("break")]
    BreakKw,

    #[token("continue")]
    ContinueKw,

    #[token("true")]
    TrueKw,

    #[token("false")]
    FalseKw,

    #[regex(r"[0-9]+")]
    Integer,

    /// Character literal `'x'`. Lowered to an integer with the char flag set.
    #[regex(r"'[^'\\\n]'")]
    CharLiteral,

    /// Identifier. Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[token(">=")]
    GreaterEquals,

    #[token("<=")]
    LessEquals,

    #[token("==")]
    EqualsEquals,

    #[token("!=")]
    BangEquals,

    #[token(">")]
    Greater,

    #[token("<")]
    Less,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("!")]
    Bang,

    /// `++` before `+` for correct precedence.
    #[token("++")]
    PlusPlus,

    #[token("+")]
    Plus,

    #[token("--")]
    MinusMinus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("=")]
    Equals,

    #[token(";")]
    Semicolon,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token(",")]
    Comma,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    CompilationUnit,
    ImportDirective,
    FloorBoxInit,
    FloorMaxInit,
    VarDecl,
    VarAssign,
    FloorAssign,
    StatementBlock,
    EmptyStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    ForInit,
    ForCondition,
    ForUpdate,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    InvocationStmt,
    BinaryExpr,
    PrefixExpr,
    IncrementExpr,
    DecrementExpr,
    FloorAccess,
    ParenExpr,
    InvocationExpr,
    NameRef,
    IntLiteral,
    BoolLiteral,
    SubprocDef,
    FunctionDef,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (self as u16) <= (FalseKw as u16)
    }

    /// Binary operators eligible for precedence climbing. Assignment is
    /// handled at the statement level and is deliberately absent.
    #[inline]
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            GreaterEquals
                | LessEquals
                | EqualsEquals
                | BangEquals
                | Greater
                | Less
                | Amp
                | Pipe
                | Plus
                | Minus
                | Star
                | Slash
                | Percent
        )
    }

    /// Precedence for the climbing parser, higher binds tighter.
    pub fn binary_precedence(self) -> i8 {
        match self {
            Star | Slash | Percent => 7,
            Plus | Minus => 6,
            GreaterEquals | LessEquals | Greater | Less => 5,
            EqualsEquals | BangEquals => 4,
            Amp => 3,
            Pipe => 2,
            _ => -1,
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HrlLang {}

impl Language for HrlLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<HrlLang>;
pub type SyntaxToken = rowan::SyntaxToken<HrlLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 64-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 64.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..64u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// FIRST set of an expression.
    pub const EXPR_FIRST: TokenSet = TokenSet::new(&[
        TrueKw,
        FalseKw,
        Integer,
        CharLiteral,
        Ident,
        FloorKw,
        ParenOpen,
        Plus,
        Minus,
        PlusPlus,
        MinusMinus,
        Bang,
    ]);

    /// FIRST set of a statement.
    pub const STATEMENT_FIRST: TokenSet = TokenSet::new(&[
        LetKw,
        ReturnKw,
        Semicolon,
        IfKw,
        ForKw,
        WhileKw,
        BraceOpen,
        FloorKw,
        Ident,
        BreakKw,
        ContinueKw,
    ]);

    /// FIRST set of a top-level item.
    pub const ITEM_FIRST: TokenSet = TokenSet::new(&[LetKw, FunctionKw, SubKw]);

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, Newline, LineComment]);

    /// Statement-level recovery points.
    pub const STMT_RECOVERY: TokenSet = TokenSet::new(&[Semicolon, BraceClose, BraceOpen]);
}
