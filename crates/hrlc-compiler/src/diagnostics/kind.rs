//! Stable diagnostic identifiers.
//!
//! Codes are a contract with downstream tooling: 1xxx lexical, 2xxx
//! syntactic, 3xxx semantic. Semantic codes must not be renumbered.

use serde::Serialize;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// Every diagnostic the compiler can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    // Lexical
    UnrecognizedCharacters,

    // Syntactic
    UnexpectedToken,
    ExpectedFloorInit,
    DuplicateFloorMax,
    ExpectedStatement,
    ExpectedExpression,
    BadForInit,

    // Semantic
    SymbolRedefined,
    SymbolUndefined,
    IntegerOverflow,
    DivModByZero,
    SignatureMismatch,
    VarShadowsOuter,
    UseBeforeInit,
    DeadCode,
    InvalidLoopControlContext,
    InvalidReturnContext,
    NotAllPathsReturn,
    ExpectReturnValue,
    ReturnValueNotAllowed,
    VarUnused,
}

impl DiagnosticKind {
    pub fn code(self) -> u16 {
        match self {
            DiagnosticKind::UnrecognizedCharacters => 1001,
            DiagnosticKind::UnexpectedToken => 2001,
            DiagnosticKind::ExpectedFloorInit => 2002,
            DiagnosticKind::DuplicateFloorMax => 2003,
            DiagnosticKind::ExpectedStatement => 2004,
            DiagnosticKind::ExpectedExpression => 2005,
            DiagnosticKind::BadForInit => 2006,
            DiagnosticKind::SymbolRedefined => 3001,
            DiagnosticKind::SymbolUndefined => 3002,
            DiagnosticKind::IntegerOverflow => 3003,
            DiagnosticKind::DivModByZero => 3004,
            DiagnosticKind::SignatureMismatch => 3005,
            DiagnosticKind::VarShadowsOuter => 3006,
            DiagnosticKind::UseBeforeInit => 3007,
            DiagnosticKind::DeadCode => 3008,
            DiagnosticKind::InvalidLoopControlContext => 3009,
            DiagnosticKind::InvalidReturnContext => 3010,
            DiagnosticKind::NotAllPathsReturn => 3011,
            DiagnosticKind::ExpectReturnValue => 3012,
            DiagnosticKind::ReturnValueNotAllowed => 3013,
            DiagnosticKind::VarUnused => 3014,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::VarShadowsOuter
            | DiagnosticKind::DeadCode
            | DiagnosticKind::VarUnused => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            DiagnosticKind::UnrecognizedCharacters => "unrecognized characters",
            DiagnosticKind::UnexpectedToken => "unexpected token",
            DiagnosticKind::ExpectedFloorInit => {
                "expect either 'init floor' or 'init floor_max' statement"
            }
            DiagnosticKind::DuplicateFloorMax => "maximum one 'init floor_max' allowed",
            DiagnosticKind::ExpectedStatement => "expect a statement",
            DiagnosticKind::ExpectedExpression => "expect an expression",
            DiagnosticKind::BadForInit => {
                "init statement of 'for' loop should either be variable assignment or variable declaration"
            }
            DiagnosticKind::SymbolRedefined => "redefinition",
            DiagnosticKind::SymbolUndefined => "undefined reference",
            DiagnosticKind::IntegerOverflow => {
                "integer overflow detected: the value exceeds the allowed range [-999, 999]"
            }
            DiagnosticKind::DivModByZero => {
                "division by zero detected. The expression results in undefined behavior"
            }
            DiagnosticKind::SignatureMismatch => "signature mismatch",
            DiagnosticKind::VarShadowsOuter => "variable shadows a variable from the outer scope",
            DiagnosticKind::UseBeforeInit => "variable may be used before assignment",
            DiagnosticKind::DeadCode => "dead code detected",
            DiagnosticKind::InvalidLoopControlContext => {
                "'break' and 'continue' can only be used inside a loop (for/while)"
            }
            DiagnosticKind::InvalidReturnContext => {
                "'return' can only be used inside a function or subprocedure"
            }
            DiagnosticKind::NotAllPathsReturn => "not all code paths return a value",
            DiagnosticKind::ExpectReturnValue => {
                "the function is expected to return a value, but no value is returned"
            }
            DiagnosticKind::ReturnValueNotAllowed => {
                "the subprocedure cannot return a value, but a return value is provided"
            }
            DiagnosticKind::VarUnused => "variable defined but not used",
        }
    }
}
