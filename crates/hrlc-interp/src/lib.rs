//! Tree-walking interpreter for analyzed HRL programs.
//!
//! Consumes the annotated AST and symbol table the compiler frontend
//! produces and executes them against the abstract machine: a single
//! accumulator, numbered floor cells, and queued input/output.

mod interp;
mod machine;

#[cfg(test)]
mod interp_tests;

pub use interp::{Interpreter, RunReport};
pub use machine::{Floor, Machine};

use hrlc_core::ValueError;

/// Runtime failures. Exhausting the input queue is not one of them: the
/// machine halts normally when `inbox` finds nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("floor index {index} is outside 0..={max}")]
    FloorIndexOutOfRange { index: i32, max: u32 },

    #[error("floor cell {index} is empty")]
    EmptyFloorCell { index: u32 },

    #[error("variable '{name}' read before it holds a value")]
    UnsetVariable { name: String },

    #[error("'{name}' is not a function or subprocedure")]
    NotCallable { name: String },

    #[error("function '{name}' finished without returning a value")]
    MissingReturnValue { name: String },

    #[error("program has no 'start' subprocedure")]
    MissingStart,

    #[error("step limit exceeded")]
    StepLimitExceeded,

    #[error("node is missing its symbol annotation")]
    UnboundNode,
}
