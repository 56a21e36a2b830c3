//! Core data model shared by the HRL compiler, interpreter, and CLI.
//!
//! The abstract machine operates on a single word type: an integer confined
//! to a small closed range, or a character. This crate owns that word type
//! and the machine limits so the compiler's constant folder and the runtime
//! agree on the arithmetic rules.

mod value;

#[cfg(test)]
mod value_tests;

pub use value::{HrmValue, ValueError, DEFAULT_FLOOR_MAX, MAX_INT, MIN_INT};
