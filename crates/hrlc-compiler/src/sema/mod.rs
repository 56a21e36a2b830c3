//! Semantic analysis: scopes, symbols, and the pass pipeline.
//!
//! Passes run strictly in sequence under the [`PassManager`] and
//! communicate only through AST mutations, node attributes, and the shared
//! [`SymbolTable`].

pub mod clear_symbol_table;
pub mod const_folding;
pub mod control_flow;
pub mod dead_code;
pub mod pass;
pub mod pass_manager;
mod scope;
pub mod strip_attributes;
mod symbol;
mod symbol_table;
pub mod symbol_analysis;
pub mod unused_symbols;
pub mod use_before_init;

#[cfg(test)]
mod const_folding_tests;
#[cfg(test)]
mod dead_code_tests;
#[cfg(test)]
mod pipeline_tests;
#[cfg(test)]
mod scope_tests;
#[cfg(test)]
mod symbol_analysis_tests;
#[cfg(test)]
mod symbol_table_tests;
#[cfg(test)]
mod unused_symbols_tests;
#[cfg(test)]
mod use_before_init_tests;

pub use pass::{PassContext, PassStatus, SemanticPass};
pub use pass_manager::PassManager;
pub use scope::{ROOT_SCOPE, ScopeId, ScopeKind, ScopeManager};
pub use symbol::{BUILTIN_FILE, Symbol, SymbolId, SymbolKind};
pub use symbol_table::SymbolTable;
