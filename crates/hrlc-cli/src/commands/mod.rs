//! Command implementations.

mod ast;
mod check;
mod run;

use std::path::Path;
use std::process::ExitCode;

use hrlc_compiler::{AnalyzedUnit, CompileOptions, Diagnostics, Error, compile};
use hrlc_interp::RuntimeError;

use crate::cli::{Cli, Command, CompileFlags};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Compile(#[from] Error),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("invalid inbox value '{0}' (expected an integer or 'c')")]
    BadInput(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub fn dispatch(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Command::Check(args) => check::run(args),
        Command::Run(args) => run::run(args),
        Command::Ast(args) => ast::run(args),
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn compile_options(flags: &CompileFlags) -> CompileOptions {
    CompileOptions {
        optimize: !flags.no_opt,
        fail_fast: !flags.keep_going,
    }
}

/// The compiled unit, or the syntax diagnostics that stopped it.
enum Compiled {
    Analyzed(Box<AnalyzedUnit>),
    SyntaxErrors(Diagnostics),
}

fn compile_file(path: &Path, flags: &CompileFlags) -> Result<(Compiled, String), CliError> {
    let source = read_source(path)?;
    let name = path.display().to_string();
    match compile(name, source.clone(), compile_options(flags)) {
        Ok(unit) => Ok((Compiled::Analyzed(Box::new(unit)), source)),
        Err(Error::SyntaxErrors(diagnostics)) => Ok((Compiled::SyntaxErrors(diagnostics), source)),
        Err(other) => Err(other.into()),
    }
}
