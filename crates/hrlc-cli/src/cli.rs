//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hrlc", version, about = "HRL compiler and interpreter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse and analyze a program, printing diagnostics.
    Check(CheckArgs),
    /// Compile and run a program on the abstract machine.
    Run(RunArgs),
    /// Dump the analyzed AST as text or Graphviz.
    Ast(AstArgs),
}

#[derive(Args)]
pub struct CompileFlags {
    /// Skip the optimization passes (constant folding, dead code and
    /// unused-variable elimination).
    #[arg(long)]
    pub no_opt: bool,

    /// Run every pass even after one fails.
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// HRL source file.
    pub file: PathBuf,

    #[command(flatten)]
    pub compile: CompileFlags,

    /// Render diagnostics with annotated source excerpts.
    #[arg(long)]
    pub styled: bool,

    /// Emit diagnostics as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Suppress diagnostics, only set the exit code.
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// HRL source file.
    pub file: PathBuf,

    #[command(flatten)]
    pub compile: CompileFlags,

    /// Inbox values, comma separated: integers or quoted characters
    /// (e.g. `--input 1,2,'c'`).
    #[arg(long, value_delimiter = ',')]
    pub input: Vec<String>,

    /// Abort after this many execution steps.
    #[arg(long, default_value_t = 1_000_000)]
    pub max_steps: u64,

    /// Emit the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AstArgs {
    /// HRL source file.
    pub file: PathBuf,

    #[command(flatten)]
    pub compile: CompileFlags,

    /// Write a Graphviz rendering to this path instead of a text dump.
    #[arg(long)]
    pub graph: Option<PathBuf>,

    /// Write one Graphviz snapshot per pipeline pass into this directory.
    #[arg(long, value_name = "DIR")]
    pub pass_graphs: Option<PathBuf>,
}
