//! `hrlc ast`: dump the analyzed tree.

use std::path::Path;
use std::process::ExitCode;

use hrlc_compiler::ast::{AttrKind, dump, lower};
use hrlc_compiler::sema::clear_symbol_table::ClearSymbolTablePass;
use hrlc_compiler::sema::const_folding::ConstantFoldingPass;
use hrlc_compiler::sema::control_flow::ControlFlowVerificationPass;
use hrlc_compiler::sema::dead_code::DeadCodeEliminationPass;
use hrlc_compiler::sema::strip_attributes::StripAttributesPass;
use hrlc_compiler::sema::symbol_analysis::SymbolAnalysisPass;
use hrlc_compiler::sema::unused_symbols::UnusedSymbolEliminationPass;
use hrlc_compiler::sema::use_before_init::UseBeforeInitPass;
use hrlc_compiler::sema::{PassManager, SemanticPass};
use hrlc_compiler::Compiler;

use super::{CliError, Compiled, compile_file, compile_options, read_source};
use crate::cli::AstArgs;

const GRAPH_ATTRS: [AttrKind; 4] = [
    AttrKind::Symbol,
    AttrKind::ScopeInfo,
    AttrKind::ConstFold,
    AttrKind::ControlContext,
];

pub fn run(args: AstArgs) -> Result<ExitCode, CliError> {
    if let Some(dir) = &args.pass_graphs {
        return run_with_pass_graphs(&args, dir);
    }

    let (compiled, source) = compile_file(&args.file, &args.compile)?;
    let path = args.file.display().to_string();

    let unit = match compiled {
        Compiled::Analyzed(unit) => unit,
        Compiled::SyntaxErrors(diagnostics) => {
            eprint!("{}", diagnostics.printer(&source, &path).render());
            return Ok(ExitCode::FAILURE);
        }
    };
    eprint!("{}", unit.printer().render());

    match &args.graph {
        Some(graph_path) => {
            let dot = dump::graphviz(&unit.ast, Some(&unit.symbols), &GRAPH_ATTRS);
            std::fs::write(graph_path, dot).map_err(|source| CliError::Io {
                path: graph_path.display().to_string(),
                source,
            })?;
        }
        None => print!("{}", dump::text_dump(&unit.ast)),
    }

    Ok(if unit.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Assembles the pipeline pass by pass so each one can write an AST snapshot
/// after it runs.
fn run_with_pass_graphs(args: &AstArgs, dir: &Path) -> Result<ExitCode, CliError> {
    let source = read_source(&args.file)?;
    let name = args.file.display().to_string();

    let parsed = Compiler::new(name.clone(), source.clone()).parse()?;
    if parsed.diagnostics().has_errors() {
        eprint!("{}", parsed.diagnostics().printer(&source, &name).render());
        return Ok(ExitCode::FAILURE);
    }
    let unit = parsed
        .compilation_unit()
        .expect("parser always produces a compilation unit");
    let ast = lower(&unit);

    std::fs::create_dir_all(dir).map_err(|source| CliError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let options = compile_options(&args.compile);
    let mut manager =
        PassManager::new(ast, name.as_str()).with_diagnostics(parsed.diagnostics().clone());
    let mut passes: Vec<Box<dyn SemanticPass>> = Vec::new();
    if options.optimize {
        passes.push(Box::new(SymbolAnalysisPass::new()));
        passes.push(Box::new(UseBeforeInitPass::new()));
        passes.push(Box::new(ConstantFoldingPass::new()));
        passes.push(Box::new(DeadCodeEliminationPass::new()));
        passes.push(Box::new(UnusedSymbolEliminationPass::new()));
        passes.push(Box::new(ClearSymbolTablePass::new()));
        passes.push(Box::new(StripAttributesPass::new(vec![
            AttrKind::Symbol,
            AttrKind::ScopeInfo,
        ])));
    }
    passes.push(Box::new(SymbolAnalysisPass::new()));
    passes.push(Box::new(UseBeforeInitPass::new()));
    passes.push(Box::new(ControlFlowVerificationPass::new()));

    for (index, pass) in passes.into_iter().enumerate() {
        let graph_path = dir.join(format!("{:02}-{}.dot", index, pass.name()));
        manager.add_pass_with_graph(pass, graph_path, GRAPH_ATTRS.to_vec());
    }
    let status = manager.run(!args.compile.keep_going);
    let (ast, _, diagnostics) = manager.into_artifacts();

    eprint!("{}", diagnostics.printer(&source, &name).render());
    print!("{}", dump::text_dump(&ast));

    Ok(if status.is_ok() && !diagnostics.has_errors() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
