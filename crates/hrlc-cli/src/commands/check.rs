//! `hrlc check`: run the pipeline and report diagnostics.

use std::process::ExitCode;

use hrlc_compiler::diagnostics::{Diagnostics, LineIndex};

use super::{CliError, Compiled, compile_file};
use crate::cli::CheckArgs;

pub fn run(args: CheckArgs) -> Result<ExitCode, CliError> {
    let (compiled, source) = compile_file(&args.file, &args.compile)?;
    let path = args.file.display().to_string();

    let (diagnostics, failed) = match &compiled {
        Compiled::Analyzed(unit) => (&unit.diagnostics, !unit.is_valid()),
        Compiled::SyntaxErrors(diagnostics) => (diagnostics, true),
    };

    if args.json {
        print_json(diagnostics, &path, &source)?;
    } else if !args.quiet {
        let rendered = diagnostics
            .printer(&source, &path)
            .styled(args.styled)
            .colored(args.styled)
            .render();
        eprint!("{rendered}");
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_json(diagnostics: &Diagnostics, path: &str, source: &str) -> Result<(), CliError> {
    let index = LineIndex::new(source);
    let views = diagnostics.views(path, &index);
    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}
