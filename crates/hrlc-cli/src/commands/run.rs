//! `hrlc run`: compile and execute on the abstract machine.

use std::process::ExitCode;

use hrlc_core::HrmValue;
use hrlc_interp::Interpreter;

use super::{CliError, Compiled, compile_file};
use crate::cli::RunArgs;

pub fn run(args: RunArgs) -> Result<ExitCode, CliError> {
    let (compiled, source) = compile_file(&args.file, &args.compile)?;
    let path = args.file.display().to_string();

    let unit = match compiled {
        Compiled::Analyzed(unit) if unit.is_valid() => unit,
        Compiled::Analyzed(unit) => {
            eprint!("{}", unit.printer().render());
            return Ok(ExitCode::FAILURE);
        }
        Compiled::SyntaxErrors(diagnostics) => {
            eprint!("{}", diagnostics.printer(&source, &path).render());
            return Ok(ExitCode::FAILURE);
        }
    };

    let input = parse_input(&args.input)?;
    let report = Interpreter::new(&unit.ast, &unit.symbols)
        .with_input(input)
        .with_step_limit(args.max_steps)
        .run()?;

    if args.json {
        let report = serde_json::json!({
            "output": report.output,
            "steps": report.steps,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for value in &report.output {
            println!("{value}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Inbox values: decimal integers or single-quoted characters.
fn parse_input(raw: &[String]) -> Result<Vec<HrmValue>, CliError> {
    raw.iter()
        .map(|item| {
            let item = item.trim();
            let mut chars = item.chars();
            if let (Some('\''), Some(c), Some('\''), None) =
                (chars.next(), chars.next(), chars.next(), chars.next())
            {
                return Ok(HrmValue::char(c));
            }
            item.parse::<i32>()
                .ok()
                .and_then(|v| HrmValue::int(v).ok())
                .ok_or_else(|| CliError::BadInput(item.to_string()))
        })
        .collect()
}
