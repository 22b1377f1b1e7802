use clap::Parser;
use color_eyre::eyre::Result;
use rill::interpreter::Evaluator;
use rill::parser;
use rill::repl::Repl;
use std::fs::read_to_string;
use std::io::{stdin, stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[clap(name = "rill", version)]
pub struct CliArgs {
    /// Script to execute; omit to start the interactive prompt.
    pub script: Option<PathBuf>,
}

fn main() -> ExitCode {
    rill_main().expect("driver I/O failed")
}

fn rill_main() -> Result<ExitCode> {
    color_eyre::install().expect("install only runs once");
    let args = CliArgs::parse();
    match args.script {
        Some(path) => run_file(&path),
        None => {
            let stdin = stdin();
            let mut repl = Repl::new(stdin.lock(), stdout());
            repl.start()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_file(path: &Path) -> Result<ExitCode> {
    let source = match read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            println!("{error}");
            return Ok(ExitCode::from(66));
        }
    };

    let mut parser = parser::Parser::new(&source);
    let root = match parser.parse() {
        Ok(root) => root,
        Err(error) => {
            println!("{error}");
            return Ok(ExitCode::from(65));
        }
    };

    if !parser.errors.is_empty() {
        for error in &parser.errors {
            println!("{error}");
        }
        return Ok(ExitCode::from(65));
    }

    let evaluator = Evaluator::new();
    if let Err(error) = evaluator.eval(&root) {
        println!("{error}");
        return Ok(ExitCode::from(70));
    }

    Ok(ExitCode::SUCCESS)
}
