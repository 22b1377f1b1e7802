use crate::interpreter::{Environment, Evaluator};
use crate::parser::Parser;
use std::io::{BufRead, Write};

pub const PROMPT: &str = ">> ";

/// Line-oriented read-eval-print driver. Each line parses on its own, but the
/// environment persists, so bindings carry across inputs. Generic over the
/// reader/writer pair so tests can drive it with buffers.
pub struct Repl<R, W> {
    input: R,
    output: W,
    evaluator: Evaluator,
    environment: Environment,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            evaluator: Evaluator::new(),
            environment: Environment::new(),
        }
    }

    pub fn start(&mut self) -> std::io::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            let mut parser = Parser::new(&line);
            let root = match parser.parse() {
                Ok(root) => root,
                Err(error) => {
                    writeln!(self.output, "{error}")?;
                    continue;
                }
            };

            if !parser.errors.is_empty() {
                for error in &parser.errors {
                    writeln!(self.output, "{error}")?;
                }
                continue;
            }

            match self.evaluator.eval_with_env(&root, &mut self.environment) {
                Ok(value) => writeln!(self.output, "{value}")?,
                Err(error) => writeln!(self.output, "{error}")?,
            }
        }
    }
}
