//! Interactive session
//!
//! Each line is either a block written in its one-line form (`declare a, b`,
//! `set a = 5`, `calc a = a * 2`), a meta command starting with `:`, or a
//! bare expression to evaluate. Variables persist between lines.

use crate::ast::Block;
use crate::eval::calculate_expression;
use crate::interp::{Environment, Interpreter};
use crate::report;
use miette::{IntoDiagnostic, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use thiserror::Error;

const HELP: &str = "\
Commands:
  declare a, b     Declare variables (set to 0)
  set a = 5        Store an integer literal
  calc a = a * 2   Store the value of an expression
  <expr>           Evaluate an expression
  :vars            Show all variables
  :reset           Forget all variables
  :help, :h        Show this help
  :quit, :q        Exit the REPL
";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Block(Block),
    Eval(String),
    Vars,
    Reset,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, miette::Diagnostic)]
pub enum LineError {
    #[error("Unknown command `{0}`")]
    #[diagnostic(code(repl::unknown_command), help("type :help for a list of commands"))]
    UnknownCommand(String),

    #[error("Expected `=` after `{keyword}`")]
    #[diagnostic(code(repl::missing_equals))]
    MissingEquals { keyword: &'static str },
}

/// Parse one input line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<Command>, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if line.starts_with(':') {
        return match line {
            ":quit" | ":q" => Ok(Some(Command::Quit)),
            ":help" | ":h" => Ok(Some(Command::Help)),
            ":vars" => Ok(Some(Command::Vars)),
            ":reset" => Ok(Some(Command::Reset)),
            other => Err(LineError::UnknownCommand(other.to_string())),
        };
    }

    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let command = match keyword {
        "declare" => Command::Block(Block::declare([rest.trim()])),
        "set" => {
            let (target, literal) = split_assignment(rest, "set")?;
            Command::Block(Block::assign(target, literal))
        }
        "calc" => {
            let (target, expression) = split_assignment(rest, "calc")?;
            Command::Block(Block::calculate(target, expression))
        }
        _ => Command::Eval(line.to_string()),
    };
    Ok(Some(command))
}

fn split_assignment<'a>(
    rest: &'a str,
    keyword: &'static str,
) -> Result<(&'a str, &'a str), LineError> {
    rest.split_once('=')
        .map(|(lhs, rhs)| (lhs.trim(), rhs.trim()))
        .ok_or(LineError::MissingEquals { keyword })
}

/// What the session wants printed after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Silent,
    Text(String),
    Quit,
}

/// REPL state carried between lines
#[derive(Debug, Default)]
pub struct Session {
    env: Environment,
    interpreter: Interpreter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Handle one input line
    pub fn handle(&mut self, line: &str) -> Result<Reply> {
        let Some(command) = parse_line(line)? else {
            return Ok(Reply::Silent);
        };

        match command {
            Command::Quit => Ok(Reply::Quit),
            Command::Help => Ok(Reply::Text(HELP.to_string())),
            Command::Vars => Ok(Reply::Text(report::render_variables(&self.env))),
            Command::Reset => {
                self.env.clear();
                Ok(Reply::Silent)
            }
            Command::Eval(expr) => match calculate_expression(&expr, &self.env) {
                Ok(value) => Ok(Reply::Text(format!("{}\n", value))),
                Err(err) => Err(miette::Report::new(err).with_source_code(expr)),
            },
            Command::Block(block) => {
                self.interpreter
                    .run_in(std::slice::from_ref(&block), &mut self.env)
                    .map_err(|failure| miette::Report::new(failure.error))?;
                Ok(self.echo(&block))
            }
        }
    }

    /// Show the stored value after an assignment
    fn echo(&self, block: &Block) -> Reply {
        let target = match block {
            Block::Assign { target, .. } | Block::Calculate { target, .. } => target.trim(),
            _ => return Reply::Silent,
        };
        match self.env.get(target) {
            Some(value) => Reply::Text(format!("{} = {}\n", target, value)),
            None => Reply::Silent,
        }
    }
}

/// Run the interactive loop on the terminal
pub fn run() -> Result<()> {
    println!("blocklang REPL v{}", crate::VERSION);
    println!("Type :help for help, :quit to exit");
    println!();

    let mut editor = DefaultEditor::new().into_diagnostic()?;
    let mut session = Session::new();

    loop {
        match editor.readline("blk> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                match session.handle(&line) {
                    Ok(Reply::Quit) => break,
                    Ok(Reply::Text(text)) => print!("{}", text),
                    Ok(Reply::Silent) => {}
                    Err(report) => eprintln!("{:?}", report),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err).into_diagnostic(),
        }
    }

    println!("Goodbye!");
    Ok(())
}
