//! Blocklang CLI
//!
//! Main entry point for the `blk` command.

use blocklang::report::{self, Report};
use blocklang::{Environment, Interpreter, Program};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "blk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run and inspect block programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program file (.json or .toml)
    Run {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Print the path of every block visited
        #[arg(long)]
        trace: bool,
    },

    /// Evaluate a single arithmetic expression
    Eval {
        /// Expression to evaluate
        #[arg(value_name = "EXPR", allow_hyphen_values = true)]
        expr: String,

        /// Variable binding, NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
        vars: Vec<(String, i64)>,
    },

    /// Load a program file and validate its shape without running it
    Check {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show the block outline
        #[arg(long)]
        show_tree: bool,
    },

    /// Start the interactive REPL
    Repl,

    /// Show information about the language
    Info,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// One `name = value` line per variable
    Text,
    /// Structured report
    Json,
}

fn parse_binding(arg: &str) -> Result<(String, i64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", arg))?;
    let name = name.trim();
    if !blocklang::lexer::is_identifier(name) {
        return Err(format!("`{}` is not a valid variable name", name));
    }
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for `{}`: {}", name, e))?;
    Ok((name.to_string(), value))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose && std::env::var_os("RUST_LOG").is_none() {
        EnvFilter::new("blocklang=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Run {
            input,
            format,
            trace,
        } => run(&input, format, trace),

        Commands::Eval { expr, vars } => eval(&expr, vars).map(|()| ExitCode::SUCCESS),

        Commands::Check { input, show_tree } => {
            check(&input, show_tree).map(|()| ExitCode::SUCCESS)
        }

        Commands::Repl => blocklang::repl::run().map(|()| ExitCode::SUCCESS),

        Commands::Info => info().map(|()| ExitCode::SUCCESS),
    }
}

/// A failed run is reported once: as the JSON report, or as a diagnostic
fn run(input: &Path, format: OutputFormat, trace: bool) -> Result<ExitCode> {
    tracing::info!("Running {:?}", input);

    let program = Program::load(input)?;
    tracing::debug!("Loaded {} blocks", program.count());

    let mut interpreter = Interpreter::new();
    let result = interpreter.run(&program.blocks);

    if trace {
        for path in interpreter.executed() {
            eprintln!("visit {}", path);
        }
    }

    match (format, result) {
        (OutputFormat::Text, Ok(env)) => {
            print!("{}", report::render_variables(&env));
            Ok(ExitCode::SUCCESS)
        }
        (OutputFormat::Text, Err(failure)) => Err(report::diagnostic(&program, &failure)),
        (OutputFormat::Json, result) => {
            let json = serde_json::to_string_pretty(&Report::new(&result)).into_diagnostic()?;
            println!("{}", json);
            Ok(if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn eval(expr: &str, vars: Vec<(String, i64)>) -> Result<()> {
    let env: Environment = vars.into_iter().collect();
    tracing::debug!("Evaluating {:?} with {} bindings", expr, env.len());

    match blocklang::calculate_expression(expr, &env) {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(err) => Err(miette::Report::new(err).with_source_code(expr.to_string())),
    }
}

fn check(input: &Path, show_tree: bool) -> Result<()> {
    tracing::info!("Checking {:?}", input);

    let program = Program::load(input)?;

    if show_tree {
        print!("{}", program);
    }

    println!(
        "{}: {} blocks ({} top-level)",
        input.display(),
        program.count(),
        program.len()
    );
    Ok(())
}

fn info() -> Result<()> {
    println!("Blocklang");
    println!("Version: {}", blocklang::VERSION);
    println!();
    println!("Blocks:");
    println!("  - declare: names, comma separated, start at 0");
    println!("  - assign: integer literal into a declared variable");
    println!("  - calculate: expression into a declared variable");
    println!("  - if: compare two expressions, run nested blocks");
    println!();
    println!("Expressions:");
    println!("  - 64-bit integers, names, + - * / % and parentheses");
    println!("  - division truncates toward zero");

    Ok(())
}
