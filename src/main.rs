/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * License:
 * This file is part of the NUA programming language project.
 *
 * NUA is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nua::interpreter::display::value_to_repr;
use nua::{lex, Config, DiagnosticPrinter, EvalMode, Feed, Interpreter, LiteralPolicy, NuaError, SourceBuffer};

/// NUA is a small embeddable scripting language.
///
/// Runs FILE, or the code given with -e, or starts an interactive session
/// when neither is present.
#[derive(Parser, Debug)]
#[command(name = "nua", version, about, long_about = None)]
struct Args {
    /// Script to run.
    file: Option<PathBuf>,

    /// Run SOURCE instead of a file.
    #[arg(short = 'e', long = "eval", value_name = "SOURCE", conflicts_with = "file")]
    source: Option<String>,

    /// Evaluation engine.
    #[arg(long, value_enum)]
    mode: Option<EvalMode>,

    /// What constant list and table literals evaluate to in compiled mode.
    #[arg(long, value_enum)]
    literals: Option<LiteralPolicy>,

    /// Maximum nested call depth.
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,

    /// JSON config file; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the token stream as JSON instead of running.
    #[arg(long)]
    tokens: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let (name, source) = match (&args.file, &args.source) {
        (Some(path), _) => match fs::read_to_string(path) {
            Ok(source) => (path.display().to_string(), source),
            Err(err) => {
                eprintln!("Failed to read the input file '{}': {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        (None, Some(source)) => ("<eval>".to_string(), source.clone()),
        (None, None) => return repl(config),
    };

    if args.tokens {
        return dump_tokens(&name, &source);
    }

    let nua = Interpreter::new(config);
    match nua.eval(&source) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            DiagnosticPrinter::new(name, source).print(&err);
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<Config, String> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };

    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(policy) = args.literals {
        config.literal_policy = policy;
    }
    if let Some(depth) = args.max_depth {
        config.max_call_depth = depth;
    }

    Ok(config)
}

fn dump_tokens(name: &str, source: &str) -> ExitCode {
    let tokens = match lex(source) {
        Ok(tokens) => tokens,
        Err(err) => {
            DiagnosticPrinter::new(name, source).print(&NuaError::from(err));
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&tokens) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("cannot serialize tokens: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Read-eval loop: lines accumulate until they form a complete program.
fn repl(config: Config) -> ExitCode {
    let nua = Interpreter::new(config);
    let mut buffer = SourceBuffer::new();
    let stdin = io::stdin();

    prompt(&buffer);
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("cannot read input: {err}");
                return ExitCode::FAILURE;
            }
        };

        let pending = format!("{}{}\n", buffer.text(), line);
        match buffer.push_line(&line) {
            Feed::NeedMore => {}

            Feed::Ready(program) => match nua.execute(&program) {
                Ok(flow) => {
                    if flow.value.is_some() {
                        println!("{}", value_to_repr(&flow.value));
                    }
                }
                Err(err) => DiagnosticPrinter::new("<repl>", pending).print(&err.into()),
            },

            Feed::Failed(err) => DiagnosticPrinter::new("<repl>", pending).print(&err),
        }

        prompt(&buffer);
    }

    ExitCode::SUCCESS
}

fn prompt(buffer: &SourceBuffer) {
    print!("{}", if buffer.is_empty() { "> " } else { ". " });
    let _ = io::stdout().flush();
}
