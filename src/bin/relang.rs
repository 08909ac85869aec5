//! Command-line interface for relang.
//!
//! Loads a grammar document, compiles it and reports on it as JSON.
//!
//! Usage:
//!   relang patterns `<grammar>`                    - Print both derived patterns
//!   relang match `<grammar>` `<input>` [--prefix]  - Match input; exit 1 if rejected
//!   relang complete `<grammar>` `<input>`          - List completions for a prefix

use clap::{Arg, ArgAction, ArgMatches, Command};
use relang::config::Loader;
use relang::definition::{DefinitionError, GrammarDocument};
use relang::grammar::{compile_with, CompileError, Grammar, MatchMode};
use relang::telemetry::{self, TelemetryError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() {
    let grammar_arg = || {
        Arg::new("grammar")
            .help("Grammar document (.json for JSON, YAML otherwise)")
            .required(true)
            .index(1)
    };
    let input_arg = || Arg::new("input").help("Text to match").required(true).index(2);

    let matches = Command::new("relang")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile grammars into full-match and prefix-match regular expressions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("log-filter")
                .long("log-filter")
                .global(true)
                .help("tracing filter directive, e.g. 'relang=debug'"),
        )
        .subcommand(
            Command::new("patterns")
                .about("Print the full-match and prefix-match patterns")
                .arg(grammar_arg()),
        )
        .subcommand(
            Command::new("match")
                .about("Match input against the grammar")
                .arg(grammar_arg())
                .arg(input_arg())
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .short('p')
                        .action(ArgAction::SetTrue)
                        .help("Accept any prefix of a valid input"),
                ),
        )
        .subcommand(
            Command::new("complete")
                .about("List completions for input typed so far")
                .arg(grammar_arg())
                .arg(input_arg()),
        )
        .get_matches();

    match run(&matches) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Dispatch the subcommand. `Ok(false)` means the input was rejected.
fn run(matches: &ArgMatches) -> Result<bool, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_config_file(path);
    }
    if let Some(filter) = matches.get_one::<String>("log-filter") {
        loader = loader.with_log_filter(filter)?;
    }
    let config = loader.build()?;
    telemetry::init(&config.log.filter)?;

    let Some((name, sub)) = matches.subcommand() else {
        unreachable!()
    };
    let path = required(sub, "grammar");
    let root = GrammarDocument::from_path(path)?.to_node()?;
    let grammar = compile_with(&root, &config.compile)?;

    match name {
        "patterns" => handle_patterns_command(&grammar),
        "match" => {
            let mode = if sub.get_flag("prefix") {
                MatchMode::Prefix
            } else {
                MatchMode::Full
            };
            handle_match_command(&grammar, required(sub, "input"), mode)
        }
        "complete" => handle_complete_command(&grammar, required(sub, "input")),
        _ => unreachable!(),
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    // clap enforces `required(true)` before we get here
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn handle_patterns_command(grammar: &Grammar) -> Result<bool, CliError> {
    let nodes = grammar.variables();
    let mut variables: Vec<&str> = Vec::new();
    for var in nodes.iter().filter_map(|node| node.as_variable()) {
        if !variables.contains(&var.name()) {
            variables.push(var.name());
        }
    }
    let output = json!({
        "full": grammar.pattern(),
        "prefix": grammar.prefix_pattern(),
        "variables": variables,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(true)
}

fn handle_match_command(grammar: &Grammar, input: &str, mode: MatchMode) -> Result<bool, CliError> {
    let found = match mode {
        MatchMode::Full => grammar.match_full(input),
        MatchMode::Prefix => grammar.match_prefix(input),
    };
    let mode_name = match mode {
        MatchMode::Full => "full",
        MatchMode::Prefix => "prefix",
    };
    let output = json!({
        "matched": found.is_some(),
        "mode": mode_name,
        "variables": found.as_ref().map(|m| m.variables()).unwrap_or_default(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(found.is_some())
}

fn handle_complete_command(grammar: &Grammar, input: &str) -> Result<bool, CliError> {
    let completions = grammar.complete(input);
    println!("{}", serde_json::to_string_pretty(&completions)?);
    Ok(true)
}
