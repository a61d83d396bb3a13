use std::collections::HashMap;
use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use rerouter::{Handler, MatchResult, Positional, Router};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grammar to register (repeatable)
    #[arg(short = 'r', long = "route", value_name = "GRAMMAR")]
    routes: Vec<String>,

    /// File with one grammar per line; `name = grammar` shares a target by name
    #[arg(short = 'f', long = "routes", value_name = "FILE")]
    routes_file: Option<String>,

    /// Log routing decisions to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Command to resolve; quote it to keep shell quoting intact
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "rerouter=debug"
    } else {
        "rerouter=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String> {
    let mut grammars: Vec<(String, String)> = args
        .routes
        .iter()
        .map(|grammar| (grammar.clone(), grammar.clone()))
        .collect();
    if let Some(path) = args.routes_file.as_ref() {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
        grammars.extend(parse_route_file(&contents));
    }
    if grammars.is_empty() {
        bail!("No routes given; use --route GRAMMAR or --routes FILE.");
    }

    let mut router: Router<(), String> = Router::new();
    let mut handlers: HashMap<String, Handler<(), String>> = HashMap::new();
    for (name, grammar) in grammars {
        let handler = handlers
            .entry(name.clone())
            .or_insert_with(|| Handler::immediate(move |m, ()| report(&name, m)))
            .clone();
        router
            .register(&grammar, handler)
            .with_context(|| format!("Invalid route '{grammar}'"))?;
    }

    let command = args.command.join(" ");
    Ok(router.dispatch(&command, ())?)
}

/// Parse `grammar` or `name = grammar` lines, skipping blanks and `#` comments.
///
/// A line is only split when the text before the first `=` is a bare name,
/// so grammars with a quoted `=` stay whole.
fn parse_route_file(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once('=') {
            Some((name, grammar)) if is_target_name(name.trim()) => {
                (name.trim().to_string(), grammar.trim().to_string())
            }
            _ => (line.to_string(), line.to_string()),
        })
        .collect()
}

fn is_target_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-'))
}

fn report(name: &str, m: &MatchResult) -> String {
    let mut lines = vec![format!("target: {name}"), format!("grammar: {}", m.grammar())];
    for idx in 0..m.len() {
        let value = match m.positional(idx) {
            Ok(Positional::Single(value)) => value.to_string(),
            Ok(Positional::Pair(key, value)) => format!("{key}:{value}"),
            Ok(Positional::Empty) | Err(_) => "-".to_string(),
        };
        lines.push(format!("  [{idx}] {value}"));
    }
    for key in m.names() {
        lines.push(format!("  {key} = {}", m.get(key).into_vec().iter().join(", ")));
    }
    lines.join("\n")
}
