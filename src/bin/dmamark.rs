//! Command-line interface for dma-markup
//! This binary parses markup files and reports what the parser made of them.
//!
//! Usage:
//!   dmamark parse `<path>` [--format `<format>`] [--config `<file>`]  - Parse and print the node tree
//!   dmamark check `<path>` [--config `<file>`]                      - Report diagnostics, exit 1 if any
//!   dmamark list-commands [--config `<file>`]                       - List known command kinds
//!   dmamark list-formats                                          - List output formats

use clap::{Arg, ArgMatches, Command};
use dma_markup::markup::config::{Loader, MarkupConfig};
use dma_markup::markup::formats::{FormatRegistry, MarkupFormatter};
use dma_markup::markup::{Diagnostics, LogSink, Registry};
use std::process;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("Configuration file layered over the defaults")
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the markup file")
        .required(true)
        .index(1)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = Command::new("dmamark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing and checking DMA markup")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print the result")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see list-formats)")
                        .default_value("treeviz"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Report all diagnostics of a file")
                .arg(path_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("list-commands")
                .about("List the known command kinds")
                .arg(config_arg()),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            handle_parse_command(path, format, &load_config(parse_matches));
        }
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            handle_check_command(path, &load_config(check_matches));
        }
        Some(("list-commands", list_matches)) => {
            handle_list_commands_command(&load_config(list_matches));
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}

fn load_config(matches: &ArgMatches) -> MarkupConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader.build().unwrap_or_else(|e| fail(e))
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| fail(format!("cannot read {path}: {e}")))
}

fn build_registry(config: &MarkupConfig) -> Registry {
    config.registry().unwrap_or_else(|e| fail(e))
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: &str, config: &MarkupConfig) {
    let source = read_source(path);
    let registry = build_registry(config);
    let parser = config.parser(&registry).unwrap_or_else(|e| fail(e));

    let nodes = parser.parse(&source, &mut LogSink);

    let mut formats = FormatRegistry::with_defaults();
    formats.register(MarkupFormatter::new(config.syntax.clone()));
    let output = formats.serialize(&nodes, format).unwrap_or_else(|e| fail(e));

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the check command
fn handle_check_command(path: &str, config: &MarkupConfig) {
    let source = read_source(path);
    let registry = build_registry(config);
    let parser = config.parser(&registry).unwrap_or_else(|e| fail(e));

    let mut diagnostics = Diagnostics::new();
    parser.parse(&source, &mut diagnostics);

    for diagnostic in &diagnostics {
        println!(
            "{}[{}]: {}",
            diagnostic.severity,
            diagnostic.kind.code(),
            diagnostic
        );
    }

    if !diagnostics.is_empty() {
        log::info!("{path}: {} diagnostics", diagnostics.len());
        process::exit(1);
    }
}

/// Handle the list-commands command
fn handle_list_commands_command(config: &MarkupConfig) {
    let registry = build_registry(config);

    println!("Available commands ([optional]{{required}}):\n");
    for kind in registry.kinds() {
        println!("  {:<16}{}", kind.name(), kind.contract());
    }

    println!("\nSymbolic names:\n");
    for (symbol, name) in registry.symbols() {
        println!("  {symbol:<16}{name}");
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let formats = FormatRegistry::with_defaults();

    println!("Available formats:\n");
    for (name, description) in formats.descriptions() {
        println!("  {name}");
        println!("    {description}");
    }
}
