//! Bloks CLI - Parse, validate, search and convert bloks payloads
//!
//! Usage:
//!   bkcli [OPTIONS] [COMMAND] <FILE|->
//!
//! Commands:
//!   parse     Parse and print the tree (default)
//!   validate  Check the payload for errors
//!   json      Export the tree as JSON
//!   find      Print the first map defining a key
//!   stats     Show tree statistics

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use bloks_core::{
    find_map, to_json, to_json_string, Location, Parser, ParserError, TreeStats, Value,
    DEFAULT_MAX_DEPTH,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = parse_args(args)?;
    init_logging(config.verbose);

    let input = read_input(&config.file)?;
    debug!(file = %config.file, bytes = input.len(), "read input");

    let mut parser = Parser::new().with_max_depth(config.max_depth);
    if config.basic {
        parser = parser.with_basic_processors();
    }

    match &config.command {
        Command::Parse => cmd_parse(&parser, &input, &config),
        Command::Validate => cmd_validate(&parser, &input, &config),
        Command::Json => cmd_json(&parser, &input, &config),
        Command::Find(key) => cmd_find(&parser, &input, key, &config),
        Command::Stats => cmd_stats(&parser, &input, &config),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("BLOKS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(file: &str) -> Result<String, String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        Ok(input)
    } else {
        fs::read_to_string(file).map_err(|e| format!("failed to read '{}': {}", file, e))
    }
}

#[derive(Debug)]
struct Config {
    command: Command,
    file: String,
    json: bool,
    pretty: bool,
    basic: bool,
    verbose: bool,
    max_depth: usize,
}

#[derive(Debug, Clone)]
enum Command {
    Parse,
    Validate,
    Json,
    Find(String),
    Stats,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut command = Command::Parse;
    let mut json = false;
    let mut pretty = false;
    let mut basic = false;
    let mut verbose = false;
    let mut max_depth = DEFAULT_MAX_DEPTH;
    let mut file = None;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("bkcli {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "-j" | "--json" => json = true,
            "-p" | "--pretty" => pretty = true,
            "-b" | "--basic" => basic = true,
            "--max-depth" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "--max-depth requires a value".to_string())?;
                max_depth = value
                    .parse()
                    .map_err(|_| format!("invalid --max-depth value: {}", value))?;
            }
            "parse" => command = Command::Parse,
            "validate" => command = Command::Validate,
            "json" => command = Command::Json,
            "stats" => command = Command::Stats,
            "find" => {
                i += 1;
                let key = args
                    .get(i)
                    .ok_or_else(|| "find requires a key".to_string())?;
                command = Command::Find(key.clone());
            }
            "-" => {
                if file.is_some() {
                    return Err("multiple files specified".to_string());
                }
                file = Some(arg.clone());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => {
                if file.is_some() {
                    return Err("multiple files specified".to_string());
                }
                file = Some(arg.clone());
            }
        }
        i += 1;
    }

    let file = file.ok_or_else(|| "no input file specified".to_string())?;

    Ok(Config {
        command,
        file,
        json,
        pretty,
        basic,
        verbose,
        max_depth,
    })
}

fn print_help() {
    eprintln!(
        r#"bkcli - bloks payload parser and converter

USAGE:
    bkcli [OPTIONS] [COMMAND] <FILE|->

COMMANDS:
    parse         Parse and print the tree (default)
    validate      Check the payload for errors without output
    json          Export the tree as JSON
    find <KEY>    Print the first map that defines KEY (use with -b)
    stats         Show tree statistics

OPTIONS:
    -b, --basic          Apply the basic bk.action processors
    -j, --json           Output in JSON format
    -p, --pretty         Pretty-print JSON output
    -v, --verbose        Show the tree as an outline and enable debug logs
        --max-depth N    Maximum blok nesting (default {})
    -h, --help           Print help information
    -V, --version        Print version information

ENVIRONMENT:
    BLOKS_LOG            Log filter, e.g. "debug" (default "warn")

EXAMPLES:
    bkcli payload.bk               Parse and print a payload
    bkcli -b -v payload.bk         Apply basic processors, print an outline
    bkcli json -p payload.bk       Export as pretty JSON
    bkcli -b find title payload.bk Find the map defining "title"
    cat payload.bk | bkcli stats - Statistics for stdin
"#,
        DEFAULT_MAX_DEPTH
    );
}

/// Parse, attaching line:column to failures for display.
fn parse_input(parser: &Parser, input: &str) -> Result<Value, String> {
    parser.parse(input).map_err(|e| describe_error(&e, input))
}

fn describe_error(error: &ParserError, input: &str) -> String {
    match error.offset() {
        Some(offset) => format!("{} ({})", error, Location::from_offset(input, offset)),
        None => error.to_string(),
    }
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(parser: &Parser, input: &str, config: &Config) -> Result<(), String> {
    let value = parse_input(parser, input)?;

    if config.json {
        print_json(&value, config.pretty)
    } else {
        if config.verbose {
            print_outline(&value, 0);
        } else {
            println!("{}", value);
        }
        Ok(())
    }
}

// =============================================================================
// Validate Command
// =============================================================================

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    error: Option<JsonError>,
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    category: String,
    offset: Option<usize>,
    line: Option<usize>,
    column: Option<usize>,
}

impl JsonError {
    fn new(error: &ParserError, input: &str) -> Self {
        let location = error.offset().map(|o| Location::from_offset(input, o));
        Self {
            message: error.to_string(),
            category: format!("{:?}", error.category()).to_lowercase(),
            offset: error.offset(),
            line: location.map(|l| l.line),
            column: location.map(|l| l.column),
        }
    }
}

fn cmd_validate(parser: &Parser, input: &str, config: &Config) -> Result<(), String> {
    let result = parser.parse(input);

    if config.json {
        let report = ValidationReport {
            valid: result.is_ok(),
            error: result.as_ref().err().map(|e| JsonError::new(e, input)),
        };
        println!("{}", serialize(&report, config.pretty)?);
    }

    match result {
        Ok(_) => {
            if !config.json {
                println!("Valid: no errors found");
            }
            Ok(())
        }
        Err(e) => {
            if !config.json {
                eprintln!("Invalid: {}", describe_error(&e, input));
            }
            Err("1 error found".to_string())
        }
    }
}

// =============================================================================
// JSON Command
// =============================================================================

fn cmd_json(parser: &Parser, input: &str, config: &Config) -> Result<(), String> {
    let value = parse_input(parser, input)?;
    print_json(&value, config.pretty)
}

fn print_json(value: &Value, pretty: bool) -> Result<(), String> {
    let text = to_json_string(value, pretty).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn serialize<T: Serialize>(value: &T, pretty: bool) -> Result<String, String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map_err(|e| ParserError::from(e).to_string())
}

// =============================================================================
// Find Command
// =============================================================================

fn cmd_find(parser: &Parser, input: &str, key: &str, config: &Config) -> Result<(), String> {
    let value = parse_input(parser, input)?;
    let map = find_map(key, &value).ok_or_else(|| format!("no map defines key '{}'", key))?;
    debug!(key, entries = map.len(), "found map");

    if config.json {
        let object: serde_json::Map<String, serde_json::Value> = map
            .iter()
            .map(|(k, v)| Ok((k.to_string(), to_json(v)?)))
            .collect::<Result<_, ParserError>>()
            .map_err(|e| e.to_string())?;
        println!("{}", serialize(&object, config.pretty)?);
    } else {
        for (k, v) in &map {
            let marker = if *k == key { "*" } else { " " };
            println!("{} {}: {}", marker, k, v);
        }
    }
    Ok(())
}

// =============================================================================
// Stats Command
// =============================================================================

#[derive(Serialize)]
struct JsonStats<'a> {
    values: usize,
    bloks: usize,
    local_bloks: usize,
    strings: usize,
    numbers: usize,
    bools: usize,
    nulls: usize,
    max_depth: usize,
    names: &'a std::collections::BTreeMap<String, usize>,
    chars: usize,
    lines: usize,
}

fn cmd_stats(parser: &Parser, input: &str, config: &Config) -> Result<(), String> {
    let value = parse_input(parser, input)?;
    let stats = TreeStats::collect(&value);

    if config.json {
        let report = JsonStats {
            values: stats.total(),
            bloks: stats.bloks,
            local_bloks: stats.local_bloks,
            strings: stats.strings,
            numbers: stats.numbers,
            bools: stats.bools,
            nulls: stats.nulls,
            max_depth: stats.max_depth,
            names: &stats.names,
            chars: input.chars().count(),
            lines: input.lines().count(),
        };
        println!("{}", serialize(&report, config.pretty)?);
        return Ok(());
    }

    println!("Tree Statistics");
    println!("---------------");
    println!("Values:         {}", stats.total());
    println!("  Bloks:        {} ({} local)", stats.bloks, stats.local_bloks);
    println!("  Strings:      {}", stats.strings);
    println!("  Numbers:      {}", stats.numbers);
    println!("  Booleans:     {}", stats.bools);
    println!("  Nulls:        {}", stats.nulls);
    println!("Max depth:      {}", stats.max_depth);
    println!();
    println!("Size:");
    println!("  Characters:   {}", input.chars().count());
    println!("  Lines:        {}", input.lines().count());

    if !stats.names.is_empty() {
        println!();
        println!("Blok names:");
        for (name, count) in &stats.names {
            println!("  {:>6}  {}", count, name);
        }
    }

    Ok(())
}

// =============================================================================
// Text Output
// =============================================================================

fn print_outline(value: &Value, indent: usize) {
    let prefix = "  ".repeat(indent);

    match value {
        Value::Blok(blok) => {
            let marker = if blok.is_local { "#" } else { "" };
            println!(
                "{}{}{} ({} args)",
                prefix,
                marker,
                blok.name,
                blok.args.len()
            );
            for arg in &blok.args {
                print_outline(arg, indent + 1);
            }
        }
        Value::String(s) => {
            let preview: String = s.chars().take(60).collect();
            let ellipsis = if s.chars().count() > 60 { "..." } else { "" };
            println!(
                "{}string: {}{}",
                prefix,
                preview.replace('\n', "\\n"),
                ellipsis
            );
        }
        other => println!("{}{}: {}", prefix, other.type_name(), other),
    }
}
