//! UP command-line tool for parsing, printing, and transcoding UP documents.
//!
//! Usage: up [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (tree, json, yaml, toml, cbor) [default: tree]
//!   -k, --key <KEY>        Print only the value of the first top-level node with KEY
//!   -w, --write            Write output to file with inferred name
//!   -o, --output <FILE>    Write output to specified file
//!   --strict               Reject unterminated blocks, lists, and multiline strings
//!   --check                Check if file parses (exit 0 if valid, 1 if invalid)
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Log output goes to stderr and is filtered by RUST_LOG (default: warn).

use libup::{encode, encode_value, parse_with_options, Document, Format, ParseOptions, Value};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod transcode;

/// Output formats understood by -t.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Tree,
    Json,
    Yaml,
    Toml,
    Cbor,
}

/// What to do with each parsed input.
struct Settings<'a> {
    output: Output,
    key: Option<&'a str>,
    output_file: Option<&'a str>,
    write_back: bool,
    check_only: bool,
    strict: bool,
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    let mut to_format: Option<&str> = None;
    let mut key: Option<&str> = None;
    let mut write_back = false;
    let mut output_file: Option<&str> = None;
    let mut check_only = false;
    let mut strict = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("up {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                if parse_format(&args[i]).is_none() {
                    eprintln!("Error: Unknown format: {}", args[i]);
                    process::exit(1);
                }
                to_format = Some(&args[i]);
            }
            "-k" | "--key" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -k requires a key argument");
                    process::exit(1);
                }
                key = Some(&args[i]);
            }
            "-w" | "--write" => {
                write_back = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "--check" => {
                check_only = true;
            }
            "--strict" => {
                strict = true;
            }
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    if write_back && output_file.is_some() {
        eprintln!("Error: --write and --output are mutually exclusive");
        process::exit(1);
    }

    let settings = Settings {
        output: to_format.and_then(parse_format).unwrap_or(Output::Tree),
        key,
        output_file,
        write_back,
        check_only,
        strict,
    };

    if let Some(path) = input_path {
        if Path::new(path).is_dir() {
            if output_file.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process_directory(path, &settings);
            return;
        }
    }

    let input = match input_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    process::exit(process_input(&input, input_path, &settings));
}

/// Install a stderr subscriber filtered by RUST_LOG.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_format(s: &str) -> Option<Output> {
    match s {
        "tree" => Some(Output::Tree),
        "json" => Some(Output::Json),
        "yaml" | "yml" => Some(Output::Yaml),
        "toml" => Some(Output::Toml),
        "cbor" => Some(Output::Cbor),
        _ => None,
    }
}

fn format_extension(format: Output) -> &'static str {
    match format {
        Output::Tree => "tree",
        Output::Json => "json",
        Output::Yaml => "yaml",
        Output::Toml => "toml",
        Output::Cbor => "cbor",
    }
}

fn process_directory(dir_path: &str, settings: &Settings) {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            process::exit(1);
        }
    };

    let mut had_errors = false;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map(|e| e == "up").unwrap_or(false) {
            let path_str = path.to_string_lossy();
            let input = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading {}: {}", path_str, e);
                    had_errors = true;
                    continue;
                }
            };

            if process_input(&input, Some(&path_str), settings) != 0 {
                had_errors = true;
            }
        }
    }

    process::exit(if had_errors { 1 } else { 0 });
}

fn process_input(input: &str, input_file: Option<&str>, settings: &Settings) -> i32 {
    let mut opts = ParseOptions::new().strict(settings.strict);
    if let Some(p) = input_file {
        let name = Path::new(p)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.to_string());
        opts = opts.with_filename(name);
    }

    let doc = match parse_with_options(input, &opts) {
        Ok(doc) => doc,
        Err(e) => {
            if let Some(path) = input_file {
                eprintln!("{}: {}", path, e);
            } else {
                eprintln!("Parse error: {}", e);
            }
            return 1;
        }
    };
    debug!(nodes = doc.len(), "parsed input");

    if settings.check_only {
        match input_file {
            Some(path) => println!("{}: ok", path),
            None => println!("ok"),
        }
        return 0;
    }

    match settings.key {
        Some(key) => match doc.get(key) {
            Some(node) => output_value(&node.value, input_file, settings),
            None => {
                eprintln!("Error: Key not found: {}", key);
                1
            }
        },
        None => output_document(&doc, input_file, settings),
    }
}

fn output_document(doc: &Document, input_file: Option<&str>, settings: &Settings) -> i32 {
    let text = match settings.output {
        Output::Tree => Ok(encode(doc, Format::Tree)),
        Output::Json => Ok(encode(doc, Format::Json)),
        Output::Yaml => transcode::yaml::encode(doc),
        Output::Toml => Ok(transcode::toml::encode(doc)),
        Output::Cbor => {
            return match transcode::cbor::encode(doc) {
                Ok(bytes) => {
                    write_output(&bytes, false, input_file, settings);
                    0
                }
                Err(e) => {
                    eprintln!("Error: Cannot convert to CBOR: {}", e);
                    1
                }
            };
        }
    };
    finish_text(text, input_file, settings)
}

/// Output a single value selected with --key.
fn output_value(value: &Value, input_file: Option<&str>, settings: &Settings) -> i32 {
    let text = match settings.output {
        Output::Tree => Ok(encode_value(value, Format::Tree)),
        Output::Json => Ok(encode_value(value, Format::Json)),
        Output::Yaml => transcode::yaml::encode_value(value),
        Output::Toml => transcode::toml::encode_value(value),
        Output::Cbor => {
            return match transcode::cbor::encode_value(value) {
                Ok(bytes) => {
                    write_output(&bytes, false, input_file, settings);
                    0
                }
                Err(e) => {
                    eprintln!("Error: Cannot convert to CBOR: {}", e);
                    1
                }
            };
        }
    };
    finish_text(text, input_file, settings)
}

fn finish_text(text: Result<String, String>, input_file: Option<&str>, settings: &Settings) -> i32 {
    match text {
        Ok(output) => {
            write_output(output.as_bytes(), true, input_file, settings);
            0
        }
        Err(e) => {
            eprintln!(
                "Error: Cannot convert to {}: {}",
                format_extension(settings.output).to_uppercase(),
                e
            );
            1
        }
    }
}

/// Where output goes: a file for -o or -w, otherwise stdout (`None`).
fn output_path(input_file: Option<&str>, settings: &Settings) -> Result<Option<PathBuf>, String> {
    if let Some(path) = settings.output_file {
        Ok(Some(PathBuf::from(path)))
    } else if settings.write_back {
        match input_file {
            Some(input_path) => {
                let ext = format_extension(settings.output);
                Ok(Some(Path::new(input_path).with_extension(ext)))
            }
            None => Err("--write requires an input file".to_string()),
        }
    } else {
        Ok(None)
    }
}

/// Write rendered output. Text written to stdout always ends with a newline.
fn write_output(output: &[u8], text: bool, input_file: Option<&str>, settings: &Settings) {
    match output_path(input_file, settings) {
        Ok(Some(path)) => {
            if let Err(e) = fs::write(&path, output) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        Ok(None) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let mut result = handle.write_all(output);
            if result.is_ok() && text && !output.ends_with(b"\n") {
                result = handle.write_all(b"\n");
            }
            if let Err(e) = result.and_then(|_| handle.flush()) {
                eprintln!("Error writing to stdout: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        "up - UP command-line tool

USAGE:
    up [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .up files in it

OPTIONS:
    -t, --to <FORMAT>      Output format [default: tree]
                           Supported: tree, json, yaml, toml, cbor

    -k, --key <KEY>        Print only the value of the first top-level node
                           named KEY (exit 1 if there is none)

    -w, --write            Write output to file with inferred extension

    -o, --output <FILE>    Write output to specified file (not valid with directory input)

    --strict               Fail on blocks, lists, and multiline strings that are
                           still open at end of input instead of closing them

    --check                Check if input parses (exit 0 if valid, 1 if invalid)

    -h, --help             Print help

    -V, --version          Print version

ENVIRONMENT:
    RUST_LOG               Log filter for stderr diagnostics [default: warn]

EXAMPLES:
    # Print the parsed tree of a document
    up config.up

    # Strictly validate all UP files in a directory
    up --check --strict ./configs/

    # Convert UP to JSON
    up -t json config.up

    # Convert UP to YAML (type annotations become YAML tags)
    up -t yaml config.up

    # Print one block as TOML
    up -k server -t toml config.up

    # Convert UP to CBOR (binary)
    up -t cbor config.up -o config.cbor

    # Convert all UP files in a directory to JSON
    up -t json -w ./configs/
"
    );
}
