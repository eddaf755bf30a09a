use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use papyrus_parser::{node_to_json, render_error};
use papyrus_parser_core::{parse, Options};

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Json,
    Debug,
}

#[derive(Debug)]
struct Args {
    inputs: Vec<Input>,
    format: OutputFormat,
    pretty: bool,
    quiet: bool,
    continue_on_error: bool,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = std::env::args().skip(1);
        let mut inputs = Vec::new();
        let mut format = OutputFormat::Json;
        let mut pretty = false;
        let mut quiet = false;
        let mut continue_on_error = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "-V" | "--version" => {
                    println!("papyrus-parse v{}", env!("CARGO_PKG_VERSION"));
                    std::process::exit(0);
                }
                "-f" | "--format" => {
                    let value = args.next().ok_or("Missing format argument")?;
                    format = match value.as_str() {
                        "json" => OutputFormat::Json,
                        "debug" => OutputFormat::Debug,
                        other => return Err(format!("Unknown format: {other}")),
                    };
                }
                "-p" | "--pretty" => pretty = true,
                "-q" | "--quiet" => quiet = true,
                "-c" | "--continue" => continue_on_error = true,
                "-" => inputs.push(Input::Stdin),
                path if path.starts_with('-') => {
                    return Err(format!("Unknown option: {path}"));
                }
                path => inputs.push(Input::File(PathBuf::from(path))),
            }
        }

        if inputs.is_empty() {
            inputs.push(Input::Stdin);
        }

        Ok(Args { inputs, format, pretty, quiet, continue_on_error })
    }
}

fn print_help() {
    println!(
        r#"papyrus-parse - Parse a Papyrus script and print its AST

USAGE:
    papyrus-parse [OPTIONS] [FILE...]

ARGS:
    <FILE>...    Path(s) to a .psc file to parse (use '-' for stdin)

OPTIONS:
    -h, --help              Print help information
    -V, --version           Print version information
    -f, --format <FORMAT>   Output format [default: json]
                           Possible values: json, debug
    -p, --pretty           Pretty-print output (JSON only)
    -q, --quiet            Suppress AST output (still reports errors)
    -c, --continue         Continue to the next file after a parse error

EXAMPLES:
    papyrus-parse MyScript.psc
    echo 'ScriptName Foo' | papyrus-parse -
    papyrus-parse -f json -p MyScript.psc
"#
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Try 'papyrus-parse --help' for more information.");
            std::process::exit(1);
        }
    };

    let mut had_error = false;

    for input in &args.inputs {
        let path_str = match input {
            Input::File(path) => path.display().to_string(),
            Input::Stdin => "<stdin>".to_string(),
        };
        let filename = match input {
            Input::File(path) => path.file_name().map(|n| n.to_string_lossy().into_owned()),
            Input::Stdin => None,
        };

        if args.inputs.len() > 1 && !args.quiet {
            eprintln!("=== Parsing {path_str} ===");
        }

        let source = match read_input(input) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Error reading {path_str}: {e}");
                if args.continue_on_error {
                    had_error = true;
                    continue;
                }
                std::process::exit(1);
            }
        };

        match parse(&source, Options::default(), filename.as_deref()) {
            Ok(ast) => {
                if !args.quiet {
                    match args.format {
                        OutputFormat::Json => {
                            let json = node_to_json(&ast);
                            let rendered = if args.pretty {
                                serde_json::to_string_pretty(&json)
                            } else {
                                serde_json::to_string(&json)
                            };
                            match rendered {
                                Ok(s) => println!("{s}"),
                                Err(e) => eprintln!("JSON serialization error: {e}"),
                            }
                        }
                        OutputFormat::Debug => println!("{ast:#?}"),
                    }
                }
            }
            Err(e) => {
                eprintln!("\nError in {path_str}:");
                eprintln!("{}", render_error(&e, &source));
                if args.continue_on_error {
                    had_error = true;
                } else {
                    std::process::exit(1);
                }
            }
        }
    }

    if had_error {
        std::process::exit(1);
    }
}

fn read_input(input: &Input) -> io::Result<String> {
    match input {
        Input::File(path) => fs::read_to_string(path),
        Input::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
