//! Command-line interface for zl
//! Compiles a zl outline file to Markdown, or dumps one of the intermediate stages.
//!
//! Usage:
//!   zl `<path>` [--mode `<mode>`] [--config `<file>`] [-v]
//!
//! Modes: md | markdown | tree | tokens | parse | json. Without `--mode` the
//! `output.default_mode` setting is used.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::process;
use tracing_subscriber::EnvFilter;

use zl::config::{Loader, ZlConfig, LOCAL_CONFIG_FILE};
use zl::{process_file, CompilerOptions, OutputMode, ProcessingError};

fn build_cli() -> Command {
    Command::new("zl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile zl outline documents to Markdown")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the zl file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Output mode: md, markdown, tree, tokens, parse or json")
                .value_parser(value_parser!(OutputMode)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), ProcessingError> {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");

    let config = load_config(matches.get_one::<String>("config"))?;
    let mode = match matches.get_one::<OutputMode>("mode") {
        Some(mode) => *mode,
        None => config.output.default_mode.parse::<OutputMode>()?,
    };
    let options = CompilerOptions::from(&config);

    tracing::debug!(%path, %mode, "compiling");
    let output = process_file(path, mode, &options)?;
    print!("{}", output);
    Ok(())
}

fn load_config(explicit: Option<&String>) -> Result<ZlConfig, ProcessingError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = explicit {
        loader = loader.with_file(path);
    }
    Ok(loader.build()?)
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
