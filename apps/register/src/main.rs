//! # Till Register Binary
//!
//! ## Usage
//! ```bash
//! # Config from the platform config dir (if present)
//! cargo run -p till-register --bin till
//!
//! # Explicit config file
//! cargo run -p till-register --bin till -- --config ./till.toml
//!
//! # Scripted session
//! printf 'add 1 2\ncheckout\n' | TILL_DB_PATH=./till_dev.db cargo run -p till-register
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Cli {
    Run { config_path: Option<PathBuf> },
    Help,
}

/// Parses arguments after the program name.
///
/// Unknown arguments are reported and skipped; a flag missing its value
/// is a usage error.
fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut config_path: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => match iter.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => return Err(format!("{} requires a path", arg)),
            },
            "--help" | "-h" => return Ok(Cli::Help),
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
    }

    Ok(Cli::Run { config_path })
}

fn print_help() {
    println!("Till Register");
    println!();
    println!("Usage: till [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Config file (default: platform config dir/till.toml)");
    println!("  -h, --help             Show this help message");
    println!();
    println!("Environment:");
    println!("  TILL_DB_PATH, TILL_TAX_RATE_BPS, TILL_STORE_NAME, RUST_LOG");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let config_path = match parse_args(&args) {
        Ok(Cli::Run { config_path }) => config_path,
        Ok(Cli::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(usage) => {
            eprintln!("till: {}", usage);
            eprintln!("Try 'till --help' for usage.");
            return ExitCode::from(2);
        }
    };

    match till_register::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("till: {}", e);
            ExitCode::FAILURE
        }
    }
}
