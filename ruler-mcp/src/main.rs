//! Ruler command line
//!
//! - `ruler convert --value <v> --from <unit> --to <unit>`
//! - `ruler units`
//! - `ruler serve` runs the MCP server on stdio

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use ruler_core::{display_decimal, InputPolicy, RulerError};
use ruler_units::{convert_units_with, list_units};

mod config;
mod server;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "ruler", version, about = "Convert lengths between centimeters, meters, feet and millimeters")]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a value from one unit to another
    Convert {
        #[arg(long, allow_hyphen_values = true)]
        value: String,
        #[arg(long, help = "Source unit (default: RULER_DEFAULT_FROM or Meters)")]
        from: Option<String>,
        #[arg(long, help = "Target unit (default: RULER_DEFAULT_TO or Meters)")]
        to: Option<String>,
        #[arg(long, default_value_t = false, help = "Reject values that are not numbers")]
        strict: bool,
        #[arg(long, default_value_t = false, help = "Print \"Result: <value> <unit>\"")]
        label: bool,
    },
    /// List the supported units
    Units,
    /// Run the MCP server on stdin/stdout
    Serve,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    init_logging(match cli.command {
        Commands::Serve => "info",
        _ => "warn",
    });
    debug!(?config, "configuration loaded");

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                println!("{}", json!({ "error": e }));
            } else {
                eprintln!("error: {}", e.message);
            }
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr; stdout carries results and protocol frames
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli, config: &Config) -> Result<(), RulerError> {
    match &cli.command {
        Commands::Convert { value, from, to, strict, label } => {
            let from = from.as_deref().unwrap_or(config.default_from.as_str());
            let to = to.as_deref().unwrap_or(config.default_to.as_str());
            let policy = InputPolicy::from_strict(*strict || config.strict);

            let conversion = convert_units_with(policy, value, from, to)?;

            if cli.json {
                print_json(&conversion)?;
            } else if *label {
                println!("{}", conversion.label());
            } else {
                println!("{}", display_decimal(conversion.result));
            }
            Ok(())
        }
        Commands::Units => {
            let units = list_units();
            if cli.json {
                print_json(&units)?;
            } else {
                for unit in units {
                    println!("{:<12} {:<3} {}", unit.name, unit.symbol, unit.factor);
                }
            }
            Ok(())
        }
        Commands::Serve => {
            let stdin = io::stdin();
            server::serve(stdin.lock(), io::stdout(), config).map_err(|e| {
                error!(error = %e, "server i/o failure");
                RulerError::internal(e.to_string())
            })
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), RulerError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| RulerError::internal(e.to_string()))?;
    println!("{}", out);
    Ok(())
}
