//! # padron CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use padron_cli::address::{run_address, AddressArgs};
use padron_cli::lookup::{run_lookup, LookupArgs};
use padron_cli::ubigeo::{run_ubigeo, UbigeoArgs};
use padron_cli::validate::{run_validate, ValidateArgs};

/// Peruvian document tooling.
///
/// Validates DNI and RUC numbers offline, looks them up in the person and
/// taxpayer registries, parses and checks addresses, and browses UBIGEO
/// reference data.
#[derive(Parser, Debug)]
#[command(name = "padron", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate DNI/RUC numbers (structure and check digit).
    Validate(ValidateArgs),

    /// Look up a DNI or RUC in the registry gateway.
    Lookup(LookupArgs),

    /// Parse or check address text.
    Address(AddressArgs),

    /// Browse departments, provinces and districts.
    Ubigeo(UbigeoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "padron CLI starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Lookup(args) => run_lookup(&args),
        Commands::Address(args) => run_address(&args),
        Commands::Ubigeo(args) => run_ubigeo(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
