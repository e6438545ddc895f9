//! Injecto CLI - configuration value injection.
//!
//! Provides commands for:
//! - `process`: Apply `@param` and `@section` directives to a directory
//! - `serve`: Start the HTTP API

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ProcessArgs, ServeArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Injecto - replace values in configuration files from YAML data.
#[derive(Parser)]
#[command(name = "injecto", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a directory of templates.
    Process(ProcessArgs),
    /// Start the HTTP API server.
    Serve(ServeArgs),
}

impl Commands {
    /// Log filter used when neither `--debug` nor `RUST_LOG` is set.
    fn default_log_level(&self) -> &'static str {
        match self {
            Self::Process(_) => "info",
            Self::Serve(_) => "warn",
        }
    }

    fn debug(&self) -> bool {
        match self {
            Self::Process(args) => args.debug,
            Self::Serve(args) => args.debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --debug enables DEBUG level, otherwise use RUST_LOG or the command default
    let filter = if cli.command.debug() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(cli.command.default_log_level()))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Process(args) => args.execute(),
        Commands::Serve(args) => match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(args.execute(VERSION)),
            Err(err) => Err(err.into()),
        },
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
