//! Goldscout CLI - Command-line interface
//!
//! Runs budgeted treasure searches, validates and tunes partition plans,
//! and manages the configuration file.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use console::style;

use commands::common::CliContext;
use commands::config::ConfigCommands;
use commands::run::RunArgs;
use commands::tune::TuneArgs;
use commands::validate::ValidateArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "goldscout", version, about)]
struct Cli {
    /// Configuration file (default: <config dir>/goldscout/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a grid and run one search
    Run(RunArgs),

    /// Check a partition plan against the grid extent
    Validate(ValidateArgs),

    /// Rank candidate partition plans by running each one
    Tune(TuneArgs),

    /// View or edit configuration settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("error:").red().bold(), e);
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = CliContext::load(cli.config)?;

    // Config commands work on the file itself and skip logging setup
    let _guard = match &cli.command {
        Command::Config(_) => None,
        _ => {
            let level = verbosity_level(&ctx.config.logging.level, cli.verbose);
            let log_file = cli.log_file.or_else(|| ctx.config.logging.file.clone());
            let guard = goldscout::logging::init(level, log_file.as_deref())?;
            tracing::debug!(
                version = goldscout::VERSION,
                config = %ctx.config_path.display(),
                "Starting goldscout"
            );
            Some(guard)
        }
    };

    match cli.command {
        Command::Run(args) => commands::run::run(&ctx, args),
        Command::Validate(args) => commands::validate::run(&ctx, args),
        Command::Tune(args) => commands::tune::run(&ctx, args),
        Command::Config(command) => commands::config::run(&ctx, command),
    }
}

/// Log filter for the given number of `-v` flags.
fn verbosity_level(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}
