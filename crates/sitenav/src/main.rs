//! sitenav CLI - locale-aware site navigation.
//!
//! Provides commands for:
//! - `resolve`: Print the resolved navigation for a page as JSON
//! - `check`: Validate a configuration and summarize its locales
//! - `plugins`: Print plugin descriptors and bundler options

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, PluginsArgs, ResolveArgs};
use output::Output;

/// sitenav - Locale-aware site navigation.
#[derive(Parser)]
#[command(name = "sitenav", version, about)]
struct Cli {
    /// Enable verbose output (log config loading and resolution).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve navigation for a page path.
    Resolve(ResolveArgs),
    /// Validate the configuration.
    Check(CheckArgs),
    /// Show configured plugins.
    Plugins(PluginsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => args.execute(&output),
        Commands::Check(args) => args.execute(&output),
        Commands::Plugins(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
