//! folio CLI - fragment transclusion for pandoc.
//!
//! Provides commands for:
//! - `filter`: run as a pandoc JSON filter (also the default without a subcommand)
//! - `extract`: print the body markup of a fragment file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExtractArgs, FilterArgs};
use output::Output;

/// folio - splice OpenDocument fragments into pandoc documents.
#[derive(Parser)]
#[command(name = "folio", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Filter arguments when invoked directly by `pandoc --filter folio`.
    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve includes in a pandoc JSON document read from stdin.
    Filter(FilterArgs),
    /// Print the body markup of a fragment file.
    Extract(ExtractArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();
    let command = cli.command.unwrap_or(Commands::Filter(cli.filter));

    let verbose = matches!(&command, Commands::Filter(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG.
    // Logs go to stderr: stdout carries the document.
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match command {
        Commands::Filter(args) => args.execute(),
        Commands::Extract(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
