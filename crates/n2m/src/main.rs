//! n2m CLI - Notion to Markdown converter.
//!
//! Provides commands for:
//! - `convert`: Convert a Notion page and its descendants to Markdown

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ConvertArgs;
use output::Output;

/// n2m - Notion to Markdown converter.
#[derive(Parser)]
#[command(name = "n2m", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Notion page to Markdown.
    Convert(ConvertArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Convert(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_flags() {
        let cli = Cli::try_parse_from([
            "n2m",
            "convert",
            "abc123",
            "--page-limit",
            "2",
            "--separate-child-pages",
            "--verbose",
        ])
        .unwrap();

        let Commands::Convert(args) = cli.command;
        assert!(args.verbose);
    }

    #[test]
    fn test_convert_requires_page_id() {
        assert!(Cli::try_parse_from(["n2m", "convert"]).is_err());
    }
}
