#![deny(missing_docs)]

//! # crefgen CLI
//!
//! Command Line Interface for compiling documented type references into an
//! OpenAPI schema document.
//!
//! Supported Commands:
//! - `compile`: Catalog + reference list -> OpenAPI components.
//! - `decode`: Shows how a flat token list decodes.
//! - `sanitize`: Shows the component key of a type identity.

use clap::{Parser, Subcommand};
use crefgen_core::AppResult;
use tracing_subscriber::EnvFilter;

mod compile;
mod inspect;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Documented type references -> OpenAPI schemas")]
struct Cli {
    /// Log compilation progress (overridden by RUST_LOG).
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a reference list against type catalogs into an OpenAPI document.
    Compile(compile::CompileArgs),
    /// Decode a flat, pre-order generic token list.
    Decode(inspect::DecodeArgs),
    /// Print the component key for a type identity.
    Sanitize(inspect::SanitizeArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Compile(args) => compile::execute(args)?,
        Commands::Decode(args) => inspect::decode(args)?,
        Commands::Sanitize(args) => inspect::sanitize(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compile_args() {
        let cli = Cli::try_parse_from([
            "crefgen",
            "compile",
            "--catalog",
            "a.yaml",
            "--catalog",
            "b.json",
            "--references",
            "refs.yaml",
            "--format",
            "json",
            "--lenient",
        ])
        .unwrap();
        match cli.command {
            Commands::Compile(args) => {
                assert_eq!(args.catalogs.len(), 2);
                assert!(args.lenient);
                assert_eq!(args.format, compile::Format::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
