//! Main entry point for the slugtree CLI.
//!
//! This is the command-line interface for the slugtree path resolver.
//! It provides commands for working with a configured site:
//! - `init`: Create the data directory and database
//! - `add`: Store a node
//! - `resolve`: Resolve a URL to a node and handler
//! - `show-path`: Build the canonical URL of a node
//! - `ancestors`: Print the breadcrumbs of a node
//! - `validate`: Check configuration and stored data

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let logger = slugtree::init_logger(cli.verbose, cli.quiet);
    // A logger installed earlier in the process is not an error.
    let _ = logger.install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        config: cli.config,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Add(cmd) => cmd.execute(&global),
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::ShowPath(cmd) => cmd.execute(&global),
        cli::Command::Ancestors(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::ShowDataDir(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
