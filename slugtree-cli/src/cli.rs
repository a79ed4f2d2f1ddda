//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AddCommand, AncestorsCommand, CompletionsCommand, InitCommand, ListCommand, ResolveCommand,
    ShowDataDirCommand, ShowPathCommand, ValidateCommand,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line tool for resolving semantic hierarchical paths.
#[derive(Parser)]
#[command(name = "slugtree")]
#[command(version, about = "Resolve and build semantic hierarchical paths", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "SLUGTREE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the database busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "SLUGTREE_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u64>,

    /// Read an additional configuration file on top of the discovered ones
    #[arg(long, value_name = "PATH", global = true, env = "SLUGTREE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Store a node
    Add(AddCommand),

    /// Resolve a URL to a node and its handler
    Resolve(ResolveCommand),

    /// Show the canonical URL of a node
    ShowPath(ShowPathCommand),

    /// Show the breadcrumbs from the root down to a node
    Ancestors(AncestorsCommand),

    /// List stored nodes
    List(ListCommand),

    /// Validate configuration and stored data
    Validate(ValidateCommand),

    /// Show the resolved data directory path
    ShowDataDir(ShowDataDirCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

/// Output format shared by commands that print nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated lines (human-readable)
    Human,
    /// JSON document
    Json,
}
