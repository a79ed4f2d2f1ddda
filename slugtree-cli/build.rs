//! Build script for slugtree-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("slugtree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve and build semantic hierarchical paths")
        .long_about(
            "Command-line tool for resolving URLs against a configured chain of node \
             collections and building canonical URLs for stored nodes",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("SLUGTREE_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the database busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("SLUGTREE_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Read an additional configuration file on top of the discovered ones")
                .value_name("PATH")
                .global(true)
                .env("SLUGTREE_CONFIG"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Create the slugtree data directory, database and starter config"),
            Command::new("add")
                .about("Store a node")
                .long_about("Store a node of one configured level with its parent and references"),
            Command::new("resolve")
                .about("Resolve a URL to a node and its handler")
                .long_about("Match a URL against the level chain; exits 1 when nothing matches"),
            Command::new("show-path")
                .about("Show the canonical URL of a node")
                .long_about("Build the canonical URL of a stored node from its ancestors"),
            Command::new("ancestors")
                .about("Show the breadcrumbs from the root down to a node")
                .long_about("List every ancestor of the node a URL addresses, root first"),
            Command::new("list")
                .about("List stored nodes")
                .long_about("Display stored nodes and their canonical URLs"),
            Command::new("validate")
                .about("Validate configuration and stored data")
                .long_about("Check a configuration file, and optionally audit stored nodes"),
            Command::new("show-data-dir")
                .about("Show the resolved data directory path")
                .long_about("Display the path to the slugtree data directory"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").map_err(std::io::Error::other)?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("slugtree.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
