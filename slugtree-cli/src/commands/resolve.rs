//! Resolve command implementation.
//!
//! This module implements the `resolve` command, which reads a URL against
//! the configured chain and reports the matched node and its handler. A URL
//! that matches nothing exits with status 1.

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::utils::{load_configuration, open_site, GlobalOptions};
use clap::Args;
use serde::Serialize;
use slugtree::{Match, Resolution, Site};

/// Resolve a URL to a node and its handler.
#[derive(Args)]
pub struct ResolveCommand {
    /// URL to resolve
    #[arg(value_name = "URL")]
    pub url: String,

    /// Treat the argument as a path relative to the mount prefix
    #[arg(long)]
    pub relative: bool,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "human",
        env = "SLUGTREE_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// A resolved node as printed by the CLI.
#[derive(Debug, Serialize)]
struct Resolved<'a> {
    kind: &'a str,
    id: i64,
    slug: &'a str,
    handler: &'a str,
    level: usize,
    consumed: usize,
    url: String,
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let site = open_site(global, &config)?;

        let resolution = if self.relative {
            site.resolve(&self.url)?
        } else {
            site.resolve_url(&self.url)?
        };

        let found = match resolution {
            Resolution::Matched(found) => found,
            Resolution::NotFound { path } => {
                return Err(CliError::SemanticFailure(format!("No match for '{path}'")));
            }
        };

        let resolved = describe(&site, &found)?;
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&resolved)
                    .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
                println!("{json}");
            }
            OutputFormat::Human if global.quiet => println!("{}", resolved.handler),
            OutputFormat::Human => {
                println!("{}({})", resolved.kind, resolved.slug);
                println!("  id: {}", resolved.id);
                println!("  handler: {}", resolved.handler);
                println!("  level: {}", resolved.level);
                println!("  url: {}", resolved.url);
            }
        }

        Ok(())
    }
}

fn describe<'a>(site: &Site, found: &'a Match<'a, String>) -> Result<Resolved<'a>, CliError> {
    Ok(Resolved {
        kind: found.node.kind(),
        id: found.node.id().value(),
        slug: found.node.slug(),
        handler: found.handler,
        level: found.level,
        consumed: found.consumed,
        url: site.url_for(&found.node)?,
    })
}
