//! List command implementation.
//!
//! This module implements the `list` command, which displays stored nodes
//! with their canonical URLs as a table or as JSON.

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::utils::{load_configuration, open_site, GlobalOptions};
use clap::Args;
use slugtree::{Node, Site};
use std::io::Write;

/// Column headers for table output.
const COLUMN_HEADERS: [&str; 4] = ["id", "kind", "slug", "url"];

/// List stored nodes.
#[derive(Args)]
pub struct ListCommand {
    /// Only list nodes of this level
    #[arg(value_name = "KIND")]
    pub kind: Option<String>,

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

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let site = open_site(global, &config)?;

        let nodes = site.list(self.kind.as_deref())?;
        let rows: Vec<(Node, Option<String>)> = nodes
            .into_iter()
            .map(|node| {
                let url = url_or_warn(&site, &node);
                (node, url)
            })
            .collect();

        match self.format {
            OutputFormat::Human => format_as_table(&rows)?,
            OutputFormat::Json => format_as_json(&rows)?,
        }

        Ok(())
    }
}

/// Nodes whose ancestors cannot be walked are listed without a URL.
fn url_or_warn(site: &Site, node: &Node) -> Option<String> {
    match site.url_for(node) {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("{node} has no canonical URL: {e}");
            None
        }
    }
}

/// Format nodes as a human-readable table.
fn format_as_table(rows: &[(Node, Option<String>)]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for (node, url) in rows {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}",
            node.id(),
            node.kind(),
            node.slug(),
            url.as_deref().unwrap_or("-"),
        )?;
    }

    Ok(())
}

/// Format nodes as JSON.
fn format_as_json(rows: &[(Node, Option<String>)]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = rows
        .iter()
        .map(|(node, url)| {
            serde_json::json!({
                "id": node.id().value(),
                "kind": node.kind(),
                "slug": node.slug(),
                "url": url,
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    writeln!(handle)?;

    Ok(())
}
