//! Ancestors command implementation.
//!
//! Prints one breadcrumb per line, from the chain root down to the node the
//! URL addresses.

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::utils::{load_configuration, open_site, GlobalOptions};
use clap::Args;
use serde::Serialize;

/// Show the breadcrumbs from the root down to a node.
#[derive(Args)]
pub struct AncestorsCommand {
    /// URL of the node
    #[arg(value_name = "URL")]
    pub url: String,

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

#[derive(Serialize)]
struct Crumb {
    level: usize,
    kind: String,
    id: i64,
    slug: String,
    url: String,
}

impl AncestorsCommand {
    /// Execute the ancestors command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let site = open_site(global, &config)?;

        let node = site
            .resolve_url(&self.url)?
            .into_match()
            .map(|found| found.node)
            .ok_or_else(|| CliError::SemanticFailure(format!("No match for '{}'", self.url)))?;

        let crumbs: Vec<Crumb> = site
            .breadcrumbs(&node)?
            .into_iter()
            .map(|crumb| Crumb {
                level: crumb.level,
                kind: crumb.node.kind().to_string(),
                id: crumb.node.id().value(),
                slug: crumb.node.slug().to_string(),
                url: site.url_format().render(&crumb.path),
            })
            .collect();

        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&crumbs)
                    .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
                println!("{json}");
            }
            OutputFormat::Human => {
                for crumb in &crumbs {
                    println!(
                        "{}\t{}({})\t{}",
                        crumb.level, crumb.kind, crumb.slug, crumb.url
                    );
                }
            }
        }

        Ok(())
    }
}
