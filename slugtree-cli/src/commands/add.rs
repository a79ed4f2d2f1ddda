//! Add command implementation.
//!
//! This module implements the `add` command, which stores a node of one
//! configured level. Parents and references can be named either by the
//! path that addresses them or by their id.

use crate::error::CliError;
use crate::utils::{load_configuration, open_site, parse_assignment, parse_node_id, GlobalOptions};
use clap::Args;
use slugtree::config::Config;
use slugtree::database::NewNode;
use slugtree::{Error as LibError, Node, Site};

/// Store a node.
#[derive(Args)]
pub struct AddCommand {
    /// Level the node belongs to
    #[arg(value_name = "KIND")]
    pub kind: String,

    /// Slug of the new node
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Path of the tree parent (hierarchical levels only)
    #[arg(long, value_name = "PATH", conflicts_with = "under_id")]
    pub under: Option<String>,

    /// Id of the tree parent (hierarchical levels only)
    #[arg(long, value_name = "ID")]
    pub under_id: Option<String>,

    /// Reference addressed by path, as FIELD=PATH (repeatable)
    #[arg(long = "ref", value_name = "FIELD=PATH")]
    pub references: Vec<String>,

    /// Reference addressed by id, as FIELD=ID (repeatable)
    #[arg(long = "ref-id", value_name = "FIELD=ID")]
    pub reference_ids: Vec<String>,
}

impl AddCommand {
    /// Execute the add command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let site = open_site(global, &config)?;

        let mut node = NewNode::new(self.slug.clone());

        if let Some(ref path) = self.under {
            node = node.under(site.find(&self.kind, path)?.id());
        } else if let Some(ref id) = self.under_id {
            node = node.under(parse_node_id(id)?);
        }

        for assignment in &self.references {
            let (field, path) = parse_assignment(assignment)?;
            let target = reference_target(&config, &self.kind, &field)?;
            node = node.with_reference(field, site.find(&target, &path)?.id());
        }

        for assignment in &self.reference_ids {
            let (field, id) = parse_assignment(assignment)?;
            node = node.with_reference(field, parse_node_id(&id)?);
        }

        let stored = site.insert(&self.kind, &node).map_err(|e| match e {
            LibError::Validation { .. } => CliError::InvalidArguments(e.to_string()),
            e => CliError::from(e),
        })?;

        report(&site, &stored, global.quiet);
        Ok(())
    }
}

/// Node type targeted by reference `field` of level `kind`.
fn reference_target(config: &Config, kind: &str, field: &str) -> Result<String, CliError> {
    let level = config
        .levels()
        .iter()
        .find(|level| level.name == kind)
        .ok_or_else(|| CliError::InvalidArguments(format!("unknown node type '{kind}'")))?;

    level
        .references
        .iter()
        .find(|reference| reference.field == field)
        .map(|reference| reference.target.clone())
        .ok_or_else(|| CliError::InvalidArguments(format!("{kind} has no reference '{field}'")))
}

fn report(site: &Site, node: &Node, quiet: bool) {
    if quiet {
        println!("{}", node.id());
        return;
    }

    match site.url_for(node) {
        Ok(url) => println!("{}\t{node}\t{url}", node.id()),
        Err(e) => {
            log::warn!("{node} is not reachable yet: {e}");
            println!("{}\t{node}", node.id());
        }
    }
}

