//! Command to show the canonical URL of a stored node.

use crate::error::CliError;
use crate::utils::{load_configuration, node_by_id, open_site, parse_node_id, GlobalOptions};
use clap::Args;

/// Show the canonical URL of a node.
#[derive(Args)]
pub struct ShowPathCommand {
    /// Level the node belongs to
    #[arg(value_name = "KIND")]
    pub kind: String,

    /// Id of the node
    #[arg(value_name = "ID")]
    pub id: String,

    /// Print the bare slug path instead of the URL
    #[arg(long)]
    pub relative: bool,
}

impl ShowPathCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let site = open_site(global, &config)?;
        let node = node_by_id(&site, &self.kind, parse_node_id(&self.id)?)?;

        if self.relative {
            println!("{}", site.ancestors(&node)?.to_path());
        } else {
            println!("{}", site.url_for(&node)?);
        }
        Ok(())
    }
}
