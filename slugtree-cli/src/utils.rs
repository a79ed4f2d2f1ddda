//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, site opening and argument parsing.

use crate::error::CliError;
use slugtree::config::Config;
use slugtree::database::{DatabaseConfig, DATABASE_FILE};
use slugtree::{ConfigBuilder, Node, NodeId, Site};
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the database busy timeout (in seconds).
    pub busy_timeout: Option<u64>,

    /// Additional configuration file.
    pub config: Option<PathBuf>,
}

/// Resolve the data directory: `--data-dir`, then `SLUGTREE_DATA_DIR`,
/// then `~/.slugtree`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => slugtree::database::resolve_data_dir().map_err(CliError::from),
    }
}

/// Path of the node database inside the data directory.
pub fn resolve_database_path(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    Ok(resolve_data_dir(global)?.join(DATABASE_FILE))
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. The file named by `--config`
/// 3. Environment variables
/// 4. Discovered project files and the user config
/// 5. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new().with_data_dir(resolve_data_dir(global)?);

    if let Some(ref path) = global.config {
        if !path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        builder = builder.with_file(path);
    }

    if let Some(seconds) = global.busy_timeout {
        builder = builder.with_config(Config {
            maximum_lock_wait_seconds: Some(seconds),
            ..Default::default()
        });
    }

    let config = builder.build().map_err(CliError::from)?;
    log::debug!("configuration loaded with {} levels", config.levels().len());
    Ok(config)
}

/// Open the site described by `config` over the database in the data
/// directory.
///
/// The database must already exist; `slugtree init` creates it.
pub fn open_site(global: &GlobalOptions, config: &Config) -> Result<Site, CliError> {
    if config.levels().is_empty() {
        return Err(CliError::Config(
            "no levels configured (add a slugtree.yaml or pass --config)".to_string(),
        ));
    }

    let db_path = resolve_database_path(global)?;
    if !db_path.exists() {
        return Err(CliError::NoDataDirectory);
    }

    Site::open(config, DatabaseConfig::new(db_path).must_exist()).map_err(CliError::from)
}

/// Parse a node id given on the command line.
pub fn parse_node_id(text: &str) -> Result<NodeId, CliError> {
    text.parse::<i64>()
        .map(NodeId::new)
        .map_err(|_| CliError::InvalidArguments(format!("'{text}' is not a node id")))
}

/// Parse a `FIELD=VALUE` pair.
pub fn parse_assignment(text: &str) -> Result<(String, String), CliError> {
    match text.split_once('=') {
        Some((field, value)) if !field.is_empty() && !value.is_empty() => {
            Ok((field.to_string(), value.to_string()))
        }
        _ => Err(CliError::InvalidArguments(format!(
            "'{text}' is not of the form FIELD=VALUE"
        ))),
    }
}

/// Look up a stored node by kind and id.
pub fn node_by_id(site: &Site, kind: &str, id: NodeId) -> Result<Node, CliError> {
    site.list(Some(kind))?
        .into_iter()
        .find(|node| node.id() == id)
        .ok_or_else(|| CliError::SemanticFailure(format!("No {kind} with id {id}")))
}
