//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the slugtree data directory and database.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use clap::Parser;
use slugtree::config::USER_CONFIG_FILE;
use slugtree::database::{Database, DatabaseConfig, DATABASE_FILE};
use std::fs;
use std::path::Path;

/// Starter user configuration written by `init --with-config`.
const DEFAULT_CONFIG_TEMPLATE: &str = r"# slugtree configuration file
#
# Levels are matched in order; each level's nodes are looked up by slug
# inside the node matched by the level before it.
#
# levels:
#   - name: photographer
#     handler: photographer_page
#   - name: category
#     handler: category_page
#     hierarchical: true
#     references:
#       - field: owner
#         target: photographer
#   - name: photo
#     handler: photo_page
#     references:
#       - field: category
#         target: category
#       - field: albums
#         target: category
#         many: true
#     parent: category

# How a many-valued reference to the parent level is treated: reject | first
# many_valued: reject

# URL rendering
# url:
#   prefix: /
#   trailing_slash: true

# Upper bound on ancestor walks (default: 256)
# max_depth: 256

# Check that a matched node really belongs to the previous one (default: true)
# verify_scope: true

# Maximum lock wait time in seconds (default: 5)
# maximum_lock_wait_seconds: 5
";

/// Initialize slugtree data directory and database.
#[derive(Parser)]
#[command(about = "Initialize slugtree data directory and database")]
pub struct InitCommand {
    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create a starter configuration file in the data directory
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;
        let db_path = data_dir.join(DATABASE_FILE);
        let config_path = data_dir.join(USER_CONFIG_FILE);

        if self.dry_run {
            return self.preview(&data_dir, &db_path, &config_path);
        }

        let db_exists = db_path.exists();
        if db_exists && !self.overwrite {
            return Err(CliError::InvalidArguments(format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            )));
        }

        let data_dir_created = !data_dir.exists();
        if data_dir_created {
            fs::create_dir_all(&data_dir)?;
        }

        if db_exists {
            fs::remove_file(&db_path)?;
        }
        Database::open(DatabaseConfig::new(&db_path))?;

        let config_created = self.with_config && !config_path.exists();
        if config_created {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        if global.quiet {
            return Ok(());
        }

        println!("Initialized slugtree in: {}", data_dir.display());
        if data_dir_created {
            println!("  - Created data directory");
        }
        if db_exists {
            println!("  - Recreated database");
        } else {
            println!("  - Created database");
        }
        if config_created {
            println!("  - Created starter configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }

    fn preview(&self, data_dir: &Path, db_path: &Path, config_path: &Path) -> Result<(), CliError> {
        println!("Dry-run mode: no changes will be made");
        println!();
        println!("Would initialize slugtree in: {}", data_dir.display());

        if data_dir.exists() {
            println!("  - Data directory already exists: {}", data_dir.display());
        } else {
            println!("  - Create data directory: {}", data_dir.display());
        }

        if !db_path.exists() {
            println!("  - Create database: {}", db_path.display());
        } else if self.overwrite {
            println!("  - Remove existing database: {}", db_path.display());
            println!("  - Create new database: {}", db_path.display());
        } else {
            println!(
                "  - ERROR: Database already exists (use --overwrite to replace): {}",
                db_path.display()
            );
        }

        if self.with_config {
            if config_path.exists() {
                println!(
                    "  - Configuration file already exists (will not overwrite): {}",
                    config_path.display()
                );
            } else {
                println!("  - Create configuration file: {}", config_path.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slugtree::config::{Config, ConfigLoader};

    #[test]
    fn test_template_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(USER_CONFIG_FILE);
        fs::write(&path, DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap(), Config::default());
    }
}
