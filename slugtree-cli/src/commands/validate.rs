//! Command to validate configuration and stored data.

use crate::error::CliError;
use crate::utils::{load_configuration, open_site, GlobalOptions};
use clap::Args;
use slugtree::config::{Config, ConfigLoader, ConfigValidator};
use slugtree::Site;
use std::path::{Path, PathBuf};

/// Validate a configuration file, or the merged configuration.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate (defaults to the merged configuration)
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    /// Also check that every stored node round-trips through its URL
    #[arg(long)]
    pub data: bool,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = match self.config_path {
            Some(ref path) => load_single(path)?,
            None => load_configuration(global)?,
        };

        // Assembling a throwaway site checks the relations between levels.
        if !config.levels().is_empty() {
            Site::in_memory(&config).map_err(report_invalid)?;
        }

        if self.data {
            let site = open_site(global, &config)?;
            let problems = site.audit()?;
            for problem in &problems {
                eprintln!("{}: {}", problem.node, problem.error);
            }
            if !problems.is_empty() {
                return Err(CliError::Integrity(format!(
                    "{} stored node(s) do not round-trip",
                    problems.len()
                )));
            }
        }

        if !global.quiet {
            println!("Configuration is valid");
        }
        Ok(())
    }
}

fn load_single(path: &Path) -> Result<Config, CliError> {
    if !path.exists() {
        return Err(CliError::InvalidArguments(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let config = ConfigLoader::load_file(path).map_err(report_invalid)?;
    ConfigValidator::validate(&config).map_err(report_invalid)?;
    Ok(config)
}

fn report_invalid(e: slugtree::Error) -> CliError {
    eprintln!("Validation error: {e}");
    CliError::Config("Configuration validation failed".to_string())
}
