//! Configuration system for slugtree.
//!
//! This module provides hierarchical configuration with support for:
//! - YAML configuration files (user config and project files)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of the configured level chain
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Explicit files (via `ConfigBuilder::with_file`)
//! 3. Environment variables (`SLUGTREE_*`)
//! 4. Private project config (`slugtree.local.yaml`)
//! 5. Project config (`slugtree.yaml`)
//! 6. User config (`~/.slugtree/config.yaml`)
//! 7. Built-in defaults
//!
//! # Examples
//!
//! Loading from a specific directory:
//!
//! ```no_run
//! use slugtree::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/path/to/site"))
//!     .build()
//!     .unwrap();
//! println!("{} levels", config.levels().len());
//! ```
//!
//! Programmatic configuration:
//!
//! ```
//! use slugtree::config::{Config, ConfigBuilder, LevelConfig, ReferenceConfig};
//!
//! let custom = Config {
//!     levels: Some(vec![
//!         LevelConfig::new("photographer", "photographer_page"),
//!         LevelConfig::new("category", "category_page")
//!             .hierarchical()
//!             .with_reference(ReferenceConfig::one("owner", "photographer")),
//!     ]),
//!     ..Default::default()
//! };
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.levels()[1].name, "category");
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types at module root
pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{
    ConfigLoader, ConfigSource, LOCAL_CONFIG_FILE, PROJECT_CONFIG_FILE, USER_CONFIG_FILE,
};
pub use merger::ConfigMerger;
pub use schema::{Config, LevelConfig, ReferenceConfig, UrlConfig};
pub use validator::ConfigValidator;
