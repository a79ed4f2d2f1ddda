//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory and database
//! - `add`: Store a node
//! - `resolve`: Resolve a URL to a node and handler
//! - `show_path`: Show the canonical URL of a node
//! - `ancestors`: Show the breadcrumbs of a node
//! - `list`: List stored nodes
//! - `validate`: Validate configuration and stored data
//! - `show_data_dir`: Show resolved data directory path
//! - `completions`: Generate shell completion scripts

pub mod add;
pub mod ancestors;
pub mod completions;
pub mod init;
pub mod list;
pub mod resolve;
pub mod show_data_dir;
pub mod show_path;
pub mod validate;

pub use add::AddCommand;
pub use ancestors::AncestorsCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use resolve::ResolveCommand;
pub use show_data_dir::ShowDataDirCommand;
pub use show_path::ShowPathCommand;
pub use validate::ValidateCommand;
