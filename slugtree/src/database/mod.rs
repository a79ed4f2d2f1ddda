//! Database layer for persistent storage of nodes.
//!
//! This module provides a SQLite-based storage layer: connection management,
//! schema versioning, node operations, and [`SqliteProvider`], which serves
//! one node kind of a shared database as a [`crate::NodeProvider`].
//!
//! # Examples
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use slugtree::database::{Database, NewNode, SqliteProvider};
//! use slugtree::{NodeProvider, NodeSchema, Reference};
//!
//! let db = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
//! let people = SqliteProvider::flat(Arc::clone(&db), NodeSchema::new("photographer"));
//! let categories = SqliteProvider::tree(
//!     Arc::clone(&db),
//!     NodeSchema::new("category").with_reference(Reference::one("owner", "photographer")),
//! );
//!
//! let jane = people.insert(&NewNode::new("jane")).unwrap();
//! let nature = categories
//!     .insert(&NewNode::new("nature").with_reference("owner", jane.id()))
//!     .unwrap();
//!
//! assert_eq!(categories.lookup_by_slug("nature", Some(&jane)).unwrap(), Some(nature));
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod provider;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use operations::NewNode;
pub use provider::{SharedDatabase, SqliteProvider};
pub use schema::CURRENT_SCHEMA_VERSION;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
