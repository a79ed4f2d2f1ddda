#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # slugtree
//!
//! A library for resolving semantic hierarchical paths.
//!
//! A path such as `/jane/nature/mountains/sunrise/` is read against an
//! ordered chain of node collections (photographers, a category tree,
//! photos). Each segment is a slug, matched inside the scope of the node
//! before it. The same chain walks back from a node to its canonical path.
//!
//! ## Core Types
//!
//! - [`NodeProvider`]: storage capability behind one level
//! - [`ChainBuilder`], [`LevelSpec`] and [`LevelChain`]: chain registration
//! - [`PathResolver`]: path to node and handler
//! - [`PathBuilder`]: node to canonical path and ancestors
//! - [`Site`]: a configured chain over a `SQLite` database
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use slugtree::{
//!     ChainBuilder, LevelSpec, MemoryProvider, NodeSchema, PathBuilder, PathResolver, Reference,
//! };
//!
//! let mut photographers = MemoryProvider::flat(NodeSchema::new("photographer"));
//! let jane = photographers.add_root("jane", &[]).unwrap();
//!
//! let mut categories = MemoryProvider::tree(
//!     NodeSchema::new("category").with_reference(Reference::one("owner", "photographer")),
//! );
//! let nature = categories.add_root("nature", &[("owner", jane.id())]).unwrap();
//!
//! let mut photos = MemoryProvider::flat(
//!     NodeSchema::new("photo").with_reference(Reference::one("category", "category")),
//! );
//! let sunrise = photos.add_root("sunrise", &[("category", nature.id())]).unwrap();
//!
//! let chain = ChainBuilder::new()
//!     .level(LevelSpec::flat(photographers, "photographer"))
//!     .level(LevelSpec::tree(categories, "category"))
//!     .level(LevelSpec::flat(photos, "photo"))
//!     .build()
//!     .unwrap();
//!
//! let found = PathResolver::new()
//!     .resolve(&chain, "/jane/nature/sunrise/")
//!     .unwrap()
//!     .into_match()
//!     .unwrap();
//! assert_eq!(found.node, sunrise);
//! assert_eq!(*found.handler, "photo");
//!
//! let path = PathBuilder::new().build_path(&chain, &sunrise).unwrap();
//! assert_eq!(path.to_string(), "jane/nature/sunrise");
//! ```

pub mod chain;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod node;
pub mod path;
pub mod provider;
pub mod site;

// Re-export key types at crate root for convenience
pub use chain::{
    ChainBuilder, Level, LevelChain, LevelSpec, ManyValuedPolicy, ParentAccessor, ParentLink,
    Relation, RelationEnds,
};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig, NewNode, SqliteProvider};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use node::{Cardinality, Node, NodeId, NodeSchema, Reference};
pub use path::{
    Ancestor, AncestorChain, Breadcrumb, Match, NodeRelationship, PathBuilder, PathResolver,
    Resolution, SlugPath, UrlFormat,
};
pub use provider::{MemoryProvider, NodeProvider};
pub use site::{Problem, Site};
