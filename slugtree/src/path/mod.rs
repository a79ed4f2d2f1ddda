//! Path resolution in both directions.
//!
//! # Forward
//!
//! [`PathResolver`] consumes a request path against a
//! [`LevelChain`](crate::LevelChain) and yields the matched node with its
//! handler, or a not-found outcome.
//!
//! # Reverse
//!
//! [`PathBuilder`] walks from a node up to the chain root and yields its
//! [`AncestorChain`] and canonical [`SlugPath`]. Resolving the built path
//! yields the node again.
//!
//! # Path text
//!
//! Segments are joined by `/`, with one optional leading and one optional
//! trailing `/`. Empty segments are never valid and matching is
//! case-sensitive. [`UrlFormat`] adds a mount prefix for rendered URLs.
//!
//! ```
//! use slugtree::path::normalize::split_segments;
//!
//! assert_eq!(split_segments("/jane/nature/").unwrap(), vec!["jane", "nature"]);
//! ```

pub mod builder;
pub mod normalize;
pub mod relationship;
pub mod resolver;
mod types;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::{Ancestor, AncestorChain, Breadcrumb, PathBuilder, DEFAULT_MAX_DEPTH};
pub use relationship::NodeRelationship;
pub use resolver::{Match, PathResolver, Resolution};
pub use types::{SlugPath, UrlFormat};
