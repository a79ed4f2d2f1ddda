//! Error types for the slugtree library.
//!
//! This module provides the error hierarchy for chain construction, path
//! resolution, reverse path building and storage, using `thiserror` for
//! ergonomic error handling.
//!
//! Errors fall into three families:
//!
//! - **Configuration** errors are raised while a chain is being constructed
//!   and must abort construction ([`Error::Configuration`],
//!   [`Error::InvalidChain`]).
//! - **Not found** is a normal per-request outcome. The resolver reports it as
//!   [`crate::Resolution::NotFound`]; [`Error::NotFound`] only appears when a
//!   caller asks for strict resolution.
//! - **Integrity** errors describe stored data that contradicts the chain
//!   ([`Error::CycleDetected`], [`Error::Integrity`]).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a slugtree error.
///
/// # Examples
///
/// ```
/// use slugtree::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the slugtree library.
#[derive(Debug, Error)]
pub enum Error {
    /// The relation between two consecutive levels could not be determined.
    #[error("cannot resolve relation from '{child}' to '{parent}': {reason}")]
    Configuration {
        /// Node type of the child level.
        child: String,
        /// Node type of the declared parent level.
        parent: String,
        /// Why no single relation could be chosen.
        reason: String,
    },

    /// A level chain was assembled from inconsistent registrations.
    #[error("invalid level chain: {reason}")]
    InvalidChain {
        /// Description of the inconsistency.
        reason: String,
    },

    /// No node matches the given path.
    #[error("no match for path '{path}'")]
    NotFound {
        /// The unmatched path.
        path: String,
    },

    /// A node was reached twice while walking its ancestors.
    #[error("cycle detected while walking ancestors of {node}")]
    CycleDetected {
        /// The node at which the cycle was detected.
        node: String,
    },

    /// Stored data contradicts the structure described by the chain.
    #[error("data integrity error at {node}: {details}")]
    Integrity {
        /// The offending node (or slug/path when no node is available).
        node: String,
        /// Details about the inconsistency.
        details: String,
    },

    /// A node type is not registered in the chain.
    #[error("unknown node type '{type_name}'")]
    UnknownType {
        /// The unregistered node type.
        type_name: String,
    },

    /// A slug failed validation.
    #[error("invalid slug '{slug}': {reason}")]
    InvalidSlug {
        /// The rejected slug.
        slug: String,
        /// The reason the slug is invalid.
        reason: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// Shared storage became unusable (for example a poisoned lock).
    #[error("storage unavailable: {details}")]
    Storage {
        /// Details about the failure.
        details: String,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

impl Error {
    /// Check if the error reports an unmatched path.
    ///
    /// # Examples
    ///
    /// ```
    /// use slugtree::Error;
    ///
    /// let err = Error::NotFound { path: "jane/missing".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the error was raised while constructing a chain or loading
    /// configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use slugtree::Error;
    ///
    /// let err = Error::Configuration {
    ///     child: "photo".into(),
    ///     parent: "category".into(),
    ///     reason: "no structural reference".into(),
    /// };
    /// assert!(err.is_configuration());
    /// ```
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::InvalidChain { .. }
                | Self::Validation { .. }
                | Self::Yaml(_)
        )
    }

    /// Check if the error reports inconsistent stored data.
    ///
    /// # Examples
    ///
    /// ```
    /// use slugtree::Error;
    ///
    /// let err = Error::CycleDetected { node: "category(loop)".into() };
    /// assert!(err.is_integrity());
    /// ```
    #[must_use]
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::CycleDetected { .. } | Self::Integrity { .. })
    }
}
