//! Configuration schema definitions.
//!
//! This module defines the configuration structure for slugtree: the level
//! chain, URL rendering, and resolver and storage tuning.

use serde::{Deserialize, Serialize};

use crate::chain::ManyValuedPolicy;
use crate::node::{Cardinality, NodeSchema, Reference};

/// Default bound on the number of ancestors walked when building a path.
pub const DEFAULT_MAX_DEPTH: usize = crate::path::DEFAULT_MAX_DEPTH;

/// Default lock wait, in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// Every field is optional so that partial documents can be layered on top
/// of each other.
///
/// # Examples
///
/// ```
/// use slugtree::config::{Config, LevelConfig};
///
/// let config = Config {
///     levels: Some(vec![LevelConfig::new("photographer", "photographer_page")]),
///     max_depth: Some(32),
///     ..Default::default()
/// };
/// assert_eq!(config.levels.as_ref().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Levels of the chain, root first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<LevelConfig>>,

    /// URL rendering settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<UrlConfig>,

    /// What to do when the only structural reference to a parent is
    /// many-valued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub many_valued: Option<ManyValuedPolicy>,

    /// Bound on the number of ancestors walked when building a path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Whether resolved nodes are checked against their scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_scope: Option<bool>,

    /// Maximum time to wait for database lock acquisition (seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_lock_wait_seconds: Option<u64>,
}

impl Config {
    /// The configured levels, or none.
    #[must_use]
    pub fn levels(&self) -> &[LevelConfig] {
        self.levels.as_deref().unwrap_or_default()
    }

    /// The many-valued policy, falling back to the default.
    #[must_use]
    pub fn many_valued_policy(&self) -> ManyValuedPolicy {
        self.many_valued.unwrap_or_default()
    }

    /// The ancestor depth bound, falling back to [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Whether scope verification is on (default `true`).
    #[must_use]
    pub fn verifies_scope(&self) -> bool {
        self.verify_scope.unwrap_or(true)
    }

    /// Lock wait in seconds, falling back to [`DEFAULT_LOCK_WAIT_SECONDS`].
    #[must_use]
    pub fn lock_wait_seconds(&self) -> u64 {
        self.maximum_lock_wait_seconds
            .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS)
    }
}

/// One level of the chain.
///
/// # Examples
///
/// ```
/// use slugtree::config::{LevelConfig, ReferenceConfig};
///
/// let level = LevelConfig::new("category", "category_page")
///     .hierarchical()
///     .with_reference(ReferenceConfig::one("owner", "photographer"));
/// assert_eq!(level.to_schema().references().len(), 1);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Node type served by this level.
    pub name: String,

    /// Name of the handler dispatched for nodes of this level.
    pub handler: String,

    /// Whether nodes of this level form a tree.
    #[serde(default)]
    pub hierarchical: bool,

    /// Structural references declared by this node type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceConfig>,

    /// Explicit reference field leading to the previous level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl LevelConfig {
    /// A flat level without references.
    #[must_use]
    pub fn new(name: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: handler.into(),
            hierarchical: false,
            references: Vec::new(),
            parent: None,
        }
    }

    /// Mark the level as tree-shaped.
    #[must_use]
    pub fn hierarchical(mut self) -> Self {
        self.hierarchical = true;
        self
    }

    /// Declare a structural reference.
    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceConfig) -> Self {
        self.references.push(reference);
        self
    }

    /// Name the field leading to the previous level.
    #[must_use]
    pub fn with_parent(mut self, field: impl Into<String>) -> Self {
        self.parent = Some(field.into());
        self
    }

    /// The node schema this level declares.
    #[must_use]
    pub fn to_schema(&self) -> NodeSchema {
        self.references
            .iter()
            .fold(NodeSchema::new(&self.name), |schema, reference| {
                schema.with_reference(reference.to_reference())
            })
    }
}

/// A structural reference declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Field name on the declaring node.
    pub field: String,

    /// Node type the field points to.
    pub target: String,

    /// Whether the field may hold several targets.
    #[serde(default)]
    pub many: bool,
}

impl ReferenceConfig {
    /// A single-valued reference.
    #[must_use]
    pub fn one(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            target: target.into(),
            many: false,
        }
    }

    /// A many-valued reference.
    #[must_use]
    pub fn many(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            many: true,
            ..Self::one(field, target)
        }
    }

    /// The node-level reference this entry describes.
    #[must_use]
    pub fn to_reference(&self) -> Reference {
        let cardinality = if self.many {
            Cardinality::Many
        } else {
            Cardinality::One
        };
        Reference::new(&self.field, &self.target, cardinality)
    }
}

/// URL rendering settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UrlConfig {
    /// Mount prefix, such as `/gallery/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Whether rendered URLs end with a slash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_slash: Option<bool>,
}
