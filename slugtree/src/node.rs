//! Node handles and the static schema of node types.
//!
//! A [`Node`] is an opaque handle to one stored instance of a node type. The
//! structural links a node type has to other types are declared up front in a
//! [`NodeSchema`]; relation discovery inspects these declarations instead of
//! reflecting over storage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator between path segments. Slugs may never contain it.
pub const SEPARATOR: char = '/';

/// Identifier of a node within its node type.
///
/// # Examples
///
/// ```
/// use slugtree::NodeId;
///
/// let id = NodeId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Handle to one instance of a node type.
///
/// Two handles are equal when they name the same type, id and slug.
///
/// # Examples
///
/// ```
/// use slugtree::{Node, NodeId};
///
/// let node = Node::new("photographer", NodeId::new(1), "jane");
/// assert_eq!(node.kind(), "photographer");
/// assert_eq!(node.slug(), "jane");
/// assert_eq!(node.to_string(), "photographer(jane)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    kind: String,
    id: NodeId,
    slug: String,
}

impl Node {
    /// Create a node handle.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: NodeId, slug: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id,
            slug: slug.into(),
        }
    }

    /// Name of the node type this node belongs to.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Identifier of the node within its type.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The path segment this node contributes.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Whether both handles refer to the same stored instance.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.slug)
    }
}

/// How many target nodes a structural reference may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// At most one target (foreign-key or one-to-one style).
    #[default]
    One,
    /// Any number of targets (many-to-many style).
    Many,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "single-valued"),
            Self::Many => write!(f, "many-valued"),
        }
    }
}

/// A structural reference from one node type to another.
///
/// # Examples
///
/// ```
/// use slugtree::{Cardinality, Reference};
///
/// let owner = Reference::one("owner", "photographer");
/// assert_eq!(owner.cardinality(), Cardinality::One);
///
/// let albums = Reference::many("albums", "category");
/// assert!(albums.is_many());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    field: String,
    target: String,
    cardinality: Cardinality,
}

impl Reference {
    /// Declare a single-valued reference.
    #[must_use]
    pub fn one(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(field, target, Cardinality::One)
    }

    /// Declare a many-valued reference.
    #[must_use]
    pub fn many(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(field, target, Cardinality::Many)
    }

    /// Declare a reference with explicit cardinality.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        target: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            field: field.into(),
            target: target.into(),
            cardinality,
        }
    }

    /// Field name under which the reference is stored.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Node type the reference points at.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Cardinality of the reference.
    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Whether the reference may hold several targets.
    #[must_use]
    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

/// Declared shape of a node type: its name and its structural references.
///
/// # Examples
///
/// ```
/// use slugtree::{NodeSchema, Reference};
///
/// let photo = NodeSchema::new("photo")
///     .with_reference(Reference::one("category", "category"))
///     .with_reference(Reference::one("photographer", "photographer"));
///
/// assert_eq!(photo.type_name(), "photo");
/// assert_eq!(photo.references_to("category").count(), 1);
/// assert!(photo.reference("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSchema {
    type_name: String,
    references: Vec<Reference>,
}

impl NodeSchema {
    /// Start a schema with no references.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            references: Vec::new(),
        }
    }

    /// Add a structural reference.
    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// Name of the node type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All declared references, in declaration order.
    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Look up a reference by field name.
    #[must_use]
    pub fn reference(&self, field: &str) -> Option<&Reference> {
        self.references.iter().find(|r| r.field == field)
    }

    /// References whose target is `type_name`, in declaration order.
    pub fn references_to<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Reference> {
        self.references.iter().filter(move |r| r.target == type_name)
    }
}

/// Check that `slug` can be used as a single path segment.
///
/// # Errors
///
/// Returns [`Error::InvalidSlug`] if the slug is empty, contains the path
/// separator, or has surrounding whitespace.
///
/// # Examples
///
/// ```
/// use slugtree::node::validate_slug;
///
/// assert!(validate_slug("mountain-photo").is_ok());
/// assert!(validate_slug("").is_err());
/// assert!(validate_slug("a/b").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<()> {
    let reason = if slug.is_empty() {
        "must not be empty"
    } else if slug.contains(SEPARATOR) {
        "must not contain '/'"
    } else if slug.trim() != slug {
        "must not have leading or trailing whitespace"
    } else if slug.contains('\0') {
        "must not contain null bytes"
    } else {
        return Ok(());
    };

    Err(Error::InvalidSlug {
        slug: slug.to_string(),
        reason: reason.to_string(),
    })
}
