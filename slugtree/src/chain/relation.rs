//! Relations between consecutive levels of a chain.
//!
//! A [`Relation`] answers "which node of the previous level owns this node?".
//! It is chosen once while the chain is built, either by discovering the
//! single structural reference the child type holds to the parent type, or
//! from an explicit [`ParentLink`] override.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::{Cardinality, Node, NodeSchema};
use crate::provider::NodeProvider;

/// The two providers a relation connects.
#[derive(Clone, Copy)]
pub struct RelationEnds<'a> {
    /// Provider of the child level.
    pub child: &'a dyn NodeProvider,
    /// Provider of the parent level.
    pub parent: &'a dyn NodeProvider,
}

/// A caller-supplied way to find the parent of a node.
///
/// Closures with the matching signature implement this trait.
///
/// # Examples
///
/// ```
/// use slugtree::chain::{ParentAccessor, RelationEnds};
/// use slugtree::{Node, Result};
///
/// fn through_owner(node: &Node, ends: RelationEnds<'_>) -> Result<Option<Node>> {
///     match ends.child.references(node, "owner")?.first() {
///         Some(id) => ends.parent.get(*id),
///         None => Ok(None),
///     }
/// }
///
/// fn assert_accessor<A: ParentAccessor>(_: A) {}
/// assert_accessor(through_owner);
/// ```
pub trait ParentAccessor: Send + Sync {
    /// Return the parent-level node owning `child`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent cannot be determined from stored data.
    fn parent_of(&self, child: &Node, ends: RelationEnds<'_>) -> Result<Option<Node>>;
}

impl<F> ParentAccessor for F
where
    F: Fn(&Node, RelationEnds<'_>) -> Result<Option<Node>> + Send + Sync,
{
    fn parent_of(&self, child: &Node, ends: RelationEnds<'_>) -> Result<Option<Node>> {
        self(child, ends)
    }
}

/// How a level declares the link to its parent level.
#[derive(Clone, Default)]
pub enum ParentLink {
    /// Discover the single structural reference to the parent type.
    #[default]
    Discover,
    /// Follow the named structural reference without discovery.
    Field(String),
    /// Use a caller-supplied accessor verbatim.
    Accessor(Arc<dyn ParentAccessor>),
}

impl fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discover => write!(f, "Discover"),
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Accessor(_) => write!(f, "Accessor(..)"),
        }
    }
}

/// What to do when the only reference to the parent type is many-valued.
///
/// # Examples
///
/// ```
/// use slugtree::ManyValuedPolicy;
///
/// assert_eq!(ManyValuedPolicy::default(), ManyValuedPolicy::Reject);
/// assert_eq!(ManyValuedPolicy::parse("first").unwrap(), ManyValuedPolicy::FirstCandidate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ManyValuedPolicy {
    /// Refuse to build the chain.
    #[default]
    #[serde(rename = "reject")]
    Reject,
    /// Follow the first related parent in enumeration order.
    #[serde(rename = "first")]
    FirstCandidate,
}

impl ManyValuedPolicy {
    /// Parse a policy name (`reject` or `first`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not recognized.
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "first" => Ok(Self::FirstCandidate),
            _ => Err(format!("invalid many-valued policy: {s}")),
        }
    }
}

impl fmt::Display for ManyValuedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::FirstCandidate => write!(f, "first"),
        }
    }
}

/// The resolved link from a child level's node type to its parent's.
#[derive(Clone)]
pub enum Relation {
    /// Follow a structural reference stored on the child.
    ///
    /// A many-valued field follows its first stored target.
    Structural {
        /// Reference field on the child type.
        field: String,
        /// Declared cardinality of the field.
        cardinality: Cardinality,
    },
    /// Delegate to a caller-supplied accessor.
    Declared(Arc<dyn ParentAccessor>),
}

impl Relation {
    /// Choose the relation between `child` and `parent` for the given link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if:
    /// - the child declares no reference to the parent type
    /// - it declares more than one
    /// - its only reference is many-valued and `policy` is
    ///   [`ManyValuedPolicy::Reject`]
    /// - an explicit field does not exist or targets another type
    ///
    /// # Examples
    ///
    /// ```
    /// use slugtree::chain::{ParentLink, Relation};
    /// use slugtree::{ManyValuedPolicy, NodeSchema, Reference};
    ///
    /// let photographer = NodeSchema::new("photographer");
    /// let category = NodeSchema::new("category")
    ///     .with_reference(Reference::one("owner", "photographer"));
    ///
    /// let relation = Relation::resolve(
    ///     &category,
    ///     &photographer,
    ///     &ParentLink::Discover,
    ///     ManyValuedPolicy::Reject,
    /// )
    /// .unwrap();
    /// assert_eq!(relation.field(), Some("owner"));
    /// ```
    pub fn resolve(
        child: &NodeSchema,
        parent: &NodeSchema,
        link: &ParentLink,
        policy: ManyValuedPolicy,
    ) -> Result<Self> {
        let fail = |reason: String| Error::Configuration {
            child: child.type_name().to_string(),
            parent: parent.type_name().to_string(),
            reason,
        };

        match link {
            ParentLink::Accessor(accessor) => Ok(Self::Declared(Arc::clone(accessor))),
            ParentLink::Field(name) => {
                let reference = child
                    .reference(name)
                    .ok_or_else(|| fail(format!("no field named '{name}'")))?;
                if reference.target() != parent.type_name() {
                    return Err(fail(format!(
                        "field '{name}' targets '{}'",
                        reference.target()
                    )));
                }
                Ok(Self::Structural {
                    field: name.clone(),
                    cardinality: reference.cardinality(),
                })
            }
            ParentLink::Discover => {
                let candidates: Vec<_> = child.references_to(parent.type_name()).collect();
                match candidates.as_slice() {
                    [] => Err(fail("no structural reference".into())),
                    [only] if only.is_many() && policy == ManyValuedPolicy::Reject => {
                        Err(fail(format!(
                            "only reference '{}' is many-valued",
                            only.field()
                        )))
                    }
                    [only] => Ok(Self::Structural {
                        field: only.field().to_string(),
                        cardinality: only.cardinality(),
                    }),
                    several => {
                        let fields: Vec<_> = several.iter().map(|r| r.field()).collect();
                        Err(fail(format!(
                            "{} structural references found ({}); declare the parent field explicitly",
                            several.len(),
                            fields.join(", ")
                        )))
                    }
                }
            }
        }
    }

    /// The followed field, for structural relations.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Structural { field, .. } => Some(field),
            Self::Declared(_) => None,
        }
    }

    /// Find the parent-level node of `child`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Integrity`] if a single-valued reference holds several
    /// targets or a stored target does not exist in the parent level.
    pub fn parent_of(&self, child: &Node, ends: RelationEnds<'_>) -> Result<Option<Node>> {
        match self {
            Self::Declared(accessor) => accessor.parent_of(child, ends),
            Self::Structural { field, cardinality } => {
                let targets = ends.child.references(child, field)?;
                let Some(first) = targets.first() else {
                    return Ok(None);
                };
                if *cardinality == Cardinality::One && targets.len() > 1 {
                    return Err(Error::Integrity {
                        node: child.to_string(),
                        details: format!(
                            "single-valued field '{field}' holds {} targets",
                            targets.len()
                        ),
                    });
                }
                match ends.parent.get(*first)? {
                    Some(parent) => Ok(Some(parent)),
                    None => Err(Error::Integrity {
                        node: child.to_string(),
                        details: format!(
                            "field '{field}' references missing {} {first}",
                            ends.parent.schema().type_name()
                        ),
                    }),
                }
            }
        }
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural { field, cardinality } => f
                .debug_struct("Structural")
                .field("field", field)
                .field("cardinality", cardinality)
                .finish(),
            Self::Declared(_) => write!(f, "Declared(..)"),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural { field, cardinality } => {
                write!(f, "via {cardinality} field '{field}'")
            }
            Self::Declared(_) => write!(f, "via declared accessor"),
        }
    }
}
