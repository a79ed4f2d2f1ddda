//! Relationship between two resolved nodes.

use std::fmt;

use crate::path::builder::AncestorChain;

/// How two nodes relate within the chain hierarchy.
///
/// # Examples
///
/// ```
/// use slugtree::{
///     ChainBuilder, LevelSpec, MemoryProvider, NodeRelationship, NodeSchema, PathBuilder,
/// };
///
/// let mut categories = MemoryProvider::tree(NodeSchema::new("category"));
/// let nature = categories.add_root("nature", &[]).unwrap();
/// let peaks = categories.add_child(&nature, "peaks", &[]).unwrap();
/// let city = categories.add_root("city", &[]).unwrap();
///
/// let chain = ChainBuilder::new()
///     .level(LevelSpec::tree(categories, ()))
///     .build()
///     .unwrap();
/// let builder = PathBuilder::new();
/// let nature = builder.ancestors(&chain, &nature).unwrap();
/// let peaks = builder.ancestors(&chain, &peaks).unwrap();
/// let city = builder.ancestors(&chain, &city).unwrap();
///
/// assert_eq!(NodeRelationship::between(&nature, &peaks), NodeRelationship::Ancestor);
/// assert_eq!(NodeRelationship::between(&peaks, &nature), NodeRelationship::Descendant);
/// assert_eq!(NodeRelationship::between(&peaks, &peaks), NodeRelationship::Same);
/// assert_eq!(NodeRelationship::between(&city, &peaks), NodeRelationship::Unrelated);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRelationship {
    /// The first node is an ancestor of the second.
    Ancestor,
    /// The first node is a descendant of the second.
    Descendant,
    /// Both chains end at the same node.
    Same,
    /// Neither node lies above the other.
    Unrelated,
}

impl NodeRelationship {
    /// Compare the nodes two ancestor chains end at.
    #[must_use]
    pub fn between(first: &AncestorChain, second: &AncestorChain) -> Self {
        if first.node().same_instance(second.node()) {
            Self::Same
        } else if second.contains(first.node()) {
            Self::Ancestor
        } else if first.contains(second.node()) {
            Self::Descendant
        } else {
            Self::Unrelated
        }
    }

    /// Whether one node lies on the other's ancestor chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use slugtree::NodeRelationship;
    ///
    /// assert!(NodeRelationship::Ancestor.is_hierarchical());
    /// assert!(NodeRelationship::Same.is_hierarchical());
    /// assert!(!NodeRelationship::Unrelated.is_hierarchical());
    /// ```
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        !matches!(self, Self::Unrelated)
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Ancestor => "is an ancestor of",
            Self::Descendant => "is a descendant of",
            Self::Same => "is the same node as",
            Self::Unrelated => "is unrelated to",
        }
    }
}

impl fmt::Display for NodeRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
