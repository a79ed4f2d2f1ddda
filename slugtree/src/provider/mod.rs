//! The storage-facing capability every level of a chain is backed by.
//!
//! A [`NodeProvider`] exposes one node type: slug lookup inside a parent
//! scope, tree traversal for hierarchical collections, and the stored values
//! of the type's structural references. Any backend implementing it can be
//! plugged into a [`crate::LevelChain`].
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryProvider`] keeps nodes in memory.
//! - [`crate::database::SqliteProvider`] reads nodes from a `SQLite` database.

mod memory;

pub use memory::MemoryProvider;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, NodeSchema};

/// Capability abstraction over one collection of nodes.
///
/// # Scoped lookup
///
/// `candidates_by_slug(slug, scope)` returns every node of this type with the
/// given slug that may live directly under `scope`:
///
/// - with `scope == None` every node of the type is a candidate;
/// - with `scope == Some(parent)` a candidate must hold `parent` in one of its
///   structural references targeting `parent.kind()`. A type that declares no
///   reference to `parent.kind()` cannot narrow the set, and returns every
///   node with the slug.
///
/// The candidate set may be wider than the level's relation allows. The
/// resolver keeps only candidates whose relation leads back to `scope`.
///
/// Hierarchical providers only consider tree roots (nodes without a tree
/// parent); deeper nodes are reached through [`NodeProvider::children_of`].
pub trait NodeProvider: Send + Sync {
    /// Declared schema of the node type.
    fn schema(&self) -> &NodeSchema;

    /// Whether the collection is tree-shaped.
    fn is_hierarchical(&self) -> bool;

    /// Fetch a node by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn get(&self, id: NodeId) -> Result<Option<Node>>;

    /// Every node with `slug` that references `scope`, in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn candidates_by_slug(&self, slug: &str, scope: Option<&Node>) -> Result<Vec<Node>>;

    /// Find the single node with `slug` that references `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails, or
    /// [`Error::Integrity`] if several candidates share the slug.
    fn lookup_by_slug(&self, slug: &str, scope: Option<&Node>) -> Result<Option<Node>> {
        unique_candidate(self.candidates_by_slug(slug, scope)?, slug, scope)
    }

    /// Tree children of `node`. Flat collections have none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn children_of(&self, _node: &Node) -> Result<Vec<Node>> {
        Ok(Vec::new())
    }

    /// Same-type tree parent of `node`. Flat collections have none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn tree_parent(&self, _node: &Node) -> Result<Option<Node>> {
        Ok(None)
    }

    /// Stored target ids of the structural reference `field` on `node`, in
    /// enumeration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn references(&self, node: &Node, field: &str) -> Result<Vec<NodeId>>;
}

/// Whether `node` references `scope` through any structural reference to
/// `scope.kind()`.
///
/// A node whose type declares no reference to `scope.kind()` always counts
/// as referencing it.
///
/// # Errors
///
/// Propagates storage errors from the provider.
pub fn in_scope(provider: &dyn NodeProvider, node: &Node, scope: Option<&Node>) -> Result<bool> {
    let Some(parent) = scope else {
        return Ok(true);
    };

    let mut declared = false;
    for reference in provider.schema().references_to(parent.kind()) {
        declared = true;
        if provider
            .references(node, reference.field())?
            .contains(&parent.id())
        {
            return Ok(true);
        }
    }

    Ok(!declared)
}

/// Reduce a candidate list to at most one node.
///
/// # Errors
///
/// Returns [`Error::Integrity`] if more than one candidate shares the slug.
pub fn unique_candidate(
    mut candidates: Vec<Node>,
    slug: &str,
    scope: Option<&Node>,
) -> Result<Option<Node>> {
    if candidates.len() > 1 {
        let scope = scope.map_or_else(|| "root scope".to_string(), ToString::to_string);
        return Err(Error::Integrity {
            node: slug.to_string(),
            details: format!(
                "{} nodes share slug '{slug}' under {scope}",
                candidates.len()
            ),
        });
    }
    Ok(candidates.pop())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_candidate_empty() {
        assert_eq!(unique_candidate(Vec::new(), "x", None).unwrap(), None);
    }

    #[test]
    fn test_unique_candidate_single() {
        let node = Node::new("photo", NodeId::new(3), "x");
        let found = unique_candidate(vec![node.clone()], "x", None).unwrap();
        assert_eq!(found, Some(node));
    }

    #[test]
    fn test_unique_candidate_duplicate_is_integrity_error() {
        let scope = Node::new("category", NodeId::new(1), "nature");
        let candidates = vec![
            Node::new("photo", NodeId::new(3), "x"),
            Node::new("photo", NodeId::new(4), "x"),
        ];
        let err = unique_candidate(candidates, "x", Some(&scope)).unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains("category(nature)"));
    }
}
