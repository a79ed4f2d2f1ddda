//! Reverse resolution: from a node back to its canonical path.
//!
//! The builder walks upward from a node. Inside a hierarchical level it
//! follows same-type tree parents; at a tree root (or any flat node) it
//! crosses into the previous level through the level relation. The walk ends
//! at a root of the first level.

use std::collections::HashSet;

use serde::Serialize;

use crate::chain::LevelChain;
use crate::error::{Error, Result};
use crate::node::{validate_slug, Node, NodeId};
use crate::path::types::SlugPath;

/// Default bound on the number of nodes an ancestor walk may visit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// One entry of an [`AncestorChain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ancestor {
    /// Index of the level the node belongs to.
    pub level: usize,
    /// The node.
    pub node: Node,
}

/// An ancestor together with the path that addresses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Index of the level the node belongs to.
    pub level: usize,
    /// The node.
    pub node: Node,
    /// Path from the chain root to this node.
    pub path: SlugPath,
}

/// The nodes from the chain root down to a node, the node itself included.
///
/// Never empty; the last entry is always the queried node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorChain {
    entries: Vec<Ancestor>,
}

impl AncestorChain {
    /// All entries, root first.
    #[must_use]
    pub fn entries(&self) -> &[Ancestor] {
        &self.entries
    }

    /// The nodes, root first.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().map(|entry| &entry.node)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The queried node.
    #[must_use]
    pub fn node(&self) -> &Node {
        // Entries are non-empty by construction.
        &self.entries[self.entries.len() - 1].node
    }

    /// The outermost ancestor.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.entries[0].node
    }

    /// Whether `node` is part of the chain.
    #[must_use]
    pub fn contains(&self, node: &Node) -> bool {
        self.nodes().any(|entry| entry.same_instance(node))
    }

    /// The canonical path of the queried node.
    #[must_use]
    pub fn to_path(&self) -> SlugPath {
        self.path_to(self.entries.len())
    }

    /// Every ancestor with its own path, root first.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| Breadcrumb {
                level: entry.level,
                node: entry.node.clone(),
                path: self.path_to(i + 1),
            })
            .collect()
    }

    fn path_to(&self, end: usize) -> SlugPath {
        // Slugs were validated while the chain was collected.
        SlugPath::from_validated(
            self.entries[..end]
                .iter()
                .map(|entry| entry.node.slug().to_string())
                .collect(),
        )
    }
}

/// Builds canonical paths and ancestor chains for resolved nodes.
///
/// # Examples
///
/// ```
/// use slugtree::{ChainBuilder, LevelSpec, MemoryProvider, NodeSchema, PathBuilder, Reference};
///
/// let mut photographers = MemoryProvider::flat(NodeSchema::new("photographer"));
/// let jane = photographers.add_root("jane", &[]).unwrap();
///
/// let mut categories = MemoryProvider::tree(
///     NodeSchema::new("category").with_reference(Reference::one("owner", "photographer")),
/// );
/// let nature = categories.add_root("nature", &[("owner", jane.id())]).unwrap();
/// let mountains = categories.add_child(&nature, "mountains", &[]).unwrap();
///
/// let chain = ChainBuilder::new()
///     .level(LevelSpec::flat(photographers, ()))
///     .level(LevelSpec::tree(categories, ()))
///     .build()
///     .unwrap();
///
/// let builder = PathBuilder::new();
/// assert_eq!(
///     builder.build_path(&chain, &mountains).unwrap().to_string(),
///     "jane/nature/mountains"
/// );
/// assert_eq!(builder.get_parent(&chain, &nature).unwrap(), Some(jane));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathBuilder {
    max_depth: usize,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl PathBuilder {
    /// Create a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of nodes an ancestor walk may visit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// The configured depth bound.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The slug `node` contributes to paths.
    #[must_use]
    pub fn get_slug(node: &Node) -> &str {
        node.slug()
    }

    /// One step up: the tree parent inside a hierarchical level, otherwise
    /// the parent across the level relation. `None` at a root of the first
    /// level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] if the node's type is not in the chain,
    /// or an integrity error from the relation.
    pub fn get_parent<H>(&self, chain: &LevelChain<H>, node: &Node) -> Result<Option<Node>> {
        let level = chain.level_of(node)?;
        if level.is_hierarchical() {
            if let Some(parent) = level.provider().tree_parent(node)? {
                return Ok(Some(parent));
            }
        }
        chain.parent_across(level.index(), node)
    }

    /// Same as [`PathBuilder::ancestors`].
    ///
    /// # Errors
    ///
    /// See [`PathBuilder::ancestors`].
    pub fn get_parents<H>(&self, chain: &LevelChain<H>, node: &Node) -> Result<AncestorChain> {
        self.ancestors(chain, node)
    }

    /// The canonical path of `node`.
    ///
    /// # Errors
    ///
    /// See [`PathBuilder::ancestors`].
    pub fn build_path<H>(&self, chain: &LevelChain<H>, node: &Node) -> Result<SlugPath> {
        Ok(self.ancestors(chain, node)?.to_path())
    }

    /// Collect the ancestors of `node`, root first, `node` last.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the node's type is not part of the chain ([`Error::UnknownType`])
    /// - a node is reached twice ([`Error::CycleDetected`])
    /// - the walk exceeds the depth bound
    /// - a node below the first level has no parent
    /// - a relation yields a node of the wrong type
    /// - a stored slug is not a valid path segment
    pub fn ancestors<H>(&self, chain: &LevelChain<H>, node: &Node) -> Result<AncestorChain> {
        let mut level = chain.level_of(node)?;
        let mut current = node.clone();
        let mut visited: HashSet<(String, NodeId)> = HashSet::new();
        let mut entries = Vec::new();

        loop {
            if !visited.insert((current.kind().to_string(), current.id())) {
                return Err(Error::CycleDetected {
                    node: current.to_string(),
                });
            }
            if entries.len() >= self.max_depth {
                return Err(Error::Integrity {
                    node: node.to_string(),
                    details: format!("ancestor walk exceeded {} nodes", self.max_depth),
                });
            }
            validate_slug(current.slug()).map_err(|err| Error::Integrity {
                node: current.to_string(),
                details: err.to_string(),
            })?;

            entries.push(Ancestor {
                level: level.index(),
                node: current.clone(),
            });

            if level.is_hierarchical() {
                if let Some(parent) = level.provider().tree_parent(&current)? {
                    current = parent;
                    continue;
                }
            }

            let Some(parent_index) = level.index().checked_sub(1) else {
                break;
            };
            let Some(parent) = chain.parent_across(level.index(), &current)? else {
                return Err(Error::Integrity {
                    node: current.to_string(),
                    details: format!("no parent in level '{}'", parent_level_name(chain, parent_index)),
                });
            };

            level = chain.level_of(&parent)?;
            if level.index() != parent_index {
                return Err(Error::Integrity {
                    node: current.to_string(),
                    details: format!("relation yielded {parent} from the wrong level"),
                });
            }
            current = parent;
        }

        entries.reverse();
        log::debug!("{node} has {} ancestors", entries.len());
        Ok(AncestorChain { entries })
    }
}

fn parent_level_name<H>(chain: &LevelChain<H>, index: usize) -> &str {
    chain.level(index).map_or("?", |level| level.name())
}
