//! Level chains: the ordered registration of node collections.
//!
//! A [`LevelChain`] lists the node collections a path walks through, root
//! level first. Each [`Level`] binds a [`NodeProvider`], a handler, a
//! hierarchical flag and (except for the root) the [`Relation`] to the
//! previous level. Chains are validated once by [`ChainBuilder::build`] and
//! are read-only afterwards.
//!
//! # Examples
//!
//! ```
//! use slugtree::{ChainBuilder, LevelSpec, MemoryProvider, NodeSchema, Reference};
//!
//! let photographers = MemoryProvider::flat(NodeSchema::new("photographer"));
//! let categories = MemoryProvider::tree(
//!     NodeSchema::new("category").with_reference(Reference::one("owner", "photographer")),
//! );
//!
//! let chain = ChainBuilder::new()
//!     .level(LevelSpec::flat(photographers, "photographer_detail"))
//!     .level(LevelSpec::tree(categories, "category_detail"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(chain.len(), 2);
//! assert_eq!(chain.level(1).unwrap().relation().unwrap().field(), Some("owner"));
//! ```

pub mod relation;

pub use relation::{ManyValuedPolicy, ParentAccessor, ParentLink, Relation, RelationEnds};

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::provider::NodeProvider;

fn shape(hierarchical: bool) -> &'static str {
    if hierarchical {
        "hierarchical"
    } else {
        "flat"
    }
}

/// Registration of one level, consumed by [`ChainBuilder`].
pub struct LevelSpec<H> {
    provider: Arc<dyn NodeProvider>,
    handler: H,
    hierarchical: bool,
    parent: ParentLink,
}

impl<H> LevelSpec<H> {
    /// Register a shared provider.
    #[must_use]
    pub fn new(provider: Arc<dyn NodeProvider>, handler: H, hierarchical: bool) -> Self {
        Self {
            provider,
            handler,
            hierarchical,
            parent: ParentLink::Discover,
        }
    }

    /// Register a flat collection: one path segment per node.
    #[must_use]
    pub fn flat<P: NodeProvider + 'static>(provider: P, handler: H) -> Self {
        Self::new(Arc::new(provider), handler, false)
    }

    /// Register a tree-shaped collection consuming a variable number of segments.
    #[must_use]
    pub fn tree<P: NodeProvider + 'static>(provider: P, handler: H) -> Self {
        Self::new(Arc::new(provider), handler, true)
    }

    /// Link to the previous level through the named reference field.
    #[must_use]
    pub fn with_parent_field(mut self, field: impl Into<String>) -> Self {
        self.parent = ParentLink::Field(field.into());
        self
    }

    /// Link to the previous level through a caller-supplied accessor.
    #[must_use]
    pub fn with_parent_accessor(mut self, accessor: impl ParentAccessor + 'static) -> Self {
        self.parent = ParentLink::Accessor(Arc::new(accessor));
        self
    }

    /// Set the parent link directly.
    #[must_use]
    pub fn with_parent_link(mut self, link: ParentLink) -> Self {
        self.parent = link;
        self
    }
}

/// Builder validating level registrations into a [`LevelChain`].
pub struct ChainBuilder<H> {
    specs: Vec<LevelSpec<H>>,
    policy: ManyValuedPolicy,
}

impl<H> Default for ChainBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ChainBuilder<H> {
    /// Start an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            policy: ManyValuedPolicy::default(),
        }
    }

    /// Append the next level, below the ones added so far.
    #[must_use]
    pub fn level(mut self, spec: LevelSpec<H>) -> Self {
        self.specs.push(spec);
        self
    }

    /// Set how discovery treats a lone many-valued reference.
    #[must_use]
    pub fn many_valued_policy(mut self, policy: ManyValuedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate the registrations and resolve every relation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChain`] if:
    /// - no level was registered
    /// - two levels share a node type
    /// - a level's hierarchical flag disagrees with its provider
    /// - the root level declares a parent link
    ///
    /// Returns [`Error::Configuration`] if the relation between two
    /// consecutive levels cannot be determined.
    pub fn build(self) -> Result<LevelChain<H>> {
        if self.specs.is_empty() {
            return Err(Error::InvalidChain {
                reason: "chain has no levels".into(),
            });
        }

        let mut seen = HashSet::new();
        let mut levels: Vec<Level<H>> = Vec::with_capacity(self.specs.len());

        for (index, spec) in self.specs.into_iter().enumerate() {
            let name = spec.provider.schema().type_name().to_string();

            if !seen.insert(name.clone()) {
                return Err(Error::InvalidChain {
                    reason: format!("node type '{name}' is registered twice"),
                });
            }

            if spec.hierarchical != spec.provider.is_hierarchical() {
                return Err(Error::InvalidChain {
                    reason: format!(
                        "level '{name}' is registered as {} but its provider is {}",
                        shape(spec.hierarchical),
                        shape(spec.provider.is_hierarchical())
                    ),
                });
            }

            let relation = match levels.last() {
                None => {
                    if !matches!(spec.parent, ParentLink::Discover) {
                        return Err(Error::InvalidChain {
                            reason: format!("root level '{name}' cannot declare a parent"),
                        });
                    }
                    None
                }
                Some(parent) => {
                    let relation = Relation::resolve(
                        spec.provider.schema(),
                        parent.provider.schema(),
                        &spec.parent,
                        self.policy,
                    )?;
                    log::debug!("level '{name}' links to '{}' {relation}", parent.name());
                    Some(relation)
                }
            };

            levels.push(Level {
                index,
                provider: spec.provider,
                handler: spec.handler,
                hierarchical: spec.hierarchical,
                relation,
            });
        }

        log::debug!("built level chain with {} levels", levels.len());
        Ok(LevelChain { levels })
    }
}

/// One validated position in a [`LevelChain`].
pub struct Level<H> {
    index: usize,
    provider: Arc<dyn NodeProvider>,
    handler: H,
    hierarchical: bool,
    relation: Option<Relation>,
}

impl<H> Level<H> {
    /// Position in the chain, 0 for the root level.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Node type name served by this level.
    #[must_use]
    pub fn name(&self) -> &str {
        self.provider.schema().type_name()
    }

    /// The backing provider.
    #[must_use]
    pub fn provider(&self) -> &dyn NodeProvider {
        self.provider.as_ref()
    }

    /// The registered handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Whether the level is tree-shaped.
    #[must_use]
    pub const fn is_hierarchical(&self) -> bool {
        self.hierarchical
    }

    /// Relation to the previous level; `None` for the root level.
    #[must_use]
    pub const fn relation(&self) -> Option<&Relation> {
        self.relation.as_ref()
    }
}

impl<H: fmt::Debug> fmt::Debug for Level<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("index", &self.index)
            .field("name", &self.name())
            .field("handler", &self.handler)
            .field("hierarchical", &self.hierarchical)
            .field("relation", &self.relation)
            .finish()
    }
}

/// Ordered, immutable sequence of levels from root to leaf.
pub struct LevelChain<H> {
    levels: Vec<Level<H>>,
}

impl<H> LevelChain<H> {
    /// Number of levels. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; a built chain has at least one level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// All levels, root first.
    #[must_use]
    pub fn levels(&self) -> &[Level<H>] {
        &self.levels
    }

    /// The level at `index`.
    #[must_use]
    pub fn level(&self, index: usize) -> Option<&Level<H>> {
        self.levels.get(index)
    }

    /// The level serving node type `kind`.
    #[must_use]
    pub fn level_named(&self, kind: &str) -> Option<&Level<H>> {
        self.levels.iter().find(|level| level.name() == kind)
    }

    /// The level `node` belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] if no level serves the node's type.
    pub fn level_of(&self, node: &Node) -> Result<&Level<H>> {
        self.level_named(node.kind())
            .ok_or_else(|| Error::UnknownType {
                type_name: node.kind().to_string(),
            })
    }

    /// Fetch a node of type `kind` by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] if no level serves `kind`, or a storage
    /// error from the provider.
    pub fn get_node(&self, kind: &str, id: NodeId) -> Result<Option<Node>> {
        let level = self.level_named(kind).ok_or_else(|| Error::UnknownType {
            type_name: kind.to_string(),
        })?;
        level.provider().get(id)
    }

    /// Follow the relation from `node` at level `index` to the previous level.
    ///
    /// The root level has no previous level and always yields `None`.
    ///
    /// # Errors
    ///
    /// Propagates integrity and storage errors from the relation.
    pub fn parent_across(&self, index: usize, node: &Node) -> Result<Option<Node>> {
        let Some(parent_index) = index.checked_sub(1) else {
            return Ok(None);
        };
        let (Some(level), Some(parent)) = (self.levels.get(index), self.levels.get(parent_index))
        else {
            return Ok(None);
        };
        let Some(relation) = &level.relation else {
            return Ok(None);
        };
        relation.parent_of(
            node,
            RelationEnds {
                child: level.provider(),
                parent: parent.provider(),
            },
        )
    }
}

impl<H: fmt::Debug> fmt::Debug for LevelChain<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.levels).finish()
    }
}
