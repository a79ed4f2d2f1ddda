//! Forward resolution: from a request path to a node and its handler.
//!
//! The resolver walks the levels of a chain in order. A flat level consumes
//! exactly one segment. A hierarchical level matches a tree root with the
//! first segment and then descends greedily through children while the next
//! segment names one. The walk never backtracks, so earlier levels win when
//! several readings of a path would be possible.

use crate::chain::{Level, LevelChain};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::path::normalize;
use crate::provider::{in_scope, unique_candidate};

/// A successful resolution.
#[derive(Debug)]
pub struct Match<'c, H> {
    /// The resolved node.
    pub node: Node,
    /// Handler registered for the node's level.
    pub handler: &'c H,
    /// Index of the level the node belongs to.
    pub level: usize,
    /// Number of path segments consumed.
    pub consumed: usize,
}

/// Outcome of resolving a path.
///
/// Not finding a match is an ordinary outcome, not an error.
#[derive(Debug)]
pub enum Resolution<'c, H> {
    /// The path named a node.
    Matched(Match<'c, H>),
    /// Nothing matched the path.
    NotFound {
        /// The unmatched path text.
        path: String,
    },
}

impl<'c, H> Resolution<'c, H> {
    /// Whether the path matched.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// The match, if any.
    #[must_use]
    pub fn into_match(self) -> Option<Match<'c, H>> {
        match self {
            Self::Matched(found) => Some(found),
            Self::NotFound { .. } => None,
        }
    }

    /// The resolved node, if any.
    #[must_use]
    pub fn node(&self) -> Option<&Node> {
        match self {
            Self::Matched(found) => Some(&found.node),
            Self::NotFound { .. } => None,
        }
    }
}

/// Resolves request paths against a [`LevelChain`].
///
/// # Examples
///
/// ```
/// use slugtree::{ChainBuilder, LevelSpec, MemoryProvider, NodeSchema, PathResolver, Reference};
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
///     .level(LevelSpec::flat(photographers, "photographer_detail"))
///     .level(LevelSpec::tree(categories, "category_detail"))
///     .build()
///     .unwrap();
///
/// let resolver = PathResolver::new();
/// let found = resolver.resolve(&chain, "/jane/nature/mountains/").unwrap();
/// let found = found.into_match().unwrap();
/// assert_eq!(found.node, mountains);
/// assert_eq!(*found.handler, "category_detail");
/// assert_eq!(found.consumed, 3);
///
/// assert!(!resolver.resolve(&chain, "jane/oceans").unwrap().is_match());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    verify_scope: bool,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self { verify_scope: true }
    }
}

impl PathResolver {
    /// Create a resolver with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure whether provider candidates are cross-checked against the
    /// scope they were requested for.
    ///
    /// Candidates are always filtered through the level relation. When
    /// enabled (the default), a candidate the provider returned for a scope it
    /// holds no reference to is reported as an integrity error.
    #[must_use]
    pub fn with_scope_verification(mut self, verify: bool) -> Self {
        self.verify_scope = verify;
        self
    }

    /// Whether scope verification is enabled.
    #[must_use]
    pub const fn verifies_scope(&self) -> bool {
        self.verify_scope
    }

    /// Resolve path text against `chain`.
    ///
    /// Malformed paths (an empty interior segment, for example) and empty
    /// paths resolve to [`Resolution::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns an integrity error if:
    /// - two candidates share a slug in one scope
    /// - scope verification finds a provider candidate that does not reference
    ///   the scope it was returned for
    ///
    /// Storage errors from providers are propagated.
    pub fn resolve<'c, H>(&self, chain: &'c LevelChain<H>, path: &str) -> Result<Resolution<'c, H>> {
        let not_found = || Resolution::NotFound {
            path: path.to_string(),
        };

        let segments = match normalize::split_segments(path) {
            Ok(segments) if !segments.is_empty() => segments,
            Ok(_) => {
                log::debug!("empty path resolves to nothing");
                return Ok(not_found());
            }
            Err(err) => {
                log::debug!("malformed path '{path}': {err}");
                return Ok(not_found());
            }
        };

        let mut scope: Option<Node> = None;
        let mut cursor = 0;

        for level in chain.levels() {
            let Some(first) = segments.get(cursor) else {
                break;
            };

            let Some(mut node) = self.lookup(chain, level, first, scope.as_ref())? else {
                log::debug!("'{first}' matches no {} in '{path}'", level.name());
                return Ok(not_found());
            };
            cursor += 1;

            if level.is_hierarchical() {
                while let Some(next) = segments.get(cursor) {
                    match Self::child_named(level, &node, next)? {
                        Some(child) => {
                            node = child;
                            cursor += 1;
                        }
                        None => break,
                    }
                }
            }

            if cursor == segments.len() {
                log::debug!("'{path}' resolved to {node} at level {}", level.index());
                return Ok(Resolution::Matched(Match {
                    node,
                    handler: level.handler(),
                    level: level.index(),
                    consumed: cursor,
                }));
            }

            scope = Some(node);
        }

        log::debug!(
            "'{path}' has {} segments left after the last level",
            segments.len() - cursor
        );
        Ok(not_found())
    }

    /// Resolve path text, treating no match as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing matched, plus every error
    /// [`PathResolver::resolve`] can return.
    pub fn resolve_strict<'c, H>(&self, chain: &'c LevelChain<H>, path: &str) -> Result<Match<'c, H>> {
        match self.resolve(chain, path)? {
            Resolution::Matched(found) => Ok(found),
            Resolution::NotFound { path } => Err(Error::NotFound { path }),
        }
    }

    /// Resolve path text and hand the match to `f`.
    ///
    /// Returns `None` without calling `f` if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns every error [`PathResolver::resolve`] can return.
    pub fn dispatch<H, R, F>(&self, chain: &LevelChain<H>, path: &str, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&H, &Node) -> R,
    {
        Ok(self
            .resolve(chain, path)?
            .into_match()
            .map(|found| f(found.handler, &found.node)))
    }

    fn child_named<H>(level: &Level<H>, node: &Node, slug: &str) -> Result<Option<Node>> {
        let mut matching: Vec<Node> = level
            .provider()
            .children_of(node)?
            .into_iter()
            .filter(|child| child.slug() == slug)
            .collect();

        if matching.len() > 1 {
            return Err(Error::Integrity {
                node: node.to_string(),
                details: format!("{} children share slug '{slug}'", matching.len()),
            });
        }
        Ok(matching.pop())
    }

    /// The node of `level` named `slug` whose relation leads to `scope`.
    fn lookup<H>(
        &self,
        chain: &LevelChain<H>,
        level: &Level<H>,
        slug: &str,
        scope: Option<&Node>,
    ) -> Result<Option<Node>> {
        let provider = level.provider();
        let candidates = provider.candidates_by_slug(slug, scope)?;
        let Some(parent) = scope else {
            return unique_candidate(candidates, slug, None);
        };

        let mut under_scope = Vec::new();
        for candidate in candidates {
            match chain.parent_across(level.index(), &candidate)? {
                Some(found) if found.same_instance(parent) => under_scope.push(candidate),
                _ if self.verify_scope && !in_scope(provider, &candidate, Some(parent))? => {
                    return Err(Error::Integrity {
                        node: candidate.to_string(),
                        details: format!("returned for {parent} but holds no reference to it"),
                    });
                }
                _ => log::debug!("{candidate} shares slug '{slug}' but is not under {parent}"),
            }
        }
        unique_candidate(under_scope, slug, Some(parent))
    }
}
