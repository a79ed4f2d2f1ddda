//! A configured site: a level chain over a shared database.
//!
//! [`Site`] ties a validated [`Config`] to storage. Each configured level is
//! served by a [`SqliteProvider`] and dispatches to a handler named in the
//! configuration.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::chain::{ChainBuilder, LevelChain, LevelSpec};
use crate::config::Config;
use crate::database::{Database, DatabaseConfig, NewNode, SharedDatabase, SqliteProvider};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::path::{AncestorChain, Breadcrumb, PathBuilder, PathResolver, Resolution, UrlFormat};

/// A node whose stored data contradicts the chain.
#[derive(Debug)]
pub struct Problem {
    /// The offending node.
    pub node: Node,
    /// What went wrong.
    pub error: Error,
}

/// A level chain over a shared database, with URL rendering.
///
/// # Examples
///
/// ```
/// use slugtree::config::{Config, LevelConfig, ReferenceConfig};
/// use slugtree::database::NewNode;
/// use slugtree::Site;
///
/// let config = Config {
///     levels: Some(vec![
///         LevelConfig::new("photographer", "photographer_page"),
///         LevelConfig::new("category", "category_page")
///             .hierarchical()
///             .with_reference(ReferenceConfig::one("owner", "photographer")),
///     ]),
///     ..Default::default()
/// };
/// let site = Site::in_memory(&config).unwrap();
///
/// let jane = site.insert("photographer", &NewNode::new("jane")).unwrap();
/// let nature = site
///     .insert("category", &NewNode::new("nature").with_reference("owner", jane.id()))
///     .unwrap();
///
/// assert_eq!(site.url_for(&nature).unwrap(), "/jane/nature/");
/// let found = site.resolve_url("/jane/nature/").unwrap().into_match().unwrap();
/// assert_eq!(found.node, nature);
/// assert_eq!(found.handler, "category_page");
/// ```
#[derive(Debug)]
pub struct Site {
    db: SharedDatabase,
    providers: Vec<SqliteProvider>,
    chain: LevelChain<String>,
    url: UrlFormat,
    resolver: PathResolver,
    builder: PathBuilder,
}

impl Site {
    /// Assemble a site over an open database.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the levels do not form a valid
    /// chain, or a validation error for a malformed URL prefix.
    pub fn new(config: &Config, db: SharedDatabase) -> Result<Self> {
        let mut providers = Vec::new();
        let mut chain = ChainBuilder::new().many_valued_policy(config.many_valued_policy());

        for level in config.levels() {
            let provider =
                SqliteProvider::new(Arc::clone(&db), level.to_schema(), level.hierarchical);
            let mut spec = LevelSpec::new(
                Arc::new(provider.clone()),
                level.handler.clone(),
                level.hierarchical,
            );
            if let Some(ref field) = level.parent {
                spec = spec.with_parent_field(field.clone());
            }
            chain = chain.level(spec);
            providers.push(provider);
        }

        let chain = chain.build()?;

        let url_config = config.url.clone().unwrap_or_default();
        let url = match url_config.prefix {
            Some(ref prefix) => UrlFormat::new(prefix)?,
            None => UrlFormat::default(),
        }
        .with_trailing_slash(url_config.trailing_slash.unwrap_or(true));

        log::debug!(
            "site ready: {} levels mounted at {}",
            chain.len(),
            url.prefix()
        );

        Ok(Self {
            db,
            providers,
            chain,
            url,
            resolver: PathResolver::new().with_scope_verification(config.verifies_scope()),
            builder: PathBuilder::new().with_max_depth(config.max_depth()),
        })
    }

    /// Open the database described by `db_config` and assemble a site.
    ///
    /// The configured lock wait replaces the busy timeout of `db_config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the
    /// configuration does not form a valid chain.
    pub fn open(config: &Config, db_config: DatabaseConfig) -> Result<Self> {
        let db_config =
            db_config.with_busy_timeout(Duration::from_secs(config.lock_wait_seconds()));
        let db = Database::open(db_config)?;
        Self::new(config, Arc::new(Mutex::new(db)))
    }

    /// Assemble a site over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// See [`Site::new`].
    pub fn in_memory(config: &Config) -> Result<Self> {
        Self::new(config, Arc::new(Mutex::new(Database::open_in_memory()?)))
    }

    /// The level chain.
    #[must_use]
    pub const fn chain(&self) -> &LevelChain<String> {
        &self.chain
    }

    /// The shared database.
    #[must_use]
    pub const fn database(&self) -> &SharedDatabase {
        &self.db
    }

    /// How paths are rendered as URLs.
    #[must_use]
    pub const fn url_format(&self) -> &UrlFormat {
        &self.url
    }

    /// Resolve a path relative to the mount point.
    ///
    /// # Errors
    ///
    /// Returns an error for integrity faults and storage failures.
    pub fn resolve(&self, path: &str) -> Result<Resolution<'_, String>> {
        self.resolver.resolve(&self.chain, path)
    }

    /// Resolve a full URL. URLs outside the mount prefix do not match.
    ///
    /// # Errors
    ///
    /// Returns an error for integrity faults and storage failures.
    pub fn resolve_url(&self, url: &str) -> Result<Resolution<'_, String>> {
        match self.url.strip(url) {
            Some(path) => self.resolve(path),
            None => Ok(Resolution::NotFound {
                path: url.to_string(),
            }),
        }
    }

    /// The canonical URL of `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node's ancestors cannot be walked.
    pub fn url_for(&self, node: &Node) -> Result<String> {
        let path = self.builder.build_path(&self.chain, node)?;
        Ok(self.url.render(&path))
    }

    /// The ancestors of `node`, root first, the node included.
    ///
    /// # Errors
    ///
    /// Returns an error if the node's ancestors cannot be walked.
    pub fn ancestors(&self, node: &Node) -> Result<AncestorChain> {
        self.builder.ancestors(&self.chain, node)
    }

    /// Breadcrumbs from the chain root down to `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node's ancestors cannot be walked.
    pub fn breadcrumbs(&self, node: &Node) -> Result<Vec<Breadcrumb>> {
        Ok(self.ancestors(node)?.breadcrumbs())
    }

    /// Store a node of the level named `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] if no level serves `kind`, or the
    /// storage error raised by the insert.
    pub fn insert(&self, kind: &str, node: &NewNode) -> Result<Node> {
        let node = self.provider(kind)?.insert(node)?;
        log::info!("stored {node}");
        Ok(node)
    }

    /// Nodes of the level named `kind`, or of every level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for an unserved kind, or a storage
    /// error.
    pub fn list(&self, kind: Option<&str>) -> Result<Vec<Node>> {
        match kind {
            Some(kind) => self.provider(kind)?.list(),
            None => {
                let mut nodes = Vec::new();
                for provider in &self.providers {
                    nodes.extend(provider.list()?);
                }
                Ok(nodes)
            }
        }
    }

    /// Find a node by kind and the path addressing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the path does not address a node of
    /// that kind.
    pub fn find(&self, kind: &str, path: &str) -> Result<Node> {
        self.provider(kind)?;
        match self.resolve(path)?.into_match() {
            Some(found) if found.node.kind() == kind => Ok(found.node),
            _ => Err(Error::NotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Check every stored node: its ancestors must be walkable and its
    /// canonical path must resolve back to it.
    ///
    /// # Errors
    ///
    /// Returns an error for storage failures. Data faults are reported as
    /// [`Problem`]s instead.
    pub fn audit(&self) -> Result<Vec<Problem>> {
        let mut problems = Vec::new();

        for node in self.list(None)? {
            if let Some(error) = self.audit_node(&node)? {
                log::warn!("{node}: {error}");
                problems.push(Problem { node, error });
            }
        }

        Ok(problems)
    }

    fn audit_node(&self, node: &Node) -> Result<Option<Error>> {
        let path = match self.builder.build_path(&self.chain, node) {
            Ok(path) => path,
            Err(e) if e.is_integrity() => return Ok(Some(e)),
            Err(e) => return Err(e),
        };

        match self.resolver.resolve(&self.chain, &path.to_string()) {
            Ok(Resolution::Matched(found)) if found.node == *node => Ok(None),
            Ok(resolution) => Ok(Some(Error::Integrity {
                node: node.to_string(),
                details: match resolution.node() {
                    Some(other) => format!("path '{path}' resolves to {other}"),
                    None => format!("path '{path}' does not resolve"),
                },
            })),
            Err(e) if e.is_integrity() => Ok(Some(e)),
            Err(e) => Err(e),
        }
    }

    fn provider(&self, kind: &str) -> Result<&SqliteProvider> {
        self.chain
            .level_named(kind)
            .map(|level| &self.providers[level.index()])
            .ok_or_else(|| Error::UnknownType {
                type_name: kind.to_string(),
            })
    }
}
