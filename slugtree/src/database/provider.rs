//! [`NodeProvider`] over a shared [`Database`].

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, NodeSchema};
use crate::provider::NodeProvider;

use super::connection::{lock_error, Database};
use super::operations::NewNode;

/// A database shared by every provider of a site.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Serves one node kind out of a shared database.
///
/// Access to the connection is serialized through the mutex; calls block
/// while another thread holds it.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use slugtree::database::{Database, NewNode, SqliteProvider};
/// use slugtree::{NodeProvider, NodeSchema};
///
/// let db = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
/// let people = SqliteProvider::flat(Arc::clone(&db), NodeSchema::new("photographer"));
/// people.insert(&NewNode::new("jane")).unwrap();
///
/// let jane = people.lookup_by_slug("jane", None).unwrap().unwrap();
/// assert_eq!(jane.kind(), "photographer");
/// ```
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    db: SharedDatabase,
    schema: NodeSchema,
    hierarchical: bool,
}

impl SqliteProvider {
    /// Serve a flat kind.
    #[must_use]
    pub fn flat(db: SharedDatabase, schema: NodeSchema) -> Self {
        Self::new(db, schema, false)
    }

    /// Serve a tree-shaped kind.
    #[must_use]
    pub fn tree(db: SharedDatabase, schema: NodeSchema) -> Self {
        Self::new(db, schema, true)
    }

    /// Serve a kind with the given shape.
    #[must_use]
    pub fn new(db: SharedDatabase, schema: NodeSchema, hierarchical: bool) -> Self {
        Self {
            db,
            schema,
            hierarchical,
        }
    }

    /// Store a node of this provider's kind.
    ///
    /// # Errors
    ///
    /// See [`Database::insert_node`].
    pub fn insert(&self, node: &NewNode) -> Result<Node> {
        let mut db = self.lock()?;
        let result = db.insert_node(&self.schema, self.hierarchical, node);
        result.map_err(|e| lock_error(e, db.config()))
    }

    /// All nodes of this provider's kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self) -> Result<Vec<Node>> {
        self.read(|conn| Database::list_nodes(conn, Some(self.kind())))
    }

    fn kind(&self) -> &str {
        self.schema.type_name()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| Error::Storage {
            details: "database connection lock poisoned".into(),
        })
    }

    fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let db = self.lock()?;
        f(db.connection()).map_err(|e| lock_error(e, db.config()))
    }

    fn holds(&self, conn: &Connection, node: &Node, scope: &Node) -> Result<bool> {
        let mut declared = false;
        for reference in self.schema.references_to(scope.kind()) {
            declared = true;
            if Database::references(conn, node.id(), reference.field())?.contains(&scope.id()) {
                return Ok(true);
            }
        }
        Ok(!declared)
    }

    fn owns(&self, node: &Node) -> bool {
        node.kind() == self.kind()
    }
}

impl NodeProvider for SqliteProvider {
    fn schema(&self) -> &NodeSchema {
        &self.schema
    }

    fn is_hierarchical(&self) -> bool {
        self.hierarchical
    }

    fn get(&self, id: NodeId) -> Result<Option<Node>> {
        self.read(|conn| Database::get_node(conn, self.kind(), id))
    }

    fn candidates_by_slug(&self, slug: &str, scope: Option<&Node>) -> Result<Vec<Node>> {
        self.read(|conn| {
            let mut candidates = Vec::new();
            for node in Database::find_by_slug(conn, self.kind(), slug, self.hierarchical)? {
                let in_scope = match scope {
                    Some(parent) => self.holds(conn, &node, parent)?,
                    None => true,
                };
                if in_scope {
                    candidates.push(node);
                }
            }
            Ok(candidates)
        })
    }

    fn children_of(&self, node: &Node) -> Result<Vec<Node>> {
        if !self.hierarchical || !self.owns(node) {
            return Ok(Vec::new());
        }
        self.read(|conn| Database::children(conn, self.kind(), node.id()))
    }

    fn tree_parent(&self, node: &Node) -> Result<Option<Node>> {
        if !self.hierarchical || !self.owns(node) {
            return Ok(None);
        }
        self.read(|conn| {
            let Some(parent) = Database::tree_parent_id(conn, self.kind(), node.id())? else {
                return Ok(None);
            };
            match Database::get_node(conn, self.kind(), parent)? {
                Some(parent) => Ok(Some(parent)),
                None => Err(Error::Integrity {
                    node: node.to_string(),
                    details: format!("tree parent {parent} does not exist"),
                }),
            }
        })
    }

    fn references(&self, node: &Node, field: &str) -> Result<Vec<NodeId>> {
        if !self.owns(node) {
            return Ok(Vec::new());
        }
        self.read(|conn| Database::references(conn, node.id(), field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{category_schema, photographer_schema};

    fn shared() -> SharedDatabase {
        Arc::new(Mutex::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn test_scoped_lookup() {
        let db = shared();
        let people = SqliteProvider::flat(Arc::clone(&db), photographer_schema());
        let cats = SqliteProvider::tree(Arc::clone(&db), category_schema());

        let jane = people.insert(&NewNode::new("jane")).unwrap();
        let john = people.insert(&NewNode::new("john")).unwrap();
        let janes = cats
            .insert(&NewNode::new("nature").with_reference("owner", jane.id()))
            .unwrap();
        let johns = cats
            .insert(&NewNode::new("nature").with_reference("owner", john.id()))
            .unwrap();

        assert_eq!(cats.lookup_by_slug("nature", Some(&jane)).unwrap(), Some(janes));
        assert_eq!(cats.lookup_by_slug("nature", Some(&john)).unwrap(), Some(johns));
        assert!(cats.lookup_by_slug("nature", None).unwrap_err().is_integrity());
        assert_eq!(cats.lookup_by_slug("oceans", Some(&jane)).unwrap(), None);
    }

    #[test]
    fn test_kinds_do_not_leak() {
        let db = shared();
        let people = SqliteProvider::flat(Arc::clone(&db), photographer_schema());
        let cats = SqliteProvider::tree(Arc::clone(&db), category_schema());
        let jane = people.insert(&NewNode::new("jane")).unwrap();

        assert_eq!(cats.get(jane.id()).unwrap(), None);
        assert_eq!(cats.lookup_by_slug("jane", None).unwrap(), None);
        assert!(cats.children_of(&jane).unwrap().is_empty());
        assert_eq!(people.list().unwrap(), vec![jane]);
    }

    #[test]
    fn test_tree_navigation() {
        let db = shared();
        let people = SqliteProvider::flat(Arc::clone(&db), photographer_schema());
        let cats = SqliteProvider::tree(Arc::clone(&db), category_schema());
        let jane = people.insert(&NewNode::new("jane")).unwrap();
        let nature = cats
            .insert(&NewNode::new("nature").with_reference("owner", jane.id()))
            .unwrap();
        let peaks = cats.insert(&NewNode::new("peaks").under(nature.id())).unwrap();

        assert_eq!(cats.children_of(&nature).unwrap(), vec![peaks.clone()]);
        assert_eq!(cats.tree_parent(&peaks).unwrap(), Some(nature.clone()));
        assert_eq!(cats.tree_parent(&nature).unwrap(), None);
        assert_eq!(cats.references(&nature, "owner").unwrap(), vec![jane.id()]);
        // Non-root nodes are reached through their parent only.
        assert_eq!(cats.lookup_by_slug("peaks", None).unwrap(), None);
    }

    #[test]
    fn test_poisoned_lock_is_storage_error() {
        let db = shared();
        let people = SqliteProvider::flat(Arc::clone(&db), photographer_schema());

        let poisoner = Arc::clone(&db);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            people.get(NodeId::new(1)),
            Err(Error::Storage { .. })
        ));
    }

    #[test]
    fn test_provider_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteProvider>();
    }
}
