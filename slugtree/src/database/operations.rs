//! Database operations for nodes and their structural references.
//!
//! Writes take `&mut self` and run in an IMMEDIATE transaction. Reads are
//! associated functions over a `&Connection` so they compose with open
//! transactions.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::error::{Error, Result};
use crate::node::{validate_slug, Cardinality, Node, NodeId, NodeSchema};

use super::connection::Database;
use super::schema::{
    INSERT_NODE, INSERT_REF, LIST_NODES, LIST_NODES_OF_KIND, SELECT_BY_SLUG, SELECT_CHILDREN,
    SELECT_NODE, SELECT_REFS, SELECT_ROOTS_BY_SLUG, SELECT_TREE_PARENT,
};

/// A node waiting to be stored.
///
/// # Examples
///
/// ```
/// use slugtree::database::NewNode;
/// use slugtree::NodeId;
///
/// let node = NewNode::new("mountains")
///     .under(NodeId::new(1))
///     .with_reference("owner", NodeId::new(7));
/// assert_eq!(node.slug, "mountains");
/// assert_eq!(node.references.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNode {
    /// The node's slug.
    pub slug: String,
    /// Same-kind tree parent, for hierarchical kinds.
    pub tree_parent: Option<NodeId>,
    /// Reference values as `(field, target)` pairs, in order.
    pub references: Vec<(String, NodeId)>,
}

impl NewNode {
    /// Start a node with the given slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Self::default()
        }
    }

    /// Place the node below `parent` in its tree.
    #[must_use]
    pub fn under(mut self, parent: NodeId) -> Self {
        self.tree_parent = Some(parent);
        self
    }

    /// Add a reference value.
    #[must_use]
    pub fn with_reference(mut self, field: impl Into<String>, target: NodeId) -> Self {
        self.references.push((field.into(), target));
        self
    }
}

fn row_to_node(row: &rusqlite::Row<'_>) -> rusqlite::Result<Node> {
    let kind: String = row.get(0)?;
    let id: i64 = row.get(1)?;
    let slug: String = row.get(2)?;
    Ok(Node::new(kind, NodeId::new(id), slug))
}

fn invalid(field: &str, message: String) -> Error {
    Error::Validation {
        field: field.to_string(),
        message,
    }
}

impl Database {
    /// Store a node of the kind described by `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the slug is invalid
    /// - a tree parent is given for a flat kind, or names no node of the kind
    /// - a reference field is undeclared or its target does not exist
    /// - a single-valued reference is given more than one target
    /// - the transaction fails
    ///
    /// # Examples
    ///
    /// ```
    /// use slugtree::database::{Database, NewNode};
    /// use slugtree::NodeSchema;
    ///
    /// let mut db = Database::open_in_memory().unwrap();
    /// let schema = NodeSchema::new("photographer");
    /// let jane = db.insert_node(&schema, false, &NewNode::new("jane")).unwrap();
    /// assert_eq!(jane.slug(), "jane");
    /// ```
    pub fn insert_node(
        &mut self,
        schema: &NodeSchema,
        hierarchical: bool,
        node: &NewNode,
    ) -> Result<Node> {
        validate_slug(&node.slug)?;
        let kind = schema.type_name();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(parent) = node.tree_parent {
            if !hierarchical {
                return Err(invalid(
                    "tree_parent",
                    format!("'{kind}' is not hierarchical"),
                ));
            }
            if Self::get_node(&tx, kind, parent)?.is_none() {
                return Err(invalid("tree_parent", format!("no {kind} with id {parent}")));
            }
        }

        for (i, (field, target)) in node.references.iter().enumerate() {
            let reference = schema.reference(field).ok_or_else(|| {
                invalid(field, format!("'{kind}' declares no reference named '{field}'"))
            })?;
            let repeated = node.references[..i].iter().any(|(other, _)| other == field);
            if repeated && reference.cardinality() == Cardinality::One {
                return Err(invalid(
                    field,
                    "single-valued reference given more than one target".into(),
                ));
            }
            if Self::get_node(&tx, reference.target(), *target)?.is_none() {
                return Err(invalid(
                    field,
                    format!("no {} with id {target}", reference.target()),
                ));
            }
        }

        tx.execute(
            INSERT_NODE,
            params![kind, node.slug, node.tree_parent.map(NodeId::value)],
        )?;
        let id = NodeId::new(tx.last_insert_rowid());

        for (position, (field, target)) in node.references.iter().enumerate() {
            let position = i64::try_from(position).map_err(|_| Error::Storage {
                details: "too many references".into(),
            })?;
            tx.execute(INSERT_REF, params![id.value(), field, target.value(), position])?;
        }

        tx.commit()?;
        log::debug!("stored {kind}({}) with id {id}", node.slug);
        Ok(Node::new(kind, id, node.slug.clone()))
    }

    /// Fetch a node of `kind` by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_node(conn: &Connection, kind: &str, id: NodeId) -> Result<Option<Node>> {
        Ok(conn
            .query_row(SELECT_NODE, params![kind, id.value()], row_to_node)
            .optional()?)
    }

    /// Nodes of `kind` with the given slug, in id order.
    ///
    /// With `roots_only`, nodes that have a tree parent are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_by_slug(
        conn: &Connection,
        kind: &str,
        slug: &str,
        roots_only: bool,
    ) -> Result<Vec<Node>> {
        let sql = if roots_only {
            SELECT_ROOTS_BY_SLUG
        } else {
            SELECT_BY_SLUG
        };
        let mut stmt = conn.prepare_cached(sql)?;
        let nodes = stmt
            .query_map(params![kind, slug], row_to_node)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(nodes)
    }

    /// Tree children of the node `id` of `kind`, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn children(conn: &Connection, kind: &str, id: NodeId) -> Result<Vec<Node>> {
        let mut stmt = conn.prepare_cached(SELECT_CHILDREN)?;
        let nodes = stmt
            .query_map(params![kind, id.value()], row_to_node)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(nodes)
    }

    /// Tree parent id of the node `id` of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn tree_parent_id(conn: &Connection, kind: &str, id: NodeId) -> Result<Option<NodeId>> {
        let parent: Option<Option<i64>> = conn
            .query_row(SELECT_TREE_PARENT, params![kind, id.value()], |row| row.get(0))
            .optional()?;
        Ok(parent.flatten().map(NodeId::new))
    }

    /// Stored targets of reference `field` on node `id`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn references(conn: &Connection, id: NodeId, field: &str) -> Result<Vec<NodeId>> {
        let mut stmt = conn.prepare_cached(SELECT_REFS)?;
        let targets = stmt
            .query_map(params![id.value(), field], |row| row.get::<_, i64>(0))?
            .map(|target| target.map(NodeId::new))
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(targets)
    }

    /// All nodes, optionally restricted to one kind, ordered by kind and id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_nodes(conn: &Connection, kind: Option<&str>) -> Result<Vec<Node>> {
        let nodes = match kind {
            Some(kind) => {
                let mut stmt = conn.prepare_cached(LIST_NODES_OF_KIND)?;
                let rows = stmt.query_map([kind], row_to_node)?;
                rows.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?
            }
            None => {
                let mut stmt = conn.prepare_cached(LIST_NODES)?;
                let rows = stmt.query_map([], row_to_node)?;
                rows.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?
            }
        };
        Ok(nodes)
    }

    /// Verifies database integrity using PRAGMA `integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns an error if the integrity check fails or detects corruption.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::Storage {
                details: format!("integrity check failed: {result}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{category_schema, create_test_database, photographer_schema};

    #[test]
    fn test_insert_and_get() {
        let mut db = create_test_database();
        let jane = db
            .insert_node(&photographer_schema(), false, &NewNode::new("jane"))
            .unwrap();

        let loaded = Database::get_node(db.connection(), "photographer", jane.id()).unwrap();
        assert_eq!(loaded, Some(jane.clone()));

        let wrong_kind = Database::get_node(db.connection(), "category", jane.id()).unwrap();
        assert_eq!(wrong_kind, None);
    }

    #[test]
    fn test_insert_rejects_invalid_slug() {
        let mut db = create_test_database();
        let result = db.insert_node(&photographer_schema(), false, &NewNode::new("a/b"));
        assert!(matches!(result, Err(Error::InvalidSlug { .. })));
    }

    #[test]
    fn test_tree_structure() {
        let mut db = create_test_database();
        let jane = db
            .insert_node(&photographer_schema(), false, &NewNode::new("jane"))
            .unwrap();
        let nature = db
            .insert_node(
                &category_schema(),
                true,
                &NewNode::new("nature").with_reference("owner", jane.id()),
            )
            .unwrap();
        let peaks = db
            .insert_node(&category_schema(), true, &NewNode::new("peaks").under(nature.id()))
            .unwrap();

        let conn = db.connection();
        assert_eq!(
            Database::children(conn, "category", nature.id()).unwrap(),
            vec![peaks.clone()]
        );
        assert_eq!(
            Database::tree_parent_id(conn, "category", peaks.id()).unwrap(),
            Some(nature.id())
        );
        assert_eq!(
            Database::tree_parent_id(conn, "category", nature.id()).unwrap(),
            None
        );
        assert_eq!(
            Database::find_by_slug(conn, "category", "peaks", true).unwrap(),
            vec![]
        );
        assert_eq!(
            Database::find_by_slug(conn, "category", "peaks", false).unwrap(),
            vec![peaks]
        );
        assert_eq!(
            Database::references(conn, nature.id(), "owner").unwrap(),
            vec![jane.id()]
        );
    }

    #[test]
    fn test_flat_kind_rejects_tree_parent() {
        let mut db = create_test_database();
        let jane = db
            .insert_node(&photographer_schema(), false, &NewNode::new("jane"))
            .unwrap();
        let result = db.insert_node(
            &photographer_schema(),
            false,
            &NewNode::new("junior").under(jane.id()),
        );
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_reference_target_must_exist() {
        let mut db = create_test_database();
        let result = db.insert_node(
            &category_schema(),
            true,
            &NewNode::new("nature").with_reference("owner", NodeId::new(42)),
        );
        assert!(result.is_err());
        assert!(Database::list_nodes(db.connection(), None).unwrap().is_empty());
    }

    #[test]
    fn test_undeclared_and_repeated_references() {
        let mut db = create_test_database();
        let jane = db
            .insert_node(&photographer_schema(), false, &NewNode::new("jane"))
            .unwrap();

        let undeclared = NewNode::new("nature").with_reference("album", jane.id());
        assert!(db.insert_node(&category_schema(), true, &undeclared).is_err());

        let repeated = NewNode::new("nature")
            .with_reference("owner", jane.id())
            .with_reference("owner", jane.id());
        assert!(db.insert_node(&category_schema(), true, &repeated).is_err());
    }

    #[test]
    fn test_list_nodes() {
        let mut db = create_test_database();
        db.insert_node(&photographer_schema(), false, &NewNode::new("john"))
            .unwrap();
        let jane = db
            .insert_node(&photographer_schema(), false, &NewNode::new("jane"))
            .unwrap();
        db.insert_node(
            &category_schema(),
            true,
            &NewNode::new("nature").with_reference("owner", jane.id()),
        )
        .unwrap();

        let all = Database::list_nodes(db.connection(), None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].kind(), "category");

        let people = Database::list_nodes(db.connection(), Some("photographer")).unwrap();
        let slugs: Vec<_> = people.iter().map(Node::slug).collect();
        assert_eq!(slugs, vec!["john", "jane"]);
    }

    #[test]
    fn test_verify_integrity() {
        let db = create_test_database();
        db.verify_integrity().unwrap();
    }
}
