//! Database schema definitions and SQL constants.
//!
//! Nodes of every type live in one adjacency-list table. Structural
//! references are stored separately so a node can hold any number of
//! targets per field, in a stable order.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for database configuration
/// and versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the nodes table.
///
/// `tree_parent` links a node to a node of the same kind; it is only set for
/// hierarchical kinds.
pub const CREATE_NODES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS nodes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        slug TEXT NOT NULL,
        tree_parent INTEGER REFERENCES nodes(id)
    )";

/// SQL statement to create the structural reference table.
///
/// `position` preserves the order in which targets were given.
pub const CREATE_NODE_REFS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS node_refs (
        node_id INTEGER NOT NULL REFERENCES nodes(id),
        field TEXT NOT NULL,
        target INTEGER NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (node_id, field, position)
    )";

/// Index for slug lookups within a kind.
pub const CREATE_KIND_SLUG_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_nodes_kind_slug ON nodes(kind, slug)";

/// Index for child enumeration.
pub const CREATE_TREE_PARENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_nodes_tree_parent ON nodes(tree_parent)";

/// Index for reverse reference lookups.
pub const CREATE_REF_TARGET_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_node_refs_target ON node_refs(field, target)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

pub(super) const INSERT_NODE: &str = "INSERT INTO nodes (kind, slug, tree_parent) VALUES (?, ?, ?)";

pub(super) const INSERT_REF: &str =
    "INSERT INTO node_refs (node_id, field, target, position) VALUES (?, ?, ?, ?)";

pub(super) const SELECT_NODE: &str = "SELECT kind, id, slug FROM nodes WHERE kind = ? AND id = ?";

pub(super) const SELECT_BY_SLUG: &str =
    "SELECT kind, id, slug FROM nodes WHERE kind = ? AND slug = ? ORDER BY id";

pub(super) const SELECT_ROOTS_BY_SLUG: &str =
    "SELECT kind, id, slug FROM nodes WHERE kind = ? AND slug = ? AND tree_parent IS NULL ORDER BY id";

pub(super) const SELECT_CHILDREN: &str =
    "SELECT kind, id, slug FROM nodes WHERE kind = ? AND tree_parent = ? ORDER BY id";

pub(super) const SELECT_TREE_PARENT: &str =
    "SELECT tree_parent FROM nodes WHERE kind = ? AND id = ?";

pub(super) const SELECT_REFS: &str =
    "SELECT target FROM node_refs WHERE node_id = ? AND field = ? ORDER BY position";

pub(super) const LIST_NODES: &str = "SELECT kind, id, slug FROM nodes ORDER BY kind, id";

pub(super) const LIST_NODES_OF_KIND: &str =
    "SELECT kind, id, slug FROM nodes WHERE kind = ? ORDER BY id";
