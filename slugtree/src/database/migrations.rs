//! Database schema management and migrations.
//!
//! This module handles database schema initialization and version checking.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_KIND_SLUG_INDEX, CREATE_METADATA_TABLE, CREATE_NODES_TABLE, CREATE_NODE_REFS_TABLE,
    CREATE_REF_TARGET_INDEX, CREATE_TREE_PARENT_INDEX, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// This function creates all tables, indices, and metadata for a fresh
/// database.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use slugtree::database::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_NODES_TABLE, [])?;
    conn.execute(CREATE_NODE_REFS_TABLE, [])?;

    conn.execute(CREATE_KIND_SLUG_INDEX, [])?;
    conn.execute(CREATE_TREE_PARENT_INDEX, [])?;
    conn.execute(CREATE_REF_TARGET_INDEX, [])?;

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION.to_string()])?;

    Ok(())
}

/// Gets the current schema version from the database.
///
/// Returns `Ok(0)` for a database that has not been initialized yet.
///
/// # Errors
///
/// Returns an error if the stored version cannot be read or parsed.
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    let has_metadata: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
        [],
        |row| row.get(0),
    )?;
    if !has_metadata {
        return Ok(0);
    }

    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| row.get::<_, String>(0)) {
        Ok(value) => value.parse::<u32>().map_err(|e| Error::Validation {
            field: "schema_version".into(),
            message: format!("stored version '{value}' is not a number: {e}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// A fresh database is initialized. A database written by another schema
/// version is refused; there are no migrations yet.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the versions differ, or a
/// database error if initialization fails.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use slugtree::database::migrations::check_schema_compatibility;
///
/// let conn = Connection::open_in_memory().unwrap();
/// check_schema_compatibility(&conn).unwrap();
/// ```
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        log::debug!("initializing database schema version {CURRENT_SCHEMA_VERSION}");
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}
