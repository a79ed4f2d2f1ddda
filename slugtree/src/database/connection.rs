//! Database connection management.
//!
//! This module provides the main database connection type with proper
//! initialization and PRAGMA settings for `SQLite`.

use rusqlite::{Connection, ErrorCode, OpenFlags};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;
use super::migrations;
use super::schema::CURRENT_SCHEMA_VERSION;

/// A database connection wrapper with configuration.
///
/// # Examples
///
/// ```no_run
/// use slugtree::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/slugtree.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Open the database with appropriate flags
    /// - Set WAL mode for concurrent access (unless read-only)
    /// - Configure busy timeout
    /// - Initialize or verify the database schema
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file is missing and may not be created
    /// - The database file cannot be opened
    /// - The parent directory cannot be created
    /// - PRAGMA settings cannot be applied
    /// - Schema initialization or verification fails
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if !config.path.exists() {
            if !config.auto_create {
                return Err(Error::DataDirectoryNotFound {
                    path: config.path.clone(),
                });
            }
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;
        Self::configure(conn, config)
    }

    /// Opens a private in-memory database with a fresh schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// use slugtree::database::Database;
    ///
    /// let db = Database::open_in_memory().unwrap();
    /// assert!(Database::list_nodes(db.connection(), None).unwrap().is_empty());
    /// ```
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn, DatabaseConfig::new(":memory:"))
    }

    fn configure(conn: Connection, config: DatabaseConfig) -> Result<Self> {
        conn.busy_timeout(config.busy_timeout)?;

        if config.read_only {
            let found = migrations::get_schema_version(&conn)?;
            if found != CURRENT_SCHEMA_VERSION {
                return Err(Error::UnsupportedSchemaVersion {
                    expected: CURRENT_SCHEMA_VERSION,
                    found,
                });
            }
        } else {
            // journal_mode reports the resulting mode as a row.
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON")?;
            migrations::check_schema_compatibility(&conn).map_err(|e| lock_error(e, &config))?;
        }

        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// The configuration the database was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}

/// Turn `SQLite` busy/locked failures into [`Error::LockTimeout`].
pub(super) fn lock_error(err: Error, config: &DatabaseConfig) -> Error {
    match err {
        Error::Database(rusqlite::Error::SqliteFailure(ref failure, _))
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            Error::LockTimeout {
                seconds: config.busy_timeout.as_secs(),
            }
        }
        other => other,
    }
}
