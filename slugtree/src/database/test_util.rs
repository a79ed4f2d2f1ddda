//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::node::{NodeSchema, Reference};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Schema of the flat root kind used in tests.
#[must_use]
pub fn photographer_schema() -> NodeSchema {
    NodeSchema::new("photographer")
}

/// Schema of the hierarchical kind owned by a photographer.
#[must_use]
pub fn category_schema() -> NodeSchema {
    NodeSchema::new("category").with_reference(Reference::one("owner", "photographer"))
}

/// Schema of the leaf kind filed under a category.
#[must_use]
pub fn photo_schema() -> NodeSchema {
    NodeSchema::new("photo").with_reference(Reference::one("category", "category"))
}
