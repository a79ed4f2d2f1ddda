//! Integration tests for the database layer.
//!
//! These tests exercise the full database stack including auto-initialization,
//! schema versioning, concurrent access and insert atomicity, and resolution
//! through providers backed by a database file.

mod common;

use std::sync::{Arc, Mutex};
use std::thread;

use tempfile::tempdir;

use common::{category_schema, gallery_config, photographer_schema};
use slugtree::database::{Database, DatabaseConfig, NewNode, SqliteProvider};
use slugtree::{Error, NodeProvider, Site};

#[test]
fn test_database_auto_creation() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("subdir").join("test.db");

    assert!(!db_path.parent().unwrap().exists());

    let _db = Database::open(DatabaseConfig::new(&db_path)).unwrap();

    assert!(db_path.exists());
}

#[test]
fn test_schema_version_compatibility() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("version_test.db");

    Database::open(DatabaseConfig::new(&db_path)).unwrap();
    // Reopening at the same version works.
    Database::open(DatabaseConfig::new(&db_path)).unwrap();

    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute(
            "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();
    }

    let err = Database::open(DatabaseConfig::new(&db_path)).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedSchemaVersion { found: 999, .. }
    ));
}

#[test]
fn test_nodes_survive_reopening() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("reopen.db");

    let jane = {
        let mut db = Database::open(DatabaseConfig::new(&db_path)).unwrap();
        db.insert_node(&photographer_schema(), false, &NewNode::new("jane"))
            .unwrap()
    };

    let db = Database::open(DatabaseConfig::new(&db_path).read_only()).unwrap();
    let found = Database::get_node(db.connection(), "photographer", jane.id()).unwrap();
    assert_eq!(found, Some(jane));
}

#[test]
fn test_failed_insert_leaves_no_trace() {
    let mut db = Database::open_in_memory().unwrap();
    let jane = db
        .insert_node(&photographer_schema(), false, &NewNode::new("jane"))
        .unwrap();

    // The second target does not exist, so nothing may be stored.
    let result = db.insert_node(
        &category_schema(),
        true,
        &NewNode::new("nature")
            .with_reference("owner", jane.id())
            .under(slugtree::NodeId::new(404)),
    );
    assert!(matches!(result, Err(Error::Validation { .. })));
    assert_eq!(
        Database::list_nodes(db.connection(), Some("category")).unwrap(),
        Vec::new()
    );
    db.verify_integrity().unwrap();
}

#[test]
fn test_concurrent_write_operations() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("concurrent.db");
    Database::open(DatabaseConfig::new(&db_path)).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let path = db_path.clone();
            thread::spawn(move || {
                let mut db = Database::open(DatabaseConfig::new(path))?;
                db.insert_node(
                    &photographer_schema(),
                    false,
                    &NewNode::new(format!("photographer-{i}")),
                )
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let db = Database::open(DatabaseConfig::new(&db_path)).unwrap();
    let all = Database::list_nodes(db.connection(), None).unwrap();
    assert_eq!(all.len(), 10);
}

#[test]
fn test_providers_share_one_connection() {
    let db = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
    let people = SqliteProvider::flat(Arc::clone(&db), photographer_schema());
    let categories = SqliteProvider::tree(Arc::clone(&db), category_schema());

    let jane = people.insert(&NewNode::new("jane")).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let categories = categories.clone();
            let owner = jane.id();
            thread::spawn(move || {
                categories.insert(
                    &NewNode::new(format!("category-{i}")).with_reference("owner", owner),
                )
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(categories.list().unwrap().len(), 4);
    assert!(categories
        .lookup_by_slug("category-2", Some(&jane))
        .unwrap()
        .is_some());
}

#[test]
fn test_site_over_database_file() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("site.db");
    let config = gallery_config();

    let photo = {
        let site = Site::open(&config, DatabaseConfig::new(&db_path)).unwrap();
        let jane = site.insert("photographer", &NewNode::new("jane")).unwrap();
        let nature = site
            .insert(
                "category",
                &NewNode::new("nature").with_reference("owner", jane.id()),
            )
            .unwrap();
        let mountains = site
            .insert("category", &NewNode::new("mountains").under(nature.id()))
            .unwrap();
        site.insert(
            "photo",
            &NewNode::new("mountain-photo").with_reference("category", mountains.id()),
        )
        .unwrap()
    };

    let site = Site::open(&config, DatabaseConfig::new(&db_path).read_only()).unwrap();
    assert_eq!(
        site.url_for(&photo).unwrap(),
        "/jane/nature/mountains/mountain-photo/"
    );

    let site = &site;
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(move || {
                let found = site
                    .resolve("jane/nature/mountains/mountain-photo")
                    .unwrap()
                    .into_match()
                    .unwrap();
                assert_eq!(found.node.slug(), "mountain-photo");
            });
        }
    });
    assert!(site.audit().unwrap().is_empty());
}

#[test]
fn test_site_files_photos_by_category_not_album() {
    let site = Site::in_memory(&gallery_config()).unwrap();
    let jane = site.insert("photographer", &NewNode::new("jane")).unwrap();
    let nature = site
        .insert(
            "category",
            &NewNode::new("nature").with_reference("owner", jane.id()),
        )
        .unwrap();
    let mountains = site
        .insert("category", &NewNode::new("mountains").under(nature.id()))
        .unwrap();
    let oceans = site
        .insert("category", &NewNode::new("oceans").under(nature.id()))
        .unwrap();

    let in_mountains = site
        .insert(
            "photo",
            &NewNode::new("shot")
                .with_reference("category", mountains.id())
                .with_reference("albums", oceans.id()),
        )
        .unwrap();
    let in_oceans = site
        .insert(
            "photo",
            &NewNode::new("shot").with_reference("category", oceans.id()),
        )
        .unwrap();

    for photo in [&in_mountains, &in_oceans] {
        let url = site.url_for(photo).unwrap();
        let found = site.resolve_url(&url).unwrap().into_match().unwrap();
        assert_eq!(&found.node, photo);
    }
    assert!(site.audit().unwrap().is_empty());
}
