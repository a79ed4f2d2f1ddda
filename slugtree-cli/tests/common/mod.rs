//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers
//! - A populated gallery fixture

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The photographer / category tree / photo chain used across tests.
pub const GALLERY_YAML: &str = r"
levels:
  - name: photographer
    handler: photographer_page
  - name: category
    handler: category_page
    hierarchical: true
    references:
      - field: owner
        target: photographer
  - name: photo
    handler: photo_page
    references:
      - field: category
        target: category
      - field: albums
        target: category
        many: true
    parent: category
";

/// Environment variables that would leak host settings into a test run.
const HOST_VARS: [&str; 10] = [
    "SLUGTREE_DATA_DIR",
    "SLUGTREE_CONFIG",
    "SLUGTREE_BUSY_TIMEOUT",
    "SLUGTREE_OUTPUT_FORMAT",
    "SLUGTREE_MANY_VALUED",
    "SLUGTREE_MAX_DEPTH",
    "SLUGTREE_URL_PREFIX",
    "SLUGTREE_TRAILING_SLASH",
    "SLUGTREE_VERIFY_SCOPE",
    "SLUGTREE_MAXIMUM_LOCK_WAIT_SECONDS",
];

/// Test environment with an isolated working and data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    temp_dir: TempDir,
    /// Working directory the binary runs in
    pub work_dir: PathBuf,
    /// Path to the slugtree data directory (not created until `init`)
    pub data_dir: PathBuf,
}

/// Node ids of the gallery created by [`TestEnv::gallery`].
#[allow(dead_code)]
pub struct GalleryIds {
    pub jane: i64,
    pub nature: i64,
    pub mountains: i64,
    pub sunrise: i64,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new, uninitialized test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let work_dir = temp_dir.path().join("site");
        std::fs::create_dir_all(&work_dir).expect("Failed to create work dir");
        let data_dir = temp_dir.path().join("slugtree-data");

        Self {
            temp_dir,
            work_dir,
            data_dir,
        }
    }

    /// A command with no flags, run in the working directory.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("slugtree").expect("Failed to find slugtree binary");
        cmd.current_dir(&self.work_dir);
        for var in HOST_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// A command with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Write `content` to `name` in the working directory.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write `content` to `name` outside the working directory.
    pub fn write_outside(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Path of the database file.
    pub fn database(&self) -> PathBuf {
        self.data_dir.join("slugtree.db")
    }

    /// Run `slugtree init`.
    pub fn init(&self) {
        self.command().arg("init").assert().success();
    }

    /// Write the gallery project config and initialize the database.
    pub fn with_gallery_config(&self) -> &Self {
        self.write_file("slugtree.yaml", GALLERY_YAML);
        self.init();
        self
    }

    /// Run `slugtree add` and return the new node's id.
    pub fn add(&self, args: &[&str]) -> i64 {
        let output = self
            .command()
            .arg("add")
            .args(args)
            .output()
            .expect("Failed to run add command");

        assert!(
            output.status.success(),
            "Add failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8(output.stdout).expect("Invalid UTF-8 in output");
        parse_id(&stdout)
    }

    /// Store jane / nature / mountains / sunrise.
    pub fn gallery(&self) -> GalleryIds {
        self.with_gallery_config();
        let jane = self.add(&["photographer", "jane"]);
        let nature = self.add(&["category", "nature", "--ref", "owner=jane"]);
        let mountains = self.add(&["category", "mountains", "--under", "jane/nature"]);
        let sunrise = self.add(&[
            "photo",
            "sunrise",
            "--ref",
            "category=jane/nature/mountains",
            "--ref",
            "albums=jane/nature",
        ]);

        GalleryIds {
            jane,
            nature,
            mountains,
            sunrise,
        }
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the leading id column of `add` output.
#[allow(dead_code)]
pub fn parse_id(output: &str) -> i64 {
    output
        .split('\t')
        .next()
        .map(str::trim)
        .and_then(|id| id.parse().ok())
        .expect("Output does not start with a node id")
}
