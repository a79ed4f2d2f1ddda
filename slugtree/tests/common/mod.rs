//! Common test utilities for integration tests.
//!
//! The gallery fixture is a three-level chain: flat photographers, a
//! category tree owned by a photographer, and flat photos filed under a
//! category. Photos also carry a many-valued `albums` reference, so their
//! level needs an explicit parent accessor.

use std::path::Path;

use slugtree::config::{Config, LevelConfig, ReferenceConfig};
use slugtree::{
    ChainBuilder, LevelChain, LevelSpec, MemoryProvider, Node, NodeSchema, Reference,
    RelationEnds, Result,
};

/// Handler bound to every gallery level.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Photographer,
    Category,
    Photo,
}

/// A populated in-memory gallery.
#[allow(dead_code)]
pub struct Gallery {
    pub chain: LevelChain<Page>,
    pub jane: Node,
    pub john: Node,
    pub nature: Node,
    pub mountains: Node,
    pub oceans: Node,
    pub johns_nature: Node,
    pub mountain_photo: Node,
    pub wave: Node,
    pub sunset: Node,
}

impl Gallery {
    /// Every node of the gallery.
    #[allow(dead_code)]
    pub fn nodes(&self) -> Vec<&Node> {
        vec![
            &self.jane,
            &self.john,
            &self.nature,
            &self.mountains,
            &self.oceans,
            &self.johns_nature,
            &self.mountain_photo,
            &self.wave,
            &self.sunset,
        ]
    }
}

#[allow(dead_code)]
pub fn photographer_schema() -> NodeSchema {
    NodeSchema::new("photographer")
}

#[allow(dead_code)]
pub fn category_schema() -> NodeSchema {
    NodeSchema::new("category").with_reference(Reference::one("owner", "photographer"))
}

#[allow(dead_code)]
pub fn photo_schema() -> NodeSchema {
    NodeSchema::new("photo")
        .with_reference(Reference::one("category", "category"))
        .with_reference(Reference::many("albums", "category"))
}

/// Parent accessor for photos: the primary category.
#[allow(dead_code)]
pub fn primary_category(photo: &Node, ends: RelationEnds<'_>) -> Result<Option<Node>> {
    match ends.child.references(photo, "category")?.first() {
        Some(id) => ends.parent.get(*id),
        None => Ok(None),
    }
}

/// Builds the populated gallery.
///
/// ```text
/// jane/nature/mountains/mountain-photo   (also in the oceans album)
/// jane/nature/oceans/wave
/// john/nature/sunset
/// ```
#[allow(dead_code)]
pub fn gallery() -> Gallery {
    let mut people = MemoryProvider::flat(photographer_schema());
    let jane = people.add_root("jane", &[]).unwrap();
    let john = people.add_root("john", &[]).unwrap();

    let mut categories = MemoryProvider::tree(category_schema());
    let nature = categories
        .add_root("nature", &[("owner", jane.id())])
        .unwrap();
    let mountains = categories.add_child(&nature, "mountains", &[]).unwrap();
    let oceans = categories.add_child(&nature, "oceans", &[]).unwrap();
    let johns_nature = categories
        .add_root("nature", &[("owner", john.id())])
        .unwrap();

    let mut photos = MemoryProvider::flat(photo_schema());
    let mountain_photo = photos
        .add_root(
            "mountain-photo",
            &[("category", mountains.id()), ("albums", oceans.id())],
        )
        .unwrap();
    let wave = photos
        .add_root("wave", &[("category", oceans.id())])
        .unwrap();
    let sunset = photos
        .add_root("sunset", &[("category", johns_nature.id())])
        .unwrap();

    let chain = ChainBuilder::new()
        .level(LevelSpec::flat(people, Page::Photographer))
        .level(LevelSpec::tree(categories, Page::Category))
        .level(LevelSpec::flat(photos, Page::Photo).with_parent_accessor(primary_category))
        .build()
        .unwrap();

    Gallery {
        chain,
        jane,
        john,
        nature,
        mountains,
        oceans,
        johns_nature,
        mountain_photo,
        wave,
        sunset,
    }
}

/// The gallery levels as configuration, photos linked by their
/// `category` field.
#[allow(dead_code)]
pub fn gallery_config() -> Config {
    Config {
        levels: Some(vec![
            LevelConfig::new("photographer", "photographer_page"),
            LevelConfig::new("category", "category_page")
                .hierarchical()
                .with_reference(ReferenceConfig::one("owner", "photographer")),
            LevelConfig::new("photo", "photo_page")
                .with_reference(ReferenceConfig::one("category", "category"))
                .with_reference(ReferenceConfig::many("albums", "category"))
                .with_parent("category"),
        ]),
        ..Default::default()
    }
}

/// The gallery configuration as YAML.
#[allow(dead_code)]
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

/// Write `content` to `dir/filename`.
#[allow(dead_code)]
pub fn write_config(dir: &Path, filename: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(filename);
    std::fs::write(&path, content).unwrap();
    path
}
