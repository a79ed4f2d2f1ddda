//! Property-based tests for forward and reverse resolution.
//!
//! Normalization properties live next to the normalizer; this module checks
//! that resolving and building agree on randomly shaped chains.

use super::builder::PathBuilder;
use super::relationship::NodeRelationship;
use super::resolver::PathResolver;
use crate::chain::{ChainBuilder, LevelChain, LevelSpec};
use crate::node::{Node, NodeSchema, Reference};
use crate::provider::MemoryProvider;
use proptest::prelude::*;

// For node i, `Some(j)` with j < i makes node j its tree parent.
fn forest_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(any::<Option<prop::sample::Index>>(), 1..40).prop_map(|picks| {
        picks
            .into_iter()
            .enumerate()
            .map(|(i, pick)| match pick {
                Some(index) if i > 0 => Some(index.index(i)),
                _ => None,
            })
            .collect()
    })
}

struct Gallery {
    chain: LevelChain<&'static str>,
    categories: Vec<Node>,
}

fn gallery(shape: &[Option<usize>], owners: usize) -> Gallery {
    let mut people = MemoryProvider::flat(NodeSchema::new("photographer"));
    let owners: Vec<Node> = (0..owners)
        .map(|i| people.add_root(&format!("p{i}"), &[]).unwrap())
        .collect();

    let mut tree = MemoryProvider::tree(
        NodeSchema::new("category").with_reference(Reference::one("owner", "photographer")),
    );
    let mut categories: Vec<Node> = Vec::new();
    for (i, parent) in shape.iter().enumerate() {
        let slug = format!("c{i}");
        let node = match parent {
            Some(p) => tree.add_child(&categories[*p], &slug, &[]).unwrap(),
            None => {
                let owner = &owners[i % owners.len()];
                tree.add_root(&slug, &[("owner", owner.id())]).unwrap()
            }
        };
        categories.push(node);
    }

    let chain = ChainBuilder::new()
        .level(LevelSpec::flat(people, "photographer"))
        .level(LevelSpec::tree(tree, "category"))
        .build()
        .unwrap();

    Gallery { chain, categories }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // resolve(build_path(n)) == n for every node
    #[test]
    fn build_then_resolve_round_trips(shape in forest_strategy(), owners in 1..4usize) {
        let gallery = gallery(&shape, owners);
        let builder = PathBuilder::new();
        let resolver = PathResolver::new();

        for node in &gallery.categories {
            let path = builder.build_path(&gallery.chain, node).unwrap();
            let found = resolver.resolve_strict(&gallery.chain, &path.to_string()).unwrap();
            prop_assert_eq!(&found.node, node);
            prop_assert_eq!(found.consumed, path.len());
        }
    }

    // Path length equals ancestor count and the chain ends with the node
    #[test]
    fn ancestor_chain_shape(shape in forest_strategy()) {
        let gallery = gallery(&shape, 2);
        let builder = PathBuilder::new();

        for node in &gallery.categories {
            let ancestors = builder.ancestors(&gallery.chain, node).unwrap();
            prop_assert_eq!(ancestors.node(), node);
            prop_assert_eq!(ancestors.root().kind(), "photographer");
            prop_assert_eq!(ancestors.to_path().len(), ancestors.len());
        }
    }

    // Resolution does not depend on outer separators
    #[test]
    fn outer_separators_are_ignored(shape in forest_strategy(), leading in any::<bool>(), trailing in any::<bool>()) {
        let gallery = gallery(&shape, 1);
        let resolver = PathResolver::new();
        let node = &gallery.categories[gallery.categories.len() - 1];
        let path = PathBuilder::new().build_path(&gallery.chain, node).unwrap();

        let mut text = path.to_string();
        if leading {
            text.insert(0, '/');
        }
        if trailing {
            text.push('/');
        }
        let found = resolver.resolve_strict(&gallery.chain, &text).unwrap();
        prop_assert_eq!(&found.node, node);
    }

    // A node's tree parent is always its ancestor
    #[test]
    fn tree_parents_are_ancestors(shape in forest_strategy()) {
        let gallery = gallery(&shape, 1);
        let builder = PathBuilder::new();

        for (i, parent) in shape.iter().enumerate() {
            if let Some(p) = parent {
                let child = builder.ancestors(&gallery.chain, &gallery.categories[i]).unwrap();
                let parent = builder.ancestors(&gallery.chain, &gallery.categories[*p]).unwrap();
                prop_assert_eq!(NodeRelationship::between(&parent, &child), NodeRelationship::Ancestor);
            }
        }
    }
}
