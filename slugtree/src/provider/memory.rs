//! In-memory node provider.

use crate::error::{Error, Result};
use crate::node::{validate_slug, Cardinality, Node, NodeId, NodeSchema};
use crate::provider::{in_scope, NodeProvider};

#[derive(Debug, Clone)]
struct StoredNode {
    node: Node,
    tree_parent: Option<NodeId>,
    references: Vec<(String, NodeId)>,
}

/// A [`NodeProvider`] holding its nodes in memory.
///
/// Ids are assigned sequentially from 1 in insertion order. Insertion does
/// not check that reference targets exist in the parent collection, and
/// [`MemoryProvider::relink`] does not prevent tree cycles; both are detected
/// later by the resolver and builder.
///
/// # Examples
///
/// ```
/// use slugtree::{MemoryProvider, NodeProvider, NodeSchema};
///
/// let mut categories = MemoryProvider::tree(NodeSchema::new("category"));
/// let nature = categories.add_root("nature", &[]).unwrap();
/// let mountains = categories.add_child(&nature, "mountains", &[]).unwrap();
///
/// assert_eq!(categories.children_of(&nature).unwrap(), vec![mountains.clone()]);
/// assert_eq!(categories.tree_parent(&mountains).unwrap(), Some(nature));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    schema: NodeSchema,
    hierarchical: bool,
    nodes: Vec<StoredNode>,
}

impl MemoryProvider {
    /// Create an empty flat collection.
    #[must_use]
    pub fn flat(schema: NodeSchema) -> Self {
        Self {
            schema,
            hierarchical: false,
            nodes: Vec::new(),
        }
    }

    /// Create an empty tree-shaped collection.
    #[must_use]
    pub fn tree(schema: NodeSchema) -> Self {
        Self {
            schema,
            hierarchical: true,
            nodes: Vec::new(),
        }
    }

    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All stored nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|stored| &stored.node)
    }

    /// Add a node without a tree parent.
    ///
    /// # Errors
    ///
    /// See [`MemoryProvider::add`].
    pub fn add_root(&mut self, slug: &str, references: &[(&str, NodeId)]) -> Result<Node> {
        self.add(slug, None, references)
    }

    /// Add a node below `parent` in the tree.
    ///
    /// # Errors
    ///
    /// See [`MemoryProvider::add`].
    pub fn add_child(
        &mut self,
        parent: &Node,
        slug: &str,
        references: &[(&str, NodeId)],
    ) -> Result<Node> {
        self.add(slug, Some(parent.id()), references)
    }

    /// Add a node.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the slug is invalid
    /// - a tree parent is given for a flat collection, or does not exist
    /// - a reference field is not declared in the schema
    /// - a single-valued reference is given more than one target
    pub fn add(
        &mut self,
        slug: &str,
        tree_parent: Option<NodeId>,
        references: &[(&str, NodeId)],
    ) -> Result<Node> {
        validate_slug(slug)?;

        if let Some(parent) = tree_parent {
            if !self.hierarchical {
                return Err(Error::Validation {
                    field: "tree_parent".into(),
                    message: format!("'{}' is not hierarchical", self.schema.type_name()),
                });
            }
            if self.stored(parent).is_none() {
                return Err(Error::Validation {
                    field: "tree_parent".into(),
                    message: format!("no {} with id {parent}", self.schema.type_name()),
                });
            }
        }

        for (i, (field, _)) in references.iter().enumerate() {
            let declared = self.schema.reference(field).ok_or_else(|| Error::Validation {
                field: (*field).to_string(),
                message: format!(
                    "'{}' declares no reference named '{field}'",
                    self.schema.type_name()
                ),
            })?;

            let repeated = references[..i].iter().any(|(other, _)| other == field);
            if repeated && declared.cardinality() == Cardinality::One {
                return Err(Error::Validation {
                    field: (*field).to_string(),
                    message: "single-valued reference given more than one target".into(),
                });
            }
        }

        let id = NodeId::new(i64::try_from(self.nodes.len() + 1).map_err(|_| Error::Storage {
            details: "node id space exhausted".into(),
        })?);
        let node = Node::new(self.schema.type_name(), id, slug);

        self.nodes.push(StoredNode {
            node: node.clone(),
            tree_parent,
            references: references
                .iter()
                .map(|(field, target)| ((*field).to_string(), *target))
                .collect(),
        });

        Ok(node)
    }

    /// Replace the tree parent of an existing node.
    ///
    /// No cycle check is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    pub fn relink(&mut self, id: NodeId, tree_parent: Option<NodeId>) -> Result<()> {
        let type_name = self.schema.type_name().to_string();
        let stored = self
            .stored_mut(id)
            .ok_or_else(|| Error::Validation {
                field: "id".into(),
                message: format!("no {type_name} with id {id}"),
            })?;
        stored.tree_parent = tree_parent;
        Ok(())
    }

    fn index(id: NodeId) -> Option<usize> {
        usize::try_from(id.value()).ok()?.checked_sub(1)
    }

    fn stored(&self, id: NodeId) -> Option<&StoredNode> {
        self.nodes.get(Self::index(id)?)
    }

    fn stored_mut(&mut self, id: NodeId) -> Option<&mut StoredNode> {
        let index = Self::index(id)?;
        self.nodes.get_mut(index)
    }

    fn owns(&self, node: &Node) -> Option<&StoredNode> {
        self.stored(node.id())
            .filter(|stored| stored.node.kind() == node.kind())
    }
}

impl NodeProvider for MemoryProvider {
    fn schema(&self) -> &NodeSchema {
        &self.schema
    }

    fn is_hierarchical(&self) -> bool {
        self.hierarchical
    }

    fn get(&self, id: NodeId) -> Result<Option<Node>> {
        Ok(self.stored(id).map(|stored| stored.node.clone()))
    }

    fn candidates_by_slug(&self, slug: &str, scope: Option<&Node>) -> Result<Vec<Node>> {
        let mut candidates = Vec::new();
        for stored in &self.nodes {
            if stored.node.slug() != slug {
                continue;
            }
            if self.hierarchical && stored.tree_parent.is_some() {
                continue;
            }
            if in_scope(self, &stored.node, scope)? {
                candidates.push(stored.node.clone());
            }
        }
        Ok(candidates)
    }

    fn children_of(&self, node: &Node) -> Result<Vec<Node>> {
        if !self.hierarchical || self.owns(node).is_none() {
            return Ok(Vec::new());
        }
        Ok(self
            .nodes
            .iter()
            .filter(|stored| stored.tree_parent == Some(node.id()))
            .map(|stored| stored.node.clone())
            .collect())
    }

    fn tree_parent(&self, node: &Node) -> Result<Option<Node>> {
        let Some(parent) = self.owns(node).and_then(|stored| stored.tree_parent) else {
            return Ok(None);
        };
        match self.stored(parent) {
            Some(stored) => Ok(Some(stored.node.clone())),
            None => Err(Error::Integrity {
                node: node.to_string(),
                details: format!("tree parent {parent} does not exist"),
            }),
        }
    }

    fn references(&self, node: &Node, field: &str) -> Result<Vec<NodeId>> {
        Ok(self
            .owns(node)
            .map(|stored| {
                stored
                    .references
                    .iter()
                    .filter(|(name, _)| name == field)
                    .map(|(_, target)| *target)
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Reference;

    fn categories() -> MemoryProvider {
        MemoryProvider::tree(
            NodeSchema::new("category").with_reference(Reference::one("owner", "photographer")),
        )
    }

    fn photographer(id: i64, slug: &str) -> Node {
        Node::new("photographer", NodeId::new(id), slug)
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut provider = categories();
        let a = provider.add_root("a", &[]).unwrap();
        let b = provider.add_root("b", &[]).unwrap();
        assert_eq!(a.id(), NodeId::new(1));
        assert_eq!(b.id(), NodeId::new(2));
        assert_eq!(provider.len(), 2);
        assert_eq!(provider.get(NodeId::new(2)).unwrap(), Some(b));
        assert_eq!(provider.get(NodeId::new(0)).unwrap(), None);
        assert_eq!(provider.get(NodeId::new(9)).unwrap(), None);
    }

    #[test]
    fn test_scoped_lookup_filters_by_reference() {
        let jane = photographer(1, "jane");
        let john = photographer(2, "john");
        let mut provider = categories();
        let janes = provider.add_root("nature", &[("owner", jane.id())]).unwrap();
        let johns = provider.add_root("nature", &[("owner", john.id())]).unwrap();

        assert_eq!(provider.lookup_by_slug("nature", Some(&jane)).unwrap(), Some(janes));
        assert_eq!(provider.lookup_by_slug("nature", Some(&john)).unwrap(), Some(johns));
        assert!(provider.lookup_by_slug("nature", None).unwrap_err().is_integrity());
    }

    #[test]
    fn test_candidates_include_every_referencing_field() {
        let jane = photographer(1, "jane");
        let john = photographer(2, "john");
        let mut provider = MemoryProvider::flat(
            NodeSchema::new("photo")
                .with_reference(Reference::one("owner", "photographer"))
                .with_reference(Reference::many("credits", "photographer")),
        );
        let owned = provider.add_root("sunset", &[("owner", jane.id())]).unwrap();
        let credited = provider
            .add_root("sunset", &[("owner", john.id()), ("credits", jane.id())])
            .unwrap();

        assert_eq!(
            provider.candidates_by_slug("sunset", Some(&jane)).unwrap(),
            vec![owned, credited.clone()]
        );
        assert_eq!(
            provider.candidates_by_slug("sunset", Some(&john)).unwrap(),
            vec![credited]
        );
    }

    #[test]
    fn test_undeclared_scope_kind_does_not_narrow() {
        let album = Node::new("album", NodeId::new(7), "summer");
        let mut provider = categories();
        provider.add_root("nature", &[]).unwrap();
        provider.add_root("nature", &[]).unwrap();

        assert_eq!(provider.candidates_by_slug("nature", Some(&album)).unwrap().len(), 2);
        assert!(provider.lookup_by_slug("nature", Some(&album)).unwrap_err().is_integrity());
    }

    #[test]
    fn test_lookup_ignores_non_roots_in_trees() {
        let jane = photographer(1, "jane");
        let mut provider = categories();
        let nature = provider.add_root("nature", &[("owner", jane.id())]).unwrap();
        provider
            .add_child(&nature, "mountains", &[("owner", jane.id())])
            .unwrap();

        assert_eq!(provider.lookup_by_slug("mountains", Some(&jane)).unwrap(), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut provider = MemoryProvider::flat(NodeSchema::new("photographer"));
        provider.add_root("jane", &[]).unwrap();
        assert!(provider.lookup_by_slug("Jane", None).unwrap().is_none());
        assert!(provider.lookup_by_slug("jane", None).unwrap().is_some());
    }

    #[test]
    fn test_flat_rejects_tree_parent() {
        let mut provider = MemoryProvider::flat(NodeSchema::new("photographer"));
        let jane = provider.add_root("jane", &[]).unwrap();
        assert!(provider.add_child(&jane, "child", &[]).is_err());
        assert!(provider.children_of(&jane).unwrap().is_empty());
    }

    #[test]
    fn test_undeclared_reference_rejected() {
        let mut provider = categories();
        let err = provider
            .add_root("nature", &[("album", NodeId::new(1))])
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_single_valued_reference_given_twice_rejected() {
        let mut provider = categories();
        let result = provider.add_root(
            "nature",
            &[("owner", NodeId::new(1)), ("owner", NodeId::new(2))],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_many_valued_reference_keeps_order() {
        let mut provider = MemoryProvider::flat(
            NodeSchema::new("photo").with_reference(Reference::many("albums", "category")),
        );
        let photo = provider
            .add_root(
                "sunset",
                &[("albums", NodeId::new(5)), ("albums", NodeId::new(2))],
            )
            .unwrap();
        assert_eq!(
            provider.references(&photo, "albums").unwrap(),
            vec![NodeId::new(5), NodeId::new(2)]
        );
    }

    #[test]
    fn test_relink_and_tree_parent() {
        let mut provider = categories();
        let a = provider.add_root("a", &[]).unwrap();
        let b = provider.add_root("b", &[]).unwrap();
        provider.relink(b.id(), Some(a.id())).unwrap();
        assert_eq!(provider.tree_parent(&b).unwrap(), Some(a.clone()));
        assert_eq!(provider.children_of(&a).unwrap(), vec![b]);

        provider.relink(a.id(), Some(NodeId::new(99))).unwrap();
        assert!(provider.tree_parent(&a).unwrap_err().is_integrity());
        assert!(provider.relink(NodeId::new(42), None).is_err());
    }

    #[test]
    fn test_foreign_node_has_no_references() {
        let provider = categories();
        let stranger = Node::new("photo", NodeId::new(1), "x");
        assert!(provider.references(&stranger, "owner").unwrap().is_empty());
        assert_eq!(provider.tree_parent(&stranger).unwrap(), None);
    }
}
