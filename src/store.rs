//! Node stores consulted by the traversal engine.
//!
//! [`NodeStore`] is the engine's only collaborator. [`SnapshotStore`] keeps a
//! hierarchy in memory; [`crate::staff_table::StaffTable`] reads it from the
//! `staff` table.

use std::{
    collections::{HashMap, hash_map::Entry},
    convert::Infallible,
};

use crate::{
    error::SnapshotError,
    node::{Node, NodeId},
};

/// Source of parent/child relations for a traversal.
///
/// Methods take `&mut self` so that a store stays borrowed, and therefore
/// unchanged, for the whole of one traversal call.
pub trait NodeStore {
    /// Failure raised by the backing storage.
    type Error;

    /// All nodes whose parent is `parent_id`; empty if there are none.
    ///
    /// # Errors
    /// Returns the store's error if the lookup cannot be performed.
    fn children_of(&mut self, parent_id: NodeId) -> Result<Vec<Node>, Self::Error>;

    /// Children of every id in `parent_ids`, fetched as one batch.
    ///
    /// The default issues one [`NodeStore::children_of`] call per parent;
    /// stores that can answer a set at once should override it.
    ///
    /// # Errors
    /// Returns the store's error if any lookup fails.
    fn children_of_many(&mut self, parent_ids: &[NodeId]) -> Result<Vec<Node>, Self::Error> {
        let mut children = Vec::new();
        for parent_id in parent_ids {
            children.extend(self.children_of(*parent_id)?);
        }
        Ok(children)
    }

    /// Look a node up by id.
    ///
    /// # Errors
    /// Returns the store's error if the lookup cannot be performed.
    fn get(&mut self, node_id: NodeId) -> Result<Option<Node>, Self::Error>;
}

/// In-memory hierarchy indexed by parent id.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    nodes: HashMap<NodeId, Node>,
    // Child ids per parent, in insertion order.
    children: HashMap<NodeId, Vec<NodeId>>,
}

impl SnapshotStore {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `nodes`.
    ///
    /// Parent references to ids absent from `nodes` are kept as they are.
    ///
    /// # Errors
    /// Returns [`SnapshotError::DuplicateNode`] if two nodes share an id.
    pub fn try_from_nodes<I>(nodes: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut store = Self::new();
        for node in nodes {
            store.insert(node)?;
        }
        Ok(store)
    }

    /// Add a node to the snapshot.
    ///
    /// # Errors
    /// Returns [`SnapshotError::DuplicateNode`] if the id is already taken.
    pub fn insert(&mut self, node: Node) -> Result<(), SnapshotError> {
        match self.nodes.entry(node.id) {
            Entry::Occupied(_) => Err(SnapshotError::DuplicateNode(node.id)),
            Entry::Vacant(slot) => {
                if let Some(parent_id) = node.parent_id {
                    self.children.entry(parent_id).or_default().push(node.id);
                }
                slot.insert(node);
                Ok(())
            }
        }
    }

    /// Move `node_id` under `new_parent`, or make it a root with `None`.
    ///
    /// The new parent may be one of the node's own descendants, which closes
    /// a cycle.
    ///
    /// # Errors
    /// Returns [`SnapshotError::UnknownNode`] if either id is not present.
    pub fn reparent(
        &mut self,
        node_id: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<(), SnapshotError> {
        if let Some(parent_id) = new_parent {
            if !self.nodes.contains_key(&parent_id) {
                return Err(SnapshotError::UnknownNode(parent_id));
            }
        }
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(SnapshotError::UnknownNode(node_id))?;
        let old_parent = std::mem::replace(&mut node.parent_id, new_parent);

        if let Some(old) = old_parent {
            if let Some(siblings) = self.children.get_mut(&old) {
                siblings.retain(|id| *id != node_id);
            }
        }
        if let Some(parent_id) = new_parent {
            self.children.entry(parent_id).or_default().push(node_id);
        }
        Ok(())
    }

    /// Number of nodes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot holds no node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn child_nodes(&self, parent_id: NodeId) -> impl Iterator<Item = &Node> {
        self.children
            .get(&parent_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.nodes.get(id))
    }
}

impl NodeStore for SnapshotStore {
    type Error = Infallible;

    fn children_of(&mut self, parent_id: NodeId) -> Result<Vec<Node>, Self::Error> {
        Ok(self.child_nodes(parent_id).cloned().collect())
    }

    fn children_of_many(&mut self, parent_ids: &[NodeId]) -> Result<Vec<Node>, Self::Error> {
        let snapshot: &Self = self;
        Ok(parent_ids
            .iter()
            .flat_map(move |parent_id| snapshot.child_nodes(*parent_id))
            .cloned()
            .collect())
    }

    fn get(&mut self, node_id: NodeId) -> Result<Option<Node>, Self::Error> {
        Ok(self.nodes.get(&node_id).cloned())
    }
}
