//! Set-at-a-time descendant traversal.
//!
//! Each expansion level fetches the children of the whole frontier in one
//! [`NodeStore::children_of_many`] call, the way one iteration of a recursive
//! CTE joins the table against the previous iteration's rows. A visited set
//! seeded with the root keeps cycles from re-expanding a node, and the depth
//! counter carried by each level bounds limited traversals.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::{
    error::{HierarchyError, TraversalError},
    limits::{DepthLimit, TraversalLimits},
    node::{Node, NodeId},
    store::{NodeStore, SnapshotStore},
};

/// A descendant together with the depth at which it was first reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descendant {
    /// The descendant itself.
    pub node: Node,
    /// Distance from the root; direct children are at depth 1.
    pub depth: u32,
}

/// Computes descendant sets over a [`NodeStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyTraversalEngine {
    limits: TraversalLimits,
}

impl HierarchyTraversalEngine {
    /// An engine without safety limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limits: TraversalLimits::unlimited(),
        }
    }

    /// An engine that aborts traversals exceeding `limits`.
    #[must_use]
    pub const fn with_limits(limits: TraversalLimits) -> Self {
        Self { limits }
    }

    /// The configured safety limits.
    #[must_use]
    pub const fn limits(&self) -> TraversalLimits {
        self.limits
    }

    /// Every node below `root_id`, in breadth-first discovery order.
    ///
    /// The root itself is never part of the result, even when a cycle leads
    /// back to it. A root the store cannot [`NodeStore::get`] yields an empty
    /// result, even if some nodes name it as their parent.
    ///
    /// # Errors
    /// Returns [`TraversalError::Store`] if the store fails, or a limit error
    /// if a configured safety limit is exceeded.
    pub fn descendants<S>(
        &self,
        store: &mut S,
        root_id: NodeId,
    ) -> Result<Vec<Node>, TraversalError<S::Error>>
    where
        S: NodeStore,
    {
        self.descendants_with_depth(store, root_id, DepthLimit::Unbounded)
            .map(into_nodes)
    }

    /// Nodes at most `depth_limit` levels below `root_id`.
    ///
    /// A limit of 1 returns the direct children; zero or a negative limit
    /// returns nothing.
    ///
    /// # Errors
    /// As for [`HierarchyTraversalEngine::descendants`].
    pub fn descendants_with_depth_limit<S>(
        &self,
        store: &mut S,
        root_id: NodeId,
        depth_limit: i32,
    ) -> Result<Vec<Node>, TraversalError<S::Error>>
    where
        S: NodeStore,
    {
        self.descendants_with_depth(store, root_id, DepthLimit::from_signed(depth_limit))
            .map(into_nodes)
    }

    /// Descendants paired with the depth of their first discovery.
    ///
    /// A node reachable at several depths is reported once, at the smallest.
    ///
    /// # Errors
    /// As for [`HierarchyTraversalEngine::descendants`].
    #[instrument(level = "debug", skip(self, store))]
    pub fn descendants_with_depth<S>(
        &self,
        store: &mut S,
        root_id: NodeId,
        limit: DepthLimit,
    ) -> Result<Vec<Descendant>, TraversalError<S::Error>>
    where
        S: NodeStore,
    {
        if !limit.admits(1) {
            return Ok(Vec::new());
        }
        // Rows with a dangling parent must not make up a subtree for an
        // unknown root.
        if store.get(root_id).map_err(TraversalError::Store)?.is_none() {
            debug!("unknown root");
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        let mut visited = HashSet::from([root_id]);
        let mut frontier = vec![root_id];
        let mut depth: u32 = 1;
        let mut levels: usize = 0;

        while !frontier.is_empty() && limit.admits(depth) {
            self.check_limits(levels, frontier.len())?;
            debug!(depth, frontier = frontier.len(), "expanding frontier");

            let children = store
                .children_of_many(&frontier)
                .map_err(TraversalError::Store)?;
            let mut next = Vec::new();
            for node in children {
                if visited.insert(node.id) {
                    next.push(node.id);
                    found.push(Descendant { node, depth });
                }
            }

            frontier = next;
            depth = depth.saturating_add(1);
            levels = levels.saturating_add(1);
        }

        debug!(found = found.len(), levels, "traversal finished");
        Ok(found)
    }

    fn check_limits<E>(&self, levels: usize, frontier: usize) -> Result<(), TraversalError<E>> {
        if let Some(max) = self.limits.max_levels {
            if levels >= max.get() {
                return Err(TraversalError::LevelLimitExceeded { limit: max.get() });
            }
        }
        if let Some(max) = self.limits.max_frontier {
            if frontier > max.get() {
                return Err(TraversalError::FrontierLimitExceeded {
                    size: frontier,
                    limit: max.get(),
                });
            }
        }
        Ok(())
    }
}

fn into_nodes(found: Vec<Descendant>) -> Vec<Node> {
    found.into_iter().map(|descendant| descendant.node).collect()
}

/// Every node below `root_id` among `nodes`.
///
/// # Errors
/// Returns [`HierarchyError::Snapshot`] if two nodes share an id.
pub fn descendants(nodes: &[Node], root_id: NodeId) -> Result<Vec<Node>, HierarchyError> {
    let mut store = SnapshotStore::try_from_nodes(nodes.iter().cloned())?;
    Ok(HierarchyTraversalEngine::new().descendants(&mut store, root_id)?)
}

/// Nodes at most `depth_limit` levels below `root_id` among `nodes`.
///
/// # Errors
/// Returns [`HierarchyError::Snapshot`] if two nodes share an id.
pub fn descendants_with_depth_limit(
    nodes: &[Node],
    root_id: NodeId,
    depth_limit: i32,
) -> Result<Vec<Node>, HierarchyError> {
    let mut store = SnapshotStore::try_from_nodes(nodes.iter().cloned())?;
    Ok(HierarchyTraversalEngine::new().descendants_with_depth_limit(
        &mut store,
        root_id,
        depth_limit,
    )?)
}
