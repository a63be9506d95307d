//! Cycle-safe traversal of self-referencing hierarchies.
//!
//! A hierarchy is a set of [`Node`]s whose parent is another node's id, such
//! as a `staff` table with a nullable `supervisor_id`. The crate answers "who
//! sits below this node?" in two ways that agree with each other:
//!
//! * [`HierarchyTraversalEngine`] expands a frontier level by level over any
//!   [`NodeStore`], either an in-memory [`SnapshotStore`] or the
//!   [`StaffTable`] read through Diesel.
//! * [`SubtreeQueryExt`] builds the same traversal as a `WITH RECURSIVE`
//!   query that the database evaluates itself.
//!
//! Both exclude the starting node from its result and terminate when parent
//! references form a cycle.

pub mod builders;
pub mod connection_ext;
pub mod cte;
pub mod engine;
pub mod error;
pub mod limits;
pub mod node;
pub mod schema;
pub mod staff_table;
pub mod store;
pub mod subtree;
#[cfg(test)]
pub(crate) mod test_support;

/// Bundles the seed, step, and body fragments handed to `with_recursive`.
pub use builders::RecursiveParts;
/// Builds a `WITH RECURSIVE` block from arbitrary fragments.
pub use builders::with_recursive;
/// Extension trait exposing the subtree queries on Diesel connections.
pub use connection_ext::SubtreeQueryExt;
/// Marker trait implemented by Diesel backends that can run recursive CTEs.
pub use cte::RecursiveBackend;
/// How the recursive step joins the rows found so far.
pub use cte::Union;
/// Traversal entry points and their result type.
pub use engine::{Descendant, HierarchyTraversalEngine, descendants, descendants_with_depth_limit};
/// Error types.
pub use error::{ConfigError, HierarchyError, SnapshotError, TraversalError};
/// Per-call depth bound and per-engine safety limits.
pub use limits::{DepthLimit, TraversalLimits};
/// The hierarchy's row type.
pub use node::{Node, NodeId};
/// Diesel-backed node store.
pub use staff_table::StaffTable;
/// Node store trait and its in-memory implementation.
pub use store::{NodeStore, SnapshotStore};
/// Table description and free-standing subtree query builders.
pub use subtree::{HierarchySchema, subtree_query, subtree_query_with_depth_limit};
