//! Extension trait exposing the subtree queries on Diesel connections.
//!
//! Both helpers delegate to [`crate::subtree`] whilst inferring the backend
//! from the connection type, so callers never pass the backend explicitly.

use diesel::{serialize::ToSql, sql_types::Integer};

#[cfg(all(feature = "async", feature = "sqlite"))]
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;

use crate::{
    cte::RecursiveBackend,
    node::NodeId,
    subtree::{self, HierarchySchema, SubtreeQuery},
};

/// Extension trait providing `subtree` and `subtree_with_depth_limit` on
/// connection types.
///
/// The returned queries load into `Vec<Node>` with `RunQueryDsl::load`.
pub trait SubtreeQueryExt {
    /// Backend associated with the connection.
    type Backend: RecursiveBackend;

    /// Query every row below `root` in `schema`.
    ///
    /// See [`subtree::subtree_query`].
    #[doc(alias = "subtree::subtree_query")]
    fn subtree(&self, schema: HierarchySchema, root: NodeId) -> SubtreeQuery<Self::Backend>
    where
        i32: ToSql<Integer, Self::Backend>,
    {
        subtree::subtree_query(schema, root)
    }

    /// Query rows at most `depth_limit` levels below `root` in `schema`.
    ///
    /// See [`subtree::subtree_query_with_depth_limit`].
    #[doc(alias = "subtree::subtree_query_with_depth_limit")]
    fn subtree_with_depth_limit(
        &self,
        schema: HierarchySchema,
        root: NodeId,
        depth_limit: i32,
    ) -> SubtreeQuery<Self::Backend>
    where
        i32: ToSql<Integer, Self::Backend>,
    {
        subtree::subtree_query_with_depth_limit(schema, root, depth_limit)
    }
}

/// Implementation of [`SubtreeQueryExt`] for synchronous `PostgreSQL` connections.
#[cfg(feature = "postgres")]
impl SubtreeQueryExt for diesel::pg::PgConnection {
    type Backend = diesel::pg::Pg;
}

/// Implementation of [`SubtreeQueryExt`] for synchronous `SQLite` connections.
#[cfg(feature = "sqlite")]
impl SubtreeQueryExt for diesel::sqlite::SqliteConnection {
    type Backend = diesel::sqlite::Sqlite;
}

/// Implementation of [`SubtreeQueryExt`] for `diesel_async` `PostgreSQL` connections.
#[cfg(all(feature = "async", feature = "postgres"))]
impl SubtreeQueryExt for diesel_async::AsyncPgConnection {
    type Backend = diesel::pg::Pg;
}

/// Implementation of [`SubtreeQueryExt`] for Diesel's async `SQLite` wrapper.
///
/// `diesel_async` exposes `SQLite` via [`SyncConnectionWrapper`], so we forward the
/// helper to that type instead of an `AsyncSqliteConnection` newtype.
#[cfg(all(feature = "async", feature = "sqlite"))]
impl<B> SubtreeQueryExt for SyncConnectionWrapper<diesel::sqlite::SqliteConnection, B> {
    type Backend = diesel::sqlite::Sqlite;
}
