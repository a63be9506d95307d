//! [`NodeStore`] over the `staff` table.
//!
//! Children of a whole frontier are fetched with one
//! `supervisor_id IN (...)` query, so a traversal issues one statement per
//! level. Diesel errors are handed back to the engine untouched.

use diesel::prelude::*;
use tracing::instrument;

use crate::{
    node::{Node, NodeId},
    schema::staff,
    store::NodeStore,
};

/// The `staff` table seen through a borrowed connection.
#[derive(Debug)]
pub struct StaffTable<'c, C> {
    conn: &'c mut C,
}

impl<'c, C> StaffTable<'c, C> {
    /// Wrap `conn`.
    #[must_use]
    pub const fn new(conn: &'c mut C) -> Self {
        Self { conn }
    }

    /// Release the connection.
    #[must_use]
    pub const fn into_inner(self) -> &'c mut C {
        self.conn
    }

    const fn conn(&mut self) -> &mut C {
        self.conn
    }
}

macro_rules! impl_staff_table {
    ($conn:ty) => {
        impl StaffTable<'_, $conn> {
            /// Insert `nodes` one row at a time, in order.
            ///
            /// # Errors
            /// Returns Diesel's error if an insert fails, e.g. on a duplicate id.
            #[instrument(level = "debug", skip_all, fields(count = nodes.len()))]
            pub fn insert_all(&mut self, nodes: &[Node]) -> QueryResult<()> {
                for node in nodes {
                    diesel::insert_into(staff::table)
                        .values(node)
                        .execute(self.conn())?;
                }
                Ok(())
            }

            /// Point `node_id` at `supervisor`, possibly closing a cycle.
            ///
            /// Returns whether a row was updated.
            ///
            /// # Errors
            /// Returns Diesel's error if the update fails.
            #[instrument(level = "debug", skip(self))]
            pub fn reparent(
                &mut self,
                node_id: NodeId,
                supervisor: Option<NodeId>,
            ) -> QueryResult<bool> {
                let updated = diesel::update(staff::table.find(node_id))
                    .set(staff::supervisor_id.eq(supervisor))
                    .execute(self.conn())?;
                Ok(updated > 0)
            }

            /// Every row, ordered by id.
            ///
            /// # Errors
            /// Returns Diesel's error if the query fails.
            pub fn all(&mut self) -> QueryResult<Vec<Node>> {
                staff::table
                    .select((staff::id, staff::name, staff::supervisor_id))
                    .order(staff::id)
                    .load(self.conn())
            }
        }

        impl NodeStore for StaffTable<'_, $conn> {
            type Error = diesel::result::Error;

            fn children_of(&mut self, parent_id: NodeId) -> QueryResult<Vec<Node>> {
                self.children_of_many(&[parent_id])
            }

            fn children_of_many(&mut self, parent_ids: &[NodeId]) -> QueryResult<Vec<Node>> {
                if parent_ids.is_empty() {
                    return Ok(Vec::new());
                }
                staff::table
                    .filter(staff::supervisor_id.eq_any(parent_ids.to_vec()))
                    .select((staff::id, staff::name, staff::supervisor_id))
                    .order(staff::id)
                    .load(self.conn())
            }

            fn get(&mut self, node_id: NodeId) -> QueryResult<Option<Node>> {
                staff::table
                    .find(node_id)
                    .select((staff::id, staff::name, staff::supervisor_id))
                    .first(self.conn())
                    .optional()
            }
        }
    };
}

#[cfg(feature = "sqlite")]
impl_staff_table!(diesel::sqlite::SqliteConnection);

#[cfg(feature = "postgres")]
impl_staff_table!(diesel::pg::PgConnection);
