//! The hierarchy's row type.
//!
//! A [`Node`] is a plain value: its parent is a [`NodeId`] resolved through a
//! [`crate::store::NodeStore`], never a pointer to another node.

use std::fmt;

use diesel::{Insertable, Queryable};

use crate::schema::staff;

/// Identity of a node, the `staff.id` primary key.
pub type NodeId = i32;

/// One member of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Insertable)]
#[diesel(table_name = staff)]
pub struct Node {
    /// Unique, immutable identity.
    pub id: NodeId,
    /// Display label.
    #[diesel(column_name = name)]
    pub label: String,
    /// Supervisor of this node, if any.
    #[diesel(column_name = supervisor_id)]
    pub parent_id: Option<NodeId>,
}

impl Node {
    /// Build a node without a parent.
    #[must_use]
    pub fn root(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            parent_id: None,
        }
    }

    /// Build a node reporting to `parent_id`.
    #[must_use]
    pub fn child(id: NodeId, label: impl Into<String>, parent_id: NodeId) -> Self {
        Self {
            id,
            label: label.into(),
            parent_id: Some(parent_id),
        }
    }
}

/// `<Staff id=.. name=.. supervisor=(..)>`. A node only holds its
/// supervisor's id, so the id stands in for the supervisor's own row.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent_id {
            Some(parent) => write!(
                f,
                "<Staff id={} name={} supervisor=({parent})>",
                self.id, self.label
            ),
            None => write!(f, "<Staff id={} name={} supervisor=(none)>", self.id, self.label),
        }
    }
}
