//! Recursive CTEs selecting every row below a root in a self-referencing
//! table.
//!
//! Both queries exclude the root from its own result, so a cycle that leads
//! back to the root ends there. [`subtree_query`] relies on `UNION` to stop
//! once no new row appears; [`subtree_query_with_depth_limit`] carries a
//! `depth` column, stops expanding at the limit and collapses repeated rows to
//! their smallest depth. The seed only matches when the root row exists, so
//! rows naming a missing parent never form a subtree of their own.

use diesel::{
    backend::Backend,
    query_builder::{AstPass, Query, QueryFragment},
    result::QueryResult,
    serialize::ToSql,
    sql_types::{Integer, Nullable, Text},
};

use crate::{
    builders::{RecursiveParts, with_recursive},
    cte::{RecursiveBackend, Union, WithRecursive, push_identifier_list},
    node::NodeId,
};

/// Name the recursive CTE is bound to.
pub const SUBTREE_CTE: &str = "subtree";

/// Extra CTE column carrying the distance from the root.
pub const DEPTH_COLUMN: &str = "depth";

const NODE_ALIAS: &str = "n";
const CTE_ALIAS: &str = "t";
const ROOT_ALIAS: &str = "r";

/// SQL type of a row returned by the subtree queries: id, label, parent.
pub type NodeRow = (Integer, Text, Nullable<Integer>);

/// Subtree query for backend `DB`.
pub type SubtreeQuery<DB> = WithRecursive<DB, SubtreeSeed, SubtreeStep, SubtreeBody>;

/// Table and column names of a self-referencing hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchySchema {
    /// Table holding the nodes.
    pub table: &'static str,
    /// Integer primary key.
    pub id: &'static str,
    /// Text label.
    pub label: &'static str,
    /// Nullable integer reference to the parent's `id`.
    pub parent: &'static str,
}

impl HierarchySchema {
    /// `staff (id, name, supervisor_id)`.
    pub const STAFF: Self = Self {
        table: "staff",
        id: "id",
        label: "name",
        parent: "supervisor_id",
    };

    const fn columns(&self) -> [&'static str; 3] {
        [self.id, self.label, self.parent]
    }

    fn push_qualified_columns<DB: Backend>(
        &self,
        out: &mut AstPass<'_, '_, DB>,
        alias: &str,
    ) -> QueryResult<()> {
        for (i, column) in self.columns().iter().enumerate() {
            if i > 0 {
                out.push_sql(", ");
            }
            push_qualified(out, alias, column)?;
        }
        Ok(())
    }
}

impl Default for HierarchySchema {
    fn default() -> Self {
        Self::STAFF
    }
}

fn push_qualified<DB: Backend>(
    out: &mut AstPass<'_, '_, DB>,
    alias: &str,
    column: &str,
) -> QueryResult<()> {
    out.push_identifier(alias)?;
    out.push_sql(".");
    out.push_identifier(column)
}

/// Non-recursive term: the root's direct children.
#[derive(Debug, Clone, Copy)]
pub struct SubtreeSeed {
    schema: HierarchySchema,
    root: NodeId,
    depth_limit: Option<i32>,
}

impl<DB> QueryFragment<DB> for SubtreeSeed
where
    DB: Backend,
    i32: ToSql<Integer, DB>,
{
    fn walk_ast<'b>(&'b self, mut out: AstPass<'_, 'b, DB>) -> QueryResult<()> {
        let schema = &self.schema;
        out.push_sql("SELECT ");
        push_identifier_list(&mut out, &schema.columns())?;
        if self.depth_limit.is_some() {
            out.push_sql(", 1");
        }
        out.push_sql(" FROM ");
        out.push_identifier(schema.table)?;
        out.push_sql(" WHERE ");
        out.push_identifier(schema.parent)?;
        out.push_sql(" = ");
        out.push_bind_param::<Integer, _>(&self.root)?;
        out.push_sql(" AND ");
        out.push_identifier(schema.id)?;
        out.push_sql(" <> ");
        out.push_bind_param::<Integer, _>(&self.root)?;
        // Rows whose parent is dangling must not seed a subtree for an
        // unknown root.
        out.push_sql(" AND EXISTS (SELECT 1 FROM ");
        out.push_identifier(schema.table)?;
        out.push_sql(" AS ");
        out.push_identifier(ROOT_ALIAS)?;
        out.push_sql(" WHERE ");
        push_qualified(&mut out, ROOT_ALIAS, schema.id)?;
        out.push_sql(" = ");
        out.push_bind_param::<Integer, _>(&self.root)?;
        out.push_sql(")");
        if let Some(limit) = &self.depth_limit {
            out.push_sql(" AND ");
            out.push_bind_param::<Integer, _>(limit)?;
            out.push_sql(" >= 1");
        }
        Ok(())
    }
}

/// Recursive term: children of the rows found by the previous iteration.
#[derive(Debug, Clone, Copy)]
pub struct SubtreeStep {
    schema: HierarchySchema,
    root: NodeId,
    depth_limit: Option<i32>,
}

impl<DB> QueryFragment<DB> for SubtreeStep
where
    DB: Backend,
    i32: ToSql<Integer, DB>,
{
    fn walk_ast<'b>(&'b self, mut out: AstPass<'_, 'b, DB>) -> QueryResult<()> {
        let schema = &self.schema;
        out.push_sql("SELECT ");
        schema.push_qualified_columns(&mut out, NODE_ALIAS)?;
        if self.depth_limit.is_some() {
            out.push_sql(", ");
            push_qualified(&mut out, CTE_ALIAS, DEPTH_COLUMN)?;
            out.push_sql(" + 1");
        }
        out.push_sql(" FROM ");
        out.push_identifier(schema.table)?;
        out.push_sql(" AS ");
        out.push_identifier(NODE_ALIAS)?;
        out.push_sql(" INNER JOIN ");
        out.push_identifier(SUBTREE_CTE)?;
        out.push_sql(" AS ");
        out.push_identifier(CTE_ALIAS)?;
        out.push_sql(" ON ");
        push_qualified(&mut out, NODE_ALIAS, schema.parent)?;
        out.push_sql(" = ");
        push_qualified(&mut out, CTE_ALIAS, schema.id)?;
        out.push_sql(" WHERE ");
        if let Some(limit) = &self.depth_limit {
            push_qualified(&mut out, CTE_ALIAS, DEPTH_COLUMN)?;
            out.push_sql(" < ");
            out.push_bind_param::<Integer, _>(limit)?;
            out.push_sql(" AND ");
        }
        push_qualified(&mut out, NODE_ALIAS, schema.id)?;
        out.push_sql(" <> ");
        out.push_bind_param::<Integer, _>(&self.root)
    }
}

/// Final select over the CTE, one row per node.
#[derive(Debug, Clone, Copy)]
pub struct SubtreeBody {
    schema: HierarchySchema,
    depth_limited: bool,
}

impl Query for SubtreeBody {
    type SqlType = NodeRow;
}

impl<DB> QueryFragment<DB> for SubtreeBody
where
    DB: Backend,
{
    fn walk_ast<'b>(&'b self, mut out: AstPass<'_, 'b, DB>) -> QueryResult<()> {
        let columns = self.schema.columns();
        out.push_sql("SELECT ");
        push_identifier_list(&mut out, &columns)?;
        out.push_sql(" FROM ");
        out.push_identifier(SUBTREE_CTE)?;
        if self.depth_limited {
            out.push_sql(" GROUP BY ");
            push_identifier_list(&mut out, &columns)?;
            out.push_sql(" ORDER BY MIN(");
            out.push_identifier(DEPTH_COLUMN)?;
            out.push_sql("), ");
        } else {
            out.push_sql(" ORDER BY ");
        }
        out.push_identifier(self.schema.id)
    }
}

/// Every row below `root`, root excluded.
#[must_use]
pub fn subtree_query<DB>(schema: HierarchySchema, root: NodeId) -> SubtreeQuery<DB>
where
    DB: RecursiveBackend,
    i32: ToSql<Integer, DB>,
{
    with_recursive(
        SUBTREE_CTE,
        &schema.columns(),
        Union::Distinct,
        RecursiveParts::new(
            SubtreeSeed {
                schema,
                root,
                depth_limit: None,
            },
            SubtreeStep {
                schema,
                root,
                depth_limit: None,
            },
            SubtreeBody {
                schema,
                depth_limited: false,
            },
        ),
    )
}

/// Rows at most `depth_limit` levels below `root`, ordered by depth.
///
/// A limit of zero or below selects nothing.
#[must_use]
pub fn subtree_query_with_depth_limit<DB>(
    schema: HierarchySchema,
    root: NodeId,
    depth_limit: i32,
) -> SubtreeQuery<DB>
where
    DB: RecursiveBackend,
    i32: ToSql<Integer, DB>,
{
    let [id, label, parent] = schema.columns();
    with_recursive(
        SUBTREE_CTE,
        &[id, label, parent, DEPTH_COLUMN],
        Union::All,
        RecursiveParts::new(
            SubtreeSeed {
                schema,
                root,
                depth_limit: Some(depth_limit),
            },
            SubtreeStep {
                schema,
                root,
                depth_limit: Some(depth_limit),
            },
            SubtreeBody {
                schema,
                depth_limited: true,
            },
        ),
    )
}
