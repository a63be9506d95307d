//! Core types modelling recursive CTE queries.
//!
//! [`WithRecursive`] renders `WITH RECURSIVE name (cols) AS (seed UNION step)
//! body` from three query fragments. [`RecursiveBackend`] marks Diesel
//! backends that support recursive queries.

use std::collections::BTreeSet;

use diesel::{
    backend::Backend,
    query_builder::{AstPass, Query, QueryFragment, QueryId},
    result::{Error, QueryResult},
};

macro_rules! impl_cte_traits {
    ($name:ident<$($gen:ident),*>, $body_ty:ident) => {
        // The rendered SQL depends on runtime names, so the type alone cannot
        // identify a prepared statement.
        impl<DB, $($gen),*> QueryId for $name<DB, $($gen),*>
        where
            DB: Backend,
        {
            type QueryId = ();
            const HAS_STATIC_QUERY_ID: bool = false;
        }

        impl<DB, $($gen),*> Query for $name<DB, $($gen),*>
        where
            DB: Backend,
            $body_ty: Query,
        {
            type SqlType = <$body_ty as Query>::SqlType;
        }

        impl<DB, $($gen),*, Conn> diesel::query_dsl::RunQueryDsl<Conn>
            for $name<DB, $($gen),*>
        where
            DB: Backend,
            Conn: diesel::connection::Connection<Backend = DB>,
            Self: QueryFragment<DB> + QueryId + Query,
        {}
    };
}

/// Push a parenthesised, comma-separated identifier list.
pub(crate) fn push_identifiers<DB>(out: &mut AstPass<'_, '_, DB>, ids: &[&str]) -> QueryResult<()>
where
    DB: Backend,
{
    if ids.is_empty() {
        return Ok(());
    }
    ensure_unique_columns(ids)?;
    out.push_sql(" (");
    push_identifier_list(out, ids)?;
    out.push_sql(")");
    Ok(())
}

/// Push `a, b, c` with each name quoted for the backend.
pub(crate) fn push_identifier_list<DB>(
    out: &mut AstPass<'_, '_, DB>,
    ids: &[&str],
) -> QueryResult<()>
where
    DB: Backend,
{
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push_sql(", ");
        }
        out.push_identifier(id)?;
    }
    Ok(())
}

fn ensure_unique_columns(names: &[&str]) -> QueryResult<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(Error::QueryBuilderError(
                format!("duplicate column name '{name}' in CTE").into(),
            ));
        }
    }
    Ok(())
}

/// Marker trait for backends that support `WITH RECURSIVE`.
pub trait RecursiveBackend: Backend {}

#[cfg(feature = "sqlite")]
impl RecursiveBackend for diesel::sqlite::Sqlite {}

#[cfg(feature = "postgres")]
impl RecursiveBackend for diesel::pg::Pg {}

/// How the recursive step is combined with the rows found so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Union {
    /// `UNION`: rows already produced are discarded, so a cyclic relation
    /// still reaches a fixpoint.
    Distinct,
    /// `UNION ALL`: every row is kept; the step must bound itself.
    All,
}

impl Union {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Distinct => " UNION ",
            Self::All => " UNION ALL ",
        }
    }
}

/// Representation of a recursive CTE query.
#[derive(Debug, Clone)]
pub struct WithRecursive<DB: Backend, Seed, Step, Body> {
    pub(crate) cte_name: &'static str,
    pub(crate) columns: Vec<&'static str>,
    pub(crate) union: Union,
    pub(crate) seed: Seed,
    pub(crate) step: Step,
    pub(crate) body: Body,
    pub(crate) _marker: std::marker::PhantomData<DB>,
}

impl<DB, Seed, Step, Body> WithRecursive<DB, Seed, Step, Body>
where
    DB: Backend,
{
    /// Name the CTE is bound to.
    #[must_use]
    pub const fn cte_name(&self) -> &'static str {
        self.cte_name
    }

    /// Column list of the CTE.
    #[must_use]
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }
}

impl<DB, Seed, Step, Body> QueryFragment<DB> for WithRecursive<DB, Seed, Step, Body>
where
    DB: Backend,
    Seed: QueryFragment<DB>,
    Step: QueryFragment<DB>,
    Body: QueryFragment<DB>,
{
    fn walk_ast<'b>(&'b self, mut out: AstPass<'_, 'b, DB>) -> QueryResult<()> {
        out.push_sql("WITH RECURSIVE ");
        out.push_identifier(self.cte_name)?;
        push_identifiers(&mut out, &self.columns)?;
        out.push_sql(" AS (");
        self.seed.walk_ast(out.reborrow())?;
        out.push_sql(self.union.keyword());
        self.step.walk_ast(out.reborrow())?;
        out.push_sql(") ");
        self.body.walk_ast(out.reborrow())
    }
}

impl_cte_traits!(WithRecursive<Seed, Step, Body>, Body);
