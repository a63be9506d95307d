//! Helper types for constructing recursive CTE queries.
//!
//! [`with_recursive`] builds a [`WithRecursive`] query from a name, column list,
//! union mode and the [`RecursiveParts`] struct bundling the seed, step and body
//! fragments. The subtree queries in [`crate::subtree`] are built through it.

use diesel::query_builder::QueryFragment;

use crate::cte::{RecursiveBackend, Union, WithRecursive};

/// Query fragments used by a recursive CTE.
#[derive(Debug, Clone)]
pub struct RecursiveParts<Seed, Step, Body> {
    /// Seed query producing the first row(s) of the CTE.
    pub seed: Seed,
    /// Step query referencing the previous iteration's result.
    pub step: Step,
    /// Query consuming the CTE.
    pub body: Body,
}

impl<Seed, Step, Body> RecursiveParts<Seed, Step, Body> {
    /// Bundle the seed, step and body queries together.
    #[must_use]
    pub const fn new(seed: Seed, step: Step, body: Body) -> Self {
        Self { seed, step, body }
    }
}

/// Build a recursive CTE query.
#[must_use]
pub fn with_recursive<DB, Seed, Step, Body>(
    cte_name: &'static str,
    columns: &[&'static str],
    union: Union,
    parts: RecursiveParts<Seed, Step, Body>,
) -> WithRecursive<DB, Seed, Step, Body>
where
    DB: RecursiveBackend,
    Seed: QueryFragment<DB>,
    Step: QueryFragment<DB>,
    Body: QueryFragment<DB>,
{
    WithRecursive {
        cte_name,
        columns: columns.to_vec(),
        union,
        seed: parts.seed,
        step: parts.step,
        body: parts.body,
        _marker: std::marker::PhantomData,
    }
}
