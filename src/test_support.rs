//! Internal helpers dedicated to unit and integration tests.

use std::convert::Infallible;

use crate::{
    node::{Node, NodeId},
    store::SnapshotStore,
};

pub(crate) const ALICE: NodeId = 1;
pub(crate) const BOB: NodeId = 2;
pub(crate) const CLAIRE: NodeId = 3;
pub(crate) const DAVID: NodeId = 4;
pub(crate) const ERIC: NodeId = 5;
pub(crate) const FIONA: NodeId = 6;
pub(crate) const GABE: NodeId = 7;

/// `alice -> {bob, claire}`, `bob -> {david, eric}`, `claire -> {fiona, gabe}`.
pub(crate) fn org_chart_nodes() -> Vec<Node> {
    vec![
        Node::root(ALICE, "alice"),
        Node::child(BOB, "bob", ALICE),
        Node::child(CLAIRE, "claire", ALICE),
        Node::child(DAVID, "david", BOB),
        Node::child(ERIC, "eric", BOB),
        Node::child(FIONA, "fiona", CLAIRE),
        Node::child(GABE, "gabe", CLAIRE),
    ]
}

/// [`org_chart_nodes`] loaded into a snapshot.
pub(crate) fn org_chart() -> SnapshotStore {
    SnapshotStore::try_from_nodes(org_chart_nodes())
        .unwrap_or_else(|err| panic!("org chart fixture: {err}"))
}

/// [`org_chart`] with alice re-parented under gabe.
pub(crate) fn circular_org_chart() -> SnapshotStore {
    let mut store = org_chart();
    store
        .reparent(ALICE, Some(GABE))
        .unwrap_or_else(|err| panic!("circular fixture: {err}"));
    store
}

/// Unwrap a result whose error type cannot be constructed.
pub(crate) fn settle<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Labels of `nodes`, in order.
pub(crate) fn labels(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|node| node.label.as_str()).collect()
}

/// Normalise Diesel's `debug_query` output for string comparisons.
///
/// Diesel's `SQLite` backend emits identifiers wrapped in backticks and appends
/// ` -- binds: [...]` to the rendered SQL. This helper trims trailing
/// whitespace, strips the bind suffix, and replaces the SQLite-specific
/// backticks with ANSI double quotes so tests can perform straightforward
/// assertions regardless of backend quirks.
#[must_use]
pub(crate) fn normalise_debug_sql(sql: &str) -> String {
    let trimmed = sql.trim();
    let without_binds = trimmed
        .split_once(" -- binds: ")
        .map_or(trimmed, |(statement, _)| statement)
        .trim_end();
    without_binds.replace('`', "\"")
}

/// The bind list Diesel appends to `debug_query` output, e.g. `[1, 1]`.
#[must_use]
pub(crate) fn debug_binds(sql: &str) -> &str {
    sql.trim()
        .split_once(" -- binds: ")
        .map_or("", |(_, binds)| binds)
}
