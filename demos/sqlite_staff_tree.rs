#![cfg(feature = "sqlite")]
//! Builds the sample staff chart in `SQLite`, then lists subordinates through
//! the recursive CTE and through the traversal engine, first for the plain
//! chart and then after alice is re-parented under gabe.
//!
//! Set `STAFF_TREE_DATABASE_URL` to use a database file instead of memory and
//! `RUST_LOG=debug` to see each expansion level.

use diesel::{Connection, RunQueryDsl, sql_query, sqlite::SqliteConnection};
use staff_tree_cte::{
    HierarchySchema, HierarchyTraversalEngine, Node, NodeId, StaffTable, SubtreeQueryExt,
    TraversalLimits,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DATABASE_URL_VAR: &str = "STAFF_TREE_DATABASE_URL";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let url = std::env::var(DATABASE_URL_VAR).unwrap_or_else(|_| ":memory:".to_owned());
    let mut conn = SqliteConnection::establish(&url)?;
    let engine = HierarchyTraversalEngine::with_limits(TraversalLimits::from_env()?);

    seed(&mut conn)?;
    for staff in StaffTable::new(&mut conn).all()? {
        info!(%staff, "row");
    }
    for root in [1, 2, 4] {
        let rows: Vec<Node> = conn.subtree(HierarchySchema::STAFF, root).load(&mut conn)?;
        report("cte", root, None, &rows);
        let found = engine.descendants(&mut StaffTable::new(&mut conn), root)?;
        report("engine", root, None, &found);
    }

    StaffTable::new(&mut conn).reparent(1, Some(7))?;
    info!("alice now reports to gabe");
    for root in [1, 2, 4] {
        let rows: Vec<Node> = conn
            .subtree_with_depth_limit(HierarchySchema::STAFF, root, 1)
            .load(&mut conn)?;
        report("cte", root, Some(1), &rows);
        let found =
            engine.descendants_with_depth_limit(&mut StaffTable::new(&mut conn), root, 1)?;
        report("engine", root, Some(1), &found);
    }
    Ok(())
}

fn seed(conn: &mut SqliteConnection) -> Result<(), Box<dyn std::error::Error>> {
    sql_query("DROP TABLE IF EXISTS staff").execute(conn)?;
    sql_query(
        "CREATE TABLE staff (\
            id INTEGER PRIMARY KEY, \
            name VARCHAR(64) NOT NULL, \
            supervisor_id INTEGER REFERENCES staff (id))",
    )
    .execute(conn)?;
    StaffTable::new(conn).insert_all(&[
        Node::root(1, "alice"),
        Node::child(2, "bob", 1),
        Node::child(3, "claire", 1),
        Node::child(4, "david", 2),
        Node::child(5, "eric", 2),
        Node::child(6, "fiona", 3),
        Node::child(7, "gabe", 3),
    ])?;
    Ok(())
}

fn report(source: &str, root: NodeId, depth_limit: Option<i32>, nodes: &[Node]) {
    let names: Vec<&str> = nodes.iter().map(|node| node.label.as_str()).collect();
    info!(source, root, ?depth_limit, subordinates = ?names, "subordinates");
}
