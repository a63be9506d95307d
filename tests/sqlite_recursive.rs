#![cfg(feature = "sqlite")]
//! Behavioural tests running the subtree CTEs on `SQLite` and checking them
//! against the in-memory engine, across sync and async entry points.


use diesel::{Connection, RunQueryDsl, sql_query, sqlite::SqliteConnection};
use rstest::{fixture, rstest};
use staff_tree_cte::{
    HierarchySchema, HierarchyTraversalEngine, Node, NodeId, StaffTable, SubtreeQueryExt,
};
use test_helpers::{ALICE, BOB, CLAIRE, DAVID, GABE, labels, org_chart, sorted_labels};

#[fixture]
fn conn() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").expect("in-memory sqlite");
    sql_query(test_helpers::CREATE_STAFF)
        .execute(&mut conn)
        .expect("create staff table");
    StaffTable::new(&mut conn)
        .insert_all(&org_chart())
        .expect("seed staff");
    conn
}

#[fixture]
fn circular_conn(mut conn: SqliteConnection) -> SqliteConnection {
    StaffTable::new(&mut conn)
        .reparent(ALICE, Some(GABE))
        .expect("close the cycle");
    conn
}

fn load_subtree(conn: &mut SqliteConnection, root: NodeId) -> Vec<Node> {
    conn.subtree(HierarchySchema::STAFF, root)
        .load(conn)
        .expect("load subtree")
}

fn load_limited(conn: &mut SqliteConnection, root: NodeId, limit: i32) -> Vec<Node> {
    conn.subtree_with_depth_limit(HierarchySchema::STAFF, root, limit)
        .load(conn)
        .expect("load subtree")
}

#[rstest]
#[case(ALICE, &["bob", "claire", "david", "eric", "fiona", "gabe"])]
#[case(BOB, &["david", "eric"])]
#[case(DAVID, &[])]
#[case(404, &[])]
fn subtree_of_plain_chart(
    mut conn: SqliteConnection,
    #[case] root: NodeId,
    #[case] expected: &[&str],
) {
    assert_eq!(labels(&load_subtree(&mut conn, root)), expected);
}

#[rstest]
fn subtree_terminates_on_cycle(mut circular_conn: SqliteConnection) {
    let found = load_subtree(&mut circular_conn, ALICE);
    assert_eq!(
        labels(&found),
        ["bob", "claire", "david", "eric", "fiona", "gabe"]
    );
    assert!(found.iter().all(|node| node.id != ALICE));
}

#[rstest]
#[case(ALICE, 1, &["bob", "claire"])]
#[case(BOB, 1, &["david", "eric"])]
#[case(DAVID, 1, &[])]
#[case(ALICE, 0, &[])]
#[case(ALICE, -2, &[])]
fn depth_limited_subtree(
    mut circular_conn: SqliteConnection,
    #[case] root: NodeId,
    #[case] limit: i32,
    #[case] expected: &[&str],
) {
    assert_eq!(labels(&load_limited(&mut circular_conn, root, limit)), expected);
}

#[rstest]
fn depth_limited_cycle_reports_each_node_once(mut circular_conn: SqliteConnection) {
    // From gabe the cycle reaches alice at depth 1 and stops short of gabe.
    let found = load_limited(&mut circular_conn, GABE, 8);
    assert_eq!(
        labels(&found),
        ["alice", "bob", "claire", "david", "eric", "fiona"]
    );
}

#[rstest]
fn unknown_root_ignores_dangling_supervisor(mut conn: SqliteConnection) {
    const MISSING: NodeId = 99;
    sql_query("PRAGMA foreign_keys = OFF")
        .execute(&mut conn)
        .expect("allow dangling supervisor");
    StaffTable::new(&mut conn)
        .insert_all(&[Node::child(8, "orphan", MISSING)])
        .expect("insert orphan");

    assert!(load_subtree(&mut conn, MISSING).is_empty());
    assert!(load_limited(&mut conn, MISSING, 1).is_empty());

    let mut table = StaffTable::new(&mut conn);
    let engine = HierarchyTraversalEngine::new();
    assert!(engine.descendants(&mut table, MISSING).expect("engine").is_empty());
    assert!(
        engine
            .descendants_with_depth_limit(&mut table, MISSING, 1)
            .expect("engine")
            .is_empty()
    );
}

#[rstest]
#[case(ALICE)]
#[case(BOB)]
#[case(CLAIRE)]
#[case(GABE)]
fn sql_and_engine_agree(mut circular_conn: SqliteConnection, #[case] root: NodeId) {
    let from_sql = load_subtree(&mut circular_conn, root);
    let from_engine = HierarchyTraversalEngine::new()
        .descendants(&mut StaffTable::new(&mut circular_conn), root)
        .expect("engine");
    assert_eq!(sorted_labels(&from_sql), sorted_labels(&from_engine));

    for limit in 0..4 {
        let limited_sql = load_limited(&mut circular_conn, root, limit);
        let limited_engine = HierarchyTraversalEngine::new()
            .descendants_with_depth_limit(&mut StaffTable::new(&mut circular_conn), root, limit)
            .expect("engine");
        assert_eq!(sorted_labels(&limited_sql), sorted_labels(&limited_engine));
    }
}

#[cfg(feature = "async")]
mod async_sqlite {
    use super::*;
    use diesel_async::{
        AsyncConnection, RunQueryDsl as AsyncRunQueryDsl,
        sync_connection_wrapper::SyncConnectionWrapper,
    };

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn sqlite_async_subtree() {
        let mut conn = SyncConnectionWrapper::<SqliteConnection>::establish(":memory:")
            .await
            .expect("async sqlite wrapper");
        AsyncRunQueryDsl::execute(sql_query(test_helpers::CREATE_STAFF), &mut conn)
            .await
            .expect("create staff table");
        for insert in test_helpers::org_chart_inserts() {
            AsyncRunQueryDsl::execute(sql_query(insert), &mut conn)
                .await
                .expect("seed staff");
        }

        let query = conn.subtree_with_depth_limit(HierarchySchema::STAFF, ALICE, 1);
        let rows: Vec<Node> = AsyncRunQueryDsl::load(query, &mut conn)
            .await
            .expect("load rows");
        assert_eq!(labels(&rows), ["bob", "claire"]);
    }
}
