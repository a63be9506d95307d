#![cfg(feature = "postgres")]
//! Behavioural tests for the subtree CTEs on `PostgreSQL`.
//!
//! These boot an embedded cluster, so they only run with `--ignored`.


use diesel::RunQueryDsl as DieselRunQueryDsl;
use diesel::sql_query;
#[cfg(feature = "async")]
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl as AsyncRunQueryDsl};
use pg_embedded_setup_unpriv::{BootstrapResult, TestCluster};
use rstest::{fixture, rstest};
use staff_tree_cte::{HierarchySchema, HierarchyTraversalEngine, Node, StaffTable, SubtreeQueryExt};
use test_helpers::{ALICE, BOB, GABE, labels, org_chart, sorted_labels};

type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync + 'static>>;

fn configure_pg_embed_env() -> test_helpers::EnvVarGuard {
    use std::path::PathBuf;

    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/pg-embed");
    let runtime = base.join("runtime");
    let data = base.join("data");
    test_helpers::EnvVarGuard::set_pg_paths(&runtime, &data)
}

type GuardedCluster = BootstrapResult<(test_helpers::EnvVarGuard, TestCluster)>;

#[fixture]
fn embedded_cluster() -> GuardedCluster {
    let guard = configure_pg_embed_env();
    TestCluster::new().map(|cluster| (guard, cluster))
}

#[rstest]
#[ignore = "boots an embedded PostgreSQL cluster"]
fn circular_chart_via_sync_conn(embedded_cluster: GuardedCluster) -> TestResult<()> {
    let (_env_guard, cluster) = embedded_cluster?;
    let mut conn = cluster.connection().diesel_connection("postgres")?;

    DieselRunQueryDsl::execute(sql_query("DROP TABLE IF EXISTS staff"), &mut conn)?;
    DieselRunQueryDsl::execute(sql_query(test_helpers::CREATE_STAFF), &mut conn)?;
    let mut table = StaffTable::new(&mut conn);
    table.insert_all(&org_chart())?;
    table.reparent(ALICE, Some(GABE))?;

    let rows: Vec<Node> = DieselRunQueryDsl::load(
        conn.subtree(HierarchySchema::STAFF, ALICE),
        &mut conn,
    )?;
    let expected = ["bob", "claire", "david", "eric", "fiona", "gabe"];
    if labels(&rows) != expected {
        return Err(format!("expected {expected:?} but saw {:?}", labels(&rows)).into());
    }

    let limited: Vec<Node> = DieselRunQueryDsl::load(
        conn.subtree_with_depth_limit(HierarchySchema::STAFF, BOB, 1),
        &mut conn,
    )?;
    if labels(&limited) != ["david", "eric"] {
        return Err(format!("unexpected depth-limited rows {:?}", labels(&limited)).into());
    }

    let from_engine =
        HierarchyTraversalEngine::new().descendants(&mut StaffTable::new(&mut conn), ALICE)?;
    if sorted_labels(&from_engine) != sorted_labels(&rows) {
        return Err("engine and CTE disagree".into());
    }
    Ok(())
}

#[cfg(feature = "async")]
#[rstest]
#[ignore = "boots an embedded PostgreSQL cluster"]
fn subtree_via_async_conn(embedded_cluster: GuardedCluster) -> TestResult<()> {
    use tokio::runtime::Builder;

    let (_env_guard, cluster) = embedded_cluster?;
    let rt = Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let db_url = cluster.connection().database_url("postgres");

    rt.block_on(async move {
        let mut conn = AsyncPgConnection::establish(&db_url).await?;

        AsyncRunQueryDsl::execute(sql_query("DROP TABLE IF EXISTS staff"), &mut conn).await?;
        AsyncRunQueryDsl::execute(sql_query(test_helpers::CREATE_STAFF), &mut conn).await?;
        for insert in test_helpers::org_chart_inserts() {
            AsyncRunQueryDsl::execute(sql_query(insert), &mut conn).await?;
        }

        let rows: Vec<Node> = AsyncRunQueryDsl::load(
            conn.subtree_with_depth_limit(HierarchySchema::STAFF, ALICE, 1),
            &mut conn,
        )
        .await?;

        if labels(&rows) != ["bob", "claire"] {
            return Err(format!("unexpected rows {:?}", labels(&rows)).into());
        }

        Ok::<_, Box<dyn std::error::Error + Send + Sync>>(())
    })?;

    Ok(())
}
