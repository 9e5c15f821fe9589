//! Reviewer ranking, client membership and user assignment in `PostgreSQL`.

use super::helpers::{TestDatabase, reviewer, test_runtime};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taxflow::filing::{
    domain::{CaId, Reviewer, UserId},
    ports::{CaDirectory, CaDirectoryError, UserDirectory},
};

#[rstest]
fn add_client_reports_only_new_memberships(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_add_client")?;
    let directory = db.directory();
    let rt = test_runtime()?;
    let ca = reviewer("Asha", 0)?;
    rt.block_on(directory.insert(&ca))?;
    let user = UserId::new();

    eyre::ensure!(rt.block_on(directory.add_client(ca.id(), user))?);
    eyre::ensure!(!rt.block_on(directory.add_client(ca.id(), user))?);

    let stored = rt
        .block_on(directory.find_by_id(ca.id()))?
        .ok_or_else(|| eyre::eyre!("reviewer should exist"))?;
    eyre::ensure!(stored.clients() == [user]);
    Ok(())
}

#[rstest]
fn add_client_to_unknown_reviewer_is_not_found(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_unknown")?;
    let directory = db.directory();
    let rt = test_runtime()?;
    let ca = CaId::new();

    let result = rt.block_on(directory.add_client(ca, UserId::new()));

    eyre::ensure!(
        matches!(result, Err(CaDirectoryError::NotFound(id)) if id == ca),
        "expected not found, got {result:?}"
    );
    Ok(())
}

#[rstest]
fn duplicate_reviewer_is_rejected(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_dup")?;
    let directory = db.directory();
    let rt = test_runtime()?;
    let ca = reviewer("Asha", 0)?;
    rt.block_on(directory.insert(&ca))?;

    let result = rt.block_on(directory.insert(&ca));

    eyre::ensure!(
        matches!(result, Err(CaDirectoryError::DuplicateReviewer(id)) if id == ca.id()),
        "expected duplicate reviewer, got {result:?}"
    );
    Ok(())
}

#[rstest]
fn rank_by_load_orders_by_clients_then_registration(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_rank")?;
    let directory = db.directory();
    let rt = test_runtime()?;
    let busy = reviewer("Busy", 0)?.with_clients([UserId::new(), UserId::new()]);
    let senior = reviewer("Senior", 5)?.with_clients([UserId::new()]);
    let junior = reviewer("Junior", 10)?.with_clients([UserId::new()]);
    let idle = reviewer("Idle", 20)?;
    for ca in [&junior, &busy, &idle, &senior] {
        rt.block_on(directory.insert(ca))?;
    }

    let ranked = rt.block_on(directory.rank_by_load())?;

    let names: Vec<&str> = ranked.iter().map(Reviewer::name).collect();
    eyre::ensure!(
        names == ["Idle", "Senior", "Junior", "Busy"],
        "unexpected ranking {names:?}"
    );
    let busy_clients = ranked
        .iter()
        .find(|ca| ca.id() == busy.id())
        .map(Reviewer::clients);
    eyre::ensure!(busy_clients == Some(busy.clients()));
    Ok(())
}

#[rstest]
fn user_assignment_is_overwritten(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "dir_users")?;
    let directory = db.directory();
    let users = db.users();
    let rt = test_runtime()?;
    let first = reviewer("Asha", 0)?;
    let second = reviewer("Bela", 1)?;
    rt.block_on(directory.insert(&first))?;
    rt.block_on(directory.insert(&second))?;
    let user = UserId::new();

    eyre::ensure!(rt.block_on(users.assigned_ca(user))?.is_none());
    rt.block_on(users.set_assigned_ca(user, first.id()))?;
    rt.block_on(users.set_assigned_ca(user, second.id()))?;

    eyre::ensure!(rt.block_on(users.assigned_ca(user))? == Some(second.id()));
    Ok(())
}
