//! Conditional writes and lookups through the `PostgreSQL` filing repository.

use super::helpers::{TestDatabase, acknowledgement, draft, filed, test_runtime, under_review};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taxflow::filing::{
    domain::{CaId, FilingId, FilingStatus, UserId},
    ports::{FilingRepository, FilingRepositoryError},
};

#[rstest]
fn stored_filing_is_found_by_id_owner_and_reviewer(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "repo_lookup")?;
    let repo = db.repository();
    let rt = test_runtime()?;
    let owner = UserId::new();
    let ca = CaId::new();
    let filing = under_review(owner, ca)?;

    rt.block_on(repo.store(&filing))?;

    let found = rt
        .block_on(repo.find_by_id(filing.id()))?
        .ok_or_else(|| eyre::eyre!("stored filing should be found"))?;
    eyre::ensure!(found.id() == filing.id());
    eyre::ensure!(found.status() == FilingStatus::PendingReview);
    eyre::ensure!(found.version() == filing.version());
    eyre::ensure!(found.inputs() == filing.inputs());
    eyre::ensure!(found.tax_calculation() == filing.tax_calculation());
    eyre::ensure!(found.review().assigned_ca() == Some(ca));

    let owned = rt.block_on(repo.find_by_owner(owner))?;
    eyre::ensure!(owned.iter().map(|f| f.id()).eq([filing.id()]));
    let reviewing = rt.block_on(repo.find_by_reviewer(ca))?;
    eyre::ensure!(reviewing.iter().map(|f| f.id()).eq([filing.id()]));
    eyre::ensure!(rt.block_on(repo.find_by_id(FilingId::new()))?.is_none());
    Ok(())
}

#[rstest]
fn update_with_current_version_succeeds(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "repo_update")?;
    let repo = db.repository();
    let rt = test_runtime()?;
    let mut filing = draft(UserId::new())?;
    rt.block_on(repo.store(&filing))?;

    let expected_version = filing.version();
    filing.request_review(&DefaultClock)?;
    rt.block_on(repo.update(&filing, expected_version))?;

    let stored = rt
        .block_on(repo.find_by_id(filing.id()))?
        .ok_or_else(|| eyre::eyre!("filing should exist"))?;
    eyre::ensure!(stored.status() == FilingStatus::PendingReview);
    eyre::ensure!(stored.version() == expected_version + 1);
    Ok(())
}

#[rstest]
fn stale_version_is_a_conflict(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "repo_stale")?;
    let repo = db.repository();
    let rt = test_runtime()?;
    let filing = under_review(UserId::new(), CaId::new())?;
    rt.block_on(repo.store(&filing))?;

    // Approval computed from the version read before the comment landed.
    let read_version = filing.version();
    let mut stale = filing.clone();
    stale.approve(&DefaultClock)?;

    let mut commented = filing;
    commented.add_comment("income", "Form 16 missing", &DefaultClock)?;
    rt.block_on(repo.update(&commented, read_version))?;

    let result = rt.block_on(repo.update(&stale, read_version));
    eyre::ensure!(
        matches!(
            result,
            Err(FilingRepositoryError::VersionConflict { expected, actual, .. })
                if expected == read_version && actual == read_version + 1
        ),
        "expected a version conflict, got {result:?}"
    );

    let stored = rt
        .block_on(repo.find_by_id(commented.id()))?
        .ok_or_else(|| eyre::eyre!("filing should exist"))?;
    eyre::ensure!(stored.status() == FilingStatus::ActionRequired);
    eyre::ensure!(stored.review().unresolved_count() == 1);
    Ok(())
}

#[rstest]
fn update_of_missing_filing_is_not_found(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "repo_missing")?;
    let repo = db.repository();
    let rt = test_runtime()?;
    let filing = draft(UserId::new())?;

    let result = rt.block_on(repo.update(&filing, filing.version()));

    eyre::ensure!(
        matches!(result, Err(FilingRepositoryError::NotFound(id)) if id == filing.id()),
        "expected not found, got {result:?}"
    );
    Ok(())
}

#[rstest]
fn storing_the_same_filing_twice_is_a_duplicate(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "repo_dup_filing")?;
    let repo = db.repository();
    let rt = test_runtime()?;
    let filing = draft(UserId::new())?;
    rt.block_on(repo.store(&filing))?;

    let result = rt.block_on(repo.store(&filing));

    eyre::ensure!(
        matches!(result, Err(FilingRepositoryError::DuplicateFiling(id)) if id == filing.id()),
        "expected duplicate filing, got {result:?}"
    );
    Ok(())
}

#[rstest]
fn reused_acknowledgement_is_rejected_on_store_and_update(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "repo_dup_ack")?;
    let repo = db.repository();
    let rt = test_runtime()?;
    let first = filed(UserId::new(), 42)?;
    rt.block_on(repo.store(&first))?;
    let number = acknowledgement(42)?;
    eyre::ensure!(rt.block_on(repo.acknowledgement_exists(&number))?);
    eyre::ensure!(!rt.block_on(repo.acknowledgement_exists(&acknowledgement(43)?))?);

    let clashing = filed(UserId::new(), 42)?;
    let stored = rt.block_on(repo.store(&clashing));
    eyre::ensure!(
        matches!(stored, Err(FilingRepositoryError::DuplicateAcknowledgement(ref n)) if *n == number),
        "expected duplicate acknowledgement on store, got {stored:?}"
    );

    let mut submitted = draft(UserId::new())?;
    submitted.submit(&DefaultClock)?;
    rt.block_on(repo.store(&submitted))?;
    let expected_version = submitted.version();
    submitted.file(number.clone(), &DefaultClock)?;
    let updated = rt.block_on(repo.update(&submitted, expected_version));
    eyre::ensure!(
        matches!(updated, Err(FilingRepositoryError::DuplicateAcknowledgement(ref n)) if *n == number),
        "expected duplicate acknowledgement on update, got {updated:?}"
    );

    let unchanged = rt
        .block_on(repo.find_by_id(submitted.id()))?
        .ok_or_else(|| eyre::eyre!("filing should exist"))?;
    eyre::ensure!(unchanged.status() == FilingStatus::Submitted);
    eyre::ensure!(unchanged.acknowledgement().is_none());
    Ok(())
}
