//! Table constraints that back the filing adapter invariants.

use super::helpers::{TestDatabase, filed, test_runtime};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taxflow::filing::{domain::UserId, ports::FilingRepository};

#[rstest]
#[case::number_without_timestamp("UPDATE filings SET filed_at = NULL WHERE id = $1")]
#[case::unfiled_with_number("UPDATE filings SET status = 'approved' WHERE id = $1")]
#[case::filed_without_number(
    "UPDATE filings SET acknowledgement_number = NULL, filed_at = NULL WHERE id = $1"
)]
#[case::negative_version("UPDATE filings SET version = -1 WHERE id = $1")]
fn inconsistent_rows_violate_check_constraints(
    shared_test_cluster: &'static TestCluster,
    #[case] statement: &str,
) -> eyre::Result<()> {
    let db = TestDatabase::create(shared_test_cluster, "schema_checks")?;
    let rt = test_runtime()?;
    let filing = filed(UserId::new(), 7)?;
    rt.block_on(db.repository().store(&filing))?;
    let mut conn = db.connect()?;

    let result = diesel::sql_query(statement)
        .bind::<diesel::sql_types::Uuid, _>(filing.id().into_inner())
        .execute(&mut conn);

    eyre::ensure!(
        matches!(
            result,
            Err(DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _))
        ),
        "expected a check violation for {statement}, got {result:?}"
    );
    Ok(())
}
