//! `PostgreSQL` repository implementation for filing storage.

use super::{
    FilingPgPool,
    models::{FilingChangeset, FilingRow, NewFilingRow},
    run_blocking,
    schema::filings,
};
use crate::filing::{
    domain::{
        Acknowledgement, AcknowledgementNumber, AssessmentYear, CaId, Filing, FilingId,
        FilingStatus, PersistedFilingData, UserId,
    },
    ports::{FilingRepository, FilingRepositoryError, FilingRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

const ACKNOWLEDGEMENT_UNIQUE_INDEX: &str = "idx_filings_acknowledgement_number_unique";

/// `PostgreSQL`-backed filing repository.
#[derive(Debug, Clone)]
pub struct PostgresFilingRepository {
    pool: FilingPgPool,
}

impl PostgresFilingRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FilingPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FilingRepository for PostgresFilingRepository {
    async fn store(&self, filing: &Filing) -> FilingRepositoryResult<()> {
        let filing_id = filing.id();
        let acknowledgement = acknowledgement_number(filing);
        let new_row = to_new_row(filing)?;

        run_blocking(self.pool.clone(), move |connection| {
            diesel::insert_into(filings::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                        unique_violation(info.as_ref(), filing_id, acknowledgement.as_ref())
                    }
                    _ => FilingRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, filing: &Filing, expected_version: u64) -> FilingRepositoryResult<()> {
        let filing_id = filing.id();
        let acknowledgement = acknowledgement_number(filing);
        let changeset = FilingChangeset::from(to_new_row(filing)?);
        let expected =
            i64::try_from(expected_version).map_err(FilingRepositoryError::persistence)?;

        run_blocking(self.pool.clone(), move |connection| {
            let updated = diesel::update(
                filings::table
                    .filter(filings::id.eq(filing_id.into_inner()))
                    .filter(filings::version.eq(expected)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                    unique_violation(info.as_ref(), filing_id, acknowledgement.as_ref())
                }
                _ => FilingRepositoryError::persistence(err),
            })?;
            if updated == 1 {
                return Ok(());
            }
            let stale = stale_write_error(connection, filing_id, expected_version)?;
            Err(stale)
        })
        .await
    }

    async fn find_by_id(&self, id: FilingId) -> FilingRepositoryResult<Option<Filing>> {
        run_blocking(self.pool.clone(), move |connection| {
            let row = filings::table
                .filter(filings::id.eq(id.into_inner()))
                .select(FilingRow::as_select())
                .first::<FilingRow>(connection)
                .optional()
                .map_err(FilingRepositoryError::persistence)?;
            row.map(row_to_filing).transpose()
        })
        .await
    }

    async fn find_by_owner(&self, owner: UserId) -> FilingRepositoryResult<Vec<Filing>> {
        run_blocking(self.pool.clone(), move |connection| {
            let rows = filings::table
                .filter(filings::owner_id.eq(owner.into_inner()))
                .order((filings::created_at.desc(), filings::id.desc()))
                .select(FilingRow::as_select())
                .load::<FilingRow>(connection)
                .map_err(FilingRepositoryError::persistence)?;
            rows.into_iter().map(row_to_filing).collect()
        })
        .await
    }

    async fn find_by_reviewer(&self, ca: CaId) -> FilingRepositoryResult<Vec<Filing>> {
        run_blocking(self.pool.clone(), move |connection| {
            let rows = filings::table
                .filter(filings::assigned_ca.eq(ca.into_inner()))
                .order((filings::created_at.desc(), filings::id.desc()))
                .select(FilingRow::as_select())
                .load::<FilingRow>(connection)
                .map_err(FilingRepositoryError::persistence)?;
            rows.into_iter().map(row_to_filing).collect()
        })
        .await
    }

    async fn acknowledgement_exists(
        &self,
        number: &AcknowledgementNumber,
    ) -> FilingRepositoryResult<bool> {
        let candidate = number.as_str().to_owned();
        run_blocking(self.pool.clone(), move |connection| {
            diesel::select(diesel::dsl::exists(
                filings::table.filter(filings::acknowledgement_number.eq(candidate)),
            ))
            .get_result::<bool>(connection)
            .map_err(FilingRepositoryError::persistence)
        })
        .await
    }
}

fn acknowledgement_number(filing: &Filing) -> Option<AcknowledgementNumber> {
    filing
        .acknowledgement()
        .map(|acknowledgement| acknowledgement.number.clone())
}

/// Explains why a conditional update touched no rows.
fn stale_write_error(
    connection: &mut PgConnection,
    filing_id: FilingId,
    expected: u64,
) -> FilingRepositoryResult<FilingRepositoryError> {
    let stored = filings::table
        .filter(filings::id.eq(filing_id.into_inner()))
        .select(filings::version)
        .first::<i64>(connection)
        .optional()
        .map_err(FilingRepositoryError::persistence)?;
    let Some(stored_version) = stored else {
        return Ok(FilingRepositoryError::NotFound(filing_id));
    };
    let actual = u64::try_from(stored_version)
        .map_err(FilingRepositoryError::invalid_persisted_data)?;
    Ok(FilingRepositoryError::VersionConflict {
        filing_id,
        expected,
        actual,
    })
}

fn unique_violation(
    info: &dyn DatabaseErrorInformation,
    filing_id: FilingId,
    acknowledgement: Option<&AcknowledgementNumber>,
) -> FilingRepositoryError {
    let on_acknowledgement = info
        .constraint_name()
        .is_some_and(|name| name == ACKNOWLEDGEMENT_UNIQUE_INDEX);
    match acknowledgement {
        Some(number) if on_acknowledgement => {
            FilingRepositoryError::DuplicateAcknowledgement(number.clone())
        }
        _ => FilingRepositoryError::DuplicateFiling(filing_id),
    }
}

pub(super) fn to_new_row(filing: &Filing) -> FilingRepositoryResult<NewFilingRow> {
    let to_json = |value: serde_json::Result<serde_json::Value>| {
        value.map_err(FilingRepositoryError::persistence)
    };
    let acknowledgement = filing.acknowledgement();

    Ok(NewFilingRow {
        id: filing.id().into_inner(),
        owner_id: filing.owner().into_inner(),
        assessment_year: filing.assessment_year().to_string(),
        status: filing.status().as_str().to_owned(),
        inputs: to_json(serde_json::to_value(filing.inputs()))?,
        tax_calculation: to_json(serde_json::to_value(filing.tax_calculation()))?,
        review: to_json(serde_json::to_value(filing.review()))?,
        assigned_ca: filing.review().assigned_ca().map(CaId::into_inner),
        acknowledgement_number: acknowledgement.map(|ack| ack.number.as_str().to_owned()),
        filed_at: acknowledgement.map(|ack| ack.filed_at),
        version: i64::try_from(filing.version()).map_err(FilingRepositoryError::persistence)?,
        created_at: filing.created_at(),
        updated_at: filing.updated_at(),
    })
}

pub(super) fn row_to_filing(row: FilingRow) -> FilingRepositoryResult<Filing> {
    let FilingRow {
        id,
        owner_id,
        assessment_year: persisted_year,
        status: persisted_status,
        inputs: persisted_inputs,
        tax_calculation: persisted_calculation,
        review: persisted_review,
        acknowledgement_number: persisted_number,
        filed_at,
        version: persisted_version,
        created_at,
        updated_at,
        ..
    } = row;

    let assessment_year = AssessmentYear::parse(&persisted_year)
        .map_err(FilingRepositoryError::invalid_persisted_data)?;
    let status = FilingStatus::try_from(persisted_status.as_str())
        .map_err(FilingRepositoryError::invalid_persisted_data)?;
    let inputs = serde_json::from_value(persisted_inputs)
        .map_err(FilingRepositoryError::invalid_persisted_data)?;
    let tax_calculation = serde_json::from_value(persisted_calculation)
        .map_err(FilingRepositoryError::invalid_persisted_data)?;
    let review = serde_json::from_value(persisted_review)
        .map_err(FilingRepositoryError::invalid_persisted_data)?;
    let acknowledgement = match (persisted_number, filed_at) {
        (Some(number), Some(at)) => Some(Acknowledgement {
            number: AcknowledgementNumber::parse(&number)
                .map_err(FilingRepositoryError::invalid_persisted_data)?,
            filed_at: at,
        }),
        (None, None) => None,
        _ => {
            return Err(FilingRepositoryError::invalid_persisted_data(
                InconsistentAcknowledgement::PartialColumns,
            ));
        }
    };
    if (status == FilingStatus::Filed) != acknowledgement.is_some() {
        return Err(FilingRepositoryError::invalid_persisted_data(
            InconsistentAcknowledgement::StatusMismatch(status),
        ));
    }
    let version = u64::try_from(persisted_version)
        .map_err(FilingRepositoryError::invalid_persisted_data)?;

    Ok(Filing::from_persisted(PersistedFilingData {
        id: FilingId::from_uuid(id),
        owner: UserId::from_uuid(owner_id),
        assessment_year,
        status,
        inputs,
        tax_calculation,
        review,
        acknowledgement,
        version,
        created_at,
        updated_at,
    }))
}

#[derive(Debug, Error)]
enum InconsistentAcknowledgement {
    #[error("acknowledgement number and filed_at must both be set or both be null")]
    PartialColumns,
    #[error("filing in status {0} disagrees with its acknowledgement columns")]
    StatusMismatch(FilingStatus),
}
