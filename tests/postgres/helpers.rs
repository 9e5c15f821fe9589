//! Shared test helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::prelude::*;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use rust_decimal_macros::dec;
use taxflow::filing::{
    adapters::postgres::{
        FilingPgPool, PostgresCaDirectory, PostgresFilingRepository, PostgresUserDirectory,
        build_pool, run_migrations,
    },
    domain::{
        AcknowledgementNumber, AcknowledgementPrefix, AssessmentYear, CaId, Filing,
        FilingInputs, Income, Reviewer, UserId,
    },
};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taxflow_test_template";

/// Creates a tokio runtime for driving adapter futures.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> eyre::Result<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Ensures the template database exists with the filing tables applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            run_migrations(&mut conn).map_err(|e| eyre::eyre!("{e}"))?;
            Ok(())
        })
        .map_err(|e| eyre::eyre!("template setup failed: {e}"))
}

/// A database cloned from the template, dropped when the value goes away.
pub struct TestDatabase {
    cluster: &'static TestCluster,
    name: String,
    pool: FilingPgPool,
}

impl TestDatabase {
    /// Clones the template into a fresh database named after `label`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template, the database, or the pool cannot be
    /// created.
    pub fn create(cluster: &'static TestCluster, label: &str) -> eyre::Result<Self> {
        ensure_template(cluster)?;
        let name = format!("{label}_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|e| eyre::eyre!("create {name}: {e}"))?;
        let database = Self {
            cluster,
            pool: build_pool(&cluster.connection().database_url(&name), 2)?,
            name,
        };
        Ok(database)
    }

    /// Filing repository over this database.
    #[must_use]
    pub fn repository(&self) -> PostgresFilingRepository {
        PostgresFilingRepository::new(self.pool.clone())
    }

    /// Reviewer directory over this database.
    #[must_use]
    pub fn directory(&self) -> PostgresCaDirectory {
        PostgresCaDirectory::new(self.pool.clone())
    }

    /// User assignment directory over this database.
    #[must_use]
    pub fn users(&self) -> PostgresUserDirectory {
        PostgresUserDirectory::new(self.pool.clone())
    }

    /// Opens a direct connection for raw SQL checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn connect(&self) -> eyre::Result<PgConnection> {
        let url = self.cluster.connection().database_url(&self.name);
        Ok(PgConnection::establish(&url)?)
    }
}

impl Drop for TestDatabase {
    #[expect(
        clippy::print_stderr,
        reason = "Test cleanup warnings are informational"
    )]
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.name);
        }
    }
}

/// The 2024-2025 assessment year.
///
/// # Errors
///
/// Returns an error if the year is outside the supported range.
pub fn year() -> eyre::Result<AssessmentYear> {
    Ok(AssessmentYear::starting_in(2024)?)
}

/// Fresh draft for `owner` with a salaried income.
///
/// # Errors
///
/// Returns an error if the domain rejects the inputs.
pub fn draft(owner: UserId) -> eyre::Result<Filing> {
    let inputs = FilingInputs {
        income: Income::from_salary(dec!(1200000)),
        ..FilingInputs::default()
    };
    Ok(Filing::new(owner, year()?, inputs, &DefaultClock)?)
}

/// Draft moved into review with `ca` assigned.
///
/// # Errors
///
/// Returns an error if a transition is rejected.
pub fn under_review(owner: UserId, ca: CaId) -> eyre::Result<Filing> {
    let mut filing = draft(owner)?;
    filing.request_review(&DefaultClock)?;
    filing.assign_reviewer(ca, &DefaultClock);
    Ok(filing)
}

/// Submitted filing stamped with an acknowledgement built from `entropy`.
///
/// # Errors
///
/// Returns an error if a transition is rejected.
pub fn filed(owner: UserId, entropy: u128) -> eyre::Result<Filing> {
    let mut filing = draft(owner)?;
    filing.submit(&DefaultClock)?;
    filing.file(acknowledgement(entropy)?, &DefaultClock)?;
    Ok(filing)
}

/// Acknowledgement number under the default prefix for 2024-2025.
///
/// # Errors
///
/// Returns an error if the year is outside the supported range.
pub fn acknowledgement(entropy: u128) -> eyre::Result<AcknowledgementNumber> {
    Ok(AcknowledgementNumber::compose(
        &AcknowledgementPrefix::default(),
        year()?,
        entropy,
    ))
}

/// Reviewer registered `minutes` after a fixed epoch.
///
/// # Errors
///
/// Returns an error if the epoch is not representable.
pub fn reviewer(name: &str, minutes: i64) -> eyre::Result<Reviewer> {
    Ok(Reviewer::new(CaId::new(), name, epoch()? + Duration::minutes(minutes)))
}

fn epoch() -> eyre::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid epoch"))
}
