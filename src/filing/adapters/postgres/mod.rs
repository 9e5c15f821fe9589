//! `PostgreSQL` adapters for filing lifecycle persistence.

mod directory;
mod models;
mod repository;
mod schema;


pub use directory::{PostgresCaDirectory, PostgresUserDirectory};
pub use repository::PostgresFilingRepository;

use crate::filing::ports::{CaDirectoryError, FilingRepositoryError, UserDirectoryError};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool type used by filing adapters.
pub type FilingPgPool = Pool<ConnectionManager<PgConnection>>;

const CREATE_FILING_TABLES_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_filing_tables/up.sql");

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<FilingPgPool, PoolError> {
    Pool::builder()
        .max_size(max_size)
        .build(ConnectionManager::<PgConnection>::new(database_url))
}

/// Creates the filing tables and indexes if they are missing.
///
/// # Errors
///
/// Returns the database error when a statement fails.
pub fn run_migrations(connection: &mut PgConnection) -> diesel::QueryResult<()> {
    connection.batch_execute(CREATE_FILING_TABLES_SQL)
}

/// Port errors that can wrap an infrastructure failure.
trait PersistenceFailure: Sized {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for FilingRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for CaDirectoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for UserDirectoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// Runs `f` with a pooled connection on the blocking thread pool.
async fn run_blocking<F, T, E>(pool: FilingPgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(E::from_persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(E::from_persistence)?
}
