//! `PostgreSQL` reviewer directory and user record updater.

use super::{
    FilingPgPool,
    models::{NewReviewerClientRow, ReviewerRow, UserAssignmentRow},
    run_blocking,
    schema::{reviewer_clients, reviewers, user_assignments},
};
use crate::filing::{
    domain::{CaId, Reviewer, UserId},
    ports::{
        CaDirectory, CaDirectoryError, CaDirectoryResult, UserDirectory, UserDirectoryError,
        UserDirectoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL`-backed reviewer directory.
#[derive(Debug, Clone)]
pub struct PostgresCaDirectory {
    pool: FilingPgPool,
}

impl PostgresCaDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FilingPgPool) -> Self {
        Self { pool }
    }

    /// Inserts a reviewer and its existing clients.
    ///
    /// # Errors
    ///
    /// Returns [`CaDirectoryError::DuplicateReviewer`] when the identifier is
    /// taken.
    pub async fn insert(&self, reviewer: &Reviewer) -> CaDirectoryResult<()> {
        let ca = reviewer.id();
        let row = ReviewerRow {
            id: ca.into_inner(),
            name: reviewer.name().to_owned(),
            created_at: reviewer.created_at(),
        };
        let clients: Vec<NewReviewerClientRow> = reviewer
            .clients()
            .iter()
            .map(|client| NewReviewerClientRow {
                reviewer_id: ca.into_inner(),
                user_id: client.into_inner(),
            })
            .collect();

        run_blocking(self.pool.clone(), move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(reviewers::table)
                        .values(&row)
                        .execute(tx)?;
                    diesel::insert_into(reviewer_clients::table)
                        .values(&clients)
                        .execute(tx)?;
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CaDirectoryError::DuplicateReviewer(ca)
                    }
                    _ => CaDirectoryError::persistence(err),
                })
        })
        .await
    }
}

#[async_trait]
impl CaDirectory for PostgresCaDirectory {
    async fn rank_by_load(&self) -> CaDirectoryResult<Vec<Reviewer>> {
        run_blocking(self.pool.clone(), |connection| {
            let rows = reviewers::table
                .select(ReviewerRow::as_select())
                .load::<ReviewerRow>(connection)
                .map_err(CaDirectoryError::persistence)?;
            let mut clients = load_clients(connection, None)?;

            let mut ranked: Vec<Reviewer> = rows
                .into_iter()
                .map(|row| {
                    let members = clients.remove(&row.id).unwrap_or_default();
                    row_to_reviewer(row, members)
                })
                .collect();
            ranked.sort_by(Reviewer::load_order);
            Ok(ranked)
        })
        .await
    }

    async fn find_by_id(&self, id: CaId) -> CaDirectoryResult<Option<Reviewer>> {
        run_blocking(self.pool.clone(), move |connection| {
            let row = reviewers::table
                .filter(reviewers::id.eq(id.into_inner()))
                .select(ReviewerRow::as_select())
                .first::<ReviewerRow>(connection)
                .optional()
                .map_err(CaDirectoryError::persistence)?;
            let Some(found) = row else {
                return Ok(None);
            };
            let members = load_clients(connection, Some(id))?
                .remove(&found.id)
                .unwrap_or_default();
            Ok(Some(row_to_reviewer(found, members)))
        })
        .await
    }

    async fn add_client(&self, ca: CaId, user: UserId) -> CaDirectoryResult<bool> {
        let membership = NewReviewerClientRow {
            reviewer_id: ca.into_inner(),
            user_id: user.into_inner(),
        };
        run_blocking(self.pool.clone(), move |connection| {
            let inserted = diesel::insert_into(reviewer_clients::table)
                .values(&membership)
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        CaDirectoryError::NotFound(ca)
                    }
                    _ => CaDirectoryError::persistence(err),
                })?;
            Ok(inserted == 1)
        })
        .await
    }
}

/// Loads client lists keyed by reviewer, in insertion order.
fn load_clients(
    connection: &mut PgConnection,
    only: Option<CaId>,
) -> CaDirectoryResult<HashMap<Uuid, Vec<UserId>>> {
    let mut query = reviewer_clients::table
        .select((reviewer_clients::reviewer_id, reviewer_clients::user_id))
        .order(reviewer_clients::position.asc())
        .into_boxed();
    if let Some(ca) = only {
        query = query.filter(reviewer_clients::reviewer_id.eq(ca.into_inner()));
    }
    let pairs = query
        .load::<(Uuid, Uuid)>(connection)
        .map_err(CaDirectoryError::persistence)?;

    let mut grouped: HashMap<Uuid, Vec<UserId>> = HashMap::new();
    for (reviewer_id, user_id) in pairs {
        grouped
            .entry(reviewer_id)
            .or_default()
            .push(UserId::from_uuid(user_id));
    }
    Ok(grouped)
}

fn row_to_reviewer(row: ReviewerRow, clients: Vec<UserId>) -> Reviewer {
    Reviewer::new(CaId::from_uuid(row.id), row.name, row.created_at).with_clients(clients)
}

/// `PostgreSQL`-backed user record updater.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: FilingPgPool,
}

impl PostgresUserDirectory {
    /// Creates a new updater from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FilingPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn set_assigned_ca(&self, user: UserId, ca: CaId) -> UserDirectoryResult<()> {
        let row = UserAssignmentRow {
            user_id: user.into_inner(),
            ca_id: ca.into_inner(),
        };
        run_blocking(self.pool.clone(), move |connection| {
            diesel::insert_into(user_assignments::table)
                .values(&row)
                .on_conflict(user_assignments::user_id)
                .do_update()
                .set(user_assignments::ca_id.eq(excluded(user_assignments::ca_id)))
                .execute(connection)
                .map_err(UserDirectoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn assigned_ca(&self, user: UserId) -> UserDirectoryResult<Option<CaId>> {
        run_blocking(self.pool.clone(), move |connection| {
            let ca = user_assignments::table
                .filter(user_assignments::user_id.eq(user.into_inner()))
                .select(user_assignments::ca_id)
                .first::<Uuid>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            Ok(ca.map(CaId::from_uuid))
        })
        .await
    }
}
