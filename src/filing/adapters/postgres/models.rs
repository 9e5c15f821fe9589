//! Diesel row models for filing persistence.

use super::schema::{filings, reviewer_clients, reviewers, user_assignments};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for filing records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = filings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FilingRow {
    /// Filing identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Assessment year.
    pub assessment_year: String,
    /// Lifecycle status.
    pub status: String,
    /// Taxpayer inputs JSON.
    pub inputs: Value,
    /// Tax snapshot JSON.
    pub tax_calculation: Value,
    /// Review JSON.
    pub review: Value,
    /// Assigned reviewer.
    pub assigned_ca: Option<uuid::Uuid>,
    /// Acknowledgement number.
    pub acknowledgement_number: Option<String>,
    /// Filing timestamp.
    pub filed_at: Option<DateTime<Utc>>,
    /// Version counter.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for filing records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = filings)]
pub struct NewFilingRow {
    /// Filing identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Assessment year.
    pub assessment_year: String,
    /// Lifecycle status.
    pub status: String,
    /// Taxpayer inputs JSON.
    pub inputs: Value,
    /// Tax snapshot JSON.
    pub tax_calculation: Value,
    /// Review JSON.
    pub review: Value,
    /// Assigned reviewer.
    pub assigned_ca: Option<uuid::Uuid>,
    /// Acknowledgement number.
    pub acknowledgement_number: Option<String>,
    /// Filing timestamp.
    pub filed_at: Option<DateTime<Utc>>,
    /// Version counter.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written by a conditional update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = filings, treat_none_as_null = true)]
pub struct FilingChangeset {
    /// Lifecycle status.
    pub status: String,
    /// Taxpayer inputs JSON.
    pub inputs: Value,
    /// Tax snapshot JSON.
    pub tax_calculation: Value,
    /// Review JSON.
    pub review: Value,
    /// Assigned reviewer.
    pub assigned_ca: Option<uuid::Uuid>,
    /// Acknowledgement number.
    pub acknowledgement_number: Option<String>,
    /// Filing timestamp.
    pub filed_at: Option<DateTime<Utc>>,
    /// Version counter.
    pub version: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<NewFilingRow> for FilingChangeset {
    fn from(row: NewFilingRow) -> Self {
        Self {
            status: row.status,
            inputs: row.inputs,
            tax_calculation: row.tax_calculation,
            review: row.review,
            assigned_ca: row.assigned_ca,
            acknowledgement_number: row.acknowledgement_number,
            filed_at: row.filed_at,
            version: row.version,
            updated_at: row.updated_at,
        }
    }
}

/// Query result row for reviewer records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviewers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewerRow {
    /// Reviewer identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for reviewer client membership.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = reviewer_clients)]
pub struct NewReviewerClientRow {
    /// Reviewer identifier.
    pub reviewer_id: uuid::Uuid,
    /// Client user identifier.
    pub user_id: uuid::Uuid,
}

/// Insert model for the user-to-reviewer reference.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_assignments)]
pub struct UserAssignmentRow {
    /// User identifier.
    pub user_id: uuid::Uuid,
    /// Assigned reviewer.
    pub ca_id: uuid::Uuid,
}
