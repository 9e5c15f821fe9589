//! Diesel schema for filing lifecycle persistence.

diesel::table! {
    /// Filing records; taxpayer inputs and review state are JSON documents.
    filings (id) {
        /// Filing identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Assessment year, `YYYY-YYYY`.
        #[max_length = 9]
        assessment_year -> Varchar,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Taxpayer inputs.
        inputs -> Jsonb,
        /// Last computed tax snapshot.
        tax_calculation -> Jsonb,
        /// Reviewer assignment and comments.
        review -> Jsonb,
        /// Assigned reviewer, mirrored from `review` for lookups.
        assigned_ca -> Nullable<Uuid>,
        /// Acknowledgement number; set only when filed.
        #[max_length = 32]
        acknowledgement_number -> Nullable<Varchar>,
        /// Filing timestamp; set only when filed.
        filed_at -> Nullable<Timestamptz>,
        /// Optimistic-concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Chartered accountants available for review.
    reviewers (id) {
        /// Reviewer identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Client membership used as the reviewer load metric.
    reviewer_clients (reviewer_id, user_id) {
        /// Reviewer identifier.
        reviewer_id -> Uuid,
        /// Client user identifier.
        user_id -> Uuid,
        /// Insertion order.
        position -> Int8,
    }
}

diesel::table! {
    /// Reviewer reference kept on user records.
    user_assignments (user_id) {
        /// User identifier.
        user_id -> Uuid,
        /// Assigned reviewer.
        ca_id -> Uuid,
    }
}

diesel::joinable!(reviewer_clients -> reviewers (reviewer_id));
diesel::allow_tables_to_appear_in_same_query!(filings, reviewers, reviewer_clients, user_assignments);
