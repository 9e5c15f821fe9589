//! Application services for the filing lifecycle.
//!
//! Each service loads a filing, applies one domain operation, and writes it
//! back with a conditional update keyed on the version that was read.

mod acknowledgement;
mod analytics;
mod assignment;
mod error;
mod lifecycle;
mod receipt;
mod review;
mod scope;

pub use acknowledgement::{
    AcknowledgementSettings, AcknowledgementSource, DEFAULT_ACKNOWLEDGEMENT_ATTEMPTS,
    EFilingService, FiledReturn, UuidAcknowledgementSource,
};
pub use analytics::{
    AnalyticsService, DeductionBreakdown, DeductionSlice, IncomeTrendPoint, KeyStats,
    UserAnalytics,
};
pub use assignment::{AssignmentOutcome, CaAssignmentPolicy};
pub use error::{
    CollaboratorError, ConflictReason, ErrorKind, FilingServiceError, FilingServiceResult,
    MissingResource,
};
pub use lifecycle::{CreateFilingRequest, FilingLifecycleService};
pub use receipt::{AcknowledgementReceipt, ReceiptRenderError};
pub use review::{
    CaDashboard, ClientSummary, LatestFiling, RECENT_PENDING_REVIEW_LIMIT, ReviewService,
};
