//! Domain model for the filing lifecycle.
//!
//! The filing domain holds the status state machine, taxpayer inputs, the
//! review thread, and acknowledgement numbers while keeping persistence and
//! collaborator concerns outside the domain boundary.

mod acknowledgement;
mod error;
mod filing;
mod ids;
mod inputs;
mod reviewer;
mod review;
mod status;

pub use acknowledgement::{
    ACKNOWLEDGEMENT_SUFFIX_DIGITS, Acknowledgement, AcknowledgementNumber, AcknowledgementPrefix,
};
pub use error::{FilingDomainError, ParseFilingStatusError, ParseItrFormError};
pub use filing::{Filing, PersistedFilingData};
pub use ids::{AssessmentYear, CaId, CommentId, FilingId, Pan, UserId};
pub use inputs::{
    Address, Deductions, FilingInputs, FilingUpdate, HousePropertyIncome, Income, ItrFormType,
    OtherSourcesIncome, PersonalInfo, SalaryIncome, TaxCalculation, TaxPaid,
};
pub use review::{CaReview, Comment};
pub use reviewer::Reviewer;
pub use status::{FilingStatus, FilingTrigger, transition};
