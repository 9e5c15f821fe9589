//! Shared builders for filing tests.

use crate::filing::{
    adapters::memory::{InMemoryCaDirectory, InMemoryFilingRepository, InMemoryUserDirectory},
    domain::{
        AcknowledgementNumber, AcknowledgementPrefix, AssessmentYear, CaId, Deductions, Filing,
        FilingDomainError, FilingInputs, FilingStatus, Income, Reviewer, TaxPaid, UserId,
    },
    services::{
        AcknowledgementSettings, AnalyticsService, CaAssignmentPolicy, CreateFilingRequest,
        EFilingService, FilingLifecycleService, ReviewService, UuidAcknowledgementSource,
    },
};
use chrono::{Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use rust_decimal_macros::dec;
use std::sync::Arc;

pub(super) fn year() -> AssessmentYear {
    AssessmentYear::starting_in(2024).expect("2024 is a supported assessment year")
}

pub(super) fn salaried_inputs() -> FilingInputs {
    FilingInputs {
        income: Income::from_salary(dec!(1200000)),
        deductions: Deductions {
            section_80c: dec!(150000),
            section_80d: dec!(50000),
            ..Deductions::default()
        },
        tax_paid: TaxPaid { tds: dec!(50000) },
        ..FilingInputs::default()
    }
}

pub(super) fn acknowledgement(entropy: u128) -> AcknowledgementNumber {
    AcknowledgementNumber::compose(&AcknowledgementPrefix::default(), year(), entropy)
}

/// Drives a fresh filing into `status` through legal transitions only.
pub(super) fn filing_in(status: FilingStatus) -> Result<Filing, FilingDomainError> {
    let clock = DefaultClock;
    let mut filing = Filing::new(UserId::new(), year(), salaried_inputs(), &clock)?;
    match status {
        FilingStatus::Draft => {}
        FilingStatus::PendingReview => filing.request_review(&clock)?,
        FilingStatus::ActionRequired => {
            filing.request_review(&clock)?;
            filing.add_comment("income", "Attach Form 16", &clock)?;
        }
        FilingStatus::Approved => {
            filing.request_review(&clock)?;
            filing.approve(&clock)?;
        }
        FilingStatus::Submitted => filing.submit(&clock)?,
        FilingStatus::Filed => {
            filing.submit(&clock)?;
            filing.file(acknowledgement(1), &clock)?;
        }
    }
    Ok(filing)
}

/// Reviewer with `clients` synthetic clients, registered `minutes` after a
/// fixed epoch.
pub(super) fn reviewer_with_load(name: &str, clients: usize, minutes: i64) -> Reviewer {
    let epoch = Utc
        .with_ymd_and_hms(2024, 4, 1, 9, 0, 0)
        .single()
        .unwrap_or_default();
    Reviewer::new(CaId::new(), name, epoch + Duration::minutes(minutes))
        .with_clients((0..clients).map(|_| UserId::new()))
}

type Repository = InMemoryFilingRepository;

/// Every service wired over shared in-memory adapters.
pub(super) struct Harness {
    pub(super) repository: Arc<Repository>,
    pub(super) directory: Arc<InMemoryCaDirectory>,
    pub(super) users: Arc<InMemoryUserDirectory>,
    pub(super) lifecycle:
        FilingLifecycleService<Repository, InMemoryCaDirectory, InMemoryUserDirectory, DefaultClock>,
    pub(super) review: ReviewService<Repository, InMemoryCaDirectory, DefaultClock>,
    pub(super) efiling: EFilingService<Repository, UuidAcknowledgementSource, DefaultClock>,
    pub(super) analytics: AnalyticsService<Repository>,
}

impl Harness {
    /// Registers a reviewer with no clients.
    pub(super) fn register_reviewer(&self, name: &str, minutes: i64) -> eyre::Result<CaId> {
        let reviewer = reviewer_with_load(name, 0, minutes);
        let id = reviewer.id();
        self.directory.insert(reviewer)?;
        Ok(id)
    }

    /// Creates a filing in `pending_review` and returns it with its reviewer.
    pub(super) async fn filing_under_review(&self, owner: UserId) -> eyre::Result<(Filing, CaId)> {
        let filing = self
            .lifecycle
            .create_filing(
                CreateFilingRequest::new(owner)
                    .with_assessment_year(year())
                    .with_inputs(salaried_inputs())
                    .with_initial_status(FilingStatus::PendingReview),
            )
            .await?;
        let ca = filing
            .review()
            .assigned_ca()
            .ok_or_else(|| eyre::eyre!("filing was not assigned"))?;
        Ok((filing, ca))
    }
}

#[fixture]
pub(super) fn harness() -> Harness {
    let repository = Arc::new(InMemoryFilingRepository::new());
    let directory = Arc::new(InMemoryCaDirectory::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let clock = Arc::new(DefaultClock);
    let policy = CaAssignmentPolicy::new(Arc::clone(&directory), Arc::clone(&users));

    Harness {
        lifecycle: FilingLifecycleService::new(Arc::clone(&repository), policy, Arc::clone(&clock)),
        review: ReviewService::new(
            Arc::clone(&repository),
            Arc::clone(&directory),
            Arc::clone(&clock),
        ),
        efiling: EFilingService::new(
            Arc::clone(&repository),
            Arc::new(UuidAcknowledgementSource),
            AcknowledgementSettings::default(),
            clock,
        ),
        analytics: AnalyticsService::new(Arc::clone(&repository)),
        repository,
        directory,
        users,
    }
}
