//! Per-user analytics over completed filings.

use super::FilingServiceResult;
use crate::filing::{
    domain::{AssessmentYear, Filing, FilingDomainError, UserId},
    ports::FilingRepository,
};
use crate::tax;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// One assessment year of the income trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IncomeTrendPoint {
    /// Assessment year.
    pub assessment_year: AssessmentYear,
    /// Gross total income.
    pub total_income: Decimal,
    /// Tax deducted at source.
    pub tax_paid: Decimal,
    /// Refund due.
    pub refund: Decimal,
}

/// A non-zero deduction bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeductionSlice {
    /// Bucket label, such as `80C`.
    pub name: &'static str,
    /// Claimed amount.
    pub value: Decimal,
}

/// Deductions claimed on the most recent completed filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductionBreakdown {
    /// Assessment year of that filing.
    pub assessment_year: AssessmentYear,
    /// Buckets with a positive amount, in statutory order.
    pub slices: Vec<DeductionSlice>,
}

/// Totals across completed filings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyStats {
    /// Number of completed filings.
    pub total_filings: usize,
    /// Sum of TDS.
    pub total_tax_paid: Decimal,
    /// Sum of refunds.
    pub total_refunds: Decimal,
    /// Tax paid as a percentage of gross income, two decimal places.
    pub average_tax_rate: Decimal,
}

/// Analytics for one taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAnalytics {
    /// Headline totals.
    pub key_stats: KeyStats,
    /// Year-by-year trend, oldest first.
    pub income_trend: Vec<IncomeTrendPoint>,
    /// Deductions of the latest completed filing.
    pub deduction_breakdown: DeductionBreakdown,
}

/// Read-only analytics service.
#[derive(Clone)]
pub struct AnalyticsService<R>
where
    R: FilingRepository,
{
    repository: Arc<R>,
}

impl<R> AnalyticsService<R>
where
    R: FilingRepository,
{
    /// Creates a new analytics service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Summarises the owner's approved and filed returns.
    ///
    /// Returns `Ok(None)` when the owner has no completed filing.
    ///
    /// # Errors
    ///
    /// Returns [`super::FilingServiceError::Service`] when storage fails and
    /// [`super::FilingServiceError::Validation`] when a total overflows.
    pub async fn user_analytics(&self, owner: UserId) -> FilingServiceResult<Option<UserAnalytics>> {
        let mut completed: Vec<Filing> = self
            .repository
            .find_by_owner(owner)
            .await?
            .into_iter()
            .filter(|filing| filing.status().is_completed())
            .collect();
        completed.sort_by_key(Filing::assessment_year);
        Ok(summarise(&completed)?)
    }
}

fn summarise(completed: &[Filing]) -> Result<Option<UserAnalytics>, FilingDomainError> {
    let Some(latest) = completed.last() else {
        return Ok(None);
    };

    let income_trend: Vec<IncomeTrendPoint> = completed
        .iter()
        .map(|filing| IncomeTrendPoint {
            assessment_year: filing.assessment_year(),
            total_income: filing.tax_calculation().gross_total_income,
            tax_paid: filing.inputs().tax_paid.tds,
            refund: filing.tax_calculation().refund,
        })
        .collect();

    let total_tax_paid =
        tax::checked_total("total tax paid", income_trend.iter().map(|point| point.tax_paid))?;
    let total_refunds =
        tax::checked_total("total refunds", income_trend.iter().map(|point| point.refund))?;
    let total_income = tax::checked_total(
        "total income",
        income_trend.iter().map(|point| point.total_income),
    )?;

    let slices = latest
        .inputs()
        .deductions
        .named_buckets()
        .into_iter()
        .filter(|(_, value)| *value > Decimal::ZERO)
        .map(|(name, value)| DeductionSlice { name, value })
        .collect();

    Ok(Some(UserAnalytics {
        key_stats: KeyStats {
            total_filings: completed.len(),
            total_tax_paid,
            total_refunds,
            average_tax_rate: tax::effective_rate(total_tax_paid, total_income)?,
        },
        income_trend,
        deduction_breakdown: DeductionBreakdown {
            assessment_year: latest.assessment_year(),
            slices,
        },
    }))
}
