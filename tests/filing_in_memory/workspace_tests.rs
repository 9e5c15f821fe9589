//! Reviewer workspace and taxpayer analytics over real flows.

use super::helpers::{Services, salaried, services};
use rstest::rstest;
use rust_decimal_macros::dec;
use taxflow::filing::{
    domain::{AssessmentYear, FilingStatus, UserId},
    services::{CreateFilingRequest, ErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_clients_go_to_the_least_loaded_reviewer(
    services: Services,
) -> Result<(), eyre::Report> {
    let first = services.register_reviewer("Asha", 0)?;
    let second = services.register_reviewer("Bala", 5)?;

    let mut assigned = Vec::new();
    for _ in 0..4 {
        let filing = services
            .lifecycle
            .create_filing(
                CreateFilingRequest::new(UserId::new())
                    .with_initial_status(FilingStatus::PendingReview),
            )
            .await?;
        assigned.push(filing.review().assigned_ca());
    }

    eyre::ensure!(assigned == vec![Some(first), Some(second), Some(first), Some(second)]);
    let first_dashboard = services.review.dashboard(first).await?;
    let second_dashboard = services.review.dashboard(second).await?;
    eyre::ensure!(first_dashboard.total_clients == 2);
    eyre::ensure!(second_dashboard.pending_reviews == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviewers_only_see_their_own_clients(services: Services) -> Result<(), eyre::Report> {
    let first = services.register_reviewer("Asha", 0)?;
    let second = services.register_reviewer("Bala", 5)?;
    let owner = UserId::new();
    let filing = services
        .lifecycle
        .create_filing(
            CreateFilingRequest::new(owner).with_initial_status(FilingStatus::PendingReview),
        )
        .await?;
    eyre::ensure!(filing.review().assigned_ca() == Some(first));

    let denied = services.review.get_filing_for_review(second, filing.id()).await;
    eyre::ensure!(denied.err().map(|err| err.kind()) == Some(ErrorKind::NotFound));

    let clients = services.review.clients(second).await?;
    eyre::ensure!(clients.is_empty());
    let own = services.review.clients(first).await?;
    eyre::ensure!(own.iter().any(|row| row.user_id == owner));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn analytics_follow_filed_years(services: Services) -> Result<(), eyre::Report> {
    let owner = UserId::new();
    for (start, salary) in [(2022, dec!(700000)), (2023, dec!(900000))] {
        let filing = services
            .lifecycle
            .create_filing(
                CreateFilingRequest::new(owner)
                    .with_assessment_year(AssessmentYear::starting_in(start)?)
                    .with_inputs(salaried(salary, dec!(50000), dec!(30000)))
                    .with_initial_status(FilingStatus::Submitted),
            )
            .await?;
        services.efiling.file_return(owner, filing.id()).await?;
    }

    let analytics = services
        .analytics
        .user_analytics(owner)
        .await?
        .ok_or_else(|| eyre::eyre!("filed returns should produce analytics"))?;

    eyre::ensure!(analytics.key_stats.total_filings == 2);
    eyre::ensure!(analytics.key_stats.total_tax_paid == dec!(60000));
    eyre::ensure!(analytics.key_stats.average_tax_rate == dec!(3.75));
    let incomes: Vec<_> = analytics
        .income_trend
        .iter()
        .map(|point| point.total_income)
        .collect();
    eyre::ensure!(incomes == vec![dec!(700000), dec!(900000)]);
    Ok(())
}
