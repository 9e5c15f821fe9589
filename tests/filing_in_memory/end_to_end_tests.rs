//! Draft-to-filed flows across the lifecycle, review and e-filing services.

use super::helpers::{Services, salaried, services};
use rstest::rstest;
use rust_decimal_macros::dec;
use taxflow::filing::{
    domain::{AssessmentYear, Deductions, FilingStatus, FilingUpdate, UserId},
    ports::{FilingRepository, UserDirectory},
    services::{AssignmentOutcome, CreateFilingRequest, ErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviewed_return_is_filed_with_receipt(services: Services) -> Result<(), eyre::Report> {
    let ca = services.register_reviewer("Asha", 0)?;
    let owner = UserId::new();

    let draft = services
        .lifecycle
        .create_filing(
            CreateFilingRequest::new(owner)
                .with_assessment_year(AssessmentYear::starting_in(2024)?)
                .with_inputs(salaried(dec!(1200000), dec!(150000), dec!(50000))),
        )
        .await?;
    eyre::ensure!(draft.status() == FilingStatus::Draft);

    let (pending, outcome) = services.lifecycle.request_review(owner, draft.id()).await?;
    eyre::ensure!(outcome == AssignmentOutcome::Assigned(ca));
    eyre::ensure!(pending.review().assigned_ca() == Some(ca));
    eyre::ensure!(services.users.assigned_ca(owner).await? == Some(ca));

    let comment = services
        .review
        .add_comment(ca, draft.id(), "deductions", "80C proof is missing")
        .await?;
    let edited = services
        .lifecycle
        .update_filing(
            owner,
            draft.id(),
            FilingUpdate {
                deductions: Some(Deductions {
                    section_80c: dec!(100000),
                    ..Deductions::default()
                }),
                ..FilingUpdate::default()
            },
        )
        .await?;
    eyre::ensure!(edited.status() == FilingStatus::ActionRequired);
    eyre::ensure!(edited.tax_calculation().total_deductions == dec!(100000));

    services
        .review
        .resolve_comment(ca, draft.id(), comment.id())
        .await?;
    let approved = services.review.approve_filing(ca, draft.id()).await?;
    eyre::ensure!(approved.status() == FilingStatus::Approved);

    let filed = services.efiling.file_return(owner, draft.id()).await?;
    eyre::ensure!(filed.filing.status() == FilingStatus::Filed);
    eyre::ensure!(filed.acknowledgement_number.as_str().starts_with("ITD2024"));
    eyre::ensure!(
        services
            .repository
            .acknowledgement_exists(&filed.acknowledgement_number)
            .await?
    );

    let receipt = filed
        .receipt()
        .ok_or_else(|| eyre::eyre!("filed return should carry a receipt"))?
        .render()?;
    eyre::ensure!(receipt.contains(filed.acknowledgement_number.as_str()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn direct_submission_skips_review(services: Services) -> Result<(), eyre::Report> {
    services.register_reviewer("Asha", 0)?;
    let owner = UserId::new();
    let draft = services
        .lifecycle
        .create_filing(
            CreateFilingRequest::new(owner).with_inputs(salaried(
                dec!(600000),
                dec!(0),
                dec!(20000),
            )),
        )
        .await?;

    let submitted = services.lifecycle.submit(owner, draft.id()).await?;
    eyre::ensure!(submitted.status() == FilingStatus::Submitted);

    let filed = services.efiling.file_return(owner, draft.id()).await?;
    eyre::ensure!(filed.filing.review().assigned_ca().is_none());
    eyre::ensure!(filed.filing.tax_calculation().refund > dec!(0));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filed_return_rejects_further_changes(services: Services) -> Result<(), eyre::Report> {
    let ca = services.register_reviewer("Asha", 0)?;
    let owner = UserId::new();
    let filing = services
        .lifecycle
        .create_filing(
            CreateFilingRequest::new(owner)
                .with_inputs(salaried(dec!(900000), dec!(50000), dec!(0)))
                .with_initial_status(FilingStatus::PendingReview),
        )
        .await?;
    services.review.approve_filing(ca, filing.id()).await?;
    let filed = services.efiling.file_return(owner, filing.id()).await?;

    let comment = services
        .review
        .add_comment(ca, filing.id(), "income", "Too late")
        .await;
    let approve = services.review.approve_filing(ca, filing.id()).await;
    let update = services
        .lifecycle
        .update_filing(owner, filing.id(), FilingUpdate::default())
        .await;
    let refile = services.efiling.file_return(owner, filing.id()).await;

    for kind in [
        comment.err().map(|err| err.kind()),
        approve.err().map(|err| err.kind()),
        update.err().map(|err| err.kind()),
        refile.err().map(|err| err.kind()),
    ] {
        eyre::ensure!(kind == Some(ErrorKind::Validation), "unexpected outcome {kind:?}");
    }
    let stored = services.lifecycle.get_filing(owner, filing.id()).await?;
    eyre::ensure!(stored == filed.filing);
    Ok(())
}
