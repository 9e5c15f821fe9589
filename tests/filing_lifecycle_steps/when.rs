//! When steps for filing lifecycle BDD scenarios.

use super::world::{FilingWorld, run_async};
use rstest_bdd_macros::when;

#[when("the taxpayer requests a review")]
fn taxpayer_requests_review(world: &mut FilingWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let result = run_async(world.lifecycle.request_review(world.owner, id));
    world.record(result.map(|(filing, _)| filing))
}

#[when(r#"the reviewer comments "{text}" on section "{section}""#)]
fn reviewer_comments(
    world: &mut FilingWorld,
    text: String,
    section: String,
) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let ca = world.assigned_reviewer()?;
    let result = run_async(world.review.add_comment(ca, id, &section, &text));
    if let Ok(ref comment) = result {
        world.last_comment = Some(comment.id());
    }
    let reloaded = result.and_then(|_| run_async(world.review.get_filing_for_review(ca, id)));
    world.record(reloaded)
}

#[when("the reviewer resolves the last comment")]
fn reviewer_resolves_comment(world: &mut FilingWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let ca = world.assigned_reviewer()?;
    let comment = world
        .last_comment
        .ok_or_else(|| eyre::eyre!("missing comment in scenario world"))?;
    let result = run_async(world.review.resolve_comment(ca, id, comment))
        .and_then(|_| run_async(world.review.get_filing_for_review(ca, id)));
    world.record(result)
}

#[when("the reviewer approves the filing")]
fn reviewer_approves(world: &mut FilingWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let ca = world.assigned_reviewer()?;
    let result = run_async(world.review.approve_filing(ca, id));
    world.record(result)
}

#[when("the taxpayer files the return")]
fn taxpayer_files(world: &mut FilingWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let result = run_async(world.efiling.file_return(world.owner, id));
    if let Ok(ref filed) = result {
        world.acknowledgement = Some(filed.acknowledgement_number.clone());
    }
    world.record(result.map(|filed| filed.filing))
}
