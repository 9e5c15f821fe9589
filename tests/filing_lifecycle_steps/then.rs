//! Then steps for filing lifecycle BDD scenarios.

use super::world::FilingWorld;
use rstest_bdd_macros::then;
use taxflow::filing::domain::FilingStatus;

#[then(r#"the filing status is "{status}""#)]
fn filing_status_is(world: &FilingWorld, status: String) -> Result<(), eyre::Report> {
    let expected = FilingStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let actual = world.current()?.status();
    eyre::ensure!(
        actual == expected,
        "expected status {}, found {}",
        expected.as_str(),
        actual.as_str()
    );
    Ok(())
}

#[then(r#"the filing is assigned to "{name}""#)]
fn filing_assigned_to(world: &FilingWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world
        .reviewers
        .get(&name)
        .copied()
        .ok_or_else(|| eyre::eyre!("unknown reviewer {name} in scenario"))?;
    eyre::ensure!(world.assigned_reviewer()? == expected, "filing assigned elsewhere");
    Ok(())
}

#[then("the filing has no assigned reviewer")]
fn filing_unassigned(world: &FilingWorld) -> Result<(), eyre::Report> {
    let assigned = world.current()?.review().assigned_ca();
    eyre::ensure!(assigned.is_none(), "expected no reviewer, found {assigned:?}");
    Ok(())
}

#[then(r#"the last operation fails with a "{kind}" error"#)]
fn last_operation_fails(world: &FilingWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last operation to fail"))?;
    eyre::ensure!(
        err.kind().as_str() == kind,
        "expected a {kind} error, got {err}"
    );
    Ok(())
}

#[then(r#"the acknowledgement number starts with "{prefix}""#)]
fn acknowledgement_starts_with(world: &FilingWorld, prefix: String) -> Result<(), eyre::Report> {
    let number = world
        .acknowledgement
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing acknowledgement number"))?;
    eyre::ensure!(number.as_str().starts_with(&prefix), "unexpected number {number}");
    let stored = world
        .current()?
        .acknowledgement()
        .map(|ack| ack.number.clone());
    eyre::ensure!(stored.as_ref() == Some(number), "filing carries a different number");
    Ok(())
}
