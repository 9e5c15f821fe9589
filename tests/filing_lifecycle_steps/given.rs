//! Given steps for filing lifecycle BDD scenarios.

use super::world::{FilingWorld, run_async};
use chrono::Utc;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use rust_decimal::Decimal;
use taxflow::filing::{
    domain::{CaId, Deductions, FilingInputs, Income, Reviewer},
    services::CreateFilingRequest,
};

#[given(r#"a registered chartered accountant "{name}""#)]
fn registered_reviewer(world: &mut FilingWorld, name: String) -> Result<(), eyre::Report> {
    let reviewer = Reviewer::new(CaId::new(), name.clone(), Utc::now());
    let id = reviewer.id();
    world
        .directory
        .insert(reviewer)
        .wrap_err("register reviewer in scenario setup")?;
    world.reviewers.insert(name, id);
    Ok(())
}

#[given("a draft return with salary {salary:u64} and deductions {deductions:u64}")]
fn draft_return(world: &mut FilingWorld, salary: u64, deductions: u64) -> Result<(), eyre::Report> {
    let inputs = FilingInputs {
        income: Income::from_salary(Decimal::from(salary)),
        deductions: Deductions {
            section_80c: Decimal::from(deductions),
            ..Deductions::default()
        },
        ..FilingInputs::default()
    };
    let created = run_async(
        world
            .lifecycle
            .create_filing(CreateFilingRequest::new(world.owner).with_inputs(inputs)),
    )
    .wrap_err("create draft return for scenario")?;
    world.filing = Some(created);
    Ok(())
}
