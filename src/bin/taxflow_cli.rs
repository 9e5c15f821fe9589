//! Command-line front end for the tax engine and database setup.
//!
//! Usage:
//!
//! ```text
//! taxflow-cli compute --salary 1200000 --deductions 150000 --tds 50000 --regime old
//! taxflow-cli compare --income 1200000 --deductions 200000
//! taxflow-cli migrate
//! ```
//!
//! `compute` and `compare` print JSON to standard output. `migrate` creates
//! the filing tables in the database named by `DATABASE_URL`.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;
use taxflow::config::{AppConfig, ConfigError};
use taxflow::filing::adapters::postgres::{build_pool, run_migrations};
use taxflow::tax::{self, ParseRegimeError, Regime, TaxInputError, TaxInputs};
use taxflow::telemetry::{self, TelemetryError};
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "taxflow-cli",
    about = "Compute income tax and manage the filing database",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess tax for one set of inputs under one regime
    Compute(ComputeArgs),
    /// Compare the new and old regimes for the same income
    Compare(CompareArgs),
    /// Create the filing tables in `DATABASE_URL`
    Migrate,
}

#[derive(Args, Debug)]
struct ComputeArgs {
    /// Salary income
    #[arg(long)]
    salary: Decimal,
    /// Other-source income; may be repeated
    #[arg(long)]
    other: Vec<Decimal>,
    /// Deduction amount; may be repeated
    #[arg(long)]
    deductions: Vec<Decimal>,
    /// Tax deducted at source
    #[arg(long, default_value = "0")]
    tds: Decimal,
    /// Regime to assess under (new or old)
    #[arg(long, default_value = "new", value_parser = parse_regime)]
    regime: Regime,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Gross income
    #[arg(long)]
    income: Decimal,
    /// Total deductions
    #[arg(long, default_value = "0")]
    deductions: Decimal,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    TaxInput(#[from] TaxInputError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("DATABASE_URL must be set to run migrations")]
    MissingDatabaseUrl,
    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(#[from] diesel::result::Error),
    #[error("migration task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn parse_regime(value: &str) -> Result<Regime, ParseRegimeError> {
    Regime::try_from(value)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "fatal errors are reported on the terminal")]
fn report(err: &CliError) {
    eprintln!("taxflow-cli error: {err}");
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Compute(args) => compute(&args),
        Command::Compare(args) => {
            let comparison = tax::compare_regimes(args.income, args.deductions)?;
            emit(&comparison)
        }
        Command::Migrate => migrate(config).await,
    }
}

fn compute(args: &ComputeArgs) -> Result<(), CliError> {
    let inputs = args
        .other
        .iter()
        .fold(TaxInputs::new(args.salary), |acc, amount| {
            acc.with_other_income(*amount)
        });
    let with_deductions = args
        .deductions
        .iter()
        .fold(inputs, |acc, amount| acc.with_deduction(*amount))
        .with_tax_paid(args.tds)
        .with_regime(args.regime);
    let assessment = tax::assess(&with_deductions)?;
    emit(&assessment)
}

async fn migrate(config: AppConfig) -> Result<(), CliError> {
    let url = config.database.url.ok_or(CliError::MissingDatabaseUrl)?;
    let pool_size = config.database.pool_size;
    tokio::task::spawn_blocking(move || -> Result<(), CliError> {
        let pool = build_pool(&url, pool_size)?;
        let mut connection = pool.get()?;
        run_migrations(&mut connection)?;
        Ok(())
    })
    .await??;
    info!("filing tables are up to date");
    Ok(())
}

fn emit(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}
