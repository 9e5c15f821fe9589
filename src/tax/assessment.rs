//! Full tax assessments built from validated inputs.

use super::{Regime, TaxInputError, calculate_tax};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::iter;

/// Income, deduction, and prepayment figures for one assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxInputs {
    salary: Decimal,
    other_sources: Vec<Decimal>,
    deductions: Vec<Decimal>,
    tax_paid: Decimal,
    regime: Regime,
}

impl TaxInputs {
    /// Creates inputs with salary income only, under the new regime.
    #[must_use]
    pub fn new(salary: Decimal) -> Self {
        Self {
            salary,
            ..Self::default()
        }
    }

    /// Adds one other-source income amount.
    #[must_use]
    pub fn with_other_income(mut self, amount: Decimal) -> Self {
        self.other_sources.push(amount);
        self
    }

    /// Adds one deduction bucket.
    #[must_use]
    pub fn with_deduction(mut self, amount: Decimal) -> Self {
        self.deductions.push(amount);
        self
    }

    /// Sets tax already paid (TDS).
    #[must_use]
    pub const fn with_tax_paid(mut self, amount: Decimal) -> Self {
        self.tax_paid = amount;
        self
    }

    /// Sets the regime used for bracket computation.
    #[must_use]
    pub const fn with_regime(mut self, regime: Regime) -> Self {
        self.regime = regime;
        self
    }

    fn validate(&self) -> Result<(), TaxInputError> {
        ensure_non_negative("salary", self.salary)?;
        for amount in &self.other_sources {
            ensure_non_negative("other source income", *amount)?;
        }
        for amount in &self.deductions {
            ensure_non_negative("deduction", *amount)?;
        }
        ensure_non_negative("tax paid", self.tax_paid)
    }
}

/// Amount still owed or refundable after prepayments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Tax still owed.
    pub payable: Decimal,
    /// Excess prepayment to refund.
    pub refund: Decimal,
}

/// Result of assessing one set of inputs under one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    /// Regime the tax was computed under.
    pub regime: Regime,
    /// Salary plus other-source income.
    pub gross_total_income: Decimal,
    /// Sum of all deduction buckets.
    pub total_deductions: Decimal,
    /// Gross income less deductions, floored at zero.
    pub taxable_income: Decimal,
    /// Bracket tax on the taxable income.
    pub calculated_tax: Decimal,
    /// Tax already paid.
    pub tax_paid: Decimal,
    /// Tax still owed.
    pub tax_payable: Decimal,
    /// Excess prepayment to refund.
    pub refund: Decimal,
}

/// Sums `amounts`, reporting `field` instead of overflowing.
///
/// # Errors
///
/// Returns [`TaxInputError::AmountTooLarge`] when the sum does not fit in a
/// [`Decimal`].
pub fn checked_total(
    field: &'static str,
    amounts: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, TaxInputError> {
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .ok_or(TaxInputError::AmountTooLarge { field })
    })
}

/// Sums salary and other-source income.
///
/// # Errors
///
/// Returns [`TaxInputError::AmountTooLarge`] on overflow.
pub fn total_income(salary: Decimal, other_sources: &[Decimal]) -> Result<Decimal, TaxInputError> {
    checked_total(
        "gross total income",
        iter::once(salary).chain(other_sources.iter().copied()),
    )
}

/// Sums deduction buckets.
///
/// Regime-specific eligibility caps are not applied: every bucket counts
/// under both regimes.
///
/// # Errors
///
/// Returns [`TaxInputError::AmountTooLarge`] on overflow.
pub fn total_deductions(buckets: &[Decimal]) -> Result<Decimal, TaxInputError> {
    checked_total("total deductions", buckets.iter().copied())
}

/// Income less deductions, floored at zero.
#[must_use]
pub fn taxable_income(total_income: Decimal, total_deductions: Decimal) -> Decimal {
    (total_income - total_deductions).max(Decimal::ZERO)
}

/// Splits calculated tax against prepayments into payable and refund.
#[must_use]
pub fn settle(calculated_tax: Decimal, tax_paid: Decimal) -> Settlement {
    Settlement {
        payable: (calculated_tax - tax_paid).max(Decimal::ZERO),
        refund: (tax_paid - calculated_tax).max(Decimal::ZERO),
    }
}

/// Percentage of `gross` paid as `tax`, rounded to two decimal places.
///
/// Returns zero when `gross` is not positive.
///
/// # Errors
///
/// Returns [`TaxInputError::AmountTooLarge`] when the percentage does not
/// fit in a [`Decimal`].
pub fn effective_rate(tax: Decimal, gross: Decimal) -> Result<Decimal, TaxInputError> {
    if gross <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    tax.checked_div(gross)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(|rate| rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or(TaxInputError::AmountTooLarge {
            field: "effective tax rate",
        })
}

/// Runs a full assessment.
///
/// # Errors
///
/// Returns [`TaxInputError::NegativeAmount`] when any input is negative and
/// [`TaxInputError::AmountTooLarge`] when a total overflows.
pub fn assess(inputs: &TaxInputs) -> Result<TaxAssessment, TaxInputError> {
    inputs.validate()?;

    let gross_total_income = total_income(inputs.salary, &inputs.other_sources)?;
    let deductions = total_deductions(&inputs.deductions)?;
    let taxable = taxable_income(gross_total_income, deductions);
    let calculated_tax = calculate_tax(taxable, inputs.regime)?;
    let Settlement { payable, refund } = settle(calculated_tax, inputs.tax_paid);

    Ok(TaxAssessment {
        regime: inputs.regime,
        gross_total_income,
        total_deductions: deductions,
        taxable_income: taxable,
        calculated_tax,
        tax_paid: inputs.tax_paid,
        tax_payable: payable,
        refund,
    })
}

pub(super) fn ensure_non_negative(
    field: &'static str,
    amount: Decimal,
) -> Result<(), TaxInputError> {
    if amount < Decimal::ZERO {
        return Err(TaxInputError::NegativeAmount { field });
    }
    Ok(())
}
