//! Side-by-side comparison of the two regimes.

use super::{
    Regime, TaxInputError, assessment::ensure_non_negative, calculate_tax, taxable_income,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax under each regime and the cheaper choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    /// Tax under the new regime.
    pub new_regime_tax: Decimal,
    /// Tax under the old regime.
    pub old_regime_tax: Decimal,
    /// Regime with the lower tax; the new regime wins ties.
    pub recommended: Regime,
    /// Absolute difference between the two.
    pub savings: Decimal,
}

/// Compares both regimes for the same income and deductions.
///
/// Deductions reduce taxable income under both regimes, matching how a
/// filing's own tax snapshot is computed.
///
/// # Errors
///
/// Returns [`TaxInputError::NegativeAmount`] when either input is negative and
/// [`TaxInputError::AmountTooLarge`] when a tax figure overflows.
pub fn compare_regimes(
    income: Decimal,
    deductions: Decimal,
) -> Result<RegimeComparison, TaxInputError> {
    ensure_non_negative("income", income)?;
    ensure_non_negative("deductions", deductions)?;

    let taxable = taxable_income(income, deductions);
    let new_regime_tax = calculate_tax(taxable, Regime::New)?;
    let old_regime_tax = calculate_tax(taxable, Regime::Old)?;
    let recommended = if new_regime_tax <= old_regime_tax {
        Regime::New
    } else {
        Regime::Old
    };

    Ok(RegimeComparison {
        new_regime_tax,
        old_regime_tax,
        recommended,
        savings: (new_regime_tax - old_regime_tax).abs(),
    })
}
