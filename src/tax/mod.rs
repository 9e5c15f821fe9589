//! Tax computation engine.
//!
//! Pure, stateless functions that turn income and deduction figures into
//! calculated tax, payable amount, refund, and a comparison between the two
//! supported regimes. The engine implements a fixed snapshot of the bracket
//! tables; it performs no I/O and holds no state.
//!
//! - Regimes and bracket tables in [`regime`]
//! - Input validation and full assessments in [`assessment`]
//! - Regime comparison in [`comparison`]

pub mod assessment;
pub mod comparison;
mod error;
pub mod regime;

pub use assessment::{
    Settlement, TaxAssessment, TaxInputs, assess, checked_total, effective_rate, settle,
    taxable_income, total_deductions, total_income,
};
pub use comparison::{RegimeComparison, compare_regimes};
pub use error::{ParseRegimeError, TaxInputError};
pub use regime::{Bracket, Regime, calculate_tax};

#[cfg(test)]
mod tests;
