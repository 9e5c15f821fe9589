//! Tax regimes and their progressive bracket tables.

use super::{ParseRegimeError, TaxInputError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One slice of a progressive bracket table.
///
/// Income inside `(lower, upper]` is taxed at `base + (income - lower) * rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// Exclusive lower bound of the slice.
    pub lower: Decimal,
    /// Inclusive upper bound of the slice; `None` for the top slice.
    pub upper: Option<Decimal>,
    /// Marginal rate applied inside the slice.
    pub rate: Decimal,
    /// Tax accumulated by all lower slices.
    pub base: Decimal,
}

const NEW_REGIME: [Bracket; 6] = [
    Bracket {
        lower: dec!(0),
        upper: Some(dec!(300000)),
        rate: dec!(0),
        base: dec!(0),
    },
    Bracket {
        lower: dec!(300000),
        upper: Some(dec!(600000)),
        rate: dec!(0.05),
        base: dec!(0),
    },
    Bracket {
        lower: dec!(600000),
        upper: Some(dec!(900000)),
        rate: dec!(0.10),
        base: dec!(15000),
    },
    Bracket {
        lower: dec!(900000),
        upper: Some(dec!(1200000)),
        rate: dec!(0.15),
        base: dec!(45000),
    },
    Bracket {
        lower: dec!(1200000),
        upper: Some(dec!(1500000)),
        rate: dec!(0.20),
        base: dec!(90000),
    },
    Bracket {
        lower: dec!(1500000),
        upper: None,
        rate: dec!(0.30),
        base: dec!(150000),
    },
];

const OLD_REGIME: [Bracket; 4] = [
    Bracket {
        lower: dec!(0),
        upper: Some(dec!(250000)),
        rate: dec!(0),
        base: dec!(0),
    },
    Bracket {
        lower: dec!(250000),
        upper: Some(dec!(500000)),
        rate: dec!(0.05),
        base: dec!(0),
    },
    Bracket {
        lower: dec!(500000),
        upper: Some(dec!(1000000)),
        rate: dec!(0.20),
        base: dec!(12500),
    },
    Bracket {
        lower: dec!(1000000),
        upper: None,
        rate: dec!(0.30),
        base: dec!(112500),
    },
];

/// Tax computation scheme selected for a return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Lower rates, fewer deductions.
    #[default]
    New,
    /// Higher marginal rates, more deductions.
    Old,
}

impl Regime {
    /// Both regimes, new first.
    pub const ALL: [Self; 2] = [Self::New, Self::Old];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
        }
    }

    /// Returns the bracket table, ordered from the lowest slice upwards.
    #[must_use]
    pub const fn brackets(self) -> &'static [Bracket] {
        match self {
            Self::New => &NEW_REGIME,
            Self::Old => &OLD_REGIME,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Regime {
    type Error = ParseRegimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "old" => Ok(Self::Old),
            _ => Err(ParseRegimeError(value.to_owned())),
        }
    }
}

/// Computes progressive tax on `taxable` income under `regime`.
///
/// Non-positive income carries no tax.
///
/// # Errors
///
/// Returns [`TaxInputError::AmountTooLarge`] when the tax does not fit in a
/// [`Decimal`].
pub fn calculate_tax(taxable: Decimal, regime: Regime) -> Result<Decimal, TaxInputError> {
    if taxable <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    regime
        .brackets()
        .iter()
        .find(|bracket| bracket.upper.is_none_or(|upper| taxable <= upper))
        .map_or(Ok(Decimal::ZERO), |bracket| {
            (taxable - bracket.lower)
                .checked_mul(bracket.rate)
                .and_then(|slice| slice.checked_add(bracket.base))
                .ok_or(TaxInputError::AmountTooLarge {
                    field: "calculated tax",
                })
        })
}
