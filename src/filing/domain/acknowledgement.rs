//! Acknowledgement numbers stamped on filed returns.

use super::{AssessmentYear, FilingDomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimal digits in the unique suffix.
pub const ACKNOWLEDGEMENT_SUFFIX_DIGITS: usize = 12;

const SUFFIX_MODULUS: u128 = 1_000_000_000_000;

/// Fixed leading letters of every acknowledgement number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AcknowledgementPrefix(String);

impl AcknowledgementPrefix {
    /// Creates a validated prefix of 1 to 8 uppercase ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidAcknowledgementPrefix`] otherwise.
    pub fn new(value: impl Into<String>) -> Result<Self, FilingDomainError> {
        let raw = value.into();
        let is_valid =
            (1..=8).contains(&raw.len()) && raw.chars().all(|ch| ch.is_ascii_uppercase());
        if !is_valid {
            return Err(FilingDomainError::InvalidAcknowledgementPrefix(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the prefix as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AcknowledgementPrefix {
    fn default() -> Self {
        Self("ITD".to_owned())
    }
}

impl fmt::Display for AcknowledgementPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a filed return: prefix, assessment start year, and a
/// twelve-digit suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcknowledgementNumber(String);

impl AcknowledgementNumber {
    /// Composes a number from its parts.
    ///
    /// Only the low twelve decimal digits of `entropy` are used.
    #[must_use]
    pub fn compose(
        prefix: &AcknowledgementPrefix,
        year: AssessmentYear,
        entropy: u128,
    ) -> Self {
        let suffix = entropy.rem_euclid(SUFFIX_MODULUS);
        Self(format!(
            "{prefix}{year:04}{suffix:0width$}",
            year = year.start_year(),
            width = ACKNOWLEDGEMENT_SUFFIX_DIGITS
        ))
    }

    /// Parses a persisted acknowledgement number.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidAcknowledgementNumber`] when the
    /// value is not letters followed by exactly sixteen digits.
    pub fn parse(value: &str) -> Result<Self, FilingDomainError> {
        let digits_start = value
            .find(|ch: char| ch.is_ascii_digit())
            .unwrap_or(value.len());
        let (letters, digits) = value.split_at(digits_start);
        let is_valid = AcknowledgementPrefix::new(letters).is_ok()
            && digits.len() == 4 + ACKNOWLEDGEMENT_SUFFIX_DIGITS
            && digits.chars().all(|ch| ch.is_ascii_digit());
        if !is_valid {
            return Err(FilingDomainError::InvalidAcknowledgementNumber(
                value.to_owned(),
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Returns the number as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AcknowledgementNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AcknowledgementNumber {
    type Error = FilingDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AcknowledgementNumber> for String {
    fn from(value: AcknowledgementNumber) -> Self {
        value.0
    }
}

/// Terminal artefact of a filed return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Issued number.
    pub number: AcknowledgementNumber,
    /// When the return was filed.
    pub filed_at: DateTime<Utc>,
}
