//! Identifier and validated scalar types for the filing domain.

use super::FilingDomainError;
use chrono::Datelike;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilingId(Uuid);

impl FilingId {
    /// Creates a new random filing identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a filing identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for FilingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FilingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Creates a new random comment identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a comment identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a taxpayer account owned by the user collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user reference.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user reference from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a chartered accountant (reviewer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaId(Uuid);

impl CaId {
    /// Creates a new random reviewer reference.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a reviewer reference from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fiscal year a filing pertains to, written `YYYY-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssessmentYear {
    start: i32,
}

impl AssessmentYear {
    /// Earliest supported first calendar year.
    pub const MIN_START: i32 = 1000;
    /// Latest supported first calendar year; its successor still has four
    /// digits.
    pub const MAX_START: i32 = 9998;

    /// Creates the assessment year beginning in `start`.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidAssessmentYear`] when either
    /// calendar year would not have four digits.
    pub fn starting_in(start: i32) -> Result<Self, FilingDomainError> {
        if !(Self::MIN_START..=Self::MAX_START).contains(&start) {
            return Err(FilingDomainError::InvalidAssessmentYear(format!(
                "{start}-{}",
                i64::from(start) + 1
            )));
        }
        Ok(Self { start })
    }

    /// Returns the assessment year beginning in the clock's current year.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidAssessmentYear`] when the clock
    /// reports a year outside the supported range.
    pub fn current(clock: &impl Clock) -> Result<Self, FilingDomainError> {
        Self::starting_in(clock.utc().year())
    }

    /// Parses a `YYYY-YYYY` string.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidAssessmentYear`] when the value is
    /// not two four-digit years where the second follows the first, or when
    /// the first year is below [`Self::MIN_START`].
    pub fn parse(value: &str) -> Result<Self, FilingDomainError> {
        let invalid = || FilingDomainError::InvalidAssessmentYear(value.to_owned());
        let (first, second) = value.trim().split_once('-').ok_or_else(invalid)?;
        let is_year = |part: &str| part.len() == 4 && part.chars().all(|ch| ch.is_ascii_digit());
        if !is_year(first) || !is_year(second) {
            return Err(invalid());
        }
        let start: i32 = first.parse().map_err(|_| invalid())?;
        let end: i32 = second.parse().map_err(|_| invalid())?;
        if end != start + 1 || start < Self::MIN_START {
            return Err(invalid());
        }
        Ok(Self { start })
    }

    /// Returns the first calendar year.
    #[must_use]
    pub const fn start_year(self) -> i32 {
        self.start
    }
}

impl fmt::Display for AssessmentYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.start + 1)
    }
}

impl TryFrom<String> for AssessmentYear {
    type Error = FilingDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssessmentYear> for String {
    fn from(value: AssessmentYear) -> Self {
        value.to_string()
    }
}

/// Permanent account number in `AAAAA9999A` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pan(String);

impl Pan {
    /// Creates a validated PAN, normalising to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::InvalidPan`] when the value does not have
    /// five letters, four digits, and a trailing letter.
    pub fn new(value: impl Into<String>) -> Result<Self, FilingDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();
        let shape_matches = normalized.len() == 10
            && normalized.char_indices().all(|(index, ch)| match index {
                5..=8 => ch.is_ascii_digit(),
                _ => ch.is_ascii_uppercase(),
            });
        if !shape_matches {
            return Err(FilingDomainError::InvalidPan(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the PAN as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Pan {
    type Error = FilingDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pan> for String {
    fn from(value: Pan) -> Self {
        value.0
    }
}
