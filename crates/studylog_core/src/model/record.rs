//! Study record domain model.
//!
//! # Responsibility
//! - Define the canonical study record shared by every store and view.
//! - Own input validation for titles and hours.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused within one list.
//! - `title` is non-empty.
//! - `hours` is finite and `>= 0`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a study record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = i64;

/// One stored study entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identity assigned by the store on insert.
    pub id: RecordId,
    /// What was studied.
    pub title: String,
    /// Time spent, in hours.
    pub hours: f64,
}

/// Insert payload for a study record. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub title: String,
    pub hours: f64,
}

/// Validation failures for record input.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    /// Title is the empty string.
    EmptyTitle,
    /// Hours is NaN or infinite.
    InvalidHours,
    /// Hours is a number below zero.
    NegativeHours(f64),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::InvalidHours => write!(f, "hours must be a number"),
            Self::NegativeHours(value) => write!(f, "hours must not be negative, got {value}"),
        }
    }
}

impl Error for RecordValidationError {}

/// Validates raw title/hours input.
///
/// Pure: no side effects. Title emptiness is checked on the raw text.
pub fn validate(title: &str, hours: f64) -> Result<(), RecordValidationError> {
    if title.is_empty() {
        return Err(RecordValidationError::EmptyTitle);
    }
    if !hours.is_finite() {
        return Err(RecordValidationError::InvalidHours);
    }
    if hours < 0.0 {
        return Err(RecordValidationError::NegativeHours(hours));
    }
    Ok(())
}

/// Sums `hours` over a record list. Empty lists sum to `0`.
pub fn total_hours(records: &[Record]) -> f64 {
    // `Sum for f64` starts from -0.0, which renders as "-0".
    records.iter().fold(0.0, |sum, record| sum + record.hours)
}

/// Returns the first id that occurs more than once, if any.
pub fn find_duplicate_id(records: &[Record]) -> Option<RecordId> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .map(|record| record.id)
        .find(|id| !seen.insert(*id))
}

impl NewRecord {
    pub fn new(title: impl Into<String>, hours: f64) -> Self {
        Self {
            title: title.into(),
            hours,
        }
    }

    /// Checks this payload against record invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate(&self.title, self.hours)
    }

    /// Attaches a store-assigned id.
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            title: self.title,
            hours: self.hours,
        }
    }
}

impl Record {
    /// Checks this record against record invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate(&self.title, self.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::{find_duplicate_id, total_hours, validate, Record, RecordValidationError};

    fn record(id: i64, hours: f64) -> Record {
        Record {
            id,
            title: format!("r{id}"),
            hours,
        }
    }

    #[test]
    fn validate_rejects_empty_title_and_bad_hours() {
        assert_eq!(validate("", 5.0), Err(RecordValidationError::EmptyTitle));
        assert_eq!(
            validate("x", -1.0),
            Err(RecordValidationError::NegativeHours(-1.0))
        );
        assert_eq!(
            validate("x", f64::NAN),
            Err(RecordValidationError::InvalidHours)
        );
        assert_eq!(
            validate("x", f64::INFINITY),
            Err(RecordValidationError::InvalidHours)
        );
    }

    #[test]
    fn validate_accepts_zero_hours() {
        assert!(validate("x", 0.0).is_ok());
        assert!(validate(" ", 1.5).is_ok());
    }

    #[test]
    fn total_hours_sums_fractions_and_handles_empty() {
        assert_eq!(total_hours(&[record(1, 1.0), record(2, 2.5)]), 3.5);
        assert_eq!(total_hours(&[]), 0.0);
        assert!(total_hours(&[]).is_sign_positive());
        assert_eq!(total_hours(&[]).to_string(), "0");
    }

    #[test]
    fn find_duplicate_id_reports_repeated_id() {
        assert_eq!(find_duplicate_id(&[record(1, 1.0), record(2, 1.0)]), None);
        assert_eq!(
            find_duplicate_id(&[record(1, 1.0), record(2, 1.0), record(1, 3.0)]),
            Some(1)
        );
    }
}
