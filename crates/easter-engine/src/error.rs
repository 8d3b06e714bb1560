//! Error types for easter-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EasterError {
    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    /// Easter Sunday of this year has no `NaiveDate` representation.
    #[error("Easter Sunday of year {0} is not representable")]
    UnrepresentableYear(i32),
}

pub type Result<T> = std::result::Result<T, EasterError>;
