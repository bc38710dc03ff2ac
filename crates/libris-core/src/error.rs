//! # Validation Errors
//!
//! Local, pre-network validation failures. Producing one of these never has a
//! side effect: no request is issued and no session state changes.
//!
//! Messages for admin form fields are the exact user-facing texts, so callers
//! can forward `to_string()` straight into a notification.

use thiserror::Error;

/// Validation errors for form inputs and domain primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A credential string was empty or whitespace.
    #[error("credential must be non-empty")]
    EmptyCredential,

    /// Borrow duration was not a positive integer number of days.
    #[error("invalid borrow duration: \"{0}\" (expected a positive whole number of days)")]
    InvalidBorrowDuration(String),

    /// Rating was not an integer between 1 and 5.
    #[error("invalid rating: \"{0}\" (expected a whole number from 1 to 5)")]
    InvalidRating(String),

    /// ISBN was not exactly 10 or 13 digits.
    #[error("ISBN must be 10 or 13 digits.")]
    InvalidIsbn(String),

    /// Publication year was not a 4-digit year in range.
    #[error("Year must be a 4-digit number between 1000 and the current year.")]
    InvalidYear(String),

    /// Copy count was not a positive integer.
    #[error("Total copies must be a positive whole number.")]
    InvalidCopies(String),

    /// A required text field was empty.
    #[error("{0} is required.")]
    MissingField(&'static str),

    /// A title search was requested with a blank title.
    #[error("title search must not be blank")]
    BlankSearchTitle,
}
