//! Errors raised by transaction guards and transitions.

use libris_core::{BookId, LoanId, ValidationError};
use thiserror::Error;

/// A transaction step that was refused before any request was issued.
///
/// Guard variants display the exact text shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Borrowing requires a decoded identity.
    #[error("Please log in to borrow books.")]
    NotLoggedIn,

    /// The cached copy count says nothing is on the shelf.
    #[error("No copies available to borrow.")]
    NoCopiesAvailable {
        /// The book that was requested.
        book_id: BookId,
    },

    /// The duration typed in the confirmation step was not a positive
    /// whole number.
    #[error("Please enter a valid number of days.")]
    InvalidDuration(#[source] ValidationError),

    /// A return was requested for a loan the server already closed.
    #[error("loan {loan_id} has already been returned")]
    LoanNotActive {
        /// The loan.
        loan_id: LoanId,
    },

    /// The requested step is not valid from the machine's current state.
    #[error("cannot {action} a {flow} in state {from}")]
    InvalidTransition {
        /// Which machine refused.
        flow: &'static str,
        /// Its state at the time.
        from: &'static str,
        /// The attempted step.
        action: &'static str,
    },
}

impl TransactionError {
    /// Whether the error is a local guard (shown to the user as a warning)
    /// rather than a programming error in the driver.
    pub fn is_guard(&self) -> bool {
        !matches!(self, Self::InvalidTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_messages_are_user_facing() {
        assert_eq!(
            TransactionError::NotLoggedIn.to_string(),
            "Please log in to borrow books."
        );
        assert_eq!(
            TransactionError::NoCopiesAvailable { book_id: BookId::new(1) }.to_string(),
            "No copies available to borrow."
        );
        assert_eq!(
            TransactionError::InvalidDuration(ValidationError::InvalidBorrowDuration("x".into()))
                .to_string(),
            "Please enter a valid number of days."
        );
    }

    #[test]
    fn invalid_transition_is_not_a_guard() {
        let err = TransactionError::InvalidTransition {
            flow: "borrow",
            from: "IDLE",
            action: "confirm",
        };
        assert!(!err.is_guard());
        assert_eq!(err.to_string(), "cannot confirm a borrow in state IDLE");
        assert!(TransactionError::NotLoggedIn.is_guard());
    }
}
