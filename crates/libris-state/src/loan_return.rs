//! # Return Flow
//!
//! `ACTIVE → RETURN_SUBMITTING → {RETURNED, RETURN_FAILED}`
//!
//! A flow exists only for a loan without a return date. The single
//! transition into `RETURNED` hands out the loan's one [`RatingPrompt`].

use serde::Serialize;

use libris_core::{BookId, Loan, LoanId};

use crate::error::TransactionError;
use crate::rating::RatingPrompt;

/// States of a return transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnState {
    /// The loan is out and may be returned.
    Active,
    /// The return request is in flight.
    ReturnSubmitting,
    /// The server recorded the return. Terminal.
    Returned,
    /// The return was not recorded. Terminal; the loan is still active.
    ReturnFailed,
}

impl ReturnState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Returned | Self::ReturnFailed)
    }

    /// Canonical state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::ReturnSubmitting => "RETURN_SUBMITTING",
            Self::Returned => "RETURNED",
            Self::ReturnFailed => "RETURN_FAILED",
        }
    }
}

impl std::fmt::Display for ReturnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One return transaction for one loan.
#[derive(Debug, Clone)]
pub struct ReturnFlow {
    loan_id: LoanId,
    book_id: BookId,
    title: String,
    state: ReturnState,
}

impl ReturnFlow {
    /// Start a return. Refused for a loan that already has a return date.
    pub fn new(loan: &Loan) -> Result<Self, TransactionError> {
        if !loan.is_active() {
            return Err(TransactionError::LoanNotActive { loan_id: loan.id });
        }
        Ok(Self {
            loan_id: loan.id,
            book_id: loan.book.id,
            title: loan.book.title.clone(),
            state: ReturnState::Active,
        })
    }

    /// The loan being returned.
    pub fn loan_id(&self) -> LoanId {
        self.loan_id
    }

    /// The borrowed book.
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    /// Current state.
    pub fn state(&self) -> ReturnState {
        self.state
    }

    /// Move to `RETURN_SUBMITTING`.
    pub fn submit(&mut self) -> Result<(), TransactionError> {
        self.expect(ReturnState::Active, "submit")?;
        self.state = ReturnState::ReturnSubmitting;
        Ok(())
    }

    /// Record the server's acceptance and produce the rating prompt for the
    /// returned book. This transition happens at most once per flow.
    pub fn succeed(&mut self) -> Result<RatingPrompt, TransactionError> {
        self.expect(ReturnState::ReturnSubmitting, "complete")?;
        self.state = ReturnState::Returned;
        Ok(RatingPrompt::new(self.book_id, self.title.clone()))
    }

    /// Record a failed submission.
    pub fn fail(&mut self) -> Result<(), TransactionError> {
        self.expect(ReturnState::ReturnSubmitting, "fail")?;
        self.state = ReturnState::ReturnFailed;
        Ok(())
    }

    fn expect(&self, required: ReturnState, action: &'static str) -> Result<(), TransactionError> {
        if self.state == required {
            Ok(())
        } else {
            Err(TransactionError::InvalidTransition {
                flow: "return",
                from: self.state.as_str(),
                action,
            })
        }
    }
}
