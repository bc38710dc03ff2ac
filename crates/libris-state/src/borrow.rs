//! # Borrow Flow
//!
//! ```text
//! IDLE ──open──▶ AWAITING_CONFIRMATION ──confirm──▶ SUBMITTING ──▶ SUCCEEDED
//!   ▲                  │        ▲                       │
//!   └────dismiss───────┘        └─ invalid duration     └────────▶ FAILED
//! ```
//!
//! `open` checks that the user is logged in and that the cached book shows at
//! least one available copy. `confirm` checks the typed duration. A refused
//! step leaves the state unchanged. Neither terminal state touches the cached
//! copy count: the server is re-read instead.

use serde::Serialize;

use libris_core::{Book, BookId, BorrowDays, Identity};

use crate::error::TransactionError;

/// States of a borrow transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorrowState {
    /// Nothing requested yet.
    Idle,
    /// Confirmation step open, waiting for a duration.
    AwaitingConfirmation,
    /// The borrow request is in flight.
    Submitting,
    /// The server accepted the borrow. Terminal.
    Succeeded,
    /// The server refused or could not be reached. Terminal.
    Failed,
}

impl BorrowState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Canonical state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            Self::Submitting => "SUBMITTING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for BorrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One borrow transaction for one book.
#[derive(Debug, Clone)]
pub struct BorrowFlow {
    book_id: BookId,
    title: String,
    available_copies: i32,
    state: BorrowState,
    days_input: String,
}

impl BorrowFlow {
    /// Start a flow from the cached copy of a book.
    pub fn new(book: &Book) -> Self {
        Self {
            book_id: book.id,
            title: book.title.clone(),
            available_copies: book.available_copies,
            state: BorrowState::Idle,
            days_input: BorrowDays::DEFAULT_INPUT.to_string(),
        }
    }

    /// The book being borrowed.
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    /// Its title, for messages.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current state.
    pub fn state(&self) -> BorrowState {
        self.state
    }

    /// The duration text currently in the confirmation step.
    pub fn days_input(&self) -> &str {
        &self.days_input
    }

    /// Open the confirmation step.
    ///
    /// Refused with [`TransactionError::NotLoggedIn`] when there is no
    /// identity, then with [`TransactionError::NoCopiesAvailable`] when the
    /// cached book has no copy on the shelf.
    pub fn open(&mut self, identity: Option<&Identity>) -> Result<(), TransactionError> {
        self.expect(BorrowState::Idle, "open")?;
        if identity.is_none() {
            return Err(TransactionError::NotLoggedIn);
        }
        if self.available_copies < 1 {
            return Err(TransactionError::NoCopiesAvailable {
                book_id: self.book_id,
            });
        }
        self.days_input = BorrowDays::DEFAULT_INPUT.to_string();
        self.state = BorrowState::AwaitingConfirmation;
        Ok(())
    }

    /// Replace the duration text. Only meaningful while awaiting
    /// confirmation.
    pub fn set_days_input(&mut self, input: impl Into<String>) -> Result<(), TransactionError> {
        self.expect(BorrowState::AwaitingConfirmation, "edit")?;
        self.days_input = input.into();
        Ok(())
    }

    /// Close the confirmation step without borrowing.
    pub fn dismiss(&mut self) -> Result<(), TransactionError> {
        self.expect(BorrowState::AwaitingConfirmation, "dismiss")?;
        self.state = BorrowState::Idle;
        Ok(())
    }

    /// Confirm the borrow. On success the flow is `SUBMITTING` and the
    /// parsed duration is returned for the request.
    pub fn confirm(&mut self) -> Result<BorrowDays, TransactionError> {
        self.expect(BorrowState::AwaitingConfirmation, "confirm")?;
        let days = BorrowDays::parse(&self.days_input).map_err(TransactionError::InvalidDuration)?;
        self.state = BorrowState::Submitting;
        Ok(days)
    }

    /// Record the server's acceptance.
    pub fn succeed(&mut self) -> Result<(), TransactionError> {
        self.expect(BorrowState::Submitting, "complete")?;
        self.state = BorrowState::Succeeded;
        Ok(())
    }

    /// Record a failed submission.
    pub fn fail(&mut self) -> Result<(), TransactionError> {
        self.expect(BorrowState::Submitting, "fail")?;
        self.state = BorrowState::Failed;
        Ok(())
    }

    fn expect(&self, required: BorrowState, action: &'static str) -> Result<(), TransactionError> {
        if self.state == required {
            Ok(())
        } else {
            Err(TransactionError::InvalidTransition {
                flow: "borrow",
                from: self.state.as_str(),
                action,
            })
        }
    }
}
