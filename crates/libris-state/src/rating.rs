//! # Rating Prompt
//!
//! `PROMPT → SUBMITTING → {SUCCEEDED, FAILED}`, or `PROMPT → DISMISSED`.
//!
//! Only a successful return can create one (see
//! [`crate::ReturnFlow::succeed`]). Both submission outcomes close the prompt;
//! a failed rating never reopens it and never affects the return.

use serde::Serialize;

use libris_core::{BookId, Rating};

use crate::error::TransactionError;

/// States of a rating prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatingState {
    /// Waiting for the user to pick a value.
    Prompt,
    /// The rating request is in flight.
    Submitting,
    /// The rating was recorded. Terminal.
    Succeeded,
    /// The rating was not recorded. Terminal.
    Failed,
    /// Closed without rating. Terminal.
    Dismissed,
}

impl RatingState {
    /// Whether the prompt is closed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Dismissed)
    }

    /// Canonical state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "PROMPT",
            Self::Submitting => "SUBMITTING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Dismissed => "DISMISSED",
        }
    }
}

impl std::fmt::Display for RatingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one-shot rating prompt offered after a return.
#[derive(Debug, Clone)]
pub struct RatingPrompt {
    book_id: BookId,
    title: String,
    value: Rating,
    state: RatingState,
}

impl RatingPrompt {
    pub(crate) fn new(book_id: BookId, title: String) -> Self {
        Self {
            book_id,
            title,
            value: Rating::default(),
            state: RatingState::Prompt,
        }
    }

    /// The book to rate.
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    /// Its title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The selected value. Starts at the midpoint.
    pub fn value(&self) -> Rating {
        self.value
    }

    /// Current state.
    pub fn state(&self) -> RatingState {
        self.state
    }

    /// Change the selected value.
    pub fn select(&mut self, rating: Rating) -> Result<(), TransactionError> {
        self.expect(RatingState::Prompt, "select")?;
        self.value = rating;
        Ok(())
    }

    /// Move to `SUBMITTING` and return the value to send.
    pub fn submit(&mut self) -> Result<Rating, TransactionError> {
        self.expect(RatingState::Prompt, "submit")?;
        self.state = RatingState::Submitting;
        Ok(self.value)
    }

    /// Record the server's acceptance.
    pub fn succeed(&mut self) -> Result<(), TransactionError> {
        self.expect(RatingState::Submitting, "complete")?;
        self.state = RatingState::Succeeded;
        Ok(())
    }

    /// Record a failed submission.
    pub fn fail(&mut self) -> Result<(), TransactionError> {
        self.expect(RatingState::Submitting, "fail")?;
        self.state = RatingState::Failed;
        Ok(())
    }

    /// Close without rating.
    pub fn dismiss(&mut self) -> Result<(), TransactionError> {
        self.expect(RatingState::Prompt, "dismiss")?;
        self.state = RatingState::Dismissed;
        Ok(())
    }

    fn expect(&self, required: RatingState, action: &'static str) -> Result<(), TransactionError> {
        if self.state == required {
            Ok(())
        } else {
            Err(TransactionError::InvalidTransition {
                flow: "rating",
                from: self.state.as_str(),
                action,
            })
        }
    }
}
