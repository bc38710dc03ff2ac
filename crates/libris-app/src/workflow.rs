//! # Transaction Workflow
//!
//! Drives the borrow, return and rating machines from `libris-state` against
//! the API. Each step is a single attempt. Every outcome, refused or failed
//! or successful, is pushed to the notification channel, and every failure
//! leaves the machine in a state from which the user can simply try again.
//!
//! Nothing here adjusts cached copy counts or loan lists. After a mutation
//! the caller re-reads the server (a successful return does so itself).

use thiserror::Error;

use libris_client::{ApiClient, ApiError, CredentialSource};
use libris_core::{Book, Identity, Loan, Rating};
use libris_state::{BorrowFlow, RatingPrompt, ReturnFlow, TransactionError};

use crate::notify::Notifier;
use crate::ratings::RatingCache;
use crate::session::SessionHandle;

/// Workflow failures. Display text is what the user is shown.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A local guard refused the step; no request was sent.
    #[error(transparent)]
    Refused(#[from] TransactionError),

    #[error("Failed to borrow book.")]
    Borrow(#[source] ApiError),

    #[error("Failed to return book")]
    Return(#[source] ApiError),

    #[error("Failed to submit rating.")]
    Rating(#[source] ApiError),

    #[error("failed to fetch loans")]
    Loans(#[source] ApiError),
}

impl WorkflowError {
    /// Whether the server rejected the session's credential.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Borrow(e) | Self::Return(e) | Self::Rating(e) | Self::Loans(e) => {
                e.is_unauthorized()
            }
            Self::Refused(_) => false,
        }
    }
}

/// What a successful return leaves behind.
#[derive(Debug)]
pub struct ReturnOutcome {
    /// The one rating prompt for the returned book.
    pub prompt: RatingPrompt,
    /// The caller's loans as re-read after the return, if that read worked.
    pub loans: Option<Vec<Loan>>,
}

/// Async driver for borrow, return and rate.
#[derive(Debug, Clone)]
pub struct TransactionWorkflow {
    client: ApiClient,
    session: SessionHandle,
    ratings: RatingCache,
    notifier: Notifier,
}

impl TransactionWorkflow {
    /// A workflow that invalidates `ratings` after each accepted rating.
    pub fn new(
        client: ApiClient,
        session: SessionHandle,
        ratings: RatingCache,
        notifier: Notifier,
    ) -> Self {
        Self {
            client,
            session,
            ratings,
            notifier,
        }
    }

    fn identity(&self) -> Option<Identity> {
        self.session.current().and_then(|c| c.identity())
    }

    fn refuse(&self, err: TransactionError) -> WorkflowError {
        if err.is_guard() {
            self.notifier.warning(err.to_string());
        } else {
            tracing::error!(error = %err, "workflow step out of order");
        }
        WorkflowError::Refused(err)
    }

    // ── Borrow ──────────────────────────────────────────────────────────

    /// The caller's identity. When logged out, queues the same refusal a
    /// borrow would, so callers can check before fetching anything.
    pub fn require_identity(&self) -> Result<Identity, WorkflowError> {
        self.identity()
            .ok_or_else(|| self.refuse(TransactionError::NotLoggedIn))
    }

    /// Open the confirmation step for a cached book. Refused, with a
    /// warning, when logged out or when no copy is on the shelf.
    pub fn begin_borrow(&self, book: &Book) -> Result<BorrowFlow, WorkflowError> {
        let mut flow = BorrowFlow::new(book);
        flow.open(self.identity().as_ref())
            .map_err(|e| self.refuse(e))?;
        Ok(flow)
    }

    /// Confirm with the typed duration and submit. An invalid duration is
    /// refused and the flow stays open for another attempt.
    pub async fn confirm_borrow(
        &self,
        flow: &mut BorrowFlow,
        days_input: &str,
    ) -> Result<(), WorkflowError> {
        flow.set_days_input(days_input).map_err(|e| self.refuse(e))?;
        let days = flow.confirm().map_err(|e| self.refuse(e))?;

        match self.client.loans().borrow(flow.book_id(), days).await {
            Ok(()) => {
                flow.succeed()?;
                tracing::info!(book = %flow.book_id(), days = days.get(), "borrowed");
                self.notifier.success("Book borrowed!");
                Ok(())
            }
            Err(e) => {
                flow.fail()?;
                tracing::warn!(book = %flow.book_id(), error = %e, "borrow failed");
                let err = WorkflowError::Borrow(e);
                self.notifier.error(err.to_string());
                Err(err)
            }
        }
    }

    /// Open, confirm and submit in one go.
    pub async fn borrow(&self, book: &Book, days_input: &str) -> Result<BorrowFlow, WorkflowError> {
        let mut flow = self.begin_borrow(book)?;
        self.confirm_borrow(&mut flow, days_input).await?;
        Ok(flow)
    }

    // ── Return ──────────────────────────────────────────────────────────

    /// The caller's loans, active and returned. A failed read raises no
    /// notification; the loan list simply stays as it was.
    pub async fn my_loans(&self) -> Result<Vec<Loan>, WorkflowError> {
        self.client.loans().mine().await.map_err(|e| {
            tracing::warn!(error = %e, "loan list fetch failed");
            WorkflowError::Loans(e)
        })
    }

    /// Return an active loan. On success the loan list is re-read and the
    /// returned book's rating prompt is handed back.
    pub async fn return_loan(&self, loan: &Loan) -> Result<ReturnOutcome, WorkflowError> {
        let mut flow = ReturnFlow::new(loan).map_err(|e| self.refuse(e))?;
        flow.submit()?;

        if let Err(e) = self.client.loans().return_loan(flow.loan_id()).await {
            flow.fail()?;
            tracing::warn!(loan = %flow.loan_id(), error = %e, "return failed");
            let err = WorkflowError::Return(e);
            self.notifier.error(err.to_string());
            return Err(err);
        }

        let prompt = flow.succeed()?;
        tracing::info!(loan = %flow.loan_id(), book = %flow.book_id(), "returned");
        self.notifier.success("Book returned!");

        let loans = match self.client.loans().mine().await {
            Ok(l) => Some(l),
            Err(e) => {
                tracing::warn!(error = %e, "loan list not refreshed after return");
                None
            }
        };
        Ok(ReturnOutcome { prompt, loans })
    }

    // ── Rate ────────────────────────────────────────────────────────────

    /// Submit the prompt's rating, optionally replacing the selected value
    /// first. Success or failure, the prompt is closed afterwards.
    pub async fn submit_rating(
        &self,
        prompt: &mut RatingPrompt,
        rating: Option<Rating>,
    ) -> Result<(), WorkflowError> {
        if let Some(r) = rating {
            prompt.select(r).map_err(|e| self.refuse(e))?;
        }
        let value = prompt.submit().map_err(|e| self.refuse(e))?;

        match self.client.ratings().rate(prompt.book_id(), value).await {
            Ok(()) => {
                prompt.succeed()?;
                self.ratings.invalidate(prompt.book_id());
                tracing::info!(book = %prompt.book_id(), rating = value.get(), "rated");
                self.notifier.success("Rating submitted!");
                Ok(())
            }
            Err(e) => {
                prompt.fail()?;
                tracing::warn!(book = %prompt.book_id(), error = %e, "rating failed");
                let err = WorkflowError::Rating(e);
                self.notifier.error(err.to_string());
                Err(err)
            }
        }
    }
}
