//! Typed client for the Libris loans API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/loans/borrow/{bookId}?durationDays=` | Borrow a copy |
//! | GET    | `/api/loans/my` | The caller's loans, active and returned |
//! | POST   | `/api/loans/return/{loanId}` | Return a borrowed copy |
//!
//! Mutations discard the response body. Callers re-read loans and books
//! afterwards; the server is the only source of truth for availability.

use reqwest::Method;

use libris_core::{BookId, BorrowDays, Loan, LoanId};

use crate::error::ApiError;
use crate::transport::Transport;

/// Client for the Libris loans API.
#[derive(Debug, Clone)]
pub struct LoanClient {
    transport: Transport,
}

impl LoanClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Borrow a copy of a book for the given number of days.
    ///
    /// Calls `POST /api/loans/borrow/{bookId}?durationDays={days}`.
    pub async fn borrow(&self, book_id: BookId, days: BorrowDays) -> Result<(), ApiError> {
        let endpoint = format!("POST /api/loans/borrow/{book_id}");
        let id = book_id.to_string();
        let builder = self
            .transport
            .request(Method::POST, &["api", "loans", "borrow", &id])
            .query(&[("durationDays", days.get())]);
        self.transport.empty(&endpoint, builder).await
    }

    /// The caller's loans.
    ///
    /// Calls `GET /api/loans/my`.
    pub async fn mine(&self) -> Result<Vec<Loan>, ApiError> {
        let builder = self.transport.request(Method::GET, &["api", "loans", "my"]);
        self.transport.json("GET /api/loans/my", builder).await
    }

    /// Return a borrowed copy.
    ///
    /// Calls `POST /api/loans/return/{loanId}`.
    pub async fn return_loan(&self, loan_id: LoanId) -> Result<(), ApiError> {
        let endpoint = format!("POST /api/loans/return/{loan_id}");
        let id = loan_id.to_string();
        let builder = self
            .transport
            .request(Method::POST, &["api", "loans", "return", &id]);
        self.transport.empty(&endpoint, builder).await
    }
}
