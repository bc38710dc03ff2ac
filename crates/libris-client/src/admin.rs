//! Typed client for the Libris admin API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/admin/loans` | Every active loan |
//! | POST   | `/api/admin/books` | Add a book |
//! | PUT    | `/api/admin/books/{id}` | Update a book |
//! | POST   | `/api/admin/lend` | Lend a book to a named user |
//! | POST   | `/api/admin/return/{loanId}` | Return any loan |
//! | POST   | `/api/admin/notify-overdue` | Email every overdue borrower |
//!
//! All of these are admin-only on the server. The client does not re-check.

use reqwest::Method;
use serde::Serialize;

use libris_core::{Book, BookId, BorrowDays, Loan, LoanId, NewBook, UserId};

use crate::error::ApiError;
use crate::transport::Transport;

/// Request to lend a book on a user's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LendRequest {
    pub book_id: BookId,
    pub user_id: UserId,
    pub duration_days: BorrowDays,
}

/// Client for the Libris admin API.
#[derive(Debug, Clone)]
pub struct AdminClient {
    transport: Transport,
}

impl AdminClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Every loan that has not been returned.
    ///
    /// Calls `GET /api/admin/loans`.
    pub async fn active_loans(&self) -> Result<Vec<Loan>, ApiError> {
        let builder = self.transport.request(Method::GET, &["api", "admin", "loans"]);
        self.transport.json("GET /api/admin/loans", builder).await
    }

    /// Add a book. Every copy starts on the shelf.
    ///
    /// Calls `POST /api/admin/books`.
    pub async fn create_book(&self, book: NewBook) -> Result<Book, ApiError> {
        let builder = self
            .transport
            .request(Method::POST, &["api", "admin", "books"])
            .json(&book.for_create());
        self.transport.json("POST /api/admin/books", builder).await
    }

    /// Replace a book's details. The server adjusts availability by the
    /// change in total copies.
    ///
    /// Calls `PUT /api/admin/books/{id}`.
    pub async fn update_book(&self, id: BookId, book: NewBook) -> Result<Book, ApiError> {
        let endpoint = format!("PUT /api/admin/books/{id}");
        let id = id.to_string();
        let builder = self
            .transport
            .request(Method::PUT, &["api", "admin", "books", &id])
            .json(&book.for_update());
        self.transport.json(&endpoint, builder).await
    }

    /// Lend a book to a user.
    ///
    /// Calls `POST /api/admin/lend`.
    pub async fn lend(&self, request: &LendRequest) -> Result<(), ApiError> {
        let builder = self
            .transport
            .request(Method::POST, &["api", "admin", "lend"])
            .json(request);
        self.transport.empty("POST /api/admin/lend", builder).await
    }

    /// Return any user's loan.
    ///
    /// Calls `POST /api/admin/return/{loanId}`.
    pub async fn return_loan(&self, loan_id: LoanId) -> Result<(), ApiError> {
        let endpoint = format!("POST /api/admin/return/{loan_id}");
        let id = loan_id.to_string();
        let builder = self
            .transport
            .request(Method::POST, &["api", "admin", "return", &id]);
        self.transport.empty(&endpoint, builder).await
    }

    /// Ask the server to notify every borrower with an overdue loan.
    /// Returns the server's summary message.
    ///
    /// Calls `POST /api/admin/notify-overdue`.
    pub async fn notify_overdue(&self) -> Result<String, ApiError> {
        let builder = self
            .transport
            .request(Method::POST, &["api", "admin", "notify-overdue"]);
        self.transport
            .text("POST /api/admin/notify-overdue", builder)
            .await
    }
}
