//! # Admin Console
//!
//! Inventory and loan management for administrators. Every operation first
//! checks the decoded identity's role. That check only decides what the
//! client offers; the server makes the real authorization decision and may
//! still answer 403.
//!
//! The dashboard fetches users, books and active loans concurrently and
//! fails as a whole if any of the three fails. Filtering happens locally over
//! the fetched lists.

use thiserror::Error;

use libris_client::admin::LendRequest;
use libris_client::{ApiClient, ApiError, CredentialSource};
use libris_core::{
    Book, BookDraft, BookId, BorrowDays, Identity, Loan, LoanId, Role, UserAccount, UserId,
    ValidationError,
};

use crate::notify::Notifier;
use crate::session::SessionHandle;

/// Admin failures. Display text is what the user is shown.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Please log in to continue.")]
    NotLoggedIn,

    #[error("Admin access required.")]
    Forbidden { role: Role },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to fetch admin data")]
    Dashboard(#[source] ApiError),

    #[error("Failed to add book")]
    AddBook(#[source] ApiError),

    #[error("Failed to update book")]
    UpdateBook(#[source] ApiError),

    #[error("Failed to delete book. User has not returned the book yet.")]
    DeleteBook(#[source] ApiError),

    #[error("Failed to lend book")]
    Lend(#[source] ApiError),

    #[error("Failed to return loan")]
    Return(#[source] ApiError),

    #[error("Failed to send overdue notifications")]
    NotifyOverdue(#[source] ApiError),
}

impl AdminError {
    /// Whether the server rejected the session's credential.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Dashboard(e)
            | Self::AddBook(e)
            | Self::UpdateBook(e)
            | Self::DeleteBook(e)
            | Self::Lend(e)
            | Self::Return(e)
            | Self::NotifyOverdue(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NotLoggedIn | Self::Forbidden { .. } | Self::Validation(_)
        )
    }
}

/// Check that an identity holds at least the given role.
pub fn require_role(identity: Option<&Identity>, minimum: Role) -> Result<(), AdminError> {
    match identity {
        None => Err(AdminError::NotLoggedIn),
        Some(id) if id.role >= minimum => Ok(()),
        Some(id) => Err(AdminError::Forbidden { role: id.role }),
    }
}

// ── Dashboard ───────────────────────────────────────────────────────────────

/// Everything the admin screen shows, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminDashboard {
    pub users: Vec<UserAccount>,
    pub books: Vec<Book>,
    pub loans: Vec<Loan>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl AdminDashboard {
    /// Users whose username, email or role contains `query`, ignoring case.
    pub fn filter_users(&self, query: &str) -> Vec<&UserAccount> {
        let q = query.trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| {
                contains_ci(&u.username, &q)
                    || contains_ci(&u.email, &q)
                    || u.role.as_deref().is_some_and(|r| contains_ci(r, &q))
            })
            .collect()
    }

    /// Books whose title, author, publisher or ISBN contains `query`,
    /// ignoring case.
    pub fn filter_books(&self, query: &str) -> Vec<&Book> {
        let q = query.trim().to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                contains_ci(&b.title, &q)
                    || contains_ci(&b.author, &q)
                    || contains_ci(&b.publisher, &q)
                    || contains_ci(&b.isbn, &q)
            })
            .collect()
    }

    /// Loans whose book title or borrower username contains `query`,
    /// ignoring case.
    pub fn filter_loans(&self, query: &str) -> Vec<&Loan> {
        let q = query.trim().to_lowercase();
        self.loans
            .iter()
            .filter(|l| {
                contains_ci(&l.book.title, &q)
                    || l.borrower
                        .as_ref()
                        .is_some_and(|u| contains_ci(&u.username, &q))
            })
            .collect()
    }
}

// ── Console ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AdminConsole {
    client: ApiClient,
    session: SessionHandle,
    notifier: Notifier,
}

impl AdminConsole {
    /// A console reading the caller's role from `session`.
    pub fn new(client: ApiClient, session: SessionHandle, notifier: Notifier) -> Self {
        Self {
            client,
            session,
            notifier,
        }
    }

    /// The current identity, if it is an administrator's.
    pub fn require_admin(&self) -> Result<Identity, AdminError> {
        let identity = self.session.current().and_then(|c| c.identity());
        match require_role(identity.as_ref(), Role::Admin) {
            Ok(()) => identity.ok_or(AdminError::NotLoggedIn),
            Err(e) => Err(self.report(e)),
        }
    }

    fn report(&self, err: AdminError) -> AdminError {
        if err.is_local() {
            self.notifier.warning(err.to_string());
        } else {
            tracing::warn!(error = %err, "admin operation failed");
            self.notifier.error(err.to_string());
        }
        err
    }

    /// Users, books and active loans, fetched concurrently.
    pub async fn dashboard(&self) -> Result<AdminDashboard, AdminError> {
        self.require_admin()?;
        let fetched = futures::try_join!(
            self.client.users().list(),
            self.client.books().list(),
            self.client.admin().active_loans(),
        );
        match fetched {
            Ok((users, books, loans)) => Ok(AdminDashboard {
                users,
                books,
                loans,
            }),
            Err(e) => Err(self.report(AdminError::Dashboard(e))),
        }
    }

    /// Validate a draft and add the book.
    pub async fn add_book(&self, draft: &BookDraft) -> Result<Book, AdminError> {
        self.require_admin()?;
        let book = draft.validate().map_err(|e| self.report(e.into()))?;
        match self.client.admin().create_book(book).await {
            Ok(created) => {
                tracing::info!(book = %created.id, "book added");
                self.notifier.success("Book added successfully");
                Ok(created)
            }
            Err(e) => Err(self.report(AdminError::AddBook(e))),
        }
    }

    /// Validate a draft and replace the book's details.
    pub async fn update_book(&self, id: BookId, draft: &BookDraft) -> Result<Book, AdminError> {
        self.require_admin()?;
        let book = draft.validate().map_err(|e| self.report(e.into()))?;
        match self.client.admin().update_book(id, book).await {
            Ok(updated) => {
                tracing::info!(book = %id, "book updated");
                self.notifier.success("Book updated successfully");
                Ok(updated)
            }
            Err(e) => Err(self.report(AdminError::UpdateBook(e))),
        }
    }

    /// Delete a book. The server refuses while any copy is on loan.
    pub async fn delete_book(&self, id: BookId) -> Result<(), AdminError> {
        self.require_admin()?;
        match self.client.books().delete(id).await {
            Ok(()) => {
                tracing::info!(book = %id, "book deleted");
                self.notifier.success("Book deleted successfully");
                Ok(())
            }
            Err(e) => Err(self.report(AdminError::DeleteBook(e))),
        }
    }

    /// Lend a book to a user for the typed number of days.
    pub async fn lend(
        &self,
        book_id: BookId,
        user_id: UserId,
        days_input: &str,
    ) -> Result<(), AdminError> {
        self.require_admin()?;
        let duration_days = BorrowDays::parse(days_input).map_err(|e| self.report(e.into()))?;
        let request = LendRequest {
            book_id,
            user_id,
            duration_days,
        };
        match self.client.admin().lend(&request).await {
            Ok(()) => {
                tracing::info!(book = %book_id, user = %user_id, days = duration_days.get(), "book lent");
                self.notifier.success("Book lent successfully");
                Ok(())
            }
            Err(e) => Err(self.report(AdminError::Lend(e))),
        }
    }

    /// Return any user's loan.
    pub async fn return_loan(&self, loan_id: LoanId) -> Result<(), AdminError> {
        self.require_admin()?;
        match self.client.admin().return_loan(loan_id).await {
            Ok(()) => {
                tracing::info!(loan = %loan_id, "loan returned by admin");
                self.notifier.success("Book returned!");
                Ok(())
            }
            Err(e) => Err(self.report(AdminError::Return(e))),
        }
    }

    /// Ask the server to notify overdue borrowers. Returns its summary.
    pub async fn notify_overdue(&self) -> Result<String, AdminError> {
        self.require_admin()?;
        match self.client.admin().notify_overdue().await {
            Ok(summary) => {
                let summary = summary.trim().to_string();
                let shown = if summary.is_empty() {
                    "Overdue notifications sent".to_string()
                } else {
                    summary.clone()
                };
                self.notifier.success(shown);
                Ok(summary)
            }
            Err(e) => Err(self.report(AdminError::NotifyOverdue(e))),
        }
    }
}
