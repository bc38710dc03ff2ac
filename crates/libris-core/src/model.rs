//! # Catalog Records
//!
//! Read-only copies of the server's book, loan and user records, plus the
//! validated [`NewBook`] payload used by the admin inventory endpoints.
//!
//! Fields use `#[serde(default)]` so that columns the server leaves `null`
//! or omits do not break deserialization. Unknown fields are ignored.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::identity::Role;
use crate::ids::{BookId, LoanId, UserId};
use crate::serde_util::null_to_default;

/// A book as returned by `GET /api/books`.
///
/// `average_rating` is not part of the server's book record. It is merged in
/// by the client from `GET /api/ratings/averages` and stays `None` until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server identifier.
    pub id: BookId,
    /// Title.
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    /// Author.
    #[serde(default, deserialize_with = "null_to_default")]
    pub author: String,
    /// Publisher.
    #[serde(default, deserialize_with = "null_to_default")]
    pub publisher: String,
    /// ISBN as stored by the server (not re-validated on read).
    #[serde(default, deserialize_with = "null_to_default")]
    pub isbn: String,
    /// Publication year, if recorded.
    #[serde(default)]
    pub year: Option<i32>,
    /// Copies owned by the library.
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_copies: i32,
    /// Copies currently on the shelf, as last reported by the server.
    #[serde(default, deserialize_with = "null_to_default")]
    pub available_copies: i32,
    /// Average member rating, merged client-side.
    #[serde(default, alias = "rating", skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

impl Book {
    /// Whether the cached availability permits a borrow attempt.
    ///
    /// Anything below one copy, including nonsensical negative counts,
    /// reads as "cannot borrow".
    pub fn can_borrow(&self) -> bool {
        self.available_copies >= 1
    }
}

/// A user account as returned by `GET /api/users` and `GET /api/profile`.
///
/// The server's password hash is never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Server identifier.
    pub id: UserId,
    /// Login name.
    #[serde(default, deserialize_with = "null_to_default")]
    pub username: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_to_default")]
    pub full_name: String,
    /// Contact email.
    #[serde(default, deserialize_with = "null_to_default")]
    pub email: String,
    /// Raw server role string (`ROLE_ADMIN`, `ROLE_EMPLOYEE`, ...).
    #[serde(default)]
    pub role: Option<String>,
}

impl UserAccount {
    /// The account's role, mapped onto the client's two-role model.
    pub fn role(&self) -> Role {
        self.role.as_deref().map(Role::from_claim).unwrap_or(Role::Member)
    }
}

/// A loan as returned by `GET /api/loans/my` and `GET /api/admin/loans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    /// Server identifier.
    pub id: LoanId,
    /// The borrowed book.
    pub book: Book,
    /// The borrowing user, when the server includes it.
    #[serde(default, rename = "user")]
    pub borrower: Option<UserAccount>,
    /// When the loan was created.
    #[serde(default)]
    pub loan_date: Option<NaiveDateTime>,
    /// When the copy is due back.
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    /// When the copy was returned. Absent for active loans.
    #[serde(default)]
    pub return_date: Option<NaiveDateTime>,
}

impl Loan {
    /// A loan is active until the server records a return date.
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

/// A validated book payload for `POST /api/admin/books` and
/// `PUT /api/admin/books/{id}`.
///
/// Build one through [`crate::BookDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// ISBN, 10 or 13 digits.
    pub isbn: String,
    /// Publication year.
    pub year: i32,
    /// Publisher.
    pub publisher: String,
    /// Copies owned by the library.
    pub total_copies: i32,
    /// Initial shelf count. Sent on creation only; the server adjusts
    /// availability itself on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_copies: Option<i32>,
}

impl NewBook {
    /// Payload for creating a book: every copy starts on the shelf.
    pub fn for_create(mut self) -> Self {
        self.available_copies = Some(self.total_copies);
        self
    }

    /// Payload for updating a book: availability is left to the server.
    pub fn for_update(mut self) -> Self {
        self.available_copies = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book_json() -> serde_json::Value {
        json!({
            "id": 7,
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "0441013597",
            "year": 1965,
            "publisher": "Ace",
            "totalCopies": 3,
            "availableCopies": 1
        })
    }

    #[test]
    fn book_deserializes_server_shape() {
        let book: Book = serde_json::from_value(book_json()).unwrap();
        assert_eq!(book.id, BookId::new(7));
        assert_eq!(book.title, "Dune");
        assert_eq!(book.year, Some(1965));
        assert_eq!(book.total_copies, 3);
        assert_eq!(book.available_copies, 1);
        assert_eq!(book.average_rating, None);
        assert!(book.can_borrow());
    }

    #[test]
    fn book_tolerates_null_columns() {
        let book: Book = serde_json::from_value(json!({
            "id": 9,
            "title": "Untitled",
            "author": null,
            "publisher": null,
            "isbn": null,
            "totalCopies": null,
            "availableCopies": null
        }))
        .unwrap();
        assert_eq!(book.author, "");
        assert_eq!(book.available_copies, 0);
        assert!(!book.can_borrow());
    }

    #[test]
    fn negative_availability_cannot_borrow() {
        let mut book: Book = serde_json::from_value(book_json()).unwrap();
        book.available_copies = -1;
        assert!(!book.can_borrow());
    }

    #[test]
    fn loan_activity_follows_return_date() {
        let loan: Loan = serde_json::from_value(json!({
            "id": 3,
            "book": book_json(),
            "user": {"id": 1, "username": "alice", "role": "ROLE_EMPLOYEE"},
            "loanDate": "2026-03-01T10:00:00",
            "dueDate": "2026-03-15T10:00:00.123456",
            "returnDate": null
        }))
        .unwrap();
        assert!(loan.is_active());
        assert_eq!(loan.borrower.as_ref().unwrap().username, "alice");
        assert_eq!(loan.borrower.as_ref().unwrap().role(), Role::Member);

        let returned: Loan = serde_json::from_value(json!({
            "id": 4,
            "book": book_json(),
            "dueDate": "2026-03-15T10:00:00",
            "returnDate": "2026-03-10T09:30:00"
        }))
        .unwrap();
        assert!(!returned.is_active());
    }

    #[test]
    fn user_account_ignores_password() {
        let user: UserAccount = serde_json::from_value(json!({
            "id": 2,
            "username": "root",
            "fullName": "Root Admin",
            "email": "root@example.org",
            "password": "$2a$10$hash",
            "role": "ROLE_ADMIN"
        }))
        .unwrap();
        assert_eq!(user.role(), Role::Admin);
        let back = serde_json::to_value(&user).unwrap();
        assert!(back.get("password").is_none());
    }

    #[test]
    fn new_book_create_and_update_payloads() {
        let book = NewBook {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            isbn: "0441013597".into(),
            year: 1965,
            publisher: "Ace".into(),
            total_copies: 4,
            available_copies: None,
        };
        let create = serde_json::to_value(book.clone().for_create()).unwrap();
        assert_eq!(create["availableCopies"], 4);
        assert_eq!(create["totalCopies"], 4);

        let update = serde_json::to_value(book.for_update()).unwrap();
        assert!(update.get("availableCopies").is_none());
    }
}
