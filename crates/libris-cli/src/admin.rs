//! # Admin Subcommands
//!
//! Inventory and loan management. Every subcommand checks the stored
//! identity's role first and refuses members without a request. The server
//! still decides; a stale admin token can still be answered with 403.
//!
//! Listings fetch the whole dashboard (users, books and active loans
//! together) and filter locally, ignoring case.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use libris_app::Libris;
use libris_core::{Book, BookDraft, BookId, BorrowDays, LoanId, UserId};

use crate::render::{book_line, loan_line, user_line};

/// Arguments for `libris admin`.
#[derive(Args, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Book fields as typed. Validation happens before any request.
#[derive(Args, Debug, Clone, Default)]
pub struct BookFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    /// 10 or 13 digits; dashes and spaces are ignored.
    #[arg(long)]
    pub isbn: Option<String>,
    /// Four-digit publication year.
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub publisher: Option<String>,
    /// Copies owned by the library.
    #[arg(long)]
    pub copies: Option<String>,
}

impl BookFields {
    /// A draft from these fields alone. Missing fields stay blank and fail
    /// validation.
    pub fn draft(&self) -> BookDraft {
        merge(self, &BookDraft::default())
    }

    /// A draft from these fields, falling back to `book`'s current values.
    pub fn over_book(&self, book: &Book) -> BookDraft {
        let current = BookDraft {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
            publisher: book.publisher.clone(),
            total_copies: book.total_copies.to_string(),
        };
        merge(self, &current)
    }
}

fn merge(fields: &BookFields, base: &BookDraft) -> BookDraft {
    let pick = |typed: &Option<String>, current: &str| {
        typed.clone().unwrap_or_else(|| current.to_string())
    };
    BookDraft {
        title: pick(&fields.title, &base.title),
        author: pick(&fields.author, &base.author),
        isbn: pick(&fields.isbn, &base.isbn),
        year: pick(&fields.year, &base.year),
        publisher: pick(&fields.publisher, &base.publisher),
        total_copies: pick(&fields.copies, &base.total_copies),
    }
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List accounts.
    Users {
        /// Keep only rows containing this text.
        #[arg(long)]
        filter: Option<String>,
    },
    /// List the inventory.
    Books {
        #[arg(long)]
        filter: Option<String>,
    },
    /// List active loans across all users.
    Loans {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Add a book. Every copy starts on the shelf.
    AddBook(BookFields),
    /// Change a book's details. Omitted fields keep their current value.
    UpdateBook {
        id: BookId,
        #[command(flatten)]
        fields: BookFields,
    },
    /// Delete a book. Refused by the server while a copy is on loan.
    DeleteBook { id: BookId },
    /// Lend a book to a user.
    Lend {
        book_id: BookId,
        user_id: UserId,
        #[arg(long, default_value = BorrowDays::DEFAULT_INPUT)]
        days: String,
    },
    /// Return any user's loan.
    Return { loan_id: LoanId },
    /// Email every borrower with an overdue loan.
    NotifyOverdue,
}

pub async fn run_admin(args: &AdminArgs, libris: &Libris) -> Result<u8> {
    let admin = libris.admin();
    admin.require_admin()?;

    match &args.command {
        AdminCommand::Users { filter } => {
            let dashboard = admin.dashboard().await?;
            for user in dashboard.filter_users(filter.as_deref().unwrap_or_default()) {
                println!("{}", user_line(user));
            }
        }
        AdminCommand::Books { filter } => {
            let dashboard = admin.dashboard().await?;
            for book in dashboard.filter_books(filter.as_deref().unwrap_or_default()) {
                println!("{}", book_line(book));
            }
        }
        AdminCommand::Loans { filter } => {
            let dashboard = admin.dashboard().await?;
            for loan in dashboard.filter_loans(filter.as_deref().unwrap_or_default()) {
                println!("{}", loan_line(loan));
            }
        }
        AdminCommand::AddBook(fields) => {
            let book = admin.add_book(&fields.draft()).await?;
            println!("{}", book_line(&book));
        }
        AdminCommand::UpdateBook { id, fields } => {
            let books = libris.catalog().search(None).await?;
            let current = books
                .iter()
                .find(|b| b.id == *id)
                .ok_or_else(|| anyhow!("no book #{id} in the catalog"))?;
            let book = admin.update_book(*id, &fields.over_book(current)).await?;
            println!("{}", book_line(&book));
        }
        AdminCommand::DeleteBook { id } => admin.delete_book(*id).await?,
        AdminCommand::Lend {
            book_id,
            user_id,
            days,
        } => admin.lend(*book_id, *user_id, days).await?,
        AdminCommand::Return { loan_id } => admin.return_loan(*loan_id).await?,
        AdminCommand::NotifyOverdue => {
            admin.notify_overdue().await?;
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_fields_fall_back_to_current_book() {
        let book: Book = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Dune",
            "author": "Frank Herbert",
            "publisher": "Chilton",
            "isbn": "9780441013593",
            "year": 1965,
            "totalCopies": 3,
            "availableCopies": 1
        }))
        .unwrap();
        let fields = BookFields {
            copies: Some("5".into()),
            ..BookFields::default()
        };
        let draft = fields.over_book(&book);
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.year, "1965");
        assert_eq!(draft.total_copies, "5");
        assert_eq!(draft.validate_as_of(2026).unwrap().total_copies, 5);
    }

    #[test]
    fn add_fields_leave_missing_values_blank() {
        let fields = BookFields {
            title: Some("Dune".into()),
            ..BookFields::default()
        };
        let draft = fields.draft();
        assert_eq!(draft.title, "Dune");
        assert!(draft.author.is_empty());
        assert!(draft.validate_as_of(2026).is_err());
    }
}
