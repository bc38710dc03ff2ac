//! Plain-text rendering of catalog records for terminal output.

use chrono::NaiveDateTime;

use libris_app::ResolvedCatalogEntry;
use libris_core::{Book, Identity, Loan, UserAccount};

fn date(value: Option<NaiveDateTime>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One line per book: id, title, author, year, shelf count and rating.
pub fn book_line(book: &Book) -> String {
    let year = book.year.map(|y| y.to_string()).unwrap_or_else(|| "n.d.".into());
    let rating = book
        .average_rating
        .map(|r| format!("{r:.1}/5"))
        .unwrap_or_else(|| "unrated".into());
    format!(
        "#{:<5} {} by {} ({year})  ISBN {}  {}/{} available  {rating}",
        book.id, book.title, book.author, book.isbn, book.available_copies, book.total_copies
    )
}

/// A resolved entry, numbered by its position in the source list.
pub fn entry_line(entry: &ResolvedCatalogEntry) -> String {
    format!("{:>3}. {}", entry.position + 1, book_line(&entry.book))
}

/// One line per loan, with the borrower when the server included one.
pub fn loan_line(loan: &Loan) -> String {
    let status = match loan.return_date {
        Some(returned) => format!("returned {}", returned.format("%Y-%m-%d")),
        None => "active".to_string(),
    };
    let borrower = loan
        .borrower
        .as_ref()
        .map(|u| format!("  borrower {}", u.username))
        .unwrap_or_default();
    format!(
        "loan #{:<5} book #{} {}  borrowed {}  due {}  {status}{borrower}",
        loan.id,
        loan.book.id,
        loan.book.title,
        date(loan.loan_date),
        date(loan.due_date),
    )
}

pub fn user_line(user: &UserAccount) -> String {
    format!(
        "#{:<5} {:<16} {:<24} {}",
        user.id,
        user.username,
        user.email,
        user.role()
    )
}

pub fn identity_line(identity: &Identity) -> String {
    let expiry = identity
        .expires_at
        .map(|t| format!(", session expires {}", t.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();
    format!(
        "{} ({}){expiry}",
        identity.display_name, identity.role
    )
}
