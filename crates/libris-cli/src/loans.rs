//! # Loan Subcommands
//!
//! `borrow`, `loans` and `return`. Borrowing starts from the book as the
//! catalog currently reports it, so a book with no copies on the shelf is
//! refused without a request. Returning optionally rates the book in the
//! same invocation, since the rating prompt only exists right after a
//! successful return.

use anyhow::{anyhow, Result};
use clap::Args;

use libris_app::Libris;
use libris_core::{BookId, BorrowDays, LoanId, Rating};

use crate::render::loan_line;

/// Arguments for `libris borrow`.
#[derive(Args, Debug)]
pub struct BorrowArgs {
    /// Book identifier, as listed by `libris books`.
    pub book_id: BookId,
    /// Loan length in whole days.
    #[arg(long, default_value = BorrowDays::DEFAULT_INPUT)]
    pub days: String,
}

/// Arguments for `libris loans`.
#[derive(Args, Debug)]
pub struct LoansArgs {
    /// Include loans that were already returned.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for `libris return`.
#[derive(Args, Debug)]
pub struct ReturnArgs {
    /// Loan identifier, as listed by `libris loans`.
    pub loan_id: LoanId,
    /// Rate the returned book from 1 to 5.
    #[arg(long, value_parser = parse_rating)]
    pub rating: Option<Rating>,
}

fn parse_rating(input: &str) -> Result<Rating, String> {
    Rating::parse(input).map_err(|e| e.to_string())
}

pub async fn run_borrow(args: &BorrowArgs, libris: &Libris) -> Result<u8> {
    libris.workflow().require_identity()?;
    let books = libris.catalog().search(None).await?;
    let book = books
        .into_iter()
        .find(|b| b.id == args.book_id)
        .ok_or_else(|| anyhow!("no book #{} in the catalog", args.book_id))?;

    let flow = libris.workflow().borrow(&book, &args.days).await?;
    tracing::debug!(book = %flow.book_id(), state = flow.state().as_str(), "borrow finished");
    println!("Borrowed {} for {} day(s)", book.title, args.days.trim());
    Ok(0)
}

pub async fn run_loans(args: &LoansArgs, libris: &Libris) -> Result<u8> {
    let loans = libris.workflow().my_loans().await?;
    let shown: Vec<_> = loans.iter().filter(|l| args.all || l.is_active()).collect();
    if shown.is_empty() {
        println!("No loans");
    }
    for loan in shown {
        println!("{}", loan_line(loan));
    }
    Ok(0)
}

pub async fn run_return(args: &ReturnArgs, libris: &Libris) -> Result<u8> {
    let workflow = libris.workflow();
    let loans = workflow.my_loans().await?;
    let loan = loans
        .iter()
        .find(|l| l.id == args.loan_id)
        .ok_or_else(|| anyhow!("no loan #{} among your loans", args.loan_id))?;

    let mut outcome = workflow.return_loan(loan).await?;
    println!("Returned {}", outcome.prompt.title());

    match args.rating {
        Some(rating) => {
            // The book is back either way; a failed rating is only reported.
            if workflow.submit_rating(&mut outcome.prompt, Some(rating)).await.is_ok() {
                println!("Rated {} {rating}/5", outcome.prompt.title());
            }
        }
        None => outcome.prompt.dismiss()?,
    }

    if let Some(remaining) = outcome.loans {
        let active = remaining.iter().filter(|l| l.is_active()).count();
        println!("{active} active loan(s) remaining");
    }
    Ok(0)
}
