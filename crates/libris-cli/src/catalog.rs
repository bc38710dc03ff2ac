//! # Catalog Subcommands
//!
//! `books`, `popular` and `recommend`. Popular and recommended titles are
//! resolved concurrently; titles that fail to resolve are simply left out.

use anyhow::Result;
use clap::Args;

use libris_app::{Libris, MatchPolicy};

use crate::render::{book_line, entry_line};

/// Arguments for `libris books`.
#[derive(Args, Debug)]
pub struct BooksArgs {
    /// Only books whose title contains this text.
    #[arg(long)]
    pub title: Option<String>,
}

/// Arguments for `libris recommend`.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Title of a book you liked.
    pub title: String,
    /// Key on the search result whose title matches exactly, rather than
    /// the first result.
    #[arg(long)]
    pub exact: bool,
}

pub async fn run_books(args: &BooksArgs, libris: &Libris) -> Result<u8> {
    let books = libris.catalog().search(args.title.as_deref()).await?;
    if books.is_empty() {
        println!("No books found");
    }
    for book in &books {
        println!("{}", book_line(book));
    }
    Ok(0)
}

pub async fn run_popular(libris: &Libris) -> Result<u8> {
    let entries = libris.catalog().popular().await?;
    if entries.is_empty() {
        println!("No popular books right now");
    }
    for entry in &entries {
        println!("{}", entry_line(entry));
    }
    Ok(0)
}

pub async fn run_recommend(args: &RecommendArgs, libris: &mut Libris) -> Result<u8> {
    if args.exact {
        libris.set_match_policy(MatchPolicy::PreferExactTitle);
    }
    let recs = libris.catalog().recommendations(&args.title).await?;
    println!("Because you liked {}:", recs.seed.title);
    if recs.entries.is_empty() {
        println!("  nothing similar found");
    }
    for entry in &recs.entries {
        println!("{}", entry_line(entry));
    }
    Ok(0)
}
