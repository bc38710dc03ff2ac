//! # Form Validation
//!
//! Typed values for user input that must be checked before a request is
//! issued. Every constructor is pure: it either returns the typed value or a
//! [`ValidationError`], and nothing else happens.

use chrono::Datelike;
use serde::Serialize;

use crate::error::ValidationError;
use crate::model::NewBook;

// ── Borrow duration ─────────────────────────────────────────────────────────

/// A borrow duration in whole days, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BorrowDays(u32);

impl BorrowDays {
    /// The value pre-filled in the borrow confirmation step.
    pub const DEFAULT_INPUT: &'static str = "2";

    /// Construct from a number of days.
    pub fn new(days: u32) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::InvalidBorrowDuration(days.to_string()));
        }
        Ok(Self(days))
    }

    /// Parse form input. Non-numeric, fractional, zero and negative input
    /// are all rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let days: u32 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidBorrowDuration(input.to_string()))?;
        Self::new(days).map_err(|_| ValidationError::InvalidBorrowDuration(input.to_string()))
    }

    /// Number of days.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BorrowDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Rating ──────────────────────────────────────────────────────────────────

/// A member rating from 1 to 5 stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;
    /// The midpoint a rating prompt opens with.
    pub const MIDPOINT: Rating = Rating(3);

    /// Construct a rating, rejecting values outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidRating(value.to_string()))
        }
    }

    /// Parse form input.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let value: u8 = input
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidRating(input.to_string()))?;
        Self::new(value)
    }

    /// Number of stars.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::MIDPOINT
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── ISBN ────────────────────────────────────────────────────────────────────

/// An ISBN of exactly 10 or 13 ASCII digits.
///
/// No checksum is verified and no hyphens are accepted, matching what the
/// server's admin endpoints accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    /// Parse form input.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let valid_len = trimmed.len() == 10 || trimmed.len() == 13;
        if valid_len && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidIsbn(input.to_string()))
        }
    }

    /// The digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── Publication year ────────────────────────────────────────────────────────

/// A publication year: four digits, from 1000 through the current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PublicationYear(i32);

impl PublicationYear {
    /// Earliest accepted year.
    pub const EARLIEST: i32 = 1000;

    /// Parse form input against today's calendar year.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Self::parse_as_of(input, chrono::Utc::now().year())
    }

    /// Parse form input against an explicit current year.
    pub fn parse_as_of(input: &str, current_year: i32) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidYear(input.to_string());
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = trimmed.parse().map_err(|_| invalid())?;
        if (Self::EARLIEST..=current_year).contains(&year) {
            Ok(Self(year))
        } else {
            Err(invalid())
        }
    }

    /// The year.
    pub fn get(self) -> i32 {
        self.0
    }
}

// ── Search ──────────────────────────────────────────────────────────────────

/// Check a title search term. The server rejects blank titles, so the
/// client does too, before sending anything.
pub fn search_title(input: &str) -> Result<&str, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(ValidationError::BlankSearchTitle)
    } else {
        Ok(trimmed)
    }
}

// ── Book form ───────────────────────────────────────────────────────────────

/// Raw admin book-form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    /// Title field.
    pub title: String,
    /// Author field.
    pub author: String,
    /// ISBN field.
    pub isbn: String,
    /// Year field.
    pub year: String,
    /// Publisher field.
    pub publisher: String,
    /// Total copies field.
    pub total_copies: String,
}

impl BookDraft {
    /// Validate against today's calendar year.
    pub fn validate(&self) -> Result<NewBook, ValidationError> {
        self.validate_as_of(chrono::Utc::now().year())
    }

    /// Validate every field. Checks run in form order and the first failure
    /// is reported.
    pub fn validate_as_of(&self, current_year: i32) -> Result<NewBook, ValidationError> {
        let title = required(&self.title, "Title")?;
        let author = required(&self.author, "Author")?;
        let isbn = Isbn::parse(&self.isbn)?;
        let year = PublicationYear::parse_as_of(&self.year, current_year)?;
        let total_copies = positive_copies(&self.total_copies)?;

        Ok(NewBook {
            title,
            author,
            isbn: isbn.0,
            year: year.get(),
            publisher: self.publisher.trim().to_string(),
            total_copies,
            available_copies: None,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn positive_copies(input: &str) -> Result<i32, ValidationError> {
    match input.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::InvalidCopies(input.to_string())),
    }
}
