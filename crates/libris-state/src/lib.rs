//! # libris-state: Transaction State Machines
//!
//! The three user transactions of the catalog client, encoded as explicit
//! state machines with checked transitions. Nothing here performs I/O: the
//! async driver in `libris-app` asks a machine whether a step is allowed,
//! issues the request, then reports the outcome back.
//!
//! ## State Machines
//!
//! - **Borrow** ([`borrow`]): `IDLE → AWAITING_CONFIRMATION → SUBMITTING →
//!   {SUCCEEDED, FAILED}`. Login and availability are checked on entry to
//!   confirmation; the duration is checked on confirm.
//!
//! - **Return** ([`loan_return`]): `ACTIVE → RETURN_SUBMITTING →
//!   {RETURNED, RETURN_FAILED}`. Only constructible from an active loan.
//!
//! - **Rating** ([`rating`]): `PROMPT → SUBMITTING → {SUCCEEDED, FAILED}`,
//!   plus `DISMISSED`. A prompt is produced only by a successful return.
//!
//! Every guard failure leaves the machine where it was, so the same step can
//! be attempted again.

pub mod borrow;
pub mod error;
pub mod loan_return;
pub mod rating;

pub use borrow::{BorrowFlow, BorrowState};
pub use error::TransactionError;
pub use loan_return::{ReturnFlow, ReturnState};
pub use rating::{RatingPrompt, RatingState};
