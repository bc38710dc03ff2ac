#![deny(missing_docs)]

//! # libris-core: Domain Model for the Libris Catalog Client
//!
//! Every other crate in the workspace depends on this one. It has no internal
//! crate dependencies and performs no I/O.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for server identifiers.** A [`BookId`] cannot be
//!    passed where a [`LoanId`] is expected, even though both are `i64` on
//!    the wire.
//!
//! 2. **The server owns the data.** [`Book`], [`Loan`] and [`UserAccount`]
//!    are read-only cached copies. Nothing in this crate computes inventory
//!    counts or rating aggregates.
//!
//! 3. **Credential decoding is pure.** [`Credential::identity`] never fails:
//!    an undecodable token yields `None`. The decoded [`Identity`] is used for
//!    display and UX gating only, never as an authorization decision.
//!
//! 4. **Validation happens before the network.** Form inputs become typed
//!    values ([`BorrowDays`], [`Rating`], [`Isbn`], [`PublicationYear`],
//!    [`NewBook`]) or a [`ValidationError`], with no side effects.

pub mod error;
pub mod identity;
pub mod ids;
pub mod model;
mod serde_util;
pub mod validation;

pub use error::ValidationError;
pub use identity::{Credential, Identity, Role};
pub use ids::{BookId, LoanId, UserId};
pub use model::{Book, Loan, NewBook, UserAccount};
pub use validation::{search_title, BookDraft, BorrowDays, Isbn, PublicationYear, Rating};
