//! # Identifier Newtypes
//!
//! The server keys books, loans and users by database-generated `i64`
//! identifiers. Each gets its own type so they cannot be mixed up at call
//! sites such as `POST /api/loans/return/{loanId}`.

use serde::{Deserialize, Serialize};

macro_rules! server_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw server identifier.
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// The raw identifier as sent on the wire.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

server_id!(
    /// Identifier of a book record.
    BookId
);

server_id!(
    /// Identifier of a loan record.
    LoanId
);

server_id!(
    /// Identifier of a user account.
    UserId
);
