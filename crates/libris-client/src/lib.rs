//! # libris-client -- Typed Rust client for the Libris REST API
//!
//! Provides typed access to every endpoint the catalog client consumes:
//! - **Users** via `/api/users` (login, register, admin listing)
//! - **Books** via `/api/books` (search, popular titles, recommendations)
//! - **Loans** via `/api/loans` (borrow, return, my loans)
//! - **Ratings** via `/api/ratings` (rate, averages)
//! - **Profile** via `/api/profile`
//! - **Admin** via `/api/admin` (inventory and loan management)
//!
//! ## Credential Injection
//!
//! The client never stores a token of its own. It is constructed with a
//! [`CredentialSource`] and asks it for the current credential each time a
//! request is dispatched, attaching `Authorization: Bearer <token>` when one
//! exists and nothing otherwise. Whoever owns the session owns the source.
//!
//! ## Errors
//!
//! Every call is a single attempt and fails with a typed [`ApiError`]:
//! network failure, 401/403, 404, other statuses, or an undecodable body.

pub mod admin;
pub mod books;
pub mod config;
pub mod error;
pub mod loans;
pub mod profile;
pub mod ratings;
mod transport;
pub mod users;

pub use config::{ConfigError, LibrisConfig};
pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use libris_core::Credential;

/// Supplies the credential to attach to an outgoing request.
///
/// Called once per dispatched request. Implementations must be cheap and must
/// not block on I/O.
pub trait CredentialSource: Send + Sync {
    /// The credential to send right now, if any.
    fn current(&self) -> Option<Credential>;
}

/// A fixed credential, or none. Useful for scripts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(pub Option<Credential>);

impl CredentialSource for StaticCredential {
    fn current(&self) -> Option<Credential> {
        self.0.clone()
    }
}

/// Top-level Libris API client. Holds sub-clients for each resource.
#[derive(Debug, Clone)]
pub struct ApiClient {
    users: users::UserClient,
    books: books::BookClient,
    loans: loans::LoanClient,
    ratings: ratings::RatingClient,
    profile: profile::ProfileClient,
    admin: admin::AdminClient,
}

impl ApiClient {
    /// Create a client from configuration and a credential source.
    pub fn new(
        config: &LibrisConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let transport = transport::Transport::new(http, config.backend_url.clone(), credentials);

        Ok(Self {
            users: users::UserClient::new(transport.clone()),
            books: books::BookClient::new(transport.clone()),
            loans: loans::LoanClient::new(transport.clone()),
            ratings: ratings::RatingClient::new(transport.clone()),
            profile: profile::ProfileClient::new(transport.clone()),
            admin: admin::AdminClient::new(transport),
        })
    }

    /// Access the users client (login, register, listing).
    pub fn users(&self) -> &users::UserClient {
        &self.users
    }

    /// Access the books client.
    pub fn books(&self) -> &books::BookClient {
        &self.books
    }

    /// Access the loans client.
    pub fn loans(&self) -> &loans::LoanClient {
        &self.loans
    }

    /// Access the ratings client.
    pub fn ratings(&self) -> &ratings::RatingClient {
        &self.ratings
    }

    /// Access the profile client.
    pub fn profile(&self) -> &profile::ProfileClient {
        &self.profile
    }

    /// Access the admin client.
    pub fn admin(&self) -> &admin::AdminClient {
        &self.admin
    }
}
