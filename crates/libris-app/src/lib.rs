//! # libris-app: Catalog Client Orchestration
//!
//! Wires the typed API client to the client-side behaviour of the Libris
//! catalog:
//!
//! - [`session`]: the persisted credential, login/logout/register, and the
//!   credential cell the API client reads at dispatch.
//! - [`catalog`]: title-list resolution with concurrent, settle-all lookups.
//! - [`workflow`]: borrow, return and rate, driving the `libris-state`
//!   machines.
//! - [`account`] and [`admin`]: profile editing and the admin console.
//! - [`notify`]: the transient notification queue every component writes to.
//!
//! ## Ownership
//!
//! [`Libris::open`] loads the session first, then hands clones of the API
//! client, the session handle, the rating cache and the notifier to every
//! component. Components share no mutable state other than the credential
//! cell (single writer: the session store) and the rating cache.

pub mod account;
pub mod admin;
pub mod catalog;
pub mod notify;
pub mod ratings;
pub mod session;
pub mod settle;
pub mod workflow;

use std::sync::Arc;

use libris_client::{ApiClient, LibrisConfig};

pub use account::{AccountError, AccountService};
pub use admin::{AdminConsole, AdminDashboard, AdminError};
pub use catalog::{CatalogResolver, MatchPolicy, Recommendations, ResolveError, ResolvedCatalogEntry};
pub use notify::{Notification, Notifications, Notifier, Severity};
pub use ratings::RatingCache;
pub use session::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionError, SessionHandle,
    SessionStore,
};
pub use workflow::{ReturnOutcome, TransactionWorkflow, WorkflowError};

/// The assembled client.
#[derive(Debug)]
pub struct Libris {
    session: SessionStore,
    catalog: CatalogResolver,
    workflow: TransactionWorkflow,
    account: AccountService,
    admin: AdminConsole,
}

impl Libris {
    /// Load the session from `store` and build every component around it.
    /// Returns the receiving end of the notification queue alongside.
    pub fn open(
        config: &LibrisConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<(Self, Notifications), SessionError> {
        let (notifier, notifications) = Notifier::channel();
        let session = SessionStore::load(config, store, notifier.clone())?;
        let client: ApiClient = session.client().clone();
        let handle = session.handle();
        let ratings = RatingCache::default();

        let libris = Self {
            catalog: CatalogResolver::new(client.clone(), ratings.clone(), notifier.clone()),
            workflow: TransactionWorkflow::new(
                client.clone(),
                handle.clone(),
                ratings,
                notifier.clone(),
            ),
            account: AccountService::new(client.clone(), notifier.clone()),
            admin: AdminConsole::new(client, handle, notifier),
            session,
        };
        Ok((libris, notifications))
    }

    /// Login state and the credential every request carries.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Catalog search, popular titles and recommendations.
    pub fn catalog(&self) -> &CatalogResolver {
        &self.catalog
    }

    /// Replace the resolver's match policy.
    pub fn set_match_policy(&mut self, policy: MatchPolicy) {
        self.catalog = self.catalog.clone().with_policy(policy);
    }

    /// Borrow, return and rate.
    pub fn workflow(&self) -> &TransactionWorkflow {
        &self.workflow
    }

    /// The caller's own profile.
    pub fn account(&self) -> &AccountService {
        &self.account
    }

    /// The admin console. Every operation checks the role first.
    pub fn admin(&self) -> &AdminConsole {
        &self.admin
    }
}
