//! Profile view and edit for the logged-in user.

use thiserror::Error;

use libris_client::profile::ProfileUpdate;
use libris_client::{ApiClient, ApiError};
use libris_core::{UserAccount, ValidationError};

use crate::notify::Notifier;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to fetch profile")]
    Fetch(#[source] ApiError),

    #[error("Failed to update profile")]
    Update(#[source] ApiError),
}

impl AccountError {
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Fetch(e) | Self::Update(e) => e.is_unauthorized(),
            Self::Validation(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountService {
    client: ApiClient,
    notifier: Notifier,
}

impl AccountService {
    /// Profile operations reporting through `notifier`.
    pub fn new(client: ApiClient, notifier: Notifier) -> Self {
        Self { client, notifier }
    }

    /// The caller's account.
    pub async fn profile(&self) -> Result<UserAccount, AccountError> {
        self.client.profile().get().await.map_err(|e| {
            tracing::warn!(error = %e, "profile fetch failed");
            let err = AccountError::Fetch(e);
            self.notifier.error(err.to_string());
            err
        })
    }

    /// Change display name and email. A blank email is refused locally.
    pub async fn update_profile(&self, full_name: &str, email: &str) -> Result<(), AccountError> {
        let email = email.trim();
        if email.is_empty() {
            let err = AccountError::Validation(ValidationError::MissingField("Email"));
            self.notifier.warning(err.to_string());
            return Err(err);
        }
        let update = ProfileUpdate {
            full_name: full_name.trim().to_string(),
            email: email.to_string(),
        };
        match self.client.profile().update(&update).await {
            Ok(()) => {
                self.notifier.success("Profile updated!");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile update failed");
                let err = AccountError::Update(e);
                self.notifier.error(err.to_string());
                Err(err)
            }
        }
    }
}
