//! Typed client for the Libris profile API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/profile` | The caller's account |
//! | PUT    | `/api/profile` | Update display name and email |

use reqwest::Method;
use serde::Serialize;

use libris_core::UserAccount;

use crate::error::ApiError;
use crate::transport::Transport;

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
}

/// Client for the Libris profile API.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    transport: Transport,
}

impl ProfileClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// The caller's account.
    ///
    /// Calls `GET /api/profile`.
    pub async fn get(&self) -> Result<UserAccount, ApiError> {
        let builder = self.transport.request(Method::GET, &["api", "profile"]);
        self.transport.json("GET /api/profile", builder).await
    }

    /// Update the caller's display name and email.
    ///
    /// Calls `PUT /api/profile`.
    pub async fn update(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let builder = self
            .transport
            .request(Method::PUT, &["api", "profile"])
            .json(update);
        self.transport.empty("PUT /api/profile", builder).await
    }
}
