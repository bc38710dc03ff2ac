//! Typed client for the Libris users API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/users/login` | Exchange username/password for a credential |
//! | POST   | `/api/users/register` | Create a member account |
//! | GET    | `/api/users` | List all accounts (admin) |

use reqwest::Method;
use serde::Serialize;

use libris_core::{Credential, UserAccount};

use crate::error::ApiError;
use crate::transport::Transport;

/// Login request body.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Registration form.
///
/// Custom `Debug` redacts the password.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub password: zeroize::Zeroizing<String>,
    pub email: String,
    pub full_name: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish()
    }
}

/// Client for the Libris users API.
#[derive(Debug, Clone)]
pub struct UserClient {
    transport: Transport,
}

impl UserClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Exchange a username and password for a credential.
    ///
    /// Calls `POST /api/users/login`. The server answers with the bare token
    /// as text; a JSON string or a `{"token": ...}` object is accepted too.
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        let endpoint = "POST /api/users/login";
        let builder = self
            .transport
            .request(Method::POST, &["api", "users", "login"])
            .json(&LoginRequest { username, password });

        let body = zeroize::Zeroizing::new(self.transport.text(endpoint, builder).await?);
        let token = extract_token(&body).ok_or_else(|| ApiError::Deserialization {
            endpoint: endpoint.into(),
            reason: "login response carried no token".into(),
        })?;
        Credential::new(token).map_err(|e| ApiError::Deserialization {
            endpoint: endpoint.into(),
            reason: e.to_string(),
        })
    }

    /// Register a new member account. Does not log in.
    ///
    /// Calls `POST /api/users/register`.
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let builder = self
            .transport
            .request(Method::POST, &["api", "users", "register"])
            .json(registration);
        self.transport.empty("POST /api/users/register", builder).await
    }

    /// List every account.
    ///
    /// Calls `GET /api/users`. Admin-only on the server.
    pub async fn list(&self) -> Result<Vec<UserAccount>, ApiError> {
        let builder = self.transport.request(Method::GET, &["api", "users"]);
        self.transport.json("GET /api/users", builder).await
    }
}

/// Pull the token out of a login response body.
fn extract_token(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(token)) => Some(token),
        Ok(serde_json::Value::Object(map)) => map
            .get("token")
            .and_then(|t| t.as_str())
            .map(str::to_string),
        // Bare JWTs are not JSON.
        _ => Some(trimmed.to_string()),
    }
}
