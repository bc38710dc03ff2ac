//! Shared request dispatch for every sub-client.
//!
//! The Authorization header is resolved when a request is dispatched, never
//! when a client is constructed: [`Transport::send`] asks the injected
//! [`CredentialSource`] for the current credential on every call. A login or
//! logout that completes before a call is issued is always observed by it.
//!
//! Every call is a single attempt. Failures map onto [`ApiError`] by status.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::CredentialSource;

#[derive(Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialSource>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// Build `{base_url}/seg/seg/...`, percent-encoding each segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Config only admits http(s) URLs, which can always be a base.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.url(segments))
    }

    /// Dispatch one request and classify the response status.
    pub(crate) async fn send(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let credential = self.credentials.current();
        let builder = match credential {
            Some(ref credential) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.as_str()))
                    .map_err(|_| ApiError::InvalidCredential {
                        endpoint: endpoint.to_string(),
                    })?;
                value.set_sensitive(true);
                builder.header(AUTHORIZATION, value)
            }
            None => builder,
        };

        tracing::debug!(endpoint, authenticated = credential.is_some(), "dispatching request");

        let resp = builder.send().await.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "request failed before a response arrived");
            ApiError::Network {
                endpoint: endpoint.to_string(),
                source: e,
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(endpoint, status = status.as_u16(), "request rejected by server");
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            },
            StatusCode::NOT_FOUND => ApiError::NotFound {
                endpoint: endpoint.to_string(),
                body,
            },
            _ => ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            },
        })
    }

    /// Dispatch and decode a JSON body.
    pub(crate) async fn json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.send(endpoint, builder).await?;
        resp.json().await.map_err(|e| ApiError::Deserialization {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    /// Dispatch and return the body as text.
    pub(crate) async fn text(&self, endpoint: &str, builder: RequestBuilder) -> Result<String, ApiError> {
        let resp = self.send(endpoint, builder).await?;
        resp.text().await.map_err(|e| ApiError::Deserialization {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    /// Dispatch and discard the body. Used where the client re-reads server
    /// state instead of trusting a mutation's response.
    pub(crate) async fn empty(&self, endpoint: &str, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send(endpoint, builder).await.map(|_| ())
    }
}
