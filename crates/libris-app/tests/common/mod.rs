//! Shared fixtures for the orchestration tests.

#![allow(dead_code)]

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use libris_app::{Libris, MemoryCredentialStore, Notifications};
use libris_client::LibrisConfig;
use libris_core::Credential;
use wiremock::{MockServer, Request};

/// An unsigned token carrying `sub` and `role` claims.
pub fn jwt(sub: &str, role: &str) -> String {
    let enc = |v: serde_json::Value| URL_SAFE_NO_PAD.encode(v.to_string());
    format!(
        "{}.{}.signature",
        enc(serde_json::json!({"alg": "HS256", "typ": "JWT"})),
        enc(serde_json::json!({"sub": sub, "role": role, "exp": 4_102_444_800i64}))
    )
}

pub fn member_token() -> String {
    jwt("alice", "ROLE_EMPLOYEE")
}

pub fn admin_token() -> String {
    jwt("root", "ROLE_ADMIN")
}

pub struct Harness {
    pub libris: Libris,
    pub inbox: Notifications,
    pub store: Arc<MemoryCredentialStore>,
}

/// Open a client against `server` with `token` already persisted.
pub fn open(server: &MockServer, token: Option<&str>) -> Harness {
    let config = LibrisConfig::local(&server.uri(), "unused.json").expect("config");
    let initial = token.map(|t| Credential::new(t).expect("credential"));
    let store = Arc::new(MemoryCredentialStore::new(initial));
    let (libris, inbox) = Libris::open(&config, store.clone()).expect("open");
    Harness {
        libris,
        inbox,
        store,
    }
}

pub fn book_json(id: i64, title: &str, isbn: &str, available: i32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "author": "Author",
        "publisher": "Publisher",
        "isbn": isbn,
        "year": 1999,
        "totalCopies": 3,
        "availableCopies": available
    })
}

pub fn no_authorization(req: &Request) -> bool {
    !req.headers.contains_key("authorization")
}

/// `(severity, message)` pairs queued so far.
pub fn drained(inbox: &mut Notifications) -> Vec<(String, String)> {
    inbox
        .drain()
        .into_iter()
        .map(|n| (n.severity.to_string(), n.message))
        .collect()
}
