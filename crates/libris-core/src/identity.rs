//! # Credentials and Decoded Identity
//!
//! The server issues a bearer token at login. Its middle segment is a
//! base64url-encoded JSON claims object (`sub`, `role`, `exp`, optionally
//! `fullName`) that the client may read without a round-trip.
//!
//! ## Trust Boundary
//!
//! Decoding does **not** verify the signature. [`Identity`] exists for
//! display and for gating UX (hiding a borrow button, refusing to open an
//! admin screen). The server enforces access control on every call.
//!
//! ## Failure Mode
//!
//! [`Credential::identity`] returns `None` for anything it cannot read:
//! wrong segment count, bad base64, non-JSON payload, missing subject. A
//! stale or garbage token never takes the session down.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::ValidationError;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// JWT segments are base64url; some issuers pad them, some do not.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Fallback for issuers that use the standard alphabet.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

// ── Role ────────────────────────────────────────────────────────────────────

/// The two roles the client distinguishes.
///
/// The `Ord` derivation follows declaration order, so `Member < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// A library member: browse, borrow, return, rate.
    Member,
    /// An administrator: manages users, inventory and loans.
    Admin,
}

impl Role {
    /// Map a server role claim onto the client's role model.
    ///
    /// The server issues `ROLE_ADMIN` and `ROLE_EMPLOYEE`. Anything that
    /// mentions `ADMIN` is an administrator; everything else is a member.
    pub fn from_claim(claim: &str) -> Self {
        if claim.to_ascii_uppercase().contains("ADMIN") {
            Self::Admin
        } else {
            Self::Member
        }
    }

    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "MEMBER",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Identity ────────────────────────────────────────────────────────────────

/// Who is acting, as read from the current credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// The token subject (the username).
    pub subject: String,
    /// Name to greet the user with: the `fullName` claim, else the subject.
    pub display_name: String,
    /// Client-side role projection.
    pub role: Role,
    /// Token expiry, for display. Expiry is only acted upon when a protected
    /// call fails.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Whether this identity may open administrator screens.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Claim payload. Every field is optional so that decoding reports absence
/// through `None` rather than a serde error path.
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default, alias = "roles", alias = "authorities")]
    role: Option<RoleClaim>,
    #[serde(default, rename = "fullName", alias = "name")]
    full_name: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoleClaim {
    One(String),
    Many(Vec<String>),
}

impl RoleClaim {
    fn role(&self) -> Role {
        match self {
            Self::One(claim) => Role::from_claim(claim),
            Self::Many(claims) => claims
                .iter()
                .map(|c| Role::from_claim(c))
                .max()
                .unwrap_or(Role::Member),
        }
    }
}

/// Decode the identity claims of a bearer token.
///
/// Pure and total: returns `None` for any token it cannot read.
pub fn decode_identity(token: &str) -> Option<Identity> {
    let mut segments = token.trim().split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    // Exactly three segments: header, payload, signature.
    segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;

    let subject = claims.sub.filter(|s| !s.trim().is_empty())?;
    let display_name = claims
        .full_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| subject.clone());
    let role = claims.role.as_ref().map(RoleClaim::role).unwrap_or(Role::Member);
    let expires_at = claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0));

    Some(Identity {
        subject,
        display_name,
        role,
        expires_at,
    })
}

// ── Credential ──────────────────────────────────────────────────────────────

/// An opaque bearer token proving an authenticated session.
///
/// The token text is zeroized on drop. Custom `Debug` redacts it to prevent
/// credential leakage in log output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Wrap a token issued by the server. Surrounding whitespace and quotes
    /// (some servers return the token as a JSON string) are stripped.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let raw: String = token.into();
        let trimmed = raw.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCredential);
        }
        Ok(Self(Zeroizing::new(trimmed.to_string())))
    }

    /// The raw token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The decoded identity, or `None` if the token cannot be read.
    pub fn identity(&self) -> Option<Identity> {
        decode_identity(self.as_str())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}
