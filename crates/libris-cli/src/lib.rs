//! # libris-cli: Command-Line Client for the Libris Catalog
//!
//! Provides the `libris` binary. Each subcommand module exposes a clap
//! `Args` type and an async `run_*` handler returning the process exit code.
//!
//! ## Subcommands
//!
//! - `libris login | logout | whoami | register`: session management.
//! - `libris books | popular | recommend`: catalog browsing.
//! - `libris borrow | loans | return`: the borrow, return and rate workflow.
//! - `libris profile`: view and edit the caller's account.
//! - `libris admin`: inventory and loan management for administrators.
//!
//! ```bash
//! LIBRIS_PASSWORD=secret libris login alice
//! libris popular
//! libris borrow 7 --days 5
//! libris return 11 --rating 4
//! ```
//!
//! Notifications raised while a command runs are printed to stdout as
//! `[severity] message` once it finishes.

pub mod admin;
pub mod catalog;
pub mod loans;
pub mod profile;
pub mod render;
pub mod session;

use std::path::Path;

use anyhow::{Context, Result};

use libris_app::{Libris, Notifications};
use libris_client::{ApiError, LibrisConfig};

/// Resolve configuration: a YAML file when given, the environment otherwise,
/// then an explicit backend URL on top.
pub fn load_config(config: Option<&Path>, backend_url: Option<&str>) -> Result<LibrisConfig> {
    let base = match config {
        Some(path) => LibrisConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => LibrisConfig::from_env().context("reading LIBRIS_* environment")?,
    };
    match backend_url {
        Some(url) => base.with_backend_url(url).context("--backend-url"),
        None => Ok(base),
    }
}

/// Whether a failed command was rejected because the session's credential
/// is no longer accepted. A 403 means the role is insufficient, not that
/// the session is dead, so only 401 counts.
pub fn session_expired(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<ApiError>())
        .any(|e| e.is_unauthorized() && e.status() == Some(401))
}

/// After a failed command: if a credential that existed before it ran was
/// rejected, drop the session and tell the user to log in again. Returns
/// whether the session was dropped.
pub fn expire_rejected_session(libris: &Libris, had_session: bool, err: &anyhow::Error) -> bool {
    if !had_session || !session_expired(err) {
        return false;
    }
    libris.session().invalidate();
    libris
        .session()
        .notifier()
        .warning("Your session has expired. Please log in again.");
    true
}

/// Print every queued notification.
pub fn print_notifications(inbox: &mut Notifications) {
    for note in inbox.drain() {
        println!("[{}] {}", note.severity, note.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn backend_flag_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend_url: http://from-file:8080").unwrap();
        writeln!(file, "timeout_secs: 7").unwrap();

        let cfg = load_config(Some(file.path()), Some("http://from-flag:9090")).unwrap();
        assert_eq!(cfg.backend_url.host_str(), Some("from-flag"));
        assert_eq!(cfg.timeout_secs, 7);

        let cfg = load_config(Some(file.path()), None).unwrap();
        assert_eq!(cfg.backend_url.host_str(), Some("from-file"));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = load_config(Some(Path::new("/nonexistent/libris.yaml")), None).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/libris.yaml"));
    }

    #[test]
    fn only_401_expires_the_session() {
        let unauthorized = |status| {
            anyhow::Error::new(ApiError::Unauthorized {
                endpoint: "GET /api/loans/my".into(),
                status,
                body: String::new(),
            })
        };
        assert!(session_expired(&unauthorized(401)));
        assert!(!session_expired(&unauthorized(403)));
        assert!(!session_expired(&anyhow::anyhow!("plain failure")));

        let wrapped = unauthorized(401).context("listing loans");
        assert!(session_expired(&wrapped));
    }
}
