//! Libris client configuration.
//!
//! One backend base URL, a request timeout, and the location of the persisted
//! credential. Defaults target a local development server. Override via
//! environment variables, a YAML file, or explicit construction for tests.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

/// Default backend when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the Libris backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrisConfig {
    /// Base URL of the REST API. Endpoint paths (`api/...`) are appended.
    pub backend_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// File holding the persisted credential between runs.
    pub credential_path: PathBuf,
}

impl LibrisConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LIBRIS_BACKEND_URL` (default: `http://localhost:8080`)
    /// - `LIBRIS_TIMEOUT_SECS` (default: 30)
    /// - `LIBRIS_CREDENTIAL_PATH` (default: `<config dir>/libris/credentials.json`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("LIBRIS_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        Ok(Self {
            backend_url: parse_backend_url("LIBRIS_BACKEND_URL", &raw)?,
            timeout_secs: std::env::var("LIBRIS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            credential_path: std::env::var_os("LIBRIS_CREDENTIAL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_credential_path),
        })
    }

    /// Load configuration from a YAML file. Missing keys take their defaults.
    ///
    /// ```yaml
    /// backend_url: https://library.example.org
    /// timeout_secs: 10
    /// credential_path: /home/alice/.libris-token.json
    /// ```
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let backend_url = match file.backend_url {
            Some(raw) => parse_backend_url("backend_url", &raw)?,
            None => parse_backend_url("backend_url", DEFAULT_BACKEND_URL)?,
        };
        Ok(Self {
            backend_url,
            timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            credential_path: file.credential_path.unwrap_or_else(default_credential_path),
        })
    }

    /// Replace the backend URL, keeping every other setting.
    pub fn with_backend_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.backend_url = parse_backend_url("backend_url", raw)?;
        Ok(self)
    }

    /// Configuration pointing at a local mock server (for testing).
    pub fn local(base_url: &str, credential_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: parse_backend_url("local", base_url)?,
            timeout_secs: 5,
            credential_path: credential_path.into(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    backend_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    credential_path: Option<PathBuf>,
}

fn parse_backend_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(
            source.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn default_credential_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("libris")
        .join("credentials.json")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A backend URL failed to parse or uses an unsupported scheme.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// The configuration file could not be read.
    #[error("cannot read config file {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
    /// The configuration file is not valid YAML for this schema.
    #[error("cannot parse config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}
