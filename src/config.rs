//! Console configuration.
//!
//! Loaded from environment variables, then overridden by CLI flags:
//! - `RBAC_CONSOLE_URL` - Backend base URL (default: `http://localhost:3001`)
//! - `RBAC_CONSOLE_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)

use std::time::Duration;

/// Default backend address for local development.
pub const DEFAULT_URL: &str = "http://localhost:3001";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL of the REST service, without a trailing slash.
    pub base_url: String,
    /// Upper bound on a single backend request.
    pub request_timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("RBAC_CONSOLE_URL").ok(),
            std::env::var("RBAC_CONSOLE_TIMEOUT_SECS").ok(),
        )
    }

    fn from_vars(url: Option<String>, timeout_secs: Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url);
        }

        if let Some(raw) = timeout_secs {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    "Ignoring invalid RBAC_CONSOLE_TIMEOUT_SECS={:?}, using {:?}",
                    raw,
                    DEFAULT_TIMEOUT
                ),
            }
        }

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }
}
