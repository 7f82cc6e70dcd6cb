//! Environment-driven application configuration.
//!
//! Everything is read once at startup (honoring a `.env` file) and then
//! threaded explicitly into the components that need it; nothing reads the
//! environment after this point.

use std::env;

/// Fallback identity when the environment supplies none.
pub const GUEST_IDENTITY: &str = "guest";

const ENV_API_URL: &str = "CREDITPATH_API_URL";
const ENV_USER_EMAIL: &str = "CREDITPATH_USER_EMAIL";
const ENV_LOG: &str = "CREDITPATH_LOG";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_LOG_FILTER: &str = "info";

/// Top-level configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the scoring service.
    pub api_url: String,
    /// Caller identity attached to every request.
    pub identity: String,
    /// Log filter directive for the tracing subscriber.
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = non_blank(lookup(ENV_API_URL))
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let identity =
            non_blank(lookup(ENV_USER_EMAIL)).unwrap_or_else(|| GUEST_IDENTITY.to_string());
        let log_filter =
            non_blank(lookup(ENV_LOG)).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            api_url,
            identity,
            log_filter,
        }
    }
}
