//! Client configuration.
//!
//! A `ClientConfig` is built from the user's credentials and optionally
//! carries a previously issued token so that `initialize` can skip the
//! login round trip.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::api::unauthorized::{CallbackHandler, RetryWithRefresh, UnauthorizedHandler};
use crate::auth::Credentials;

/// Base URL of the MyStat REST API
pub const DEFAULT_BASE_URL: &str = "https://msapi.itstep.org/api/v2";

/// Vendor application key sent with every login request
pub const DEFAULT_APPLICATION_KEY: &str =
    "6a56a5df2667e65aab73ce76d1dd737f7d1faef9c52e8b8c55ac75f565d8e8a6";

/// Language used for localized response fields when none is configured
pub const DEFAULT_LANGUAGE: &str = "en";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub language: String,
    pub access_token: Option<String>,
    /// Absolute expiry of `access_token`, epoch milliseconds.
    pub token_expires_at: Option<i64>,
    pub group_id: Option<i64>,
    pub base_url: String,
    pub application_key: String,
    pub timeout: Duration,
    pub unauthorized_handler: Arc<dyn UnauthorizedHandler>,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            language: DEFAULT_LANGUAGE.to_string(),
            access_token: None,
            token_expires_at: None,
            group_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            application_key: DEFAULT_APPLICATION_KEY.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            unauthorized_handler: Arc::new(RetryWithRefresh),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Reuse a token issued earlier. Both parts are required for login to be skipped.
    pub fn with_token(mut self, access_token: impl Into<String>, expires_at_ms: i64) -> Self {
        self.access_token = Some(access_token.into());
        self.token_expires_at = Some(expires_at_ms);
        self
    }

    pub fn with_group_id(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_application_key(mut self, key: impl Into<String>) -> Self {
        self.application_key = key.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.unauthorized_handler = handler;
        self
    }

    /// Hand every 401 to `callback` instead of refreshing and retrying.
    pub fn on_unauthorized<F>(self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.with_unauthorized_handler(Arc::new(CallbackHandler::new(callback)))
    }

    /// Pre-supplied token and expiry, if both are present
    pub(crate) fn supplied_token(&self) -> Option<(&str, i64)> {
        match (&self.access_token, self.token_expires_at) {
            (Some(token), Some(expires_at)) => Some((token.as_str(), expires_at)),
            _ => None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("credentials", &self.credentials)
            .field("language", &self.language)
            .field("has_access_token", &self.access_token.is_some())
            .field("token_expires_at", &self.token_expires_at)
            .field("group_id", &self.group_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("student", "secret")
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new(creds());
        assert_eq!(config.language, "en");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.application_key, DEFAULT_APPLICATION_KEY);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.supplied_token().is_none());
    }

    #[test]
    fn test_supplied_token_needs_both_parts() {
        let mut config = ClientConfig::new(creds());
        config.access_token = Some("tok".to_string());
        assert!(config.supplied_token().is_none());

        let config = ClientConfig::new(creds()).with_token("tok", 1_700_000_000_000);
        assert_eq!(config.supplied_token(), Some(("tok", 1_700_000_000_000)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::new(creds()).with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ClientConfig::new(creds()).with_token("very-secret-token", 1);
        let shown = format!("{:?}", config);
        assert!(!shown.contains("very-secret-token"));
        assert!(!shown.contains("secret\""));
    }
}
