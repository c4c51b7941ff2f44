use chrono::{Duration, Utc};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::{ApiError, Result};
use crate::config::ClientConfig;

use super::login::{AuthOutcome, LoginRequest, LoginResponse};
use super::Credentials;

/// Path of the login endpoint, relative to the base URL
const LOGIN_PATH: &str = "auth/login";

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// The live authenticated state of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    /// Epoch milliseconds after which the token is treated as invalid.
    pub expires_at: i64,
    pub language: String,
    pub group_id: Option<i64>,
}

impl SessionData {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }

    pub fn time_until_expiry(&self) -> Duration {
        Duration::milliseconds(self.expires_at - now_millis())
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        self.time_until_expiry().num_minutes().max(0)
    }
}

/// Owns the credentials and the single session of a client and performs logins.
pub struct SessionManager {
    http: Client,
    login_url: String,
    application_key: String,
    credentials: Credentials,
    state: RwLock<Option<SessionData>>,
}

impl SessionManager {
    pub fn new(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            login_url: format!("{}/{}", config.base_url, LOGIN_PATH),
            application_key: config.application_key.clone(),
            credentials: config.credentials.clone(),
            state: RwLock::new(None),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Adopt the configured token if one was supplied, otherwise log in.
    pub async fn initialize(&self, config: &ClientConfig) -> Result<()> {
        let data = match config.supplied_token() {
            Some((token, expires_at)) => {
                debug!(expires_at, "Reusing supplied access token");
                SessionData {
                    access_token: token.to_string(),
                    expires_at,
                    language: config.language.clone(),
                    group_id: config.group_id,
                }
            }
            None => {
                let login = self.login().await?;
                SessionData {
                    access_token: login.access_token,
                    expires_at: Self::expiry_from_lifetime(login.expires_in_access),
                    language: config.language.clone(),
                    group_id: config.group_id,
                }
            }
        };

        *self.state.write().await = Some(data);
        Ok(())
    }

    /// True when there is no session or its token has reached its expiry.
    pub async fn is_expired(&self) -> bool {
        self.state
            .read()
            .await
            .as_ref()
            .map(|d| d.is_expired())
            .unwrap_or(true)
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// Log in again and overwrite token and expiry, keeping the other session fields.
    pub async fn refresh(&self) -> Result<()> {
        if !self.is_initialized().await {
            return Err(ApiError::Uninitialized);
        }

        let login = self.login().await?;
        let expires_at = Self::expiry_from_lifetime(login.expires_in_access);

        let mut state = self.state.write().await;
        let data = state.as_mut().ok_or(ApiError::Uninitialized)?;
        data.access_token = login.access_token;
        data.expires_at = expires_at;
        debug!(expires_at, "Access token refreshed");
        Ok(())
    }

    /// Token and language to attach to an outgoing request
    pub(crate) async fn request_identity(&self) -> Result<(String, String)> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|d| (d.access_token.clone(), d.language.clone()))
            .ok_or(ApiError::Uninitialized)
    }

    pub async fn snapshot(&self) -> Option<SessionData> {
        self.state.read().await.clone()
    }

    pub async fn group_id(&self) -> Result<Option<i64>> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|d| d.group_id)
            .ok_or(ApiError::Uninitialized)
    }

    pub async fn set_group_id(&self, group_id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let data = state.as_mut().ok_or(ApiError::Uninitialized)?;
        data.group_id = Some(group_id);
        Ok(())
    }

    fn expiry_from_lifetime(expires_in_secs: i64) -> i64 {
        now_millis().saturating_add(expires_in_secs.saturating_mul(1000))
    }

    /// Post the stored credentials to the login endpoint.
    async fn login(&self) -> Result<LoginResponse> {
        let body = LoginRequest {
            application_key: &self.application_key,
            id_city: None,
            username: self.credentials.username(),
            password: self.credentials.password(),
        };

        debug!(username = self.credentials.username(), "Logging in");

        let response = self
            .http
            .post(&self.login_url)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<AuthOutcome>(&text) {
            Ok(AuthOutcome::Authenticated(login)) if status.is_success() => Ok(login),
            Ok(AuthOutcome::Rejected(errors)) => {
                warn!(status = status.as_u16(), count = errors.len(), "Login rejected");
                Err(ApiError::Authentication(errors))
            }
            Err(e) if status.is_success() => Err(ApiError::decode(LOGIN_PATH, e)),
            _ => Err(ApiError::from_status(status, text)),
        }
    }
}
