//! API client for communicating with the MyStat REST API.
//!
//! `ApiClient` owns the session manager and dispatches every authenticated
//! request: it refreshes a stale token before sending, attaches the bearer
//! token and language headers, and applies the unauthorized policy.

use std::sync::Arc;

use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{SessionData, SessionManager};
use crate::config::ClientConfig;

use super::payload::Payload;
use super::unauthorized::{UnauthorizedAction, UnauthorizedHandler};
use super::{ApiError, Result};

/// Header carrying the preferred language for localized fields
const LANGUAGE_HEADER: &str = "x-language";

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionManager,
    unauthorized_handler: Arc<dyn UnauthorizedHandler>,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a client without touching the network. Call `initialize` before use.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let session = SessionManager::new(http.clone(), &config);

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            session,
            unauthorized_handler: config.unauthorized_handler.clone(),
            config,
        })
    }

    /// Create a client and initialize its session in one step.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.initialize().await?;
        Ok(client)
    }

    /// Adopt the configured token or log in with the configured credentials.
    pub async fn initialize(&self) -> Result<()> {
        self.session.initialize(&self.config).await
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub async fn is_token_expired(&self) -> bool {
        self.session.is_expired().await
    }

    /// Force a new login, keeping language and group id.
    pub async fn refresh_token(&self) -> Result<()> {
        self.session.refresh().await
    }

    /// Copy of the current session, for persisting between runs
    pub async fn session_snapshot(&self) -> Option<SessionData> {
        self.session.snapshot().await
    }

    /// Send an authenticated request and parse the body as JSON.
    ///
    /// Returns `Ok(None)` when a 401 was taken over by the configured
    /// unauthorized handler. An empty body parses as JSON `null`.
    pub async fn authenticated_request(
        &self,
        method: Method,
        path: &str,
        payload: &Payload,
    ) -> Result<Option<Value>> {
        let Some(body) = self.dispatch(method, path, payload).await? else {
            return Ok(None);
        };

        if body.trim().is_empty() {
            return Ok(Some(Value::Null));
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ApiError::decode(path, e))
    }

    /// Send an authenticated request and return the raw response body.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        path: &str,
        payload: &Payload,
    ) -> Result<Option<String>> {
        if !self.session.is_initialized().await {
            return Err(ApiError::Uninitialized);
        }

        if self.session.is_expired().await {
            debug!(path, "Access token expired, refreshing before request");
            self.session.refresh().await?;
        }

        let mut retried = false;
        loop {
            let response = self.send_once(method.clone(), path, payload).await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                match self.unauthorized_handler.on_unauthorized(path) {
                    UnauthorizedAction::Handled => {
                        debug!(path, "Unauthorized response handed to caller");
                        return Ok(None);
                    }
                    UnauthorizedAction::Retry if !retried => {
                        warn!(path, "Unauthorized, refreshing token and retrying once");
                        self.session.refresh().await?;
                        retried = true;
                        continue;
                    }
                    UnauthorizedAction::Retry => {
                        return Err(ApiError::Unauthorized {
                            path: path.to_string(),
                        });
                    }
                }
            }

            let body = response.text().await?;
            if !status.is_success() {
                warn!(path, status = status.as_u16(), "Request failed");
                return Err(ApiError::from_status(status, body));
            }
            return Ok(Some(body));
        }
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        payload: &Payload,
    ) -> Result<reqwest::Response> {
        let (token, language) = self.session.request_identity().await?;
        let url = format!("{}/{}", self.base_url, path);

        let request = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .header(LANGUAGE_HEADER, header::HeaderValue::from_str(&language)?)
            .header(header::ACCEPT, "application/json");

        Ok(payload.apply(request).send().await?)
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let payload = self
            .authenticated_request(Method::GET, path, &Payload::Empty)
            .await?;
        decode_list(path, payload)
    }

    pub(crate) async fn get_object<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let payload = self
            .authenticated_request(Method::GET, path, &Payload::Empty)
            .await?;
        decode_object(path, payload)
    }
}

/// Decode an array payload. An absent or `null` payload is an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(path: &str, payload: Option<Value>) -> Result<Vec<T>> {
    match payload {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|e| ApiError::decode(path, e)),
    }
}

/// Decode an object payload. An absent or `null` payload is `None`.
pub(crate) fn decode_object<T: DeserializeOwned>(path: &str, payload: Option<Value>) -> Result<Option<T>> {
    match payload {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ApiError::decode(path, e)),
    }
}
