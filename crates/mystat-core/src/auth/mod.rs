//! Authentication module for managing the client session and credentials.
//!
//! This module provides:
//! - `SessionManager`: login, token expiry tracking and refresh
//! - `CredentialStore`: Secure OS-level credential storage via keyring
//! - `SessionStore`: the last session persisted to disk between runs

pub mod credentials;
pub mod login;
pub mod session;
pub mod store;

pub use credentials::{CredentialStore, Credentials};
pub use login::{AuthOutcome, FieldError, LoginResponse};
pub use session::{now_millis, SessionData, SessionManager};
pub use store::{SessionStore, StoredSession};
