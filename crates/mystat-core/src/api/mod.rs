//! REST API client module for the MyStat student portal.
//!
//! This module provides the `ApiClient` that dispatches authenticated
//! requests and exposes typed accessors for schedule, homework, news,
//! exams and progress endpoints.
//!
//! The API uses bearer tokens obtained from the `auth/login` endpoint;
//! expired tokens are renewed by logging in again with stored credentials.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod payload;
pub mod unauthorized;

pub use client::ApiClient;
pub use error::{ApiError, Result};
pub use payload::{FormField, FormValue, Payload};
pub use unauthorized::{CallbackHandler, RetryWithRefresh, UnauthorizedAction, UnauthorizedHandler};
