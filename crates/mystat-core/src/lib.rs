//! Client library for the MyStat learning-management REST API.
//!
//! ```no_run
//! use mystat_core::{ApiClient, ClientConfig, Credentials};
//!
//! # async fn run() -> mystat_core::Result<()> {
//! let config = ClientConfig::new(Credentials::new("login", "pass")).with_language("en");
//! let client = ApiClient::connect(config).await?;
//! for lesson in client.get_schedule_by_date(None).await? {
//!     println!("{} {}", lesson.time_range(), lesson.subject_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, Result};
pub use auth::{Credentials, SessionData};
pub use config::ClientConfig;
