//! Client for the Evim Kirada rental marketplace API.
//!
//! The backend owns every record and every business rule. This crate holds a
//! session, talks to the REST endpoints, decides which status transitions it
//! is willing to request, and renders role-scoped views of what it fetched.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod routes;
pub mod session;
pub mod upload;
pub mod views;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
