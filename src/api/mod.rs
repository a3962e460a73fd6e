//! HTTP access to the marketplace backend.
//!
//! `ApiClient` owns the connection pool and configuration. Resource clients
//! (`auth()`, `properties()`, ...) are thin borrowed wrappers with one method
//! per endpoint. Every method takes the `Session`; its bearer token is attached
//! here, never by callers.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod payments;
pub mod properties;
pub mod upload;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::session::Session;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

pub use admin::Admin;
pub use applications::{ActionOutcome, Applications};
pub use auth::Auth;
pub use payments::Payments;
pub use properties::Properties;
pub use upload::Uploads;

/// Marketplace API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("kirada/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth { api: self }
    }

    pub fn properties(&self) -> Properties<'_> {
        Properties { api: self }
    }

    pub fn applications(&self) -> Applications<'_> {
        Applications { api: self }
    }

    pub fn payments(&self) -> Payments<'_> {
        Payments { api: self }
    }

    pub fn admin(&self) -> Admin<'_> {
        Admin { api: self }
    }

    pub fn uploads(&self) -> Uploads<'_> {
        Uploads { api: self }
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Health> {
        self.fetch(self.client.get(self.config.api_url("/health"))).await
    }

    /// Request builder for an API path, carrying the session's credential
    /// when one is present.
    pub(crate) fn request(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        let builder = self.client.request(method, self.config.api_url(path));
        match session.credential() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode a JSON body
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send and discard the body
    pub(crate) async fn submit(&self, builder: RequestBuilder) -> Result<()> {
        self.execute(builder).await.map(|_| ())
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!("{} {}", method, path);

        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{} {} returned {}", method, path, status);
        Err(ClientError::from_response(status.as_u16(), &body))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
}
