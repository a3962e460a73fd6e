use super::ApiClient;
use crate::error::Result;
use crate::models::{LoginRequest, Registration, TokenPair, User};
use crate::session::Session;
use reqwest::Method;

pub struct Auth<'a> {
    pub(super) api: &'a ApiClient,
}

impl Auth<'_> {
    /// `POST /auth/login`
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenPair> {
        let builder = self.api.client.post(self.api.config.api_url("/auth/login")).json(credentials);
        self.api.fetch(builder).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        let builder = self.api.client.post(self.api.config.api_url("/auth/register")).json(registration);
        self.api.fetch(builder).await
    }

    /// `GET /auth/me`
    pub async fn me(&self, session: &Session) -> Result<User> {
        self.api.fetch(self.api.request(Method::GET, "/auth/me", session)).await
    }
}
