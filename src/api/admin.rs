use super::ApiClient;
use crate::error::Result;
use crate::models::{AdminStats, Application, Property, User};
use crate::session::Session;
use reqwest::Method;
use serde_json::Value;
use tracing::warn;

/// Platform-wide endpoints, admin role only
pub struct Admin<'a> {
    pub(super) api: &'a ApiClient,
}

impl Admin<'_> {
    pub async fn stats(&self, session: &Session) -> Result<AdminStats> {
        self.api.fetch(self.api.request(Method::GET, "/admin/stats", session)).await
    }

    /// Records the client cannot decode (e.g. a role it does not know) are
    /// skipped so one odd account does not hide the rest.
    pub async fn users(&self, session: &Session) -> Result<Vec<User>> {
        let raw: Vec<Value> = self.api.fetch(self.api.request(Method::GET, "/admin/users", session)).await?;
        Ok(raw.into_iter().filter_map(decode_user).collect())
    }

    pub async fn properties(&self, session: &Session) -> Result<Vec<Property>> {
        self.api.fetch(self.api.request(Method::GET, "/admin/properties", session)).await
    }

    pub async fn applications(&self, session: &Session) -> Result<Vec<Application>> {
        self.api.fetch(self.api.request(Method::GET, "/admin/applications", session)).await
    }
}

fn decode_user(raw: Value) -> Option<User> {
    let id = raw.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
    match serde_json::from_value(raw) {
        Ok(user) => Some(user),
        Err(err) => {
            warn!("Skipping user {}: {}", id, err);
            None
        }
    }
}
