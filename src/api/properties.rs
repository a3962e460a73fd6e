use super::ApiClient;
use crate::error::{ClientError, Result};
use crate::lifecycle::PropertyTransition;
use crate::models::{Property, PropertyDraft, PropertyFilter, PropertyStatus};
use crate::session::Session;
use reqwest::Method;
use tracing::info;

pub struct Properties<'a> {
    pub(super) api: &'a ApiClient,
}

impl Properties<'_> {
    /// `GET /properties` with the filter's set fields as query parameters
    pub async fn list(&self, session: &Session, filter: &PropertyFilter) -> Result<Vec<Property>> {
        let builder = self.api.request(Method::GET, "/properties", session).query(&filter.to_query());
        self.api.fetch(builder).await
    }

    /// `GET /properties/{id}`
    pub async fn get(&self, session: &Session, id: &str) -> Result<Property> {
        self.api.fetch(self.api.request(Method::GET, &format!("/properties/{id}"), session)).await
    }

    /// `GET /my-properties`
    pub async fn mine(&self, session: &Session) -> Result<Vec<Property>> {
        self.api.fetch(self.api.request(Method::GET, "/my-properties", session)).await
    }

    /// `POST /properties`
    pub async fn create(&self, session: &Session, draft: &PropertyDraft) -> Result<Property> {
        let builder = self.api.request(Method::POST, "/properties", session).json(draft);
        let property: Property = self.api.fetch(builder).await?;
        info!("Created property {} ({})", property.id, property.title);
        Ok(property)
    }

    /// `PUT /properties/{id}/images` with the retained image references
    pub async fn set_images(&self, session: &Session, id: &str, images: &[String]) -> Result<()> {
        let builder = self
            .api
            .request(Method::PUT, &format!("/properties/{id}/images"), session)
            .json(images);
        self.api.submit(builder).await
    }

    /// Validate `transition` against the listing's current status, then
    /// `PUT /properties/{id}/status?status=<target>`. Returns the target sent.
    pub async fn transition(
        &self,
        session: &Session,
        property: &Property,
        transition: PropertyTransition,
    ) -> Result<PropertyStatus> {
        let role = session.role().ok_or(ClientError::NotSignedIn)?;
        let target = transition.check(role, &property.status)?;

        let builder = self
            .api
            .request(Method::PUT, &format!("/properties/{}/status", property.id), session)
            .query(&[("status", target.as_str())]);
        self.api.submit(builder).await?;

        info!("Property {}: {} -> {}", property.id, property.status.as_str(), target.as_str());
        Ok(target)
    }
}
