use super::render::{self, field, money};
use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{Property, PropertyDraft, Role};
use crate::session::Session;
use crate::upload::{ImageFile, ImageUploader};
use tracing::info;

/// Owner form for a new listing, including its photos
#[derive(Debug, Clone)]
pub struct PropertyForm {
    pub draft: PropertyDraft,
    uploader: ImageUploader,
    /// Set once `POST /properties` succeeded; retries only attach photos
    created: Option<String>,
}

impl PropertyForm {
    pub fn new(draft: PropertyDraft, config: &Config) -> Self {
        Self {
            draft,
            uploader: ImageUploader::new(config.max_image_bytes),
            created: None,
        }
    }

    /// Id of the listing already created by an earlier submit
    pub fn created_id(&self) -> Option<&str> {
        self.created.as_deref()
    }

    pub fn images(&self) -> &[String] {
        self.uploader.images()
    }

    /// Upload a batch of photos; oversized files stop the whole batch
    pub async fn attach(&mut self, api: &ApiClient, session: &mut Session, files: &[ImageFile]) -> Result<()> {
        require_owner(session)?;
        if let Err(err) = self.uploader.upload(api, session, files).await {
            session.note_failure(&err);
            return Err(err);
        }
        Ok(())
    }

    /// Drop an uploaded photo from the form only
    pub fn remove_image(&mut self, reference: &str) -> bool {
        self.uploader.remove(reference)
    }

    /// Required-field checks done before anything is sent
    pub fn validate(&self) -> Result<()> {
        let draft = &self.draft;
        let required = [
            ("title", &draft.title),
            ("description", &draft.description),
            ("address", &draft.address),
            ("district", &draft.district),
            ("city", &draft.city),
            ("rooms", &draft.rooms),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ClientError::Validation(format!("The {name} field is required")));
        }
        if draft.price.is_nan() || draft.price <= 0.0 {
            return Err(ClientError::Validation("Rent must be greater than zero".into()));
        }
        if draft.deposit < 0.0 {
            return Err(ClientError::Validation("Deposit cannot be negative".into()));
        }
        if draft.area == 0 {
            return Err(ClientError::Validation("Area must be greater than zero".into()));
        }
        Ok(())
    }

    /// Create the listing, attach the retained photos, then read it back.
    /// After a partial failure, calling again reuses the created listing.
    pub async fn submit(&mut self, api: &ApiClient, session: &mut Session) -> Result<Property> {
        require_owner(session)?;
        self.validate()?;

        let result = self.create(api, session).await;
        if let Err(err) = &result {
            session.note_failure(err);
        }
        result
    }

    async fn create(&mut self, api: &ApiClient, session: &Session) -> Result<Property> {
        let properties = api.properties();
        let id = match self.created.clone() {
            Some(id) => {
                info!("Listing {} already exists, retrying photos only", id);
                id
            }
            None => {
                let created = properties.create(session, &self.draft).await?;
                self.created = Some(created.id.clone());
                created.id
            }
        };

        if !self.images().is_empty() {
            properties.set_images(session, &id, self.images()).await?;
            info!("Attached {} image(s) to {}", self.images().len(), id);
        }
        properties.get(session, &id).await
    }

    pub fn render(&self, config: &Config) -> String {
        let draft = &self.draft;
        let mut out = render::heading("New listing");
        out.push_str(&field("Title", &draft.title));
        out.push_str(&field("Location", format!("{}, {}", draft.district, draft.city)));
        out.push_str(&field("Rent", money(draft.price)));
        out.push_str(&field("Deposit", money(draft.deposit)));
        out.push_str(&field("Rooms", &draft.rooms));
        out.push_str(&field("Area", format!("{} m²", draft.area)));
        for image in self.images() {
            out.push_str(&format!("  photo: {}\n", config.resolve_image(image)));
        }
        out
    }
}

fn require_owner(session: &Session) -> Result<()> {
    match session.role() {
        Some(Role::Owner) => Ok(()),
        Some(Role::Tenant | Role::Admin) => Err(ClientError::Forbidden("only owners can list properties".into())),
        None => Err(ClientError::NotSignedIn),
    }
}
