use super::render::{self, field, money};
use super::View;
use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{Application, ApplicationDraft, Property, PropertyStatus, Role};
use crate::session::Session;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Write;

/// Single listing with everything the backend knows about it
#[derive(Debug, Clone)]
pub struct PropertyDetail {
    pub id: String,
}

impl PropertyDetail {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Whether the visitor may open the application form for `property`
pub fn can_apply(role: Option<Role>, property: &Property) -> bool {
    match role {
        Some(Role::Tenant) => property.status == PropertyStatus::Active,
        Some(Role::Owner | Role::Admin) | None => false,
    }
}

#[async_trait]
impl View for PropertyDetail {
    type Snapshot = Property;

    fn title(&self) -> &'static str {
        "Property"
    }

    async fn load(&self, api: &ApiClient, session: &Session) -> Result<Property> {
        api.properties().get(session, &self.id).await
    }

    fn render(&self, property: &Property, session: &Session, config: &Config) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", property.title);
        out.push_str(&field("Status", &property.status));
        out.push_str(&field("Rent", money(property.price)));
        out.push_str(&field("Deposit", money(property.deposit)));
        out.push_str(&field("Address", format!("{}, {}, {}", property.address, property.district, property.city)));
        out.push_str(&field("Type", property.property_type.as_str()));
        out.push_str(&field("Rooms", &property.rooms));
        out.push_str(&field("Area", format!("{} m²", property.area)));
        if let Some(floor) = property.floor {
            out.push_str(&field("Floor", floor));
        }
        if let Some(heating) = &property.heating {
            out.push_str(&field("Heating", heating));
        }
        out.push_str(&field("Furnished", if property.furnished { "yes" } else { "no" }));
        out.push_str(&field("Pets", if property.pets_allowed { "allowed" } else { "not allowed" }));
        if !property.amenities.is_empty() {
            out.push_str(&field("Amenities", property.amenities.join(", ")));
        }

        if !property.description.is_empty() {
            out.push_str(&render::section("Description"));
            let _ = writeln!(out, "{}", property.description);
        }

        if !property.images.is_empty() {
            out.push_str(&render::section("Photos"));
            for image in &property.images {
                let _ = writeln!(out, "  {}", config.resolve_image(image));
            }
        }

        out.push('\n');
        if can_apply(session.role(), property) {
            let _ = writeln!(out, "Apply with: kirada apply {} --message <text> --move-in <YYYY-MM-DD>", property.id);
        } else if session.role().is_none() {
            out.push_str("Sign in as a tenant to apply.\n");
        }
        out
    }
}

/// What the application form is showing
#[derive(Debug, Clone)]
pub enum ApplyState {
    Editing,
    Submitted(Application),
}

/// Tenant application form for one property
#[derive(Debug, Clone)]
pub struct ApplicationForm {
    pub property_id: String,
    pub message: String,
    pub move_in: Option<NaiveDate>,
    pub proposed_rent: Option<f64>,
    state: ApplyState,
}

impl ApplicationForm {
    pub fn new(property_id: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            message: String::new(),
            move_in: None,
            proposed_rent: None,
            state: ApplyState::Editing,
        }
    }

    pub fn state(&self) -> &ApplyState {
        &self.state
    }

    /// Required-field checks; nothing is sent when these fail
    pub fn validate(&self) -> Result<ApplicationDraft> {
        if self.property_id.trim().is_empty() {
            return Err(ClientError::Validation("No property selected".into()));
        }
        if self.message.trim().is_empty() {
            return Err(ClientError::Validation("Please write a short message to the owner".into()));
        }
        let move_in = self
            .move_in
            .ok_or_else(|| ClientError::Validation("Please choose a move-in date".into()))?;
        if let Some(rent) = self.proposed_rent {
            if rent <= 0.0 {
                return Err(ClientError::Validation("Proposed rent must be positive".into()));
            }
        }

        let mut draft = ApplicationDraft::new(self.property_id.trim(), self.message.trim(), move_in);
        draft.proposed_rent = self.proposed_rent;
        Ok(draft)
    }

    /// Post the application. Success moves the form to its confirmation.
    pub async fn submit(&mut self, api: &ApiClient, session: &mut Session) -> Result<()> {
        match session.role() {
            Some(Role::Tenant) => {}
            Some(Role::Owner | Role::Admin) => {
                return Err(ClientError::Forbidden("only tenants can apply".into()));
            }
            None => return Err(ClientError::NotSignedIn),
        }
        let draft = self.validate()?;

        match api.applications().submit(session, &draft).await {
            Ok(application) => {
                self.state = ApplyState::Submitted(application);
                Ok(())
            }
            Err(err) => {
                session.note_failure(&err);
                Err(err)
            }
        }
    }

    pub fn render(&self) -> String {
        match &self.state {
            ApplyState::Editing => format!("Application for property {} not sent yet.\n", self.property_id),
            ApplyState::Submitted(application) => {
                let mut out = render::heading("Application sent");
                out.push_str(&field("Reference", &application.id));
                out.push_str(&field("Status", &application.status));
                out.push_str(&field("Move-in", render::date(&application.move_in_date)));
                out.push_str("The owner will review your application. Track it with `kirada dashboard`.\n");
                out
            }
        }
    }
}
