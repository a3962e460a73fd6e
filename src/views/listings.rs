use super::render::money;
use super::View;
use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Property, PropertyFilter, PropertyStatus};
use crate::session::Session;
use async_trait::async_trait;
use std::fmt::Write;

/// Public listing browser
#[derive(Debug, Clone, Default)]
pub struct Listings {
    pub filter: PropertyFilter,
}

impl Listings {
    pub fn new(filter: PropertyFilter) -> Self {
        Self { filter }
    }
}

#[async_trait]
impl View for Listings {
    type Snapshot = Vec<Property>;

    fn title(&self) -> &'static str {
        "Properties for rent"
    }

    async fn load(&self, api: &ApiClient, session: &Session) -> Result<Vec<Property>> {
        api.properties().list(session, &self.filter).await
    }

    fn render(&self, properties: &Vec<Property>, _session: &Session, config: &Config) -> String {
        if properties.is_empty() {
            return "No properties match these filters.\n".to_string();
        }

        let mut out = String::new();
        for (i, property) in properties.iter().enumerate() {
            let _ = writeln!(out, "{}. {} ({}/month)", i + 1, property.title, money(property.price));
            let _ = writeln!(out, "   {}, {} | {} | {} m²", property.district, property.city, property.rooms, property.area);
            if property.status != PropertyStatus::Active {
                let _ = writeln!(out, "   Status: {}", property.status);
            }
            if property.furnished {
                let _ = writeln!(out, "   Furnished");
            }
            if let Some(cover) = property.images.first() {
                let _ = writeln!(out, "   {}", config.resolve_image(cover));
            }
            let _ = writeln!(out, "   ID: {}", property.id);
            out.push('\n');
        }
        out
    }
}
