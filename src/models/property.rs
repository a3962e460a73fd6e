use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing status. Values the client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyStatus {
    Draft,
    Active,
    Inactive,
    Rented,
    Unknown(String),
}

impl PropertyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyStatus::Draft => "draft",
            PropertyStatus::Active => "active",
            PropertyStatus::Inactive => "inactive",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Unknown(raw) => raw,
        }
    }

    /// Display label; unknown values pass through unchanged
    pub fn label(&self) -> &str {
        match self {
            PropertyStatus::Draft => "Draft",
            PropertyStatus::Active => "Active",
            PropertyStatus::Inactive => "Inactive",
            PropertyStatus::Rented => "Rented",
            PropertyStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for PropertyStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "draft" => PropertyStatus::Draft,
            "active" => PropertyStatus::Active,
            "inactive" => PropertyStatus::Inactive,
            "rented" => PropertyStatus::Rented,
            _ => PropertyStatus::Unknown(raw),
        }
    }
}

impl From<PropertyStatus> for String {
    fn from(status: PropertyStatus) -> Self {
        match status {
            PropertyStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of dwelling. Values the client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
    Studio,
    Villa,
    Unknown(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Studio => "studio",
            PropertyType::Villa => "villa",
            PropertyType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for PropertyType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "apartment" => PropertyType::Apartment,
            "house" => PropertyType::House,
            "studio" => PropertyType::Studio,
            "villa" => PropertyType::Villa,
            _ => PropertyType::Unknown(raw),
        }
    }
}

impl From<PropertyType> for String {
    fn from(kind: PropertyType) -> Self {
        match kind {
            PropertyType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the known kinds can be chosen when creating or filtering
impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match PropertyType::from(s.trim().to_ascii_lowercase()) {
            PropertyType::Unknown(other) => Err(format!("unknown property type `{other}`")),
            known => Ok(known),
        }
    }
}

/// Rental listing as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    /// Monthly rent
    pub price: f64,
    #[serde(default)]
    pub deposit: f64,
    /// Size in square meters
    #[serde(default)]
    pub area: u32,
    /// Room layout such as "2+1"
    #[serde(default)]
    pub rooms: String,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub heating: Option<String>,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub pets_allowed: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub status: PropertyStatus,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields an owner submits when creating a listing
#[derive(Debug, Clone, Serialize)]
pub struct PropertyDraft {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub address: String,
    pub district: String,
    pub city: String,
    pub price: f64,
    pub deposit: f64,
    pub area: u32,
    pub rooms: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heating: Option<String>,
    pub furnished: bool,
    pub pets_allowed: bool,
    pub amenities: Vec<String>,
}

impl Default for PropertyDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            property_type: PropertyType::Apartment,
            address: String::new(),
            district: String::new(),
            city: "İstanbul".to_string(),
            price: 0.0,
            deposit: 0.0,
            area: 0,
            rooms: String::new(),
            floor: None,
            heating: None,
            furnished: false,
            pets_allowed: false,
            amenities: Vec::new(),
        }
    }
}

/// Search parameters for the public listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// City to search in
    pub city: Option<String>,
    /// District within the city
    pub district: Option<String>,
    pub property_type: Option<PropertyType>,
    /// Minimum monthly rent
    pub min_price: Option<f64>,
    /// Maximum monthly rent
    pub max_price: Option<f64>,
    /// Exact room layout, e.g. "3+1"
    pub rooms: Option<String>,
    pub furnished: Option<bool>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl PropertyFilter {
    /// Query pairs for the set fields only. Blank strings are dropped.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let text = |value: &Option<String>| value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

        if let Some(city) = text(&self.city) {
            query.push(("city", city));
        }
        if let Some(district) = text(&self.district) {
            query.push(("district", district));
        }
        if let Some(kind) = &self.property_type {
            query.push(("property_type", kind.as_str().to_string()));
        }
        if let Some(min) = self.min_price {
            query.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            query.push(("max_price", max.to_string()));
        }
        if let Some(rooms) = text(&self.rooms) {
            query.push(("rooms", rooms));
        }
        if let Some(furnished) = self.furnished {
            query.push(("furnished", furnished.to_string()));
        }
        if let Some(skip) = self.skip {
            query.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing(status: &str) -> serde_json::Value {
        json!({
            "id": "p1",
            "owner_id": "o1",
            "title": "Moda'da deniz manzaralı 2+1",
            "price": 25000.0,
            "status": status,
            "created_at": "2025-05-01T10:00:00",
        })
    }

    #[test]
    fn unknown_status_is_preserved_and_labelled_raw() {
        let property: Property = serde_json::from_value(listing("archived")).unwrap();
        assert_eq!(property.status, PropertyStatus::Unknown("archived".into()));
        assert_eq!(property.status.label(), "archived");
        assert_eq!(property.status.to_string(), "archived");
    }

    #[test]
    fn known_status_round_trips_as_lowercase() {
        let property: Property = serde_json::from_value(listing("rented")).unwrap();
        assert_eq!(property.status, PropertyStatus::Rented);
        assert_eq!(serde_json::to_value(&property.status).unwrap(), json!("rented"));
        assert!(property.created_at.is_some());
    }

    #[test]
    fn unknown_property_type_keeps_raw_label() {
        let mut raw = listing("active");
        raw["property_type"] = json!("loft");
        let property: Property = serde_json::from_value(raw).unwrap();

        assert_eq!(property.property_type, PropertyType::Unknown("loft".into()));
        assert_eq!(property.property_type.as_str(), "loft");
        assert_eq!(serde_json::to_value(&property).unwrap()["property_type"], json!("loft"));
    }

    #[test]
    fn only_known_property_types_parse_from_input() {
        assert_eq!("Villa".parse::<PropertyType>(), Ok(PropertyType::Villa));
        assert!("loft".parse::<PropertyType>().is_err());
    }

    #[test]
    fn filter_skips_unset_and_blank_fields() {
        let filter = PropertyFilter {
            city: Some("İstanbul".into()),
            district: Some("  ".into()),
            max_price: Some(30000.0),
            rooms: Some("2+1".into()),
            ..Default::default()
        };

        assert_eq!(
            filter.to_query(),
            vec![
                ("city", "İstanbul".to_string()),
                ("max_price", "30000".to_string()),
                ("rooms", "2+1".to_string()),
            ]
        );
    }
}
