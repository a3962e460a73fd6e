use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application status. Values the client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    KycRequired,
    Approved,
    Rejected,
    Cancelled,
    Unknown(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::KycRequired => "kyc_required",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Cancelled => "cancelled",
            ApplicationStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::UnderReview => "Under review",
            ApplicationStatus::KycRequired => "KYC required",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Cancelled => "Cancelled",
            ApplicationStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected | ApplicationStatus::Cancelled
        )
    }
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => ApplicationStatus::Pending,
            "under_review" => ApplicationStatus::UnderReview,
            "kyc_required" => ApplicationStatus::KycRequired,
            "approved" => ApplicationStatus::Approved,
            "rejected" => ApplicationStatus::Rejected,
            "cancelled" => ApplicationStatus::Cancelled,
            _ => ApplicationStatus::Unknown(raw),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tenant application against a single property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub property_id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub owner_id: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub proposed_rent: Option<f64>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub move_in_date: DateTime<Utc>,
    /// Backend-computed score out of 100
    #[serde(default)]
    pub kyc_score: Option<u32>,
    #[serde(default)]
    pub kyc_notes: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /applications`
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDraft {
    pub property_id: String,
    pub message: String,
    pub move_in_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_rent: Option<f64>,
}

impl ApplicationDraft {
    /// Move-in dates are sent as midnight UTC of the chosen day.
    pub fn new(property_id: impl Into<String>, message: impl Into<String>, move_in: NaiveDate) -> Self {
        Self {
            property_id: property_id.into(),
            message: message.into(),
            move_in_date: move_in.and_time(NaiveTime::MIN).and_utc(),
            proposed_rent: None,
        }
    }
}

/// Result of `PUT /applications/{id}/kyc`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KycOutcome {
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default, alias = "kyc_score")]
    pub score: Option<u32>,
    #[serde(default, alias = "kyc_notes")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_serializes_move_in_as_iso8601_midnight() {
        let draft = ApplicationDraft::new("p1", "Hello", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let body = serde_json::to_value(&draft).unwrap();

        assert_eq!(
            body,
            json!({
                "property_id": "p1",
                "message": "Hello",
                "move_in_date": "2025-06-01T00:00:00Z",
            })
        );
    }

    #[test]
    fn terminal_statuses() {
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
        assert!(ApplicationStatus::Cancelled.is_terminal());
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(!ApplicationStatus::Unknown("payment_completed".into()).is_terminal());
    }

    #[test]
    fn application_with_backend_only_status_decodes() {
        let app: Application = serde_json::from_value(json!({
            "id": "a1",
            "property_id": "p1",
            "tenant_id": "t1",
            "owner_id": "o1",
            "status": "payment_completed",
            "message": "Merhaba",
            "move_in_date": "2025-06-01T00:00:00",
            "kyc_score": 85,
        }))
        .unwrap();

        assert_eq!(app.status.label(), "payment_completed");
        assert_eq!(app.kyc_score, Some(85));
    }

    #[test]
    fn kyc_outcome_accepts_either_field_spelling() {
        let outcome: KycOutcome =
            serde_json::from_value(json!({"status": "kyc_required", "kyc_score": 70, "notes": "ok"})).unwrap();
        assert_eq!(outcome.status, Some(ApplicationStatus::KycRequired));
        assert_eq!(outcome.score, Some(70));
        assert_eq!(outcome.notes.as_deref(), Some("ok"));
    }
}
