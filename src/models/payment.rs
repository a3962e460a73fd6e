use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Shown only when the backend leaves the commission rate out
pub const DEFAULT_COMMISSION_RATE: &str = "40%";

/// Payment record. All amounts are computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub booking_id: String,
    pub total_amount: f64,
    #[serde(default)]
    pub commission_amount: f64,
    #[serde(default)]
    pub owner_amount: f64,
    #[serde(default)]
    pub commission_rate: Option<f64>,
    /// initialized, completed or failed
    pub status: String,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Platform commission totals from `/commission-stats`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommissionStats {
    pub total_payments: f64,
    pub total_commission_collected: f64,
    pub total_owner_payments: f64,
    pub payment_count: u64,
    #[serde(deserialize_with = "rate_label")]
    pub commission_rate: Option<String>,
}

impl CommissionStats {
    pub fn rate_label(&self) -> &str {
        self.commission_rate.as_deref().unwrap_or(DEFAULT_COMMISSION_RATE)
    }
}

/// Platform-wide figures from `/admin/stats`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_tenants: u64,
    pub total_owners: u64,
    pub total_properties: u64,
    pub active_properties: u64,
    pub rented_properties: u64,
    pub total_applications: u64,
    pub pending_applications: u64,
    pub total_revenue: f64,
    #[serde(deserialize_with = "rate_label")]
    pub commission_rate: Option<String>,
}

impl AdminStats {
    pub fn rate_label(&self) -> &str {
        self.commission_rate.as_deref().unwrap_or(DEFAULT_COMMISSION_RATE)
    }
}

/// Response of `POST /payment/initialize`
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInit {
    pub status: String,
    #[serde(default)]
    pub payment_token: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub commission_breakdown: Option<CommissionBreakdown>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionBreakdown {
    pub total: f64,
    pub platform_commission: f64,
    pub owner_amount: f64,
    #[serde(default, deserialize_with = "rate_label")]
    pub commission_rate: Option<String>,
}

/// Commission rates arrive either as text ("40%") or as a bare number.
fn rate_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::Number(n)) => Some(format!("{n}%")),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commission_rate_is_shown_verbatim() {
        let stats: CommissionStats =
            serde_json::from_value(json!({"total_commission_collected": 12000.0, "commission_rate": "35%"})).unwrap();
        assert_eq!(stats.rate_label(), "35%");
    }

    #[test]
    fn commission_rate_defaults_only_when_missing() {
        let stats: CommissionStats = serde_json::from_value(json!({"payment_count": 3})).unwrap();
        assert_eq!(stats.rate_label(), DEFAULT_COMMISSION_RATE);
        assert_eq!(stats.payment_count, 3);
    }

    #[test]
    fn numeric_rate_becomes_percent_label() {
        let stats: AdminStats = serde_json::from_value(json!({"commission_rate": 40.0, "total_revenue": 1.5})).unwrap();
        assert_eq!(stats.rate_label(), "40%");
    }
}
