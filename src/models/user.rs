use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role, fixed at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tenant,
    Owner,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Tenant => "Tenant",
            Role::Owner => "Owner",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tenant" => Ok(Role::Tenant),
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role `{other}` (expected tenant, owner or admin)")),
        }
    }
}

/// Optional profile details kept alongside the account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub phone: Option<String>,
    pub tc_no: Option<String>,
    pub address: Option<String>,
    pub profession: Option<String>,
    pub income: Option<f64>,
    pub is_kyc_verified: bool,
    pub kyc_documents: Vec<String>,
}

/// Account as returned by `/auth/me` and the admin user listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default, deserialize_with = "super::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration form
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Tokens issued by `/auth/login`. Only the access token is used.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_decodes_with_missing_optional_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "ayse@example.com",
            "full_name": "Ayşe Yılmaz",
            "role": "owner",
        }))
        .unwrap();

        assert_eq!(user.role, Role::Owner);
        assert!(user.is_active);
        assert!(!user.profile.is_kyc_verified);
        assert!(user.created_at.is_none());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("landlord".parse::<Role>().is_err());
    }

    #[test]
    fn registration_omits_missing_phone() {
        let body = serde_json::to_value(Registration {
            email: "a@b.c".into(),
            password: "secret1".into(),
            full_name: "A B".into(),
            role: Role::Tenant,
            phone: None,
        })
        .unwrap();

        assert_eq!(body["role"], "tenant");
        assert!(body.get("phone").is_none());
    }
}
