//! Client-visible status machines for properties and applications.
//!
//! The backend owns the records; these tables decide which requests the
//! client is willing to send. Anything outside them is refused before a
//! request is built.

use crate::error::{ClientError, Result};
use crate::models::{ApplicationStatus, PropertyStatus, Role};
use std::fmt;

/// Reason sent when an owner rejects without giving one
pub const DEFAULT_REJECT_REASON: &str = "Application rejected";

/// Owner-requested property status change. `rented` is never a client target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyTransition {
    /// draft -> active
    Publish,
    /// active -> inactive
    Suspend,
    /// inactive -> active
    Resume,
}

impl PropertyTransition {
    pub const ALL: [PropertyTransition; 3] = [Self::Publish, Self::Suspend, Self::Resume];

    pub fn name(self) -> &'static str {
        match self {
            PropertyTransition::Publish => "publish",
            PropertyTransition::Suspend => "suspend",
            PropertyTransition::Resume => "resume",
        }
    }

    /// Target status for this transition out of `from`
    pub fn target(self, from: &PropertyStatus) -> Result<PropertyStatus> {
        match (self, from) {
            (PropertyTransition::Publish, PropertyStatus::Draft) => Ok(PropertyStatus::Active),
            (PropertyTransition::Suspend, PropertyStatus::Active) => Ok(PropertyStatus::Inactive),
            (PropertyTransition::Resume, PropertyStatus::Inactive) => Ok(PropertyStatus::Active),
            _ => Err(ClientError::InvalidTransition {
                from: from.as_str().to_string(),
                action: self.name(),
            }),
        }
    }

    /// Role check followed by the status table
    pub fn check(self, role: Role, from: &PropertyStatus) -> Result<PropertyStatus> {
        match role {
            Role::Owner => self.target(from),
            Role::Tenant | Role::Admin => Err(ClientError::Forbidden(format!(
                "only the owner can {} a listing",
                self.name()
            ))),
        }
    }
}

impl fmt::Display for PropertyTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PropertyTransition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PropertyTransition::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown transition `{s}` (expected publish, suspend or resume)"))
    }
}

/// Transitions offered to `role` for a listing in `status`
pub fn property_transitions(role: Role, status: &PropertyStatus) -> Vec<PropertyTransition> {
    match role {
        Role::Owner => PropertyTransition::ALL
            .into_iter()
            .filter(|t| t.target(status).is_ok())
            .collect(),
        Role::Tenant | Role::Admin => Vec::new(),
    }
}

/// Actor-triggered application action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationAction {
    /// Tenant asks the backend to score the application
    RunKyc,
    Approve,
    Reject,
    MarkUnderReview,
}

impl ApplicationAction {
    pub const ALL: [ApplicationAction; 4] = [Self::RunKyc, Self::Approve, Self::Reject, Self::MarkUnderReview];

    pub fn name(self) -> &'static str {
        match self {
            ApplicationAction::RunKyc => "run KYC",
            ApplicationAction::Approve => "approve",
            ApplicationAction::Reject => "reject",
            ApplicationAction::MarkUnderReview => "mark under review",
        }
    }

    /// Explicit status sent for owner/admin actions. KYC has none; the
    /// backend decides the resulting status.
    pub fn target(self) -> Option<ApplicationStatus> {
        match self {
            ApplicationAction::RunKyc => None,
            ApplicationAction::Approve => Some(ApplicationStatus::Approved),
            ApplicationAction::Reject => Some(ApplicationStatus::Rejected),
            ApplicationAction::MarkUnderReview => Some(ApplicationStatus::UnderReview),
        }
    }

    fn allowed_for(self, role: Role) -> bool {
        match role {
            Role::Tenant => self == ApplicationAction::RunKyc,
            Role::Owner | Role::Admin => self != ApplicationAction::RunKyc,
        }
    }

    /// Role check followed by the status table
    pub fn check(self, role: Role, status: &ApplicationStatus) -> Result<()> {
        if !self.allowed_for(role) {
            return Err(ClientError::Forbidden(format!(
                "a {} cannot {} an application",
                role.as_str(),
                self.name()
            )));
        }
        if application_actions(role, status).contains(&self) {
            Ok(())
        } else {
            Err(ClientError::InvalidTransition {
                from: status.as_str().to_string(),
                action: self.name(),
            })
        }
    }

    /// Note sent with the status change. Rejections always carry a reason.
    pub fn note(self, note: Option<&str>) -> Option<String> {
        let note = note.map(str::trim).filter(|n| !n.is_empty());
        match self {
            ApplicationAction::Reject => Some(note.unwrap_or(DEFAULT_REJECT_REASON).to_string()),
            _ => note.map(str::to_string),
        }
    }
}

impl fmt::Display for ApplicationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Actions offered to `role` for an application in `status`
pub fn application_actions(role: Role, status: &ApplicationStatus) -> Vec<ApplicationAction> {
    match role {
        Role::Tenant => match status {
            ApplicationStatus::Pending => vec![ApplicationAction::RunKyc],
            _ => Vec::new(),
        },
        Role::Owner | Role::Admin => match status {
            ApplicationStatus::Pending | ApplicationStatus::UnderReview => vec![
                ApplicationAction::Approve,
                ApplicationAction::Reject,
                ApplicationAction::MarkUnderReview,
            ],
            _ => Vec::new(),
        },
    }
}
