//! Derived dashboard figures.
//!
//! Everything here is a pure function of the snapshot passed in and is
//! recomputed on every render. Commission and revenue figures are taken from
//! the backend as-is.

use crate::models::{
    AdminStats, Application, ApplicationStatus, CommissionStats, Payment, Property, PropertyStatus, Role, User,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyCounts {
    pub draft: usize,
    pub active: usize,
    pub inactive: usize,
    pub rented: usize,
    /// Statuses the client does not recognise
    pub other: usize,
}

impl PropertyCounts {
    pub fn tally<'a>(properties: impl IntoIterator<Item = &'a Property>) -> Self {
        let mut counts = Self::default();
        for property in properties {
            match property.status {
                PropertyStatus::Draft => counts.draft += 1,
                PropertyStatus::Active => counts.active += 1,
                PropertyStatus::Inactive => counts.inactive += 1,
                PropertyStatus::Rented => counts.rented += 1,
                PropertyStatus::Unknown(_) => counts.other += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.draft + self.active + self.inactive + self.rented + self.other
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationCounts {
    pub pending: usize,
    pub under_review: usize,
    pub kyc_required: usize,
    pub approved: usize,
    pub rejected: usize,
    pub cancelled: usize,
    pub other: usize,
}

impl ApplicationCounts {
    pub fn tally<'a>(applications: impl IntoIterator<Item = &'a Application>) -> Self {
        let mut counts = Self::default();
        for application in applications {
            match application.status {
                ApplicationStatus::Pending => counts.pending += 1,
                ApplicationStatus::UnderReview => counts.under_review += 1,
                ApplicationStatus::KycRequired => counts.kyc_required += 1,
                ApplicationStatus::Approved => counts.approved += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
                ApplicationStatus::Cancelled => counts.cancelled += 1,
                ApplicationStatus::Unknown(_) => counts.other += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.pending + self.under_review + self.kyc_required + self.approved + self.rejected + self.cancelled + self.other
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts {
    pub tenants: usize,
    pub owners: usize,
    pub admins: usize,
}

impl RoleCounts {
    pub fn tally<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        let mut counts = Self::default();
        for user in users {
            match user.role {
                Role::Tenant => counts.tenants += 1,
                Role::Owner => counts.owners += 1,
                Role::Admin => counts.admins += 1,
            }
        }
        counts
    }
}

/// Sum of monthly rent over rented listings
pub fn monthly_income(properties: &[Property]) -> f64 {
    properties
        .iter()
        .filter(|p| p.status == PropertyStatus::Rented)
        .map(|p| p.price)
        .sum()
}

pub fn applications_for<'a>(applications: &'a [Application], property_id: &'a str) -> impl Iterator<Item = &'a Application> + 'a {
    applications.iter().filter(move |a| a.property_id == property_id)
}

#[derive(Debug, Clone)]
pub struct OwnerSummary<'a> {
    pub properties: PropertyCounts,
    pub applications: ApplicationCounts,
    pub pending: Vec<&'a Application>,
    pub rented: Vec<&'a Property>,
    pub monthly_income: f64,
}

pub fn owner_summary<'a>(properties: &'a [Property], applications: &'a [Application]) -> OwnerSummary<'a> {
    OwnerSummary {
        properties: PropertyCounts::tally(properties),
        applications: ApplicationCounts::tally(applications),
        pending: applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .collect(),
        rented: properties
            .iter()
            .filter(|p| p.status == PropertyStatus::Rented)
            .collect(),
        monthly_income: monthly_income(properties),
    }
}

#[derive(Debug, Clone)]
pub struct TenantSummary<'a> {
    pub applications: ApplicationCounts,
    /// Pending applications the tenant can still send to KYC
    pub awaiting_kyc: Vec<&'a Application>,
    /// Sum of completed payment totals as reported
    pub total_paid: f64,
}

pub fn tenant_summary<'a>(applications: &'a [Application], payments: &[Payment]) -> TenantSummary<'a> {
    TenantSummary {
        applications: ApplicationCounts::tally(applications),
        awaiting_kyc: applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .collect(),
        total_paid: payments
            .iter()
            .filter(|p| p.status == "completed")
            .map(|p| p.total_amount)
            .sum(),
    }
}

#[derive(Debug, Clone)]
pub struct AdminSummary<'a> {
    /// Platform figures exactly as the backend reported them
    pub platform: &'a AdminStats,
    pub commission: &'a CommissionStats,
    pub users: RoleCounts,
    pub properties: PropertyCounts,
    pub applications: ApplicationCounts,
    pub revenue: f64,
    pub commission_rate: &'a str,
}

pub fn admin_summary<'a>(
    platform: &'a AdminStats,
    commission: &'a CommissionStats,
    users: &[User],
    properties: &[Property],
    applications: &[Application],
) -> AdminSummary<'a> {
    AdminSummary {
        platform,
        commission,
        users: RoleCounts::tally(users),
        properties: PropertyCounts::tally(properties),
        applications: ApplicationCounts::tally(applications),
        revenue: platform.total_revenue,
        commission_rate: commission.commission_rate.as_deref().unwrap_or_else(|| platform.rate_label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn property(id: &str, status: &str, price: f64) -> Property {
        serde_json::from_value(json!({
            "id": id,
            "owner_id": "o1",
            "title": id,
            "price": price,
            "status": status,
        }))
        .unwrap()
    }

    fn application(id: &str, property_id: &str, status: &str) -> Application {
        serde_json::from_value(json!({
            "id": id,
            "property_id": property_id,
            "tenant_id": "t1",
            "status": status,
            "move_in_date": "2025-06-01T00:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn monthly_income_sums_rented_only() {
        let properties = vec![
            property("p1", "rented", 20000.0),
            property("p2", "active", 99999.0),
            property("p3", "rented", 15500.5),
            property("p4", "archived", 1.0),
        ];
        assert_eq!(monthly_income(&properties), 35500.5);
    }

    #[test]
    fn owner_summary_reflects_latest_snapshot() {
        let mut properties = vec![property("p1", "rented", 20000.0), property("p2", "draft", 18000.0)];
        let applications = vec![
            application("a1", "p2", "pending"),
            application("a2", "p2", "approved"),
            application("a3", "p1", "pending"),
        ];

        let first = owner_summary(&properties, &applications);
        assert_eq!(first.monthly_income, 20000.0);
        assert_eq!(first.pending.len(), 2);
        assert_eq!(first.rented.len(), 1);
        assert_eq!(first.properties.draft, 1);

        properties[1] = property("p2", "rented", 18000.0);
        let second = owner_summary(&properties, &applications);
        assert_eq!(second.monthly_income, 38000.0);
        assert_eq!(second.properties.rented, 2);
    }

    #[test]
    fn unknown_statuses_are_counted_separately() {
        let applications = vec![application("a1", "p1", "payment_completed"), application("a2", "p1", "cancelled")];
        let counts = ApplicationCounts::tally(&applications);
        assert_eq!(counts.other, 1);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn applications_for_filters_by_property() {
        let applications = vec![application("a1", "p1", "pending"), application("a2", "p2", "pending")];
        let ids: Vec<_> = applications_for(&applications, "p2").map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a2"]);
    }

    #[test]
    fn admin_revenue_and_rate_are_verbatim() {
        let platform: AdminStats = serde_json::from_value(json!({"total_revenue": 123456.78, "total_users": 9})).unwrap();
        let commission: CommissionStats = serde_json::from_value(json!({"commission_rate": "35%"})).unwrap();

        let summary = admin_summary(&platform, &commission, &[], &[], &[]);
        assert_eq!(summary.revenue, 123456.78);
        assert_eq!(summary.commission_rate, "35%");
        assert_eq!(summary.platform.total_users, 9);
    }

    #[test]
    fn admin_rate_falls_back_to_display_default() {
        let platform = AdminStats::default();
        let commission = CommissionStats::default();
        let summary = admin_summary(&platform, &commission, &[], &[], &[]);
        assert_eq!(summary.commission_rate, "40%");
    }
}
