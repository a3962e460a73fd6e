//! Role dashboards.
//!
//! Each role gets its own view type and snapshot; `DashboardPage` picks one
//! by matching on the signed-in role.

use super::render::{self, field, money};
use super::{ApplicationSource, Loadable, PropertySource, View};
use crate::aggregate::{self, admin_summary, owner_summary, tenant_summary};
use crate::api::{ActionOutcome, ApiClient};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::lifecycle::{application_actions, property_transitions, ApplicationAction, PropertyTransition};
use crate::models::{AdminStats, Application, CommissionStats, Payment, Property, PropertyStatus, Role, User};
use crate::session::Session;
use async_trait::async_trait;
use std::fmt::Write;

fn application_line(out: &mut String, application: &Application, role: Role) {
    let _ = writeln!(
        out,
        "  [{}] property {} | move-in {} | {}",
        application.id,
        application.property_id,
        render::date(&application.move_in_date),
        application.status
    );
    if !application.message.is_empty() {
        let _ = writeln!(out, "      \"{}\"", application.message);
    }
    if let Some(score) = application.kyc_score {
        let _ = writeln!(out, "      KYC score: {score}/100");
    }
    if let Some(notes) = &application.kyc_notes {
        let _ = writeln!(out, "      KYC notes: {notes}");
    }
    if let Some(notes) = &application.admin_notes {
        let _ = writeln!(out, "      Notes: {notes}");
    }
    let actions = application_actions(role, &application.status);
    if !actions.is_empty() {
        let names: Vec<_> = actions.iter().map(|a| a.name()).collect();
        let _ = writeln!(out, "      actions: {}", names.join(", "));
    }
}

fn property_line(out: &mut String, property: &Property, role: Role, config: &Config) {
    let _ = writeln!(
        out,
        "  [{}] {} | {} / {} | {} | {}",
        property.id,
        property.title,
        property.district,
        property.city,
        money(property.price),
        property.status
    );
    if let Some(cover) = property.images.first() {
        let _ = writeln!(out, "      cover: {}", config.resolve_image(cover));
    }
    let transitions = property_transitions(role, &property.status);
    if !transitions.is_empty() {
        let names: Vec<_> = transitions.iter().map(|t| t.name()).collect();
        let _ = writeln!(out, "      actions: {}", names.join(", "));
    }
}

fn payment_line(out: &mut String, payment: &Payment) {
    let _ = writeln!(
        out,
        "  [{}] {} | {} | {}",
        payment.id,
        money(payment.total_amount),
        payment.status,
        render::optional_date(payment.created_at.as_ref())
    );
}

// ---------------------------------------------------------------------------
// Tenant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct TenantDashboard;

#[derive(Debug, Clone)]
pub struct TenantSnapshot {
    pub applications: Vec<Application>,
    pub payments: Vec<Payment>,
}

impl ApplicationSource for TenantSnapshot {
    fn application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }
}

#[async_trait]
impl View for TenantDashboard {
    type Snapshot = TenantSnapshot;

    fn title(&self) -> &'static str {
        "My applications"
    }

    async fn load(&self, api: &ApiClient, session: &Session) -> Result<TenantSnapshot> {
        let (apps, pays) = (api.applications(), api.payments());
        let (applications, payments) = tokio::try_join!(apps.list(session), pays.list(session))?;
        Ok(TenantSnapshot { applications, payments })
    }

    fn render(&self, snapshot: &TenantSnapshot, _session: &Session, _config: &Config) -> String {
        let summary = tenant_summary(&snapshot.applications, &snapshot.payments);
        let mut out = String::new();

        out.push_str(&field("Applications", summary.applications.total()));
        out.push_str(&field("Pending", summary.applications.pending));
        out.push_str(&field("Approved", summary.applications.approved));
        out.push_str(&field("Awaiting KYC", summary.awaiting_kyc.len()));
        out.push_str(&field("Total paid", money(summary.total_paid)));

        out.push_str(&render::section("Applications"));
        if snapshot.applications.is_empty() {
            out.push_str("  You have not applied to any property yet.\n");
        }
        for application in &snapshot.applications {
            application_line(&mut out, application, Role::Tenant);
        }

        if !snapshot.payments.is_empty() {
            out.push_str(&render::section("Payments"));
            for payment in &snapshot.payments {
                payment_line(&mut out, payment);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnerTab {
    #[default]
    Overview,
    Properties,
    Applications,
    Payments,
}

impl std::str::FromStr for OwnerTab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "overview" => Ok(OwnerTab::Overview),
            "properties" => Ok(OwnerTab::Properties),
            "applications" => Ok(OwnerTab::Applications),
            "payments" => Ok(OwnerTab::Payments),
            other => Err(format!("unknown tab `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerDashboard {
    pub tab: OwnerTab,
}

#[derive(Debug, Clone)]
pub struct OwnerSnapshot {
    pub properties: Vec<Property>,
    pub applications: Vec<Application>,
    pub payments: Vec<Payment>,
    pub commission: CommissionStats,
}

impl ApplicationSource for OwnerSnapshot {
    fn application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }
}

impl PropertySource for OwnerSnapshot {
    fn property(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }
}

#[async_trait]
impl View for OwnerDashboard {
    type Snapshot = OwnerSnapshot;

    fn title(&self) -> &'static str {
        "Owner dashboard"
    }

    async fn load(&self, api: &ApiClient, session: &Session) -> Result<OwnerSnapshot> {
        let (props, apps, pays) = (api.properties(), api.applications(), api.payments());
        let (properties, applications, payments, commission) = tokio::try_join!(
            props.mine(session),
            apps.list(session),
            pays.list(session),
            pays.commission_stats(session),
        )?;
        Ok(OwnerSnapshot { properties, applications, payments, commission })
    }

    fn render(&self, snapshot: &OwnerSnapshot, _session: &Session, config: &Config) -> String {
        let summary = owner_summary(&snapshot.properties, &snapshot.applications);
        let mut out = String::new();

        match self.tab {
            OwnerTab::Overview => {
                out.push_str(&field("Properties", summary.properties.total()));
                out.push_str(&field("Active", summary.properties.active));
                out.push_str(&field("Draft", summary.properties.draft));
                out.push_str(&field("Rented", summary.rented.len()));
                out.push_str(&field("Pending apps", summary.pending.len()));
                out.push_str(&field("Monthly income", money(summary.monthly_income)));
                out.push_str(&field("Commission", snapshot.commission.rate_label()));

                if !summary.pending.is_empty() {
                    out.push_str(&render::section("Waiting for you"));
                    for application in &summary.pending {
                        application_line(&mut out, application, Role::Owner);
                    }
                }
            }
            OwnerTab::Properties => {
                if snapshot.properties.is_empty() {
                    out.push_str("  No listings yet. Create one with `kirada new-property`.\n");
                }
                for property in &snapshot.properties {
                    property_line(&mut out, property, Role::Owner, config);
                    let count = aggregate::applications_for(&snapshot.applications, &property.id).count();
                    if count > 0 {
                        let _ = writeln!(out, "      applications: {count}");
                    }
                }
            }
            OwnerTab::Applications => {
                if snapshot.applications.is_empty() {
                    out.push_str("  No applications yet.\n");
                }
                for application in &snapshot.applications {
                    application_line(&mut out, application, Role::Owner);
                }
            }
            OwnerTab::Payments => {
                out.push_str(&field("Collected", money(snapshot.commission.total_payments)));
                out.push_str(&field("Owner share", money(snapshot.commission.total_owner_payments)));
                out.push_str(&field("Commission", money(snapshot.commission.total_commission_collected)));
                out.push_str(&field("Rate", snapshot.commission.rate_label()));
                for payment in &snapshot.payments {
                    payment_line(&mut out, payment);
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct AdminDashboard;

#[derive(Debug, Clone)]
pub struct AdminSnapshot {
    pub stats: AdminStats,
    pub users: Vec<User>,
    pub properties: Vec<Property>,
    pub applications: Vec<Application>,
    pub commission: CommissionStats,
}

impl ApplicationSource for AdminSnapshot {
    fn application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }
}

#[async_trait]
impl View for AdminDashboard {
    type Snapshot = AdminSnapshot;

    fn title(&self) -> &'static str {
        "Admin dashboard"
    }

    async fn load(&self, api: &ApiClient, session: &Session) -> Result<AdminSnapshot> {
        let (admin, pays) = (api.admin(), api.payments());
        let (stats, users, properties, applications, commission) = tokio::try_join!(
            admin.stats(session),
            admin.users(session),
            admin.properties(session),
            admin.applications(session),
            pays.commission_stats(session),
        )?;
        Ok(AdminSnapshot { stats, users, properties, applications, commission })
    }

    fn render(&self, snapshot: &AdminSnapshot, _session: &Session, config: &Config) -> String {
        let summary = admin_summary(
            &snapshot.stats,
            &snapshot.commission,
            &snapshot.users,
            &snapshot.properties,
            &snapshot.applications,
        );
        let mut out = String::new();

        out.push_str(&field("Users", summary.platform.total_users));
        out.push_str(&field("Owners", summary.platform.total_owners));
        out.push_str(&field("Tenants", summary.platform.total_tenants));
        out.push_str(&field("Properties", summary.platform.total_properties));
        out.push_str(&field("Active", summary.platform.active_properties));
        out.push_str(&field("Applications", summary.platform.total_applications));
        out.push_str(&field("Revenue", money(summary.revenue)));
        out.push_str(&field("Commission", money(summary.commission.total_commission_collected)));
        out.push_str(&field("Rate", summary.commission_rate));

        out.push_str(&render::section("Loaded records"));
        let _ = writeln!(
            out,
            "  users: {} tenants, {} owners, {} admins",
            summary.users.tenants, summary.users.owners, summary.users.admins
        );
        let _ = writeln!(
            out,
            "  properties: {} active, {} rented, {} draft, {} inactive",
            summary.properties.active, summary.properties.rented, summary.properties.draft, summary.properties.inactive
        );
        let _ = writeln!(
            out,
            "  applications: {} pending, {} under review, {} approved, {} rejected",
            summary.applications.pending,
            summary.applications.under_review,
            summary.applications.approved,
            summary.applications.rejected
        );

        let open: Vec<_> = snapshot
            .applications
            .iter()
            .filter(|a| !application_actions(Role::Admin, &a.status).is_empty())
            .collect();
        if !open.is_empty() {
            out.push_str(&render::section("Open applications"));
            for application in open {
                application_line(&mut out, application, Role::Admin);
            }
        }

        let rented: Vec<_> = snapshot
            .properties
            .iter()
            .filter(|p| p.status == PropertyStatus::Rented)
            .collect();
        if !rented.is_empty() {
            out.push_str(&render::section("Rented"));
            for property in rented {
                property_line(&mut out, property, Role::Admin, config);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Role dispatch
// ---------------------------------------------------------------------------

/// The dashboard for whoever is signed in
#[derive(Debug, Clone)]
pub enum DashboardPage {
    Tenant(TenantDashboard, Loadable<TenantSnapshot>),
    Owner(OwnerDashboard, Loadable<OwnerSnapshot>),
    Admin(AdminDashboard, Loadable<AdminSnapshot>),
}

impl DashboardPage {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Tenant => DashboardPage::Tenant(TenantDashboard, Loadable::default()),
            Role::Owner => DashboardPage::Owner(OwnerDashboard::default(), Loadable::default()),
            Role::Admin => DashboardPage::Admin(AdminDashboard, Loadable::default()),
        }
    }

    pub fn for_session(session: &Session) -> Result<Self> {
        session.role().map(Self::for_role).ok_or(ClientError::NotSignedIn)
    }

    pub fn with_owner_tab(mut self, tab: OwnerTab) -> Self {
        if let DashboardPage::Owner(view, _) = &mut self {
            view.tab = tab;
        }
        self
    }

    pub async fn refresh(&mut self, api: &ApiClient, session: &mut Session) -> Result<()> {
        match self {
            DashboardPage::Tenant(view, state) => super::refresh(view, state, api, session).await,
            DashboardPage::Owner(view, state) => super::refresh(view, state, api, session).await,
            DashboardPage::Admin(view, state) => super::refresh(view, state, api, session).await,
        }
    }

    pub async fn act_on_application(
        &mut self,
        api: &ApiClient,
        session: &mut Session,
        application_id: &str,
        action: ApplicationAction,
        note: Option<&str>,
    ) -> Result<ActionOutcome> {
        match self {
            DashboardPage::Tenant(view, state) => {
                super::act_on_application(view, state, api, session, application_id, action, note).await
            }
            DashboardPage::Owner(view, state) => {
                super::act_on_application(view, state, api, session, application_id, action, note).await
            }
            DashboardPage::Admin(view, state) => {
                super::act_on_application(view, state, api, session, application_id, action, note).await
            }
        }
    }

    pub async fn transition_property(
        &mut self,
        api: &ApiClient,
        session: &mut Session,
        property_id: &str,
        transition: PropertyTransition,
    ) -> Result<PropertyStatus> {
        match self {
            DashboardPage::Owner(view, state) => {
                super::transition_property(view, state, api, session, property_id, transition).await
            }
            DashboardPage::Tenant(..) | DashboardPage::Admin(..) => Err(ClientError::Forbidden(format!(
                "only the owner can {} a listing",
                transition.name()
            ))),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DashboardPage::Tenant(_, state) => state.error(),
            DashboardPage::Owner(_, state) => state.error(),
            DashboardPage::Admin(_, state) => state.error(),
        }
    }

    pub fn render(&self, session: &Session, config: &Config) -> String {
        match self {
            DashboardPage::Tenant(view, state) => super::show(view, state, session, config),
            DashboardPage::Owner(view, state) => super::show(view, state, session, config),
            DashboardPage::Admin(view, state) => super::show(view, state, session, config),
        }
    }
}
