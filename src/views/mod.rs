//! Terminal views over the API.
//!
//! A view loads a snapshot and renders it. Loads either replace the snapshot
//! wholesale or leave the previous one in place with an error message; they
//! are never patched in place. Actions re-fetch through the same path.

pub mod dashboard;
pub mod listings;
pub mod property_detail;
pub mod property_form;
pub mod render;

use crate::api::{ActionOutcome, ApiClient};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::lifecycle::{ApplicationAction, PropertyTransition};
use crate::models::{Application, Property, PropertyStatus};
use crate::session::Session;
use async_trait::async_trait;
use tracing::warn;

pub use dashboard::{AdminDashboard, DashboardPage, OwnerDashboard, OwnerTab, TenantDashboard};
pub use listings::Listings;
pub use property_detail::{ApplicationForm, ApplyState, PropertyDetail};
pub use property_form::PropertyForm;

/// Something that can be fetched and shown
#[async_trait]
pub trait View: Send + Sync {
    type Snapshot: Send;

    fn title(&self) -> &'static str;

    /// Fetch a complete snapshot. Parallel fetches fail as a batch.
    async fn load(&self, api: &ApiClient, session: &Session) -> Result<Self::Snapshot>;

    fn render(&self, snapshot: &Self::Snapshot, session: &Session, config: &Config) -> String;
}

/// Snapshot plus the loading/error flags a view shows around it
#[derive(Debug, Clone)]
pub struct Loadable<T> {
    snapshot: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            snapshot: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Loadable<T> {
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Success replaces the snapshot; failure keeps it and records why
    pub fn finish(&mut self, result: Result<T>) -> Result<()> {
        self.loading = false;
        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub fn fail(&mut self, err: &ClientError) {
        self.loading = false;
        self.error = Some(err.user_message());
    }

    pub fn snapshot(&self) -> Option<&T> {
        self.snapshot.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Load `view` into `state`, ending the session on an auth failure
pub async fn refresh<V>(view: &V, state: &mut Loadable<V::Snapshot>, api: &ApiClient, session: &mut Session) -> Result<()>
where
    V: View + ?Sized,
{
    state.begin();
    let result = view.load(api, session).await;
    if let Err(err) = &result {
        session.note_failure(err);
    }
    state.finish(result)
}

/// Render whatever state the view is in
pub fn show<V>(view: &V, state: &Loadable<V::Snapshot>, session: &Session, config: &Config) -> String
where
    V: View + ?Sized,
{
    let mut out = render::heading(view.title());
    if state.is_loading() {
        out.push_str("Loading...\n");
    }
    if let Some(error) = state.error() {
        out.push_str(&format!("! {error}\n"));
    }
    match state.snapshot() {
        Some(snapshot) => out.push_str(&view.render(snapshot, session, config)),
        None if state.error().is_none() && !state.is_loading() => out.push_str("Nothing loaded yet.\n"),
        None => {}
    }
    out
}

/// Snapshots that hold applications a user can act on
pub trait ApplicationSource {
    fn application(&self, id: &str) -> Option<&Application>;
}

/// Snapshots that hold the owner's listings
pub trait PropertySource {
    fn property(&self, id: &str) -> Option<&Property>;
}

/// Reload after the backend accepted a change. A failed reload keeps the
/// previous snapshot with its error; the change itself still stands.
async fn reload_after_change<V>(view: &V, state: &mut Loadable<V::Snapshot>, api: &ApiClient, session: &mut Session)
where
    V: View + ?Sized,
{
    if let Err(err) = refresh(view, state, api, session).await {
        warn!("Change applied, but reloading {} failed: {}", view.title(), err);
    }
}

/// Apply `action` to an application in the current snapshot, then reload
pub async fn act_on_application<V>(
    view: &V,
    state: &mut Loadable<V::Snapshot>,
    api: &ApiClient,
    session: &mut Session,
    application_id: &str,
    action: ApplicationAction,
    note: Option<&str>,
) -> Result<ActionOutcome>
where
    V: View + ?Sized,
    V::Snapshot: ApplicationSource,
{
    let application = state
        .snapshot()
        .and_then(|snapshot| snapshot.application(application_id))
        .cloned()
        .ok_or_else(|| ClientError::NotFound(format!("application {application_id}")))?;

    let outcome = match api.applications().act(session, &application, action, note).await {
        Ok(outcome) => outcome,
        Err(err) => {
            session.note_failure(&err);
            state.fail(&err);
            return Err(err);
        }
    };

    reload_after_change(view, state, api, session).await;
    Ok(outcome)
}

/// Apply `transition` to a listing in the current snapshot, then reload
pub async fn transition_property<V>(
    view: &V,
    state: &mut Loadable<V::Snapshot>,
    api: &ApiClient,
    session: &mut Session,
    property_id: &str,
    transition: PropertyTransition,
) -> Result<PropertyStatus>
where
    V: View + ?Sized,
    V::Snapshot: PropertySource,
{
    let property = state
        .snapshot()
        .and_then(|snapshot| snapshot.property(property_id))
        .cloned()
        .ok_or_else(|| ClientError::NotFound(format!("property {property_id}")))?;

    let target = match api.properties().transition(session, &property, transition).await {
        Ok(target) => target,
        Err(err) => {
            session.note_failure(&err);
            state.fail(&err);
            return Err(err);
        }
    };

    reload_after_change(view, state, api, session).await;
    Ok(target)
}
