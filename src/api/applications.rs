use super::ApiClient;
use crate::error::{ClientError, Result};
use crate::lifecycle::ApplicationAction;
use crate::models::{Application, ApplicationDraft, ApplicationStatus, KycOutcome};
use crate::session::Session;
use reqwest::Method;
use tracing::info;

pub struct Applications<'a> {
    pub(super) api: &'a ApiClient,
}

/// What the backend reported after an action
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// Status change accepted with this explicit target
    StatusUpdated(ApplicationStatus),
    Kyc(KycOutcome),
}

impl Applications<'_> {
    /// `POST /applications`
    pub async fn submit(&self, session: &Session, draft: &ApplicationDraft) -> Result<Application> {
        let builder = self.api.request(Method::POST, "/applications", session).json(draft);
        let application: Application = self.api.fetch(builder).await?;
        info!("Submitted application {} for property {}", application.id, application.property_id);
        Ok(application)
    }

    /// `GET /applications`, scoped by the backend to the caller's role
    pub async fn list(&self, session: &Session) -> Result<Vec<Application>> {
        self.api.fetch(self.api.request(Method::GET, "/applications", session)).await
    }

    /// Validate `action` for the signed-in role and the application's
    /// current status, then send it. Callers re-fetch afterwards.
    pub async fn act(
        &self,
        session: &Session,
        application: &Application,
        action: ApplicationAction,
        note: Option<&str>,
    ) -> Result<ActionOutcome> {
        let role = session.role().ok_or(ClientError::NotSignedIn)?;
        action.check(role, &application.status)?;

        match action.target() {
            Some(target) => {
                let note = action.note(note);
                self.update_status(session, &application.id, &target, note.as_deref()).await?;
                info!("Application {}: {} -> {}", application.id, application.status.as_str(), target.as_str());
                Ok(ActionOutcome::StatusUpdated(target))
            }
            None => {
                let outcome = self.run_kyc(session, &application.id).await?;
                info!("KYC completed for application {} (score {:?})", application.id, outcome.score);
                Ok(ActionOutcome::Kyc(outcome))
            }
        }
    }

    /// `PUT /applications/{id}/status?new_status=&admin_notes=`
    async fn update_status(
        &self,
        session: &Session,
        id: &str,
        status: &ApplicationStatus,
        notes: Option<&str>,
    ) -> Result<()> {
        let mut query = vec![("new_status", status.as_str())];
        if let Some(notes) = notes {
            query.push(("admin_notes", notes));
        }

        let builder = self
            .api
            .request(Method::PUT, &format!("/applications/{id}/status"), session)
            .query(&query);
        self.api.submit(builder).await
    }

    /// `PUT /applications/{id}/kyc`
    async fn run_kyc(&self, session: &Session, id: &str) -> Result<KycOutcome> {
        self.api
            .fetch(self.api.request(Method::PUT, &format!("/applications/{id}/kyc"), session))
            .await
    }
}
