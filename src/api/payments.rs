use super::ApiClient;
use crate::error::Result;
use crate::models::{CommissionStats, Payment, PaymentInit};
use crate::session::Session;
use reqwest::Method;

pub struct Payments<'a> {
    pub(super) api: &'a ApiClient,
}

impl Payments<'_> {
    /// `GET /payments`
    pub async fn list(&self, session: &Session) -> Result<Vec<Payment>> {
        self.api.fetch(self.api.request(Method::GET, "/payments", session)).await
    }

    /// `GET /commission-stats`
    pub async fn commission_stats(&self, session: &Session) -> Result<CommissionStats> {
        self.api.fetch(self.api.request(Method::GET, "/commission-stats", session)).await
    }

    /// `POST /payment/initialize?booking_id=`. The breakdown is computed by
    /// the backend and only displayed.
    pub async fn initialize(&self, session: &Session, booking_id: &str) -> Result<PaymentInit> {
        let builder = self
            .api
            .request(Method::POST, "/payment/initialize", session)
            .query(&[("booking_id", booking_id)]);
        self.api.fetch(builder).await
    }
}
