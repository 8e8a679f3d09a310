//! HTTP mailer.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::notify::{Mailer, MailerError, OrderConfirmation};

/// Mailer that POSTs confirmation payloads to an HTTP endpoint as JSON.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    endpoint: String,
    http: Client,
}

impl HttpMailer {
    /// Create a mailer for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_order_confirmation(
        &self,
        confirmation: OrderConfirmation,
    ) -> Result<(), MailerError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&confirmation)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(MailerError::UnexpectedResponse(format!(
                "confirmation request failed with status {status}: {text}"
            )));
        }

        debug!(order_id = %confirmation.order_id, "sent order confirmation");

        Ok(())
    }
}
