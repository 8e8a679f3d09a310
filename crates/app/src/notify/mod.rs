//! Notifications
//!
//! Order confirmations go out through a [`Mailer`]. Delivery is best-effort:
//! checkout records the order first and only then asks for the email, so a
//! failed send is logged without touching order state.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::domain::orders::models::Order;

pub mod http;

pub use http::HttpMailer;

/// Template parameters for an order confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    /// Recipient name
    pub to_name: String,
    /// Recipient email
    pub to_email: String,
    /// Order id the customer can quote back
    pub order_id: String,
    /// Formatted order total
    pub order_total: String,
    /// Order date
    pub order_date: String,
    /// One line per purchased item
    pub items_summary: String,
    /// Full shipping address
    pub shipping_address: String,
}

impl OrderConfirmation {
    /// Build the template parameters for a recorded order.
    #[must_use]
    pub fn for_order(order: &Order) -> Self {
        let items_summary = order
            .items
            .iter()
            .map(|item| {
                format!(
                    "{} (x{}) - ${:.2}",
                    item.name,
                    item.quantity,
                    item.line_total()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            to_name: order.customer.full_name.clone(),
            to_email: order.customer.email.clone(),
            order_id: order.id.to_string(),
            order_total: format!("{:.2}", order.total),
            order_date: order.created_at.strftime("%Y-%m-%d").to_string(),
            items_summary,
            shipping_address: order.customer.shipping_address.to_string(),
        }
    }
}

/// Errors delivering a notification.
#[derive(Debug, Error)]
pub enum MailerError {
    /// HTTP transport or serialization failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The mail endpoint returned a non-2xx response
    #[error("unexpected response from the mail endpoint: {0}")]
    UnexpectedResponse(String),
}

/// Delivery channel for order confirmations.
#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send an order confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error when delivery fails; callers log it and move on.
    async fn send_order_confirmation(
        &self,
        confirmation: OrderConfirmation,
    ) -> Result<(), MailerError>;
}

/// Mailer for installs without a mail endpoint: logs the confirmation and
/// reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_order_confirmation(
        &self,
        confirmation: OrderConfirmation,
    ) -> Result<(), MailerError> {
        info!(
            order_id = %confirmation.order_id,
            to = %confirmation.to_email,
            "order confirmation logged; no mail endpoint configured"
        );

        Ok(())
    }
}
