//! Checkout service.
//!
//! Orchestrates submit: gate on the session, hand the cart snapshot to the
//! inventory reservation, record the order, then run the best-effort side
//! effects (profile address, confirmation email, cart clear). Stock
//! reservation and order recording are two separate commits; a failed order
//! write after a committed reservation is surfaced with a support reference
//! instead of being retried blindly.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        carts::CartStore,
        checkout::{errors::CheckoutError, models::CheckoutRequest},
        customers::CustomersService,
        inventory::{ReservationService, models::ReservationLine},
        orders::{
            OrdersService,
            models::{NewOrder, Order, OrderCustomer, OrderLine},
        },
    },
    notify::{Mailer, OrderConfirmation},
    session::SessionManager,
};

#[derive(Clone)]
pub struct CheckoutService {
    sessions: SessionManager,
    carts: CartStore,
    inventory: Arc<dyn ReservationService>,
    orders: Arc<dyn OrdersService>,
    customers: Arc<dyn CustomersService>,
    mailer: Arc<dyn Mailer>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        sessions: SessionManager,
        carts: CartStore,
        inventory: Arc<dyn ReservationService>,
        orders: Arc<dyn OrdersService>,
        customers: Arc<dyn CustomersService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            sessions,
            carts,
            inventory,
            orders,
            customers,
            mailer,
        }
    }

    /// Submit the current cart as an order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotAuthenticated`] without a session,
    /// [`CheckoutError::EmptyCart`] for a cart with no lines,
    /// [`CheckoutError::MissingAddress`] when no shipping address can be
    /// resolved, [`CheckoutError::Reservation`] when stock cannot be
    /// reserved (nothing is decremented then), and
    /// [`CheckoutError::OrderWriteFailed`] when the order write fails after
    /// the reservation committed.
    pub async fn submit(&self, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        let Some(session) = self.sessions.current().session().cloned() else {
            return Err(CheckoutError::NotAuthenticated);
        };

        let cart = self.carts.view().await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let customer = self.customers.get_customer(session.customer).await?;

        let new_address = request.address.is_some();
        let address = match request.address {
            Some(address) => address,
            None => customer
                .default_address()
                .cloned()
                .ok_or(CheckoutError::MissingAddress)?,
        };

        // Reference identifying this attempt in the logs; quoted back to
        // support when the order write fails after stock was decremented.
        let reference = Uuid::now_v7();
        info!(
            %reference,
            customer_uuid = %customer.uid,
            lines = cart.lines.len(),
            total = %cart.total,
            "submitting checkout"
        );

        let reservation: Vec<ReservationLine> =
            cart.lines.iter().map(ReservationLine::from).collect();
        self.inventory.reserve(reservation).await?;

        let new_order = NewOrder {
            customer: OrderCustomer {
                uid: customer.uid,
                full_name: request.full_name.unwrap_or(session.display_name),
                email: request.email.unwrap_or(session.email),
                phone: request.phone.unwrap_or(customer.phone),
                shipping_address: address.clone(),
            },
            items: cart.lines.iter().map(OrderLine::from).collect(),
            total: cart.total,
            notes: request.notes,
        };

        let order = match self.orders.create_order(new_order).await {
            Ok(order) => order,
            Err(source) => {
                error!(
                    %reference,
                    error = %source,
                    "order write failed after stock was reserved"
                );
                return Err(CheckoutError::OrderWriteFailed { reference, source });
            }
        };

        if new_address
            && let Err(error) = self.customers.save_address(customer.uid, address).await
        {
            warn!(%reference, %error, "could not save the shipping address");
        }

        let confirmation = OrderConfirmation::for_order(&order);
        if let Err(error) = self.mailer.send_order_confirmation(confirmation).await {
            warn!(%reference, order_uuid = %order.id, %error, "order confirmation failed");
        }

        if let Err(error) = self.carts.clear().await {
            warn!(%reference, order_uuid = %order.id, %error, "could not clear the cart");
        }

        Ok(order)
    }
}
