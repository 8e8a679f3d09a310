//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    domain::orders::{
        errors::OrdersServiceError,
        models::{NewOrder, Order, OrderStatus, OrderUuid, PaymentMethod},
    },
    store::Store,
};

const ORDERS_COLLECTION: &str = "orders";

#[derive(Debug, Clone)]
pub struct StoreOrdersService {
    store: Store,
}

impl StoreOrdersService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrdersService for StoreOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let created = Order {
            id: OrderUuid::now_v7(),
            customer: order.customer,
            items: order.items,
            total: order.total,
            status: OrderStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
            notes: order.notes,
            created_at: Timestamp::now(),
        };

        let mut tx = self.store.begin();
        tx.put(ORDERS_COLLECTION, &created.id.to_string(), &created)?;
        tx.commit().await?;

        info!(order_uuid = %created.id, total = %created.total, "recorded order");

        Ok(created)
    }

    async fn get_order(&self, id: OrderUuid) -> Result<Order, OrdersServiceError> {
        self.store
            .get(ORDERS_COLLECTION, &id.to_string())
            .await
            .ok_or(OrdersServiceError::NotFound(id))?
            .decode()
            .map_err(OrdersServiceError::from)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let documents = self.store.list(ORDERS_COLLECTION).await;

        let mut orders = Vec::with_capacity(documents.len());
        for document in documents {
            orders.push(document.decode::<Order>()?);
        }

        // Newest first; ids are time-ordered, so they break timestamp ties
        // in creation order.
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(orders)
    }

    async fn set_status(
        &self,
        id: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.store.begin();

        let document = tx
            .get(ORDERS_COLLECTION, &id.to_string())
            .await
            .ok_or(OrdersServiceError::NotFound(id))?;
        let mut order: Order = document.decode()?;

        order.status = status;

        tx.put(ORDERS_COLLECTION, &id.to_string(), &order)?;
        tx.commit().await?;

        info!(order_uuid = %id, status = ?status, "updated order status");

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Record a new order as pending, assigning its id and timestamp.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, id: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Move an order through its lifecycle.
    async fn set_status(
        &self,
        id: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::test::{TestContext, test_new_order};

    use super::*;

    #[tokio::test]
    async fn created_orders_start_pending_with_cash_payment() -> TestResult {
        let ctx = TestContext::new().await;

        let order = ctx
            .orders
            .create_order(test_new_order("ana@example.mx", 150_00))
            .await?;

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, PaymentMethod::CashOnDelivery);
        assert_eq!(order.total, Decimal::new(150_00, 2));

        let fetched = ctx.orders.get_order(order.id).await?;
        assert_eq!(fetched, order);

        Ok(())
    }

    #[tokio::test]
    async fn list_returns_newest_orders_first() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx
            .orders
            .create_order(test_new_order("ana@example.mx", 50_00))
            .await?;
        let second = ctx
            .orders
            .create_order(test_new_order("ana@example.mx", 85_00))
            .await?;
        let third = ctx
            .orders
            .create_order(test_new_order("ana@example.mx", 120_00))
            .await?;

        let ids: Vec<OrderUuid> = ctx
            .orders
            .list_orders()
            .await?
            .into_iter()
            .map(|order| order.id)
            .collect();

        assert_eq!(ids, vec![third.id, second.id, first.id]);

        Ok(())
    }

    #[tokio::test]
    async fn set_status_moves_the_order_along() -> TestResult {
        let ctx = TestContext::new().await;

        let order = ctx
            .orders
            .create_order(test_new_order("ana@example.mx", 50_00))
            .await?;

        let updated = ctx
            .orders
            .set_status(order.id, OrderStatus::Processing)
            .await?;

        assert_eq!(updated.status, OrderStatus::Processing);
        assert_eq!(
            ctx.orders.get_order(order.id).await?.status,
            OrderStatus::Processing
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_orders_are_reported() {
        let ctx = TestContext::new().await;
        let ghost = OrderUuid::now_v7();

        let fetched = ctx.orders.get_order(ghost).await;
        let updated = ctx.orders.set_status(ghost, OrderStatus::Completed).await;

        assert!(
            matches!(fetched, Err(OrdersServiceError::NotFound(id)) if id == ghost),
            "expected NotFound, got {fetched:?}"
        );
        assert!(
            matches!(updated, Err(OrdersServiceError::NotFound(id)) if id == ghost),
            "expected NotFound, got {updated:?}"
        );
    }
}
