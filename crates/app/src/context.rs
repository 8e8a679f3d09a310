//! Application context.
//!
//! Wires every service over one data directory. The document store, the
//! session document, and the cart snapshot each live in their own file, so
//! successive CLI invocations see the same storefront state.

use std::{path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::{
    domain::{
        carts::{CartStore, errors::CartStoreError, storage::FileSnapshotStorage},
        checkout::CheckoutService,
        customers::StoreCustomersService,
        inventory::StoreReservationService,
        orders::StoreOrdersService,
        products::StoreCatalogService,
    },
    notify::{HttpMailer, LogMailer, Mailer},
    session::{SessionError, SessionManager},
    store::{Store, StoreError},
};

/// Errors bringing the application up.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The data directory could not be created
    #[error("data directory: {0}")]
    DataDir(#[from] std::io::Error),

    /// The document store could not be opened
    #[error("document store: {0}")]
    Store(#[from] StoreError),

    /// The persisted session could not be restored
    #[error("session: {0}")]
    Session(#[from] SessionError),

    /// The cart snapshot could not be loaded or reconciled
    #[error("cart store: {0}")]
    Carts(#[from] CartStoreError),
}

/// Every service a command can reach.
pub struct AppContext {
    pub sessions: SessionManager,
    pub catalog: StoreCatalogService,
    pub carts: CartStore,
    pub orders: StoreOrdersService,
    pub customers: StoreCustomersService,
    pub checkout: CheckoutService,
}

impl AppContext {
    /// Open the storefront over `data_dir`, creating it when absent. Order
    /// confirmations go to `mail_endpoint` when one is configured and to the
    /// log otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AppInitError`] when any of the persisted files cannot be
    /// opened.
    pub async fn from_data_dir(
        data_dir: PathBuf,
        mail_endpoint: Option<String>,
    ) -> Result<Self, AppInitError> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let store = Store::open(data_dir.join("store.json")).await?;
        let sessions = SessionManager::open(data_dir.join("session.json")).await?;

        let storage = Arc::new(FileSnapshotStorage::new(data_dir.join("cart.json")));
        let carts = CartStore::open(storage, sessions.clone()).await?;

        let catalog = StoreCatalogService::new(store.clone());
        let inventory = StoreReservationService::new(store.clone());
        let orders = StoreOrdersService::new(store.clone());
        let customers = StoreCustomersService::new(store);

        let mailer: Arc<dyn Mailer> = match mail_endpoint {
            Some(endpoint) => Arc::new(HttpMailer::new(endpoint)),
            None => Arc::new(LogMailer),
        };

        let checkout = CheckoutService::new(
            sessions.clone(),
            carts.clone(),
            Arc::new(inventory),
            Arc::new(orders.clone()),
            Arc::new(customers.clone()),
            mailer,
        );

        Ok(Self {
            sessions,
            catalog,
            carts,
            orders,
            customers,
            checkout,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::models::ItemCandidate,
            customers::CustomersService,
            products::{
                CatalogService,
                models::{NewProduct, ProductStatus},
            },
        },
        session::Session,
        test::test_customer,
    };

    use super::*;

    /// Register a customer, sign her in, and stock one product.
    async fn stock_and_sign_in(app: &AppContext) -> TestResult {
        let customer = app
            .customers
            .register(test_customer("Ana García", "ana@example.mx"))
            .await?;

        app.sessions
            .sign_in(Session {
                customer: customer.uid,
                email: customer.email.clone(),
                display_name: customer.full_name.clone(),
                signed_in_at: Timestamp::now(),
            })
            .await?;

        let product = app
            .catalog
            .create_product(NewProduct {
                id: Some("aspirina".to_string()),
                name: "Aspirina".to_string(),
                price: Decimal::new(50_00, 2),
                stock: 10,
                image: None,
                category: None,
                status: ProductStatus::Active,
            })
            .await?;

        app.carts.add_item(ItemCandidate::from(&product)).await?;

        Ok(())
    }

    #[tokio::test]
    async fn storefront_state_survives_across_contexts() -> TestResult {
        let dir = tempfile::tempdir()?;

        {
            let app = AppContext::from_data_dir(dir.path().to_path_buf(), None).await?;
            stock_and_sign_in(&app).await?;
        }

        let reopened = AppContext::from_data_dir(dir.path().to_path_buf(), None).await?;

        assert!(reopened.sessions.current().is_authenticated());
        assert_eq!(reopened.carts.view().await?.count, 1);
        assert_eq!(reopened.catalog.get_product("aspirina").await?.stock, 10);

        Ok(())
    }

    #[tokio::test]
    async fn a_cart_left_by_a_departed_session_is_cleared_on_reopen() -> TestResult {
        let dir = tempfile::tempdir()?;

        {
            let app = AppContext::from_data_dir(dir.path().to_path_buf(), None).await?;
            stock_and_sign_in(&app).await?;

            // The session expiring outside this process.
            tokio::fs::remove_file(dir.path().join("session.json")).await?;
        }

        let reopened = AppContext::from_data_dir(dir.path().to_path_buf(), None).await?;

        assert!(!reopened.sessions.current().is_authenticated());
        assert!(reopened.carts.view().await?.is_empty());

        Ok(())
    }
}
