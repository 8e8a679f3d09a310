//! Shared test support: an in-memory wiring of every service plus fixture
//! builders the domain tests lean on.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use jiff::Timestamp;
use rust_decimal::Decimal;
use testresult::TestResult;
use zeroize::Zeroizing;

use crate::{
    domain::{
        carts::{
            CartStore,
            storage::{MemorySnapshotStorage, SnapshotStorage},
        },
        checkout::CheckoutService,
        customers::{
            CustomersService, StoreCustomersService,
            models::{Address, Customer, CustomerUuid, NewCustomer},
        },
        inventory::StoreReservationService,
        orders::{
            StoreOrdersService,
            models::{NewOrder, OrderCustomer, OrderLine},
        },
        products::{
            CatalogService, StoreCatalogService,
            models::{NewProduct, Product, ProductStatus},
        },
    },
    notify::{Mailer, MailerError, OrderConfirmation},
    session::{Session, SessionManager},
    store::Store,
};

/// Every service wired over one in-memory store, the way the CLI wires them
/// over a data directory.
pub(crate) struct TestContext {
    pub(crate) store: Store,
    pub(crate) sessions: SessionManager,
    pub(crate) storage: Arc<MemorySnapshotStorage>,
    pub(crate) catalog: StoreCatalogService,
    pub(crate) carts: CartStore,
    pub(crate) inventory: StoreReservationService,
    pub(crate) orders: StoreOrdersService,
    pub(crate) customers: StoreCustomersService,
    pub(crate) mailer: Arc<RecordingMailer>,
    pub(crate) checkout: CheckoutService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let store = Store::in_memory();
        let sessions = SessionManager::in_memory();
        let storage = Arc::new(MemorySnapshotStorage::default());

        let carts = CartStore::open(storage.clone(), sessions.clone())
            .await
            .expect("the cart store opens over empty storage");

        let catalog = StoreCatalogService::new(store.clone());
        let inventory = StoreReservationService::new(store.clone());
        let orders = StoreOrdersService::new(store.clone());
        let customers = StoreCustomersService::new(store.clone());
        let mailer = Arc::new(RecordingMailer::default());

        let checkout = CheckoutService::new(
            sessions.clone(),
            carts.clone(),
            Arc::new(inventory.clone()),
            Arc::new(orders.clone()),
            Arc::new(customers.clone()),
            mailer.clone(),
        );

        Self {
            store,
            sessions,
            storage,
            catalog,
            carts,
            inventory,
            orders,
            customers,
            mailer,
            checkout,
        }
    }

    /// Insert an active product under an explicit id.
    pub(crate) async fn seed_product(
        &self,
        id: &str,
        name: &str,
        cents: i64,
        stock: u32,
    ) -> Product {
        self.catalog
            .create_product(NewProduct {
                id: Some(id.to_string()),
                name: name.to_string(),
                price: Decimal::new(cents, 2),
                stock,
                image: None,
                category: None,
                status: ProductStatus::Active,
            })
            .await
            .expect("seeded products are valid")
    }

    /// Register the standing test customer and sign her in.
    pub(crate) async fn sign_in(&self) -> TestResult<Customer> {
        let customer = self
            .customers
            .register(test_customer("Ana García", "ana@example.mx"))
            .await?;

        self.sessions
            .sign_in(Session {
                customer: customer.uid,
                email: customer.email.clone(),
                display_name: customer.full_name.clone(),
                signed_in_at: Timestamp::now(),
            })
            .await?;

        Ok(customer)
    }

    /// The raw persisted cart snapshot, if one has been written.
    pub(crate) async fn cart_snapshot(&self) -> Option<String> {
        self.storage
            .read()
            .await
            .expect("memory snapshot storage never fails")
    }
}

pub(crate) fn test_session(email: &str) -> Session {
    Session {
        customer: CustomerUuid::now_v7(),
        email: email.to_string(),
        display_name: "Ana García".to_string(),
        signed_in_at: Timestamp::now(),
    }
}

pub(crate) fn test_customer(name: &str, email: &str) -> NewCustomer {
    NewCustomer {
        full_name: name.to_string(),
        email: email.to_string(),
        phone: "33 1234 5678".to_string(),
        password: Zeroizing::new("farmacia123".to_string()),
    }
}

pub(crate) fn test_address(street: &str) -> Address {
    Address {
        street: street.to_string(),
        exterior_number: "12".to_string(),
        interior_number: None,
        neighborhood: "Centro".to_string(),
        city: "Guadalajara".to_string(),
        state: "Jalisco".to_string(),
        zip_code: "44100".to_string(),
        is_default: false,
    }
}

pub(crate) fn test_new_order(email: &str, cents: i64) -> NewOrder {
    NewOrder {
        customer: OrderCustomer {
            uid: CustomerUuid::now_v7(),
            full_name: "Ana García".to_string(),
            email: email.to_string(),
            phone: "33 1234 5678".to_string(),
            shipping_address: test_address("Av. Hidalgo"),
        },
        items: vec![OrderLine {
            id: "aspirina-bayer-500mg".to_string(),
            name: "Aspirina Bayer 500mg".to_string(),
            price: Decimal::new(cents, 2),
            quantity: 1,
        }],
        total: Decimal::new(cents, 2),
        notes: None,
    }
}

/// Mailer double that records confirmations and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<OrderConfirmation>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    /// Every confirmation accepted so far.
    pub(crate) fn sent(&self) -> Vec<OrderConfirmation> {
        self.sent.lock().expect("mailer lock").clone()
    }

    /// Make all further sends fail.
    pub(crate) fn fail_next_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_order_confirmation(
        &self,
        confirmation: OrderConfirmation,
    ) -> Result<(), MailerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailerError::UnexpectedResponse(
                "recording mailer set to fail".to_string(),
            ));
        }

        self.sent.lock().expect("mailer lock").push(confirmation);

        Ok(())
    }
}
