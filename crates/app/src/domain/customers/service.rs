//! Customers service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    domain::customers::{
        credentials,
        errors::CustomersServiceError,
        models::{Address, Customer, CustomerUuid, NewCustomer},
    },
    store::{Store, StoreError},
};

const CUSTOMERS_COLLECTION: &str = "customers";

/// Email-uniqueness index: one document per registered email, keyed by the
/// lowercased address.
const EMAILS_COLLECTION: &str = "customer-emails";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailIndexEntry {
    uid: CustomerUuid,
}

#[derive(Debug, Clone)]
pub struct StoreCustomersService {
    store: Store,
}

impl StoreCustomersService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CustomersService for StoreCustomersService {
    async fn register(&self, customer: NewCustomer) -> Result<Customer, CustomersServiceError> {
        let email = normalize_email(&customer.email);

        let mut tx = self.store.begin();

        if tx.get(EMAILS_COLLECTION, &email).await.is_some() {
            return Err(CustomersServiceError::EmailTaken);
        }

        let registered = Customer {
            uid: CustomerUuid::now_v7(),
            full_name: customer.full_name,
            email: email.clone(),
            phone: customer.phone,
            credential: credentials::digest_password(&customer.password),
            addresses: Vec::new(),
            created_at: Timestamp::now(),
        };

        tx.put(CUSTOMERS_COLLECTION, &registered.uid.to_string(), &registered)?;
        tx.put(
            EMAILS_COLLECTION,
            &email,
            &EmailIndexEntry {
                uid: registered.uid,
            },
        )?;

        // A conflict here means the email appeared between the absence read
        // and the commit, which is the same outcome as finding it upfront.
        match tx.commit().await {
            Ok(()) => {}
            Err(StoreError::Conflict) => return Err(CustomersServiceError::EmailTaken),
            Err(err) => return Err(err.into()),
        }

        info!(customer_uuid = %registered.uid, "registered customer");

        Ok(registered)
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Customer, CustomersServiceError> {
        let email = normalize_email(email);

        let Some(entry) = self.store.get(EMAILS_COLLECTION, &email).await else {
            return Err(CustomersServiceError::InvalidCredentials);
        };
        let entry: EmailIndexEntry = entry.decode()?;

        let Some(document) = self
            .store
            .get(CUSTOMERS_COLLECTION, &entry.uid.to_string())
            .await
        else {
            return Err(CustomersServiceError::InvalidCredentials);
        };
        let customer: Customer = document.decode()?;

        if !credentials::verify_password(&customer.credential, password) {
            return Err(CustomersServiceError::InvalidCredentials);
        }

        Ok(customer)
    }

    async fn get_customer(&self, id: CustomerUuid) -> Result<Customer, CustomersServiceError> {
        self.store
            .get(CUSTOMERS_COLLECTION, &id.to_string())
            .await
            .ok_or(CustomersServiceError::NotFound(id))?
            .decode()
            .map_err(CustomersServiceError::from)
    }

    async fn save_address(
        &self,
        id: CustomerUuid,
        address: Address,
    ) -> Result<bool, CustomersServiceError> {
        let mut tx = self.store.begin();

        let document = tx
            .get(CUSTOMERS_COLLECTION, &id.to_string())
            .await
            .ok_or(CustomersServiceError::NotFound(id))?;
        let mut customer: Customer = document.decode()?;

        if customer
            .addresses
            .iter()
            .any(|saved| saved.same_location(&address))
        {
            return Ok(false);
        }

        let mut address = address;
        // The first saved address becomes the preferred one.
        address.is_default = customer.addresses.is_empty();
        customer.addresses.push(address);

        tx.put(CUSTOMERS_COLLECTION, &id.to_string(), &customer)?;
        tx.commit().await?;

        Ok(true)
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Register a new customer. Emails are unique, case-insensitively.
    async fn register(&self, customer: NewCustomer) -> Result<Customer, CustomersServiceError>;

    /// Look a customer up by email and check the password. Unknown emails
    /// and wrong passwords fail identically.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Customer, CustomersServiceError>;

    /// Retrieve a single customer.
    async fn get_customer(&self, id: CustomerUuid) -> Result<Customer, CustomersServiceError>;

    /// Save a shipping address unless an identical one is already on file.
    /// Returns whether the address was added.
    async fn save_address(
        &self,
        id: CustomerUuid,
        address: Address,
    ) -> Result<bool, CustomersServiceError>;
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, test_address, test_customer};

    use super::*;

    #[tokio::test]
    async fn registered_customers_can_sign_in() -> TestResult {
        let ctx = TestContext::new().await;

        let registered = ctx
            .customers
            .register(test_customer("Ana García", "Ana@Example.MX"))
            .await?;

        assert_eq!(registered.email, "ana@example.mx", "emails are lowercased");

        let verified = ctx
            .customers
            .verify_credentials("ana@example.mx", "farmacia123")
            .await?;
        assert_eq!(verified.uid, registered.uid);

        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.customers
            .register(test_customer("Ana García", "ana@example.mx"))
            .await?;

        let wrong_password = ctx
            .customers
            .verify_credentials("ana@example.mx", "incorrecta")
            .await;
        let unknown_email = ctx
            .customers
            .verify_credentials("nadie@example.mx", "farmacia123")
            .await;

        assert!(
            matches!(wrong_password, Err(CustomersServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {wrong_password:?}"
        );
        assert!(
            matches!(unknown_email, Err(CustomersServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {unknown_email:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn emails_are_unique_case_insensitively() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.customers
            .register(test_customer("Ana García", "ana@example.mx"))
            .await?;

        let result = ctx
            .customers
            .register(test_customer("Otra Ana", "ANA@EXAMPLE.MX"))
            .await;

        assert!(
            matches!(result, Err(CustomersServiceError::EmailTaken)),
            "expected EmailTaken, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn first_saved_address_becomes_the_default() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx
            .customers
            .register(test_customer("Ana García", "ana@example.mx"))
            .await?;

        let added = ctx
            .customers
            .save_address(customer.uid, test_address("Av. Hidalgo"))
            .await?;
        assert!(added);

        let saved = ctx.customers.get_customer(customer.uid).await?;
        assert_eq!(saved.addresses.len(), 1);
        assert!(saved.addresses[0].is_default);

        let second = ctx
            .customers
            .save_address(customer.uid, test_address("Calle Morelos"))
            .await?;
        assert!(second);

        let saved = ctx.customers.get_customer(customer.uid).await?;
        assert_eq!(saved.addresses.len(), 2);
        assert!(!saved.addresses[1].is_default, "later addresses stay secondary");

        Ok(())
    }

    #[tokio::test]
    async fn identical_addresses_are_saved_once() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx
            .customers
            .register(test_customer("Ana García", "ana@example.mx"))
            .await?;

        assert!(
            ctx.customers
                .save_address(customer.uid, test_address("Av. Hidalgo"))
                .await?
        );
        assert!(
            !ctx.customers
                .save_address(customer.uid, test_address("Av. Hidalgo"))
                .await?
        );

        let saved = ctx.customers.get_customer(customer.uid).await?;
        assert_eq!(saved.addresses.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_customers_are_reported() {
        let ctx = TestContext::new().await;
        let ghost = CustomerUuid::now_v7();

        let result = ctx.customers.get_customer(ghost).await;

        assert!(
            matches!(result, Err(CustomersServiceError::NotFound(id)) if id == ghost),
            "expected NotFound, got {result:?}"
        );
    }
}
