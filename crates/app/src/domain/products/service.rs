//! Catalog service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;

use farmony::{items::slugify, prices::PRICE_SCALE};

use crate::{
    domain::products::{
        errors::CatalogServiceError,
        models::{NewProduct, Product, ProductStatus, ProductUpdate},
    },
    store::Store,
};

/// Collection holding one document per product. Stock lives on these
/// documents and is decremented only by the inventory reservation.
pub(crate) const PRODUCTS_COLLECTION: &str = "products";

#[derive(Debug, Clone)]
pub struct StoreCatalogService {
    store: Store,
}

impl StoreCatalogService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for StoreCatalogService {
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let name = product.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogServiceError::InvalidName);
        }

        let price = product.price.round_dp(PRICE_SCALE);
        if price <= Decimal::ZERO {
            return Err(CatalogServiceError::InvalidPrice);
        }

        let id = match product.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id.trim().to_string(),
            None => slugify(&name).ok_or(CatalogServiceError::InvalidName)?,
        };

        let mut tx = self.store.begin();

        if tx.get(PRODUCTS_COLLECTION, &id).await.is_some() {
            return Err(CatalogServiceError::AlreadyExists);
        }

        let created = Product {
            id: id.clone(),
            name,
            price,
            stock: product.stock,
            image: product.image,
            category: product.category,
            status: product.status,
            created_at: Timestamp::now(),
        };

        tx.put(PRODUCTS_COLLECTION, &id, &created)?;
        tx.commit().await?;

        Ok(created)
    }

    async fn get_product(&self, id: &str) -> Result<Product, CatalogServiceError> {
        self.store
            .get(PRODUCTS_COLLECTION, id)
            .await
            .ok_or(CatalogServiceError::NotFound)?
            .decode()
            .map_err(CatalogServiceError::from)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let documents = self.store.list(PRODUCTS_COLLECTION).await;

        let mut products = Vec::with_capacity(documents.len());
        for document in documents {
            products.push(document.decode::<Product>()?);
        }

        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(products)
    }

    async fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Product, CatalogServiceError> {
        let mut tx = self.store.begin();

        let document = tx
            .get(PRODUCTS_COLLECTION, id)
            .await
            .ok_or(CatalogServiceError::NotFound)?;
        let mut product: Product = document.decode()?;

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CatalogServiceError::InvalidName);
            }
            product.name = name;
        }

        if let Some(price) = update.price {
            let price = price.round_dp(PRICE_SCALE);
            if price <= Decimal::ZERO {
                return Err(CatalogServiceError::InvalidPrice);
            }
            product.price = price;
        }

        if let Some(stock) = update.stock {
            product.stock = stock;
        }

        if let Some(image) = update.image {
            product.image = Some(image);
        }

        if let Some(category) = update.category {
            product.category = Some(category);
        }

        tx.put(PRODUCTS_COLLECTION, id, &product)?;
        tx.commit().await?;

        Ok(product)
    }

    async fn set_status(
        &self,
        id: &str,
        status: ProductStatus,
    ) -> Result<Product, CatalogServiceError> {
        let mut tx = self.store.begin();

        let document = tx
            .get(PRODUCTS_COLLECTION, id)
            .await
            .ok_or(CatalogServiceError::NotFound)?;
        let mut product: Product = document.decode()?;

        product.status = status;

        tx.put(PRODUCTS_COLLECTION, id, &product)?;
        tx.commit().await?;

        Ok(product)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Create a catalog entry; the id is slugified from the name when not
    /// given explicitly.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, id: &str) -> Result<Product, CatalogServiceError>;

    /// All products, sorted by display name.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Apply the set fields of the update; unset fields stay as they were.
    async fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Product, CatalogServiceError>;

    /// Publish or hide a product.
    async fn set_status(
        &self,
        id: &str,
        status: ProductStatus,
    ) -> Result<Product, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_product(name: &str, cents: i64, stock: u32) -> NewProduct {
        NewProduct {
            id: None,
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            stock,
            image: None,
            category: None,
            status: ProductStatus::Active,
        }
    }

    #[tokio::test]
    async fn create_slugifies_the_id_from_the_name() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(new_product("Aspirina Bayer 500mg", 50_00, 10))
            .await?;

        assert_eq!(product.id, "aspirina-bayer-500mg");
        assert_eq!(product.price, Decimal::new(50_00, 2));
        assert_eq!(product.status, ProductStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn create_duplicate_id_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.catalog
            .create_product(new_product("Aspirina", 50_00, 10))
            .await?;

        let result = ctx
            .catalog
            .create_product(new_product("Aspirina", 60_00, 5))
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_non_positive_prices() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_product(new_product("Muestra gratis", 0, 10))
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidPrice)),
            "expected InvalidPrice, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_product("ghost").await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.catalog
            .create_product(new_product("Paracetamol 500mg", 25_00, 10))
            .await?;
        ctx.catalog
            .create_product(new_product("Aspirina", 50_00, 10))
            .await?;
        ctx.catalog
            .create_product(new_product("Ibuprofeno 400mg", 30_00, 10))
            .await?;

        let names: Vec<String> = ctx
            .catalog
            .list_products()
            .await?
            .into_iter()
            .map(|product| product.name)
            .collect();

        assert_eq!(names, vec!["Aspirina", "Ibuprofeno 400mg", "Paracetamol 500mg"]);

        Ok(())
    }

    #[tokio::test]
    async fn update_changes_only_the_set_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(new_product("Aspirina", 50_00, 10))
            .await?;

        let updated = ctx
            .catalog
            .update_product(
                &product.id,
                ProductUpdate {
                    price: Some(Decimal::new(55_00, 2)),
                    stock: Some(25),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.price, Decimal::new(55_00, 2));
        assert_eq!(updated.stock, 25, "restock applies");
        assert_eq!(updated.name, "Aspirina", "unset fields keep their value");

        Ok(())
    }

    #[tokio::test]
    async fn set_status_hides_a_product() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(new_product("Aspirina", 50_00, 10))
            .await?;

        let hidden = ctx
            .catalog
            .set_status(&product.id, ProductStatus::Pending)
            .await?;

        assert_eq!(hidden.status, ProductStatus::Pending);

        Ok(())
    }
}
