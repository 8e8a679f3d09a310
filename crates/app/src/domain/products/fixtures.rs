//! Catalog fixtures.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use farmony::prices::{self, RawPrice};

use crate::domain::products::{
    errors::CatalogServiceError,
    models::{NewProduct, ProductStatus},
    service::CatalogService,
};

/// Demo catalog bundled into the binary for `catalog seed`.
pub const DEMO_CATALOG: &str = include_str!("../../../fixtures/products/demo.yml");

/// Fixture parsing errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading a fixture file
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

/// Wrapper for products in YAML.
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product fixture from YAML.
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Display name
    pub name: String,

    /// Unit price (e.g., "50.00")
    pub price: String,

    /// Units on hand
    pub stock: u32,

    /// Optional image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Optional category label
    #[serde(default)]
    pub category: Option<String>,
}

impl CatalogFixture {
    /// Parse the bundled demo catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled YAML fails to parse.
    pub fn demo() -> Result<Self, FixtureError> {
        Self::from_yaml(DEMO_CATALOG)
    }

    /// Parse a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML fails to parse.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Convert into catalog inserts, sorted by id so seeding order is stable.
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture price fails to normalize.
    pub fn into_new_products(self) -> Result<Vec<NewProduct>, FixtureError> {
        let mut products = Vec::with_capacity(self.products.len());

        for (id, fixture) in self.products {
            products.push(fixture.try_into_product(id)?);
        }

        products.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(products)
    }
}

impl ProductFixture {
    /// Convert to a `NewProduct` registered under the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the price fails to normalize.
    pub fn try_into_product(self, id: String) -> Result<NewProduct, FixtureError> {
        let price = prices::normalize(&RawPrice::Text(self.price.clone()))
            .ok_or(FixtureError::InvalidPrice(self.price))?;

        Ok(NewProduct {
            id: Some(id),
            name: self.name,
            price,
            stock: self.stock,
            image: self.image,
            category: self.category,
            status: ProductStatus::Active,
        })
    }
}

/// Outcome of a seeding pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Products inserted by this pass
    pub created: usize,
    /// Ids left untouched because they already existed
    pub skipped: usize,
}

/// Insert every product into the catalog, leaving already-present ids as
/// they are.
///
/// # Errors
///
/// Returns an error if any insert fails for a reason other than the id
/// already existing.
pub async fn seed_catalog(
    catalog: &dyn CatalogService,
    products: Vec<NewProduct>,
) -> Result<SeedOutcome, CatalogServiceError> {
    let mut outcome = SeedOutcome::default();

    for product in products {
        match catalog.create_product(product).await {
            Ok(_) => outcome.created += 1,
            Err(CatalogServiceError::AlreadyExists) => outcome.skipped += 1,
            Err(err) => return Err(err),
        }
    }

    Ok(outcome)
}
