//! Inventory reservation service.
//!
//! Reserving stock means decrementing every requested product inside one
//! optimistic transaction: validate everything first, then stage the
//! decrements, then commit. A conflicted commit re-runs the whole attempt
//! against fresh stock levels, within a bounded retry budget. Either every
//! line is reserved or no stock changes at all.

use std::time::Instant;

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    domain::{
        inventory::{errors::ReservationError, models::ReservationLine},
        products::{models::Product, service::PRODUCTS_COLLECTION},
    },
    store::{Store, StoreError, retry::RetryPolicy},
};

type Lines = SmallVec<[ReservationLine; 8]>;

#[derive(Debug, Clone)]
pub struct StoreReservationService {
    store: Store,
    policy: RetryPolicy,
}

impl StoreReservationService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    #[must_use]
    pub fn with_policy(store: Store, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// One reservation attempt: read and validate every line, then stage
    /// all decrements and commit.
    async fn try_reserve(&self, lines: &Lines) -> Result<(), ReservationError> {
        let mut tx = self.store.begin();

        let mut validated: SmallVec<[(u32, Product); 8]> = SmallVec::new();

        for line in lines {
            let document = tx
                .get(PRODUCTS_COLLECTION, &line.product_id)
                .await
                .ok_or_else(|| ReservationError::ProductNotFound {
                    product: line.product_id.clone(),
                })?;

            let product: Product = document
                .decode()
                .map_err(|source| ReservationError::TransactionFailed { source })?;

            if product.stock < line.quantity {
                return Err(ReservationError::InsufficientStock {
                    product: line.product_id.clone(),
                    available: product.stock,
                });
            }

            validated.push((line.quantity, product));
        }

        // No stock is touched until every line has passed validation.
        for (quantity, mut product) in validated {
            product.stock -= quantity;
            tx.put(PRODUCTS_COLLECTION, &product.id, &product)
                .map_err(|source| ReservationError::TransactionFailed { source })?;
        }

        tx.commit()
            .await
            .map_err(|source| ReservationError::TransactionFailed { source })
    }
}

#[async_trait]
impl ReservationService for StoreReservationService {
    async fn reserve(&self, lines: Vec<ReservationLine>) -> Result<(), ReservationError> {
        let lines = combine(lines);
        if lines.is_empty() {
            return Ok(());
        }

        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            match self.try_reserve(&lines).await {
                Ok(()) => {
                    debug!(attempts, lines = lines.len(), "reserved stock");
                    return Ok(());
                }
                Err(ReservationError::TransactionFailed {
                    source: StoreError::Conflict,
                }) => {
                    if !self.policy.allows_retry(attempts, started.elapsed()) {
                        warn!(attempts, "reservation conflicts exhausted the retry budget");
                        return Err(ReservationError::TransactionFailed {
                            source: StoreError::Conflict,
                        });
                    }

                    tokio::time::sleep(self.policy.delay_for_retry(attempts - 1)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Atomically decrement stock for every line, or change nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::ProductNotFound`] or
    /// [`ReservationError::InsufficientStock`] when validation fails, and
    /// [`ReservationError::TransactionFailed`] when commits kept conflicting
    /// within the retry budget.
    async fn reserve(&self, lines: Vec<ReservationLine>) -> Result<(), ReservationError>;
}

/// Fold duplicate product ids into one line each, dropping zero-quantity
/// lines. First-seen order is preserved so validation errors are stable.
fn combine(lines: Vec<ReservationLine>) -> Lines {
    let mut combined = Lines::new();
    let mut index_by_id: FxHashMap<String, usize> = FxHashMap::default();

    for line in lines {
        if line.quantity == 0 {
            continue;
        }

        match index_by_id.get(&line.product_id) {
            Some(&index) => {
                if let Some(existing) = combined.get_mut(index) {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
            }
            None => {
                index_by_id.insert(line.product_id.clone(), combined.len());
                combined.push(line);
            }
        }
    }

    combined
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use crate::{domain::products::CatalogService, test::TestContext};

    use super::*;

    fn line(product_id: &str, quantity: u32) -> ReservationLine {
        ReservationLine {
            product_id: product_id.to_string(),
            name: product_id.to_string(),
            quantity,
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..RetryPolicy::default()
        }
    }

    #[tokio::test]
    async fn reserve_decrements_every_line() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.seed_product("aspirina", "Aspirina", 50_00, 10).await;
        ctx.seed_product("paracetamol", "Paracetamol", 25_00, 5).await;

        ctx.inventory
            .reserve(vec![line("aspirina", 3), line("paracetamol", 5)])
            .await?;

        assert_eq!(ctx.catalog.get_product("aspirina").await?.stock, 7);
        assert_eq!(ctx.catalog.get_product("paracetamol").await?.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn insufficient_stock_reserves_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.seed_product("aspirina", "Aspirina", 50_00, 1).await;
        ctx.seed_product("jarabe", "Jarabe para la Tos", 89_50, 0).await;

        let result = ctx
            .inventory
            .reserve(vec![line("aspirina", 1), line("jarabe", 1)])
            .await;

        assert!(
            matches!(
                result,
                Err(ReservationError::InsufficientStock { ref product, available: 0 })
                    if product == "jarabe"
            ),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(
            ctx.catalog.get_product("aspirina").await?.stock,
            1,
            "a failed reservation must not touch other lines"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_fails_validation() {
        let ctx = TestContext::new().await;

        let result = ctx.inventory.reserve(vec![line("ghost", 1)]).await;

        assert!(
            matches!(
                result,
                Err(ReservationError::ProductNotFound { ref product }) if product == "ghost"
            ),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn duplicate_lines_fold_into_one_decrement() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.seed_product("aspirina", "Aspirina", 50_00, 5).await;

        ctx.inventory
            .reserve(vec![line("aspirina", 2), line("aspirina", 2)])
            .await?;

        assert_eq!(ctx.catalog.get_product("aspirina").await?.stock, 1);

        Ok(())
    }

    #[tokio::test]
    async fn empty_and_zero_quantity_reservations_are_noops() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.seed_product("aspirina", "Aspirina", 50_00, 5).await;

        ctx.inventory.reserve(vec![]).await?;
        ctx.inventory.reserve(vec![line("aspirina", 0)]).await?;

        assert_eq!(ctx.catalog.get_product("aspirina").await?.stock, 5);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_reservations_of_the_last_unit_pick_one_winner() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.seed_product("aspirina", "Aspirina", 50_00, 1).await;

        let first = ctx.inventory.clone();
        let second = ctx.inventory.clone();

        let (a, b) = tokio::join!(
            first.reserve(vec![line("aspirina", 1)]),
            second.reserve(vec![line("aspirina", 1)]),
        );

        let outcomes = [a, b];
        assert_eq!(
            outcomes.iter().filter(|outcome| outcome.is_ok()).count(),
            1,
            "exactly one reservation may win the last unit: {outcomes:?}"
        );
        assert!(
            outcomes.iter().any(|outcome| matches!(
                outcome,
                Err(ReservationError::InsufficientStock { available: 0, .. })
            )),
            "the loser must see the drained stock: {outcomes:?}"
        );
        assert_eq!(ctx.catalog.get_product("aspirina").await?.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn conflicted_commits_retry_until_success() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.seed_product("aspirina", "Aspirina", 50_00, 3).await;

        let service = StoreReservationService::with_policy(ctx.store.clone(), fast_policy(5));

        ctx.store.inject_conflicts(2);
        service.reserve(vec![line("aspirina", 1)]).await?;

        assert_eq!(
            ctx.catalog.get_product("aspirina").await?.stock,
            2,
            "the retried attempt must apply exactly once"
        );

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_retry_budget_surfaces_as_transaction_failure() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.seed_product("aspirina", "Aspirina", 50_00, 3).await;

        let service = StoreReservationService::with_policy(ctx.store.clone(), fast_policy(3));

        ctx.store.inject_conflicts(3);
        let result = service.reserve(vec![line("aspirina", 1)]).await;

        assert!(
            matches!(
                result,
                Err(ReservationError::TransactionFailed {
                    source: StoreError::Conflict,
                })
            ),
            "expected TransactionFailed, got {result:?}"
        );
        assert_eq!(
            ctx.catalog.get_product("aspirina").await?.stock,
            3,
            "no attempt may leave a partial decrement behind"
        );

        Ok(())
    }
}
