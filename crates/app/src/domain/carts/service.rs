//! Cart store service.
//!
//! Wraps the cart engine with session awareness, snapshot persistence, and
//! change notifications. Every accepted mutation is persisted before it is
//! acknowledged; a persistence failure rolls the in-memory cart back so
//! memory and storage never drift apart.
//!
//! A sign-out clears the cart twice over: a spawned watcher follows session
//! transitions and sweeps as soon as the session goes anonymous, and every
//! operation reconciles on entry, which also covers a sign-out that happened
//! in another process.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use farmony::{
    cart::{Cart, CartError},
    items::NewLine,
    prices,
    snapshot::{self, DiscardReason},
};

use crate::{
    domain::carts::{
        errors::CartStoreError,
        models::{CartView, ItemCandidate},
        storage::{SnapshotStorage, StorageError},
    },
    session::SessionManager,
};

struct CartStoreInner {
    cart: Mutex<Cart>,
    storage: Arc<dyn SnapshotStorage>,
    sessions: SessionManager,
    views: watch::Sender<CartView>,
}

/// The live cart. Cheap to clone; all clones share one cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

impl CartStore {
    /// Load the persisted snapshot and reconcile it with the current
    /// session. A snapshot the load pass had to repair or discard is
    /// rewritten in canonical form.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be read, or when the
    /// reconciled state cannot be persisted.
    pub async fn open(
        storage: Arc<dyn SnapshotStorage>,
        sessions: SessionManager,
    ) -> Result<Self, CartStoreError> {
        let (cart, repaired) = match storage.read().await? {
            Some(payload) => {
                let loaded = snapshot::decode(&payload);

                match &loaded.discarded {
                    Some(DiscardReason::Malformed) => {
                        warn!("discarding malformed cart snapshot");
                    }
                    Some(DiscardReason::VersionMismatch { found }) => {
                        warn!(
                            found = found.as_deref(),
                            "discarding cart snapshot with a stale schema"
                        );
                    }
                    None => {
                        if loaded.dropped > 0 {
                            warn!(dropped = loaded.dropped, "dropped unusable cart lines");
                        }
                        if loaded.merged > 0 {
                            info!(merged = loaded.merged, "merged duplicate cart lines");
                        }
                    }
                }

                let repaired =
                    loaded.discarded.is_some() || loaded.dropped > 0 || loaded.merged > 0;

                (loaded.cart, repaired)
            }
            None => (Cart::new(), false),
        };

        let (views, _) = watch::channel(CartView::of(&cart));

        let store = Self {
            inner: Arc::new(CartStoreInner {
                cart: Mutex::new(cart),
                storage,
                sessions,
                views,
            }),
        };

        {
            let mut cart = store.inner.cart.lock().await;

            if repaired {
                store.persist(&cart).await?;
            }

            store.reconcile(&mut cart).await?;
        }

        store.spawn_session_watcher();

        Ok(store)
    }

    /// Follow session transitions so a sign-out clears the cart even when
    /// nothing else touches the store. The task holds the store weakly and
    /// ends with the store or the session channel, whichever goes first.
    fn spawn_session_watcher(&self) {
        let inner = Arc::downgrade(&self.inner);
        let mut sessions = self.inner.sessions.subscribe();

        tokio::spawn(async move {
            while sessions.changed().await.is_ok() {
                if sessions.borrow_and_update().is_authenticated() {
                    continue;
                }

                let Some(inner) = inner.upgrade() else {
                    return;
                };

                let store = CartStore { inner };
                let mut cart = store.inner.cart.lock().await;

                if let Err(error) = store.reconcile(&mut cart).await {
                    warn!(%error, "failed to clear the cart after sign-out");
                }
            }
        });
    }

    /// Add one unit of an item, accumulating onto an existing line with the
    /// same id.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::NotAuthenticated`] without a signed-in
    /// session, [`CartStoreError::InvalidItem`] when the candidate has no
    /// usable name or price, and [`CartStoreError::Storage`] when the
    /// snapshot cannot be persisted (the cart is left unchanged then).
    pub async fn add_item(&self, candidate: ItemCandidate) -> Result<CartView, CartStoreError> {
        let mut cart = self.inner.cart.lock().await;
        self.reconcile(&mut cart).await?;
        self.require_session()?;

        let unit_price = candidate
            .price
            .as_ref()
            .and_then(prices::normalize)
            .ok_or(CartStoreError::InvalidItem(CartError::InvalidPrice))?;

        let line = NewLine {
            id: candidate.id,
            name: candidate.name,
            unit_price,
            image: candidate.image,
            category: candidate.category,
        };

        let before = cart.clone();
        cart.add(line).map_err(CartStoreError::InvalidItem)?;

        if let Err(err) = self.persist(&cart).await {
            *cart = before;
            return Err(err);
        }

        Ok(self.publish(&cart))
    }

    /// Remove a line, matching by id first and display name second.
    /// Removing an unknown line is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::NotAuthenticated`] without a signed-in
    /// session and [`CartStoreError::Storage`] when persistence fails.
    pub async fn remove_item(
        &self,
        id: Option<&str>,
        name: &str,
    ) -> Result<CartView, CartStoreError> {
        let mut cart = self.inner.cart.lock().await;
        self.reconcile(&mut cart).await?;
        self.require_session()?;

        let before = cart.clone();
        if !cart.remove(id, name) {
            return Ok(CartView::of(&cart));
        }

        if let Err(err) = self.persist(&cart).await {
            *cart = before;
            return Err(err);
        }

        Ok(self.publish(&cart))
    }

    /// Set a line's quantity. Requested quantities below 1 leave the cart
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::ItemNotFound`] when no line matches,
    /// [`CartStoreError::NotAuthenticated`] without a signed-in session, and
    /// [`CartStoreError::Storage`] when persistence fails.
    pub async fn set_quantity(
        &self,
        id: Option<&str>,
        name: &str,
        quantity: i64,
    ) -> Result<CartView, CartStoreError> {
        let mut cart = self.inner.cart.lock().await;
        self.reconcile(&mut cart).await?;
        self.require_session()?;

        let before = cart.clone();
        let changed = match cart.set_quantity(id, name, quantity) {
            Ok(changed) => changed,
            Err(CartError::LineNotFound { name }) => {
                return Err(CartStoreError::ItemNotFound { name });
            }
            Err(err) => return Err(CartStoreError::InvalidItem(err)),
        };

        if !changed {
            return Ok(CartView::of(&cart));
        }

        if let Err(err) = self.persist(&cart).await {
            *cart = before;
            return Err(err);
        }

        Ok(self.publish(&cart))
    }

    /// Drop every line.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::NotAuthenticated`] without a signed-in
    /// session and [`CartStoreError::Storage`] when persistence fails.
    pub async fn clear(&self) -> Result<CartView, CartStoreError> {
        let mut cart = self.inner.cart.lock().await;
        self.reconcile(&mut cart).await?;
        self.require_session()?;

        let before = cart.clone();
        if !cart.clear() {
            return Ok(CartView::of(&cart));
        }

        if let Err(err) = self.persist(&cart).await {
            *cart = before;
            return Err(err);
        }

        Ok(self.publish(&cart))
    }

    /// The current view. Reads reconcile too, so a cart left behind by a
    /// signed-out session is cleared before it is shown.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Storage`] when clearing a stale cart cannot
    /// be persisted.
    pub async fn view(&self) -> Result<CartView, CartStoreError> {
        let mut cart = self.inner.cart.lock().await;
        self.reconcile(&mut cart).await?;

        Ok(CartView::of(&cart))
    }

    /// Subscribe to view updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.inner.views.subscribe()
    }

    /// A non-empty cart never coexists with an anonymous session. Lines a
    /// departed session left behind are cleared the moment the store is
    /// touched again.
    async fn reconcile(&self, cart: &mut Cart) -> Result<(), CartStoreError> {
        if cart.is_empty() || self.inner.sessions.current().is_authenticated() {
            return Ok(());
        }

        let lines = cart.len();
        cart.clear();
        self.persist(cart).await?;
        self.publish(cart);
        info!(lines, "cleared cart left behind by a signed-out session");

        Ok(())
    }

    fn require_session(&self) -> Result<(), CartStoreError> {
        if self.inner.sessions.current().is_authenticated() {
            Ok(())
        } else {
            Err(CartStoreError::NotAuthenticated)
        }
    }

    async fn persist(&self, cart: &Cart) -> Result<(), CartStoreError> {
        let payload = snapshot::encode(cart).map_err(StorageError::from)?;
        self.inner.storage.write(&payload).await?;

        Ok(())
    }

    fn publish(&self, cart: &Cart) -> CartView {
        let view = CartView::of(cart);
        self.inner.views.send_replace(view.clone());

        view
    }
}
