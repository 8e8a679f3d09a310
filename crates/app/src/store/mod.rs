//! Document store
//!
//! An embedded stand-in for the hosted document database: named collections
//! of JSON documents keyed by string id, each carrying a version counter.
//! All writes go through [`Transaction`], which validates its read set at
//! commit time under the store lock: two commits racing over the same
//! documents resolve into one winner and one [`StoreError::Conflict`].
//!
//! Two backends sit behind one handle: in-memory for tests, and file-backed
//! for durable CLI state. The file backend rewrites the store file inside
//! commit while the lock is held, so file order always equals commit order.

use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

mod error;
pub mod retry;
mod transaction;

pub use error::StoreError;
pub use transaction::Transaction;

pub(crate) type Collections = FxHashMap<String, FxHashMap<String, StoredDocument>>;

/// A document as stored: version counter plus JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredDocument {
    pub(crate) version: u64,
    pub(crate) body: serde_json::Value,
}

/// A document read out of the store.
#[derive(Debug, Clone)]
pub struct Document {
    /// Document id, unique within its collection.
    pub id: String,
    /// Version counter, bumped by every committed write.
    pub version: u64,
    /// The JSON body.
    pub body: serde_json::Value,
}

impl Document {
    /// Decode the body into a typed record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`] when the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

#[derive(Debug)]
enum Backend {
    Memory,
    File(PathBuf),
}

#[derive(Debug)]
struct StoreInner {
    state: Mutex<Collections>,
    backend: Backend,
    #[cfg(test)]
    forced_conflicts: std::sync::atomic::AtomicU32,
}

impl StoreInner {
    fn new(state: Collections, backend: Backend) -> Self {
        Self {
            state: Mutex::new(state),
            backend,
            #[cfg(test)]
            forced_conflicts: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Rewrite the backing file from the given state. Callers hold the state
    /// lock, so commit order equals file order.
    async fn persist(&self, state: &Collections) -> Result<(), StoreError> {
        let Backend::File(path) = &self.backend else {
            return Ok(());
        };

        let payload = serde_json::to_vec(&PersistedStore {
            collections: state.clone(),
        })?;

        tokio::fs::write(path, payload).await?;

        Ok(())
    }

    #[cfg(test)]
    fn take_forced_conflict(&self) -> bool {
        self.forced_conflicts
            .fetch_update(
                std::sync::atomic::Ordering::SeqCst,
                std::sync::atomic::Ordering::SeqCst,
                |count| count.checked_sub(1),
            )
            .is_ok()
    }
}

/// Serialized shape of the file backend.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedStore {
    collections: Collections,
}

/// Handle to the shared document store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// An empty store with no durability.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner::new(Collections::default(), Backend::Memory)),
        }
    }

    /// Open a file-backed store, loading any previously committed state.
    /// A missing file starts empty; a present but undecodable file is an
    /// error, never silently wiped, since the store holds shared data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be read and
    /// [`StoreError::Codec`] when its contents do not parse.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<PersistedStore>(&bytes)?.collections,
            Err(error) if error.kind() == ErrorKind::NotFound => Collections::default(),
            Err(error) => return Err(error.into()),
        };

        Ok(Self {
            inner: Arc::new(StoreInner::new(state, Backend::File(path))),
        })
    }

    /// Read one document. Reads see the latest committed state and carry no
    /// transactional guarantee.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Document> {
        let state = self.inner.state.lock().await;

        state.get(collection).and_then(|documents| {
            documents.get(id).map(|stored| Document {
                id: id.to_string(),
                version: stored.version,
                body: stored.body.clone(),
            })
        })
    }

    /// Read a whole collection, sorted by document id.
    pub async fn list(&self, collection: &str) -> Vec<Document> {
        let state = self.inner.state.lock().await;

        let mut documents: Vec<Document> = state
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, stored)| Document {
                        id: id.clone(),
                        version: stored.version,
                        body: stored.body.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        documents.sort_by(|a, b| a.id.cmp(&b.id));

        documents
    }

    /// Start a transaction. Reads record the version of every document they
    /// touch; [`Transaction::commit`] applies staged writes only when none
    /// of those versions have drifted.
    #[must_use]
    pub fn begin(&self) -> Transaction {
        Transaction::new(self.clone())
    }

    /// Force the next `count` commits to fail with a conflict.
    #[cfg(test)]
    pub(crate) fn inject_conflicts(&self, count: u32) {
        self.inner
            .forced_conflicts
            .store(count, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Shelf {
        label: String,
        slots: u32,
    }

    fn shelf(label: &str, slots: u32) -> Shelf {
        Shelf {
            label: label.to_string(),
            slots,
        }
    }

    #[tokio::test]
    async fn committed_documents_are_readable() -> TestResult {
        let store = Store::in_memory();

        let mut tx = store.begin();
        tx.put("shelves", "a", &shelf("Analgésicos", 4))?;
        tx.commit().await?;

        let document = store.get("shelves", "a").await.expect("document exists");
        assert_eq!(document.version, 1);
        assert_eq!(document.decode::<Shelf>()?, shelf("Analgésicos", 4));

        Ok(())
    }

    #[tokio::test]
    async fn list_returns_documents_sorted_by_id() -> TestResult {
        let store = Store::in_memory();

        let mut tx = store.begin();
        tx.put("shelves", "b", &shelf("B", 1))?;
        tx.put("shelves", "a", &shelf("A", 1))?;
        tx.put("shelves", "c", &shelf("C", 1))?;
        tx.commit().await?;

        let ids: Vec<String> = store
            .list("shelves")
            .await
            .into_iter()
            .map(|document| document.id)
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);

        Ok(())
    }

    #[tokio::test]
    async fn commit_bumps_the_version_counter() -> TestResult {
        let store = Store::in_memory();

        let mut tx = store.begin();
        tx.put("shelves", "a", &shelf("A", 1))?;
        tx.commit().await?;

        let mut tx = store.begin();
        tx.get("shelves", "a").await;
        tx.put("shelves", "a", &shelf("A", 2))?;
        tx.commit().await?;

        let document = store.get("shelves", "a").await.expect("document exists");
        assert_eq!(document.version, 2);

        Ok(())
    }

    #[tokio::test]
    async fn stale_read_set_conflicts_at_commit() -> TestResult {
        let store = Store::in_memory();

        let mut tx = store.begin();
        tx.put("shelves", "a", &shelf("A", 1))?;
        tx.commit().await?;

        // Both transactions read the same version; the second commit must
        // observe the first one's write and abort.
        let mut first = store.begin();
        first.get("shelves", "a").await;
        let mut second = store.begin();
        second.get("shelves", "a").await;

        first.put("shelves", "a", &shelf("A", 2))?;
        first.commit().await?;

        second.put("shelves", "a", &shelf("A", 9))?;
        let result = second.commit().await;

        assert!(
            matches!(result, Err(StoreError::Conflict)),
            "expected Conflict, got {result:?}"
        );

        let document = store.get("shelves", "a").await.expect("document exists");
        assert_eq!(
            document.decode::<Shelf>()?,
            shelf("A", 2),
            "losing commit must not apply"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reading_absence_conflicts_when_the_document_appears() -> TestResult {
        let store = Store::in_memory();

        let mut first = store.begin();
        assert!(first.get("shelves", "a").await.is_none());

        let mut interloper = store.begin();
        interloper.put("shelves", "a", &shelf("A", 1))?;
        interloper.commit().await?;

        first.put("shelves", "a", &shelf("A", 9))?;
        let result = first.commit().await;

        assert!(
            matches!(result, Err(StoreError::Conflict)),
            "expected Conflict, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_commit_applies_none_of_its_writes() -> TestResult {
        let store = Store::in_memory();

        let mut tx = store.begin();
        tx.put("shelves", "a", &shelf("A", 1))?;
        tx.put("shelves", "b", &shelf("B", 1))?;
        tx.commit().await?;

        let mut losing = store.begin();
        losing.get("shelves", "a").await;
        losing.get("shelves", "b").await;

        let mut winning = store.begin();
        winning.get("shelves", "b").await;
        winning.put("shelves", "b", &shelf("B", 2))?;
        winning.commit().await?;

        losing.put("shelves", "a", &shelf("A", 9))?;
        losing.put("shelves", "b", &shelf("B", 9))?;
        assert!(losing.commit().await.is_err());

        let a = store.get("shelves", "a").await.expect("document exists");
        let b = store.get("shelves", "b").await.expect("document exists");
        assert_eq!(a.decode::<Shelf>()?.slots, 1, "untouched by losing commit");
        assert_eq!(b.decode::<Shelf>()?.slots, 2, "only the winner applied");

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_the_document() -> TestResult {
        let store = Store::in_memory();

        let mut tx = store.begin();
        tx.put("shelves", "a", &shelf("A", 1))?;
        tx.commit().await?;

        let mut tx = store.begin();
        tx.delete("shelves", "a");
        tx.commit().await?;

        assert!(store.get("shelves", "a").await.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn file_backend_round_trips_across_reopen() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");

        {
            let store = Store::open(path.clone()).await?;
            let mut tx = store.begin();
            tx.put("shelves", "a", &shelf("Analgésicos", 4))?;
            tx.commit().await?;
        }

        let reopened = Store::open(path).await?;
        let document = reopened
            .get("shelves", "a")
            .await
            .expect("document survives reopen");

        assert_eq!(document.version, 1);
        assert_eq!(document.decode::<Shelf>()?, shelf("Analgésicos", 4));

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_store_file_is_an_error_not_a_wipe() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, b"not json").await?;

        let result = Store::open(path).await;

        assert!(
            matches!(result, Err(StoreError::Codec(_))),
            "expected Codec error, got {:?}",
            result.err()
        );

        Ok(())
    }
}
