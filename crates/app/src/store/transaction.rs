//! Optimistic multi-document transactions.
//!
//! A transaction records the version of every document it reads and stages
//! its writes locally. Commit takes the store lock once: it validates that
//! no recorded version has drifted, applies every staged write, and on the
//! file backend rewrites the store file before releasing the lock. A
//! transaction that fails validation has changed nothing.

use serde::Serialize;

use super::{Document, Store, StoreError, StoredDocument};

#[derive(Debug)]
struct ReadStamp {
    collection: String,
    id: String,
    /// Version observed at read time; `None` records that the document was
    /// absent, which commit re-validates too.
    version: Option<u64>,
}

#[derive(Debug)]
enum StagedWrite {
    Put {
        collection: String,
        id: String,
        body: serde_json::Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

/// An in-flight unit of work against the store.
#[derive(Debug)]
pub struct Transaction {
    store: Store,
    reads: Vec<ReadStamp>,
    writes: Vec<StagedWrite>,
}

impl Transaction {
    pub(crate) fn new(store: Store) -> Self {
        Self {
            store,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Read one document from the latest committed state, recording its
    /// version (or absence) for commit-time validation. Staged writes of
    /// this transaction are not visible to its own reads.
    pub async fn get(&mut self, collection: &str, id: &str) -> Option<Document> {
        let state = self.store.inner.state.lock().await;

        let stored = state
            .get(collection)
            .and_then(|documents| documents.get(id));

        self.reads.push(ReadStamp {
            collection: collection.to_string(),
            id: id.to_string(),
            version: stored.map(|stored| stored.version),
        });

        stored.map(|stored| Document {
            id: id.to_string(),
            version: stored.version,
            body: stored.body.clone(),
        })
    }

    /// Stage a write of `body` to the given document, creating it when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`] when the body cannot be serialized.
    pub fn put<T: Serialize>(
        &mut self,
        collection: &str,
        id: &str,
        body: &T,
    ) -> Result<(), StoreError> {
        self.writes.push(StagedWrite::Put {
            collection: collection.to_string(),
            id: id.to_string(),
            body: serde_json::to_value(body)?,
        });

        Ok(())
    }

    /// Stage the removal of a document. Removing an absent document is a
    /// no-op at commit.
    pub fn delete(&mut self, collection: &str, id: &str) {
        self.writes.push(StagedWrite::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }

    /// Validate the read set and apply all staged writes atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when any document in the read set
    /// was committed to since it was read; nothing is applied and the
    /// caller may retry. Returns [`StoreError::Io`] or [`StoreError::Codec`]
    /// when persisting the file backend fails; writes are not applied then
    /// either, so memory and file never diverge.
    pub async fn commit(self) -> Result<(), StoreError> {
        let inner = &self.store.inner;
        let mut state = inner.state.lock().await;

        #[cfg(test)]
        if inner.take_forced_conflict() {
            return Err(StoreError::Conflict);
        }

        for read in &self.reads {
            let current = state
                .get(&read.collection)
                .and_then(|documents| documents.get(&read.id))
                .map(|stored| stored.version);

            if current != read.version {
                return Err(StoreError::Conflict);
            }
        }

        // Apply to a scratch copy first: file persistence can fail, and a
        // half-applied commit must never become visible.
        let mut next = state.clone();

        for write in self.writes {
            match write {
                StagedWrite::Put {
                    collection,
                    id,
                    body,
                } => {
                    let documents = next.entry(collection).or_default();
                    let version = documents.get(&id).map_or(1, |stored| stored.version + 1);
                    documents.insert(id, StoredDocument { version, body });
                }
                StagedWrite::Delete { collection, id } => {
                    if let Some(documents) = next.get_mut(&collection) {
                        documents.remove(&id);
                    }
                }
            }
        }

        inner.persist(&next).await?;
        *state = next;

        Ok(())
    }
}
