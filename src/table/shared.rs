use std::sync::Arc;

use parking_lot::RwLock;

use crate::index::{RowIndex, TableIndexes};
use crate::table::{MultiIndexStore, StoreError};
use crate::util::RecordHandle;

/// [`MultiIndexStore`] behind a reader-writer lock, shareable between
/// threads. Every operation takes the lock for its whole duration, so readers
/// never observe a half-applied mutation.
pub struct SharedStore<Row, Indexes = ()> {
    inner: Arc<RwLock<MultiIndexStore<Row, Indexes>>>,
}

impl<Row, Indexes> Clone for SharedStore<Row, Indexes> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<Row, Indexes> From<MultiIndexStore<Row, Indexes>> for SharedStore<Row, Indexes> {
    fn from(store: MultiIndexStore<Row, Indexes>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }
}

impl<Row, Indexes> SharedStore<Row, Indexes>
where
    Indexes: TableIndexes<Row>,
{
    pub fn new(indexes: Indexes) -> Self {
        MultiIndexStore::new(indexes).into()
    }

    /// Runs `f` under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&MultiIndexStore<Row, Indexes>) -> T) -> T {
        f(&self.inner.read())
    }

    /// Runs `f` under the write lock. Several mutations done in one `f` are
    /// seen by readers all at once.
    pub fn write<T>(&self, f: impl FnOnce(&mut MultiIndexStore<Row, Indexes>) -> T) -> T {
        f(&mut self.inner.write())
    }

    pub fn insert(&self, row: Row) -> Result<RecordHandle, StoreError> {
        self.inner.write().insert(row)
    }

    pub fn erase(&self, handle: RecordHandle) -> Option<Row> {
        self.inner.write().erase(handle)
    }

    pub fn erase_by<I, F>(&self, index: F, key: &I::Key) -> usize
    where
        F: FnOnce(&Indexes) -> &I,
        I: RowIndex<Row>,
    {
        self.inner.write().erase_by(index, key)
    }

    pub fn modify<F>(&self, handle: RecordHandle, mutator: F) -> Result<(), StoreError>
    where
        Row: Clone,
        F: FnOnce(&mut Row),
    {
        self.inner.write().modify(handle, mutator)
    }

    pub fn update_non_key_field<F>(&self, handle: RecordHandle, mutator: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Row),
    {
        self.inner.write().update_non_key_field(handle, mutator)
    }

    pub fn get_cloned(&self, handle: RecordHandle) -> Option<Row>
    where
        Row: Clone,
    {
        self.inner.read().get(handle).cloned()
    }

    /// Clones every row whose key in the selected index equals `key`.
    pub fn find_cloned<I, F>(&self, index: F, key: &I::Key) -> Vec<Row>
    where
        F: FnOnce(&Indexes) -> &I,
        I: RowIndex<Row>,
        Row: Clone,
    {
        let store = self.inner.read();
        let index = index(store.indexes());
        index
            .lookup(key)
            .into_iter()
            .filter_map(|h| store.get(h).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear()
    }
}
