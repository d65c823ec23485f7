pub mod config;
pub mod select;
pub mod shared;
pub mod system_info;
pub mod view;

use derive_more::{Display, Error, From};
use tracing::{debug, error, trace};

use crate::in_memory::DataArena;
use crate::index::{DuplicateKeyError, IndexInfo, RowIndex, TableIndexes};
use crate::util::RecordHandle;

pub use config::StoreConfig;
pub use select::SelectQueryBuilder;
pub use shared::SharedStore;
pub use system_info::SystemInfo;
pub use view::{IndexView, Rows};

/// Set of rows with any number of synchronized indexes over it.
///
/// Rows are owned by the store's arena; every index holds one entry per live
/// row and nothing else. All mutations go through the store and update the
/// arena and every index before returning, or fail without touching either.
#[derive(Debug)]
pub struct MultiIndexStore<Row, Indexes = ()> {
    data: DataArena<Row>,

    indexes: Indexes,

    config: StoreConfig,
}

impl<Row, Indexes> Default for MultiIndexStore<Row, Indexes>
where
    Indexes: TableIndexes<Row> + Default,
{
    fn default() -> Self {
        Self::new(Indexes::default())
    }
}

impl<Row, Indexes> MultiIndexStore<Row, Indexes>
where
    Indexes: TableIndexes<Row>,
{
    pub fn new(indexes: Indexes) -> Self {
        Self::with_config(indexes, StoreConfig::default())
    }

    pub fn with_config(indexes: Indexes, config: StoreConfig) -> Self {
        Self {
            data: DataArena::with_capacity(config.capacity),
            indexes,
            config,
        }
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inserts `row` into the store and every index.
    ///
    /// All unique indexes are checked before anything is modified, so a
    /// rejected row leaves the store exactly as it was.
    pub fn insert(&mut self, row: Row) -> Result<RecordHandle, StoreError> {
        if let Err(e) = self.indexes.check_row(&row, None) {
            debug!(store = self.config.name, index = e.index, key = %e.key, "Insert rejected");
            return Err(e.into());
        }

        let handle = self.data.insert(row);
        let row = self.data.get(handle).expect("row was inserted just before");
        self.indexes.save_row(row, handle);

        self.check_cardinality("insert");
        Ok(handle)
    }

    pub fn get(&self, handle: RecordHandle) -> Option<&Row> {
        self.data.get(handle)
    }

    pub fn contains(&self, handle: RecordHandle) -> bool {
        self.data.contains(handle)
    }

    /// Removes the row behind `handle` from the store and every index.
    /// Returns `None` if the handle is stale.
    pub fn erase(&mut self, handle: RecordHandle) -> Option<Row> {
        let row = self.erase_unchecked(handle)?;
        self.check_cardinality("erase");
        Some(row)
    }

    fn erase_unchecked(&mut self, handle: RecordHandle) -> Option<Row> {
        let row = self.data.remove(handle)?;
        self.indexes.delete_row(&row, handle);
        Some(row)
    }

    /// Removes every row whose key in the selected index equals `key`.
    /// Returns the count of removed rows.
    pub fn erase_by<I, F>(&mut self, index: F, key: &I::Key) -> usize
    where
        F: FnOnce(&Indexes) -> &I,
        I: RowIndex<Row>,
    {
        let index = index(&self.indexes);
        let name = index.name();
        let handles = index.lookup(key);

        let removed = handles
            .into_iter()
            .filter_map(|h| self.erase_unchecked(h))
            .count();
        trace!(store = self.config.name, index = name, removed, "Erased by key");

        self.check_cardinality("erase_by");
        removed
    }

    /// Borrows one index of the store as a queryable view.
    pub fn index<'a, I, F>(&'a self, index: F) -> IndexView<'a, Row, I>
    where
        F: FnOnce(&'a Indexes) -> &'a I,
        I: RowIndex<Row> + 'a,
    {
        IndexView::new(index(&self.indexes), &self.data)
    }

    /// Rows whose key in the selected index equals `key`.
    pub fn find_by<'a, I, F>(&'a self, index: F, key: &I::Key) -> Rows<'a, Row>
    where
        F: FnOnce(&'a Indexes) -> &'a I,
        I: RowIndex<Row> + 'a,
    {
        self.index(index).find(key)
    }

    pub fn count_by<'a, I, F>(&'a self, index: F, key: &I::Key) -> usize
    where
        F: FnOnce(&'a Indexes) -> &'a I,
        I: RowIndex<Row> + 'a,
    {
        self.index(index).count(key)
    }

    /// All rows in the order of the selected index.
    pub fn iter<'a, I, F>(&'a self, index: F) -> impl Iterator<Item = &'a Row> + 'a
    where
        F: FnOnce(&'a Indexes) -> &'a I,
        I: RowIndex<Row> + 'a,
        Row: 'a,
    {
        self.index(index).iter()
    }

    /// All rows with their handles in storage order.
    pub fn rows(&self) -> impl Iterator<Item = (RecordHandle, &Row)> + '_ {
        self.data.iter()
    }

    /// Applies `mutator` to the row in place without touching any index.
    ///
    /// The mutator must not change a value any index extracts its key from;
    /// use [`MultiIndexStore::modify`] for that. Debug builds verify this
    /// after the mutation and panic if an index lost track of the row.
    pub fn update_non_key_field<F>(
        &mut self,
        handle: RecordHandle,
        mutator: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Row),
    {
        let row = self
            .data
            .get_mut(handle)
            .ok_or(StoreError::StaleHandle(handle))?;
        mutator(row);

        if cfg!(debug_assertions) {
            if let Err(index) = self.indexes.holds_row(row, handle) {
                error!(
                    store = self.config.name,
                    index,
                    %handle,
                    "Key changed by non-key update"
                );
                panic!(
                    "invariant violation: non-key update of {handle} changed the key of `{index}` index"
                );
            }
        }

        Ok(())
    }

    /// Applies `mutator` to a copy of the row and stores the result,
    /// re-keying every index whose key changed.
    ///
    /// If the new keys collide with another row in a unique index the stored
    /// row and all indexes stay unchanged.
    pub fn modify<F>(&mut self, handle: RecordHandle, mutator: F) -> Result<(), StoreError>
    where
        Row: Clone,
        F: FnOnce(&mut Row),
    {
        let mut row = self
            .data
            .get(handle)
            .ok_or(StoreError::StaleHandle(handle))?
            .clone();
        mutator(&mut row);
        self.replace(handle, row).map(|_| ())
    }

    /// Replaces the row behind `handle` with `row`, keeping the handle, and
    /// returns the previous row. Same atomicity as [`MultiIndexStore::modify`].
    pub fn replace(&mut self, handle: RecordHandle, row: Row) -> Result<Row, StoreError> {
        let row_old = self
            .data
            .get(handle)
            .ok_or(StoreError::StaleHandle(handle))?;
        if let Err(e) = self.indexes.check_row(&row, Some(handle)) {
            debug!(store = self.config.name, index = e.index, key = %e.key, %handle, "Update rejected");
            return Err(e.into());
        }

        self.indexes.reinsert_row(row_old, &row, handle);
        let row_old = self
            .data
            .replace(handle, row)
            .expect("handle was checked before");

        self.check_cardinality("replace");
        Ok(row_old)
    }

    /// Removes all rows. Every handle issued so far becomes stale.
    pub fn clear(&mut self) {
        self.data.clear();
        self.indexes.clear();
        self.check_cardinality("clear");
    }

    pub fn index_info(&self) -> Vec<IndexInfo> {
        self.indexes.index_info()
    }

    /// Every index must hold exactly one entry per live row. A mismatch means
    /// the store is corrupted and is not recoverable.
    fn check_cardinality(&self, operation: &'static str) {
        let rows = self.data.len();
        if let Err((index, len)) = self.indexes.check_len(rows) {
            error!(
                store = self.config.name,
                index, len, rows, operation, "Index diverged from stored rows"
            );
            panic!(
                "invariant violation after {operation}: `{index}` index holds {len} entries for {rows} rows"
            );
        }
    }
}

#[derive(Debug, Display, Error, From, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[display("{}", _0)]
    DuplicateKey(DuplicateKeyError),
    #[display("Record handle `{}` is stale", _0)]
    StaleHandle(#[error(not(source))] RecordHandle),
}
