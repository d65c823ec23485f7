use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Bound, RangeBounds};

use smallvec::SmallVec;

use crate::in_memory::DataArena;
use crate::index::{HashedIndex, IndexInfo, OrderedIndex, RowIndex};
use crate::table::select::SelectQueryBuilder;
use crate::util::RecordHandle;

/// Rows resolved from a set of handles found by a key lookup.
pub struct Rows<'a, Row> {
    handles: smallvec::IntoIter<[RecordHandle; 1]>,
    data: &'a DataArena<Row>,
}

impl<'a, Row> Rows<'a, Row> {
    fn new(handles: SmallVec<[RecordHandle; 1]>, data: &'a DataArena<Row>) -> Self {
        Self {
            handles: handles.into_iter(),
            data,
        }
    }

    /// Remaining rows together with their handles.
    pub fn with_handles(self) -> impl Iterator<Item = (RecordHandle, &'a Row)> {
        let data = self.data;
        self.handles
            .map(move |h| (h, data.get(h).expect("index entry points to a live row")))
    }
}

impl<'a, Row> Iterator for Rows<'a, Row> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.handles.next()?;
        Some(
            self.data
                .get(handle)
                .expect("index entry points to a live row"),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

impl<Row> ExactSizeIterator for Rows<'_, Row> {}

/// Read-only view over one index of a store.
pub struct IndexView<'a, Row, I> {
    index: &'a I,
    data: &'a DataArena<Row>,
}

impl<Row, I> Clone for IndexView<'_, Row, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Row, I> Copy for IndexView<'_, Row, I> {}

impl<'a, Row, I> IndexView<'a, Row, I>
where
    I: RowIndex<Row>,
{
    pub(crate) fn new(index: &'a I, data: &'a DataArena<Row>) -> Self {
        Self { index, data }
    }

    fn resolve(data: &'a DataArena<Row>, handle: RecordHandle) -> &'a Row {
        data.get(handle).expect("index entry points to a live row")
    }

    pub fn name(&self) -> &'static str {
        self.index.name()
    }

    pub fn info(&self) -> IndexInfo {
        self.index.info()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn find(&self, key: &I::Key) -> Rows<'a, Row> {
        Rows::new(self.index.lookup(key), self.data)
    }

    pub fn find_one(&self, key: &I::Key) -> Option<&'a Row> {
        self.find(key).next()
    }

    pub fn count(&self, key: &I::Key) -> usize {
        self.index.lookup(key).len()
    }

    pub fn contains_key(&self, key: &I::Key) -> bool {
        !self.index.lookup(key).is_empty()
    }

    /// Every row in the order of this index. Restartable: each call walks the
    /// index from the beginning.
    pub fn iter(self) -> impl Iterator<Item = &'a Row> + 'a {
        let data = self.data;
        self.index.handles().map(move |h| Self::resolve(data, h))
    }

    pub fn select(self) -> SelectQueryBuilder<'a, Row, impl Iterator<Item = &'a Row> + 'a> {
        SelectQueryBuilder::new(self.iter())
    }
}

impl<'a, Row, K> IndexView<'a, Row, OrderedIndex<Row, K>>
where
    K: Debug + Ord + Clone + Send + Sync + 'static,
{
    /// Rows with keys inside `range`, in index order. Bounds are read in the
    /// direction of the index, so on a descending index the start bound is
    /// the larger key.
    pub fn range<R>(self, range: R) -> impl Iterator<Item = &'a Row> + 'a
    where
        R: RangeBounds<K>,
    {
        self.between(range.start_bound().cloned(), range.end_bound().cloned())
    }

    pub fn between(self, start: Bound<K>, end: Bound<K>) -> impl Iterator<Item = &'a Row> + 'a {
        let data = self.data;
        self.index
            .handles_between(start, end)
            .map(move |h| Self::resolve(data, h))
    }

    /// Rows starting at the first key not ordered before `key`.
    pub fn lower_bound(self, key: K) -> impl Iterator<Item = &'a Row> + 'a {
        self.between(Bound::Included(key), Bound::Unbounded)
    }

    /// Rows starting at the first key ordered after `key`.
    pub fn upper_bound(self, key: K) -> impl Iterator<Item = &'a Row> + 'a {
        self.between(Bound::Excluded(key), Bound::Unbounded)
    }

    pub fn first(self) -> Option<&'a Row> {
        self.iter().next()
    }
}

impl<'a, Row, K> IndexView<'a, Row, HashedIndex<Row, K>>
where
    K: Debug + Hash + Eq,
{
    /// Lookup by any borrowed form of the key.
    pub fn get<Q>(&self, key: &Q) -> Rows<'a, Row>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Rows::new(self.index.find(key), self.data)
    }
}
