use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Bound, RangeBounds};

use indexset::concurrent::set::BTreeSet;
use smallvec::SmallVec;

use crate::index::{IndexKind, Order, RowIndex, Uniqueness};
use crate::util::RecordHandle;

/// Key wrapper that compares in the direction of its index, so a descending
/// index is stored in the same kind of tree as an ascending one.
#[derive(Clone, Debug)]
pub struct Directed<K> {
    pub key: K,
    pub order: Order,
}

impl<K> Directed<K> {
    pub fn new(key: K, order: Order) -> Self {
        Self { key, order }
    }
}

impl<K: Ord> Ord for Directed<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.order {
            Order::Asc => self.key.cmp(&other.key),
            Order::Desc => other.key.cmp(&self.key),
        }
    }
}

impl<K: Ord> PartialOrd for Directed<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Eq> PartialEq for Directed<K> {
    fn eq(&self, other: &Self) -> bool {
        self.key.eq(&other.key)
    }
}

impl<K: Eq> Eq for Directed<K> {}

type Entry<K> = (Directed<K>, RecordHandle);

/// Index that keeps its entries sorted by key in ascending or descending
/// order. Entries with equal keys are adjacent and ordered by handle.
#[derive(Debug)]
pub struct OrderedIndex<Row, K>
where
    K: Debug + Ord + Clone + Send + Sync + 'static,
{
    name: &'static str,
    order: Order,
    uniqueness: Uniqueness,
    extractor: fn(&Row) -> K,
    entries: BTreeSet<Entry<K>>,
}

impl<Row, K> OrderedIndex<Row, K>
where
    K: Debug + Ord + Clone + Send + Sync + 'static,
{
    pub fn new(
        name: &'static str,
        order: Order,
        uniqueness: Uniqueness,
        extractor: fn(&Row) -> K,
    ) -> Self {
        Self {
            name,
            order,
            uniqueness,
            extractor,
            entries: BTreeSet::new(),
        }
    }

    pub fn unique(name: &'static str, order: Order, extractor: fn(&Row) -> K) -> Self {
        Self::new(name, order, Uniqueness::Unique, extractor)
    }

    pub fn non_unique(name: &'static str, order: Order, extractor: fn(&Row) -> K) -> Self {
        Self::new(name, order, Uniqueness::NonUnique, extractor)
    }

    pub fn order(&self) -> Order {
        self.order
    }

    fn entry(&self, key: K, handle: RecordHandle) -> Entry<K> {
        (Directed::new(key, self.order), handle)
    }

    /// Handles whose keys fall between `start` and `end`. Bounds are read in
    /// index order: for a descending index `start` is the larger key.
    pub fn handles_between(
        &self,
        start: Bound<K>,
        end: Bound<K>,
    ) -> impl Iterator<Item = RecordHandle> + '_ {
        let start = match start {
            Bound::Included(k) => Bound::Included(self.entry(k, RecordHandle::MIN)),
            Bound::Excluded(k) => Bound::Excluded(self.entry(k, RecordHandle::MAX)),
            Bound::Unbounded => Bound::Unbounded,
        };
        let end = match end {
            Bound::Included(k) => Bound::Included(self.entry(k, RecordHandle::MAX)),
            Bound::Excluded(k) => Bound::Excluded(self.entry(k, RecordHandle::MIN)),
            Bound::Unbounded => Bound::Unbounded,
        };
        let entries = (!is_empty_range(&start, &end)).then(|| self.entries.range((start, end)));
        entries.into_iter().flatten().map(|e| e.1)
    }

    pub fn handles_in<R>(&self, range: R) -> impl Iterator<Item = RecordHandle> + '_
    where
        R: RangeBounds<K>,
    {
        self.handles_between(range.start_bound().cloned(), range.end_bound().cloned())
    }
}

fn is_empty_range<T: Ord>(start: &Bound<T>, end: &Bound<T>) -> bool {
    match (start, end) {
        (Bound::Included(s), Bound::Included(e)) => s > e,
        (Bound::Included(s), Bound::Excluded(e))
        | (Bound::Excluded(s), Bound::Included(e))
        | (Bound::Excluded(s), Bound::Excluded(e)) => s >= e,
        _ => false,
    }
}

impl<Row, K> RowIndex<Row> for OrderedIndex<Row, K>
where
    K: Debug + Ord + Clone + Send + Sync + 'static,
{
    type Key = K;

    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> IndexKind {
        IndexKind::Ordered(self.order)
    }

    fn uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    fn extract(&self, row: &Row) -> K {
        (self.extractor)(row)
    }

    fn lookup(&self, key: &K) -> SmallVec<[RecordHandle; 1]> {
        self.handles_between(Bound::Included(key.clone()), Bound::Included(key.clone()))
            .collect()
    }

    fn insert_entry(&mut self, key: K, handle: RecordHandle) {
        let entry = self.entry(key, handle);
        self.entries.insert(entry);
    }

    fn remove_entry(&mut self, key: &K, handle: RecordHandle) {
        let entry = self.entry(key.clone(), handle);
        self.entries.remove(&entry);
    }

    fn contains_entry(&self, key: &K, handle: RecordHandle) -> bool {
        self.entries.contains(&self.entry(key.clone(), handle))
    }

    fn handles(&self) -> impl Iterator<Item = RecordHandle> + '_ {
        self.entries.iter().map(|e| e.1)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries = BTreeSet::new();
    }

    fn heap_size(&self) -> usize {
        self.entries.len() * size_of::<Entry<K>>()
    }
}
