use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

use crate::index::{IndexKind, RowIndex, Uniqueness};
use crate::util::RecordHandle;

type Bucket = SmallVec<[RecordHandle; 1]>;

/// Index with exact-key lookup only. Each key maps to a bucket of handles;
/// for a unique index a bucket never holds more than one handle and stays
/// inline.
#[derive(Debug)]
pub struct HashedIndex<Row, K>
where
    K: Debug + Hash + Eq,
{
    name: &'static str,
    uniqueness: Uniqueness,
    extractor: fn(&Row) -> K,
    map: HashMap<K, Bucket>,
    len: usize,
}

impl<Row, K> HashedIndex<Row, K>
where
    K: Debug + Hash + Eq,
{
    pub fn new(name: &'static str, uniqueness: Uniqueness, extractor: fn(&Row) -> K) -> Self {
        Self {
            name,
            uniqueness,
            extractor,
            map: HashMap::new(),
            len: 0,
        }
    }

    pub fn unique(name: &'static str, extractor: fn(&Row) -> K) -> Self {
        Self::new(name, Uniqueness::Unique, extractor)
    }

    pub fn non_unique(name: &'static str, extractor: fn(&Row) -> K) -> Self {
        Self::new(name, Uniqueness::NonUnique, extractor)
    }

    /// Lookup by any borrowed form of the key, e.g. `&str` for `String` keys.
    pub fn find<Q>(&self, key: &Q) -> SmallVec<[RecordHandle; 1]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).cloned().unwrap_or_default()
    }

    /// Count of distinct keys.
    pub fn key_count(&self) -> usize {
        self.map.len()
    }
}

impl<Row, K> RowIndex<Row> for HashedIndex<Row, K>
where
    K: Debug + Hash + Eq,
{
    type Key = K;

    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> IndexKind {
        IndexKind::Hashed
    }

    fn uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    fn extract(&self, row: &Row) -> K {
        (self.extractor)(row)
    }

    fn lookup(&self, key: &K) -> SmallVec<[RecordHandle; 1]> {
        self.find(key)
    }

    fn insert_entry(&mut self, key: K, handle: RecordHandle) {
        self.map.entry(key).or_default().push(handle);
        self.len += 1;
    }

    fn remove_entry(&mut self, key: &K, handle: RecordHandle) {
        let Some(bucket) = self.map.get_mut(key) else {
            return;
        };
        if let Some(pos) = bucket.iter().position(|h| *h == handle) {
            bucket.swap_remove(pos);
            self.len -= 1;
        }
        if bucket.is_empty() {
            self.map.remove(key);
        }
    }

    fn contains_entry(&self, key: &K, handle: RecordHandle) -> bool {
        self.map
            .get(key)
            .is_some_and(|bucket| bucket.contains(&handle))
    }

    fn handles(&self) -> impl Iterator<Item = RecordHandle> + '_ {
        self.map.values().flat_map(|bucket| bucket.iter().copied())
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.map.clear();
        self.len = 0;
    }

    fn heap_size(&self) -> usize {
        let table = self.map.capacity() * size_of::<(K, Bucket)>();
        let spilled: usize = self
            .map
            .values()
            .filter(|bucket| bucket.spilled())
            .map(|bucket| bucket.capacity() * size_of::<RecordHandle>())
            .sum();
        table + spilled
    }
}
