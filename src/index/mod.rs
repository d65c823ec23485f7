mod hashed;
mod info;
mod ordered;
mod table_indexes;

use std::fmt::Debug;

use derive_more::{Display, Error};
use serde::Serialize;
use smallvec::SmallVec;

pub use hashed::HashedIndex;
pub use info::IndexInfo;
pub use ordered::{Directed, OrderedIndex};
pub use table_indexes::TableIndexes;

#[doc(hidden)]
pub mod __ops {
    pub use super::table_indexes::{
        check_len, check_unique, clear, delete, heap_size, holds, info, reinsert, save,
    };
}

use crate::util::RecordHandle;

/// Direction in which an ordered index (or a select query) walks its keys.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Order {
    #[display("asc")]
    Asc,
    #[display("desc")]
    Desc,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Uniqueness {
    #[display("unique")]
    Unique,
    #[display("non-unique")]
    NonUnique,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IndexKind {
    #[display("ordered {}", _0)]
    Ordered(Order),
    #[display("hashed")]
    Hashed,
}

/// Insert or re-key was rejected because a live row already holds the key in
/// a unique index.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("Value `{key}` already exists for `{index}` index")]
pub struct DuplicateKeyError {
    pub index: &'static str,
    pub key: String,
}

/// One view over the rows of a store. An index stores `(key, handle)` entries
/// only; rows are resolved through the store's arena.
pub trait RowIndex<Row> {
    type Key: Debug + Eq;

    fn name(&self) -> &'static str;

    fn kind(&self) -> IndexKind;

    fn uniqueness(&self) -> Uniqueness;

    /// Computes the key of `row` for this index.
    fn extract(&self, row: &Row) -> Self::Key;

    /// Handles of all entries whose key equals `key`.
    fn lookup(&self, key: &Self::Key) -> SmallVec<[RecordHandle; 1]>;

    /// Returns a handle, other than `own`, already holding `key` if this
    /// index is unique.
    fn conflict(&self, key: &Self::Key, own: Option<RecordHandle>) -> Option<RecordHandle> {
        if self.uniqueness() == Uniqueness::NonUnique {
            return None;
        }
        self.lookup(key).into_iter().find(|h| Some(*h) != own)
    }

    fn insert_entry(&mut self, key: Self::Key, handle: RecordHandle);

    fn remove_entry(&mut self, key: &Self::Key, handle: RecordHandle);

    fn contains_entry(&self, key: &Self::Key, handle: RecordHandle) -> bool;

    /// All handles in index order.
    fn handles(&self) -> impl Iterator<Item = RecordHandle> + '_;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// Estimated heap bytes taken by index entries.
    fn heap_size(&self) -> usize;

    fn info(&self) -> IndexInfo {
        IndexInfo {
            name: self.name(),
            kind: self.kind(),
            uniqueness: self.uniqueness(),
            len: self.len(),
            heap_size: self.heap_size(),
        }
    }
}
