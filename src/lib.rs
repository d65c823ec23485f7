pub mod in_memory;
mod index;
pub mod mem_stat;
mod table;
pub mod util;

pub use index::*;
pub use mem_stat::MemStat;
pub use table::*;
pub use util::RecordHandle;

pub use ordered_float::OrderedFloat;

pub mod prelude {
    pub use crate::mem_stat::MemStat;
    pub use crate::select::{Order, SelectQueryBuilder};
    pub use crate::{
        HashedIndex, IndexInfo, IndexView, MultiIndexStore, OrderedIndex, RecordHandle, RowIndex,
        SharedStore, StoreConfig, StoreError, SystemInfo, TableIndexes, Uniqueness, indexes,
    };
    pub use ordered_float::OrderedFloat;
}
