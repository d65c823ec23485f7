use serde::Serialize;

use crate::index::{IndexKind, Uniqueness};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub name: &'static str,
    pub kind: IndexKind,
    pub uniqueness: Uniqueness,
    /// Count of entries in the index.
    pub len: usize,
    pub heap_size: usize,
}
