use std::fmt::{self, Display, Formatter};

use prettytable::{Table, format, row};
use serde::Serialize;

use crate::index::{IndexInfo, TableIndexes};
use crate::mem_stat::MemStat;
use crate::table::MultiIndexStore;

/// Snapshot of a store's size and the state of each of its indexes.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub name: &'static str,
    pub rows: usize,
    pub slots: usize,
    pub free_slots: usize,
    /// Bytes allocated by the arena and the rows it holds.
    pub heap_size: usize,
    /// Bytes occupied by live rows.
    pub used_size: usize,
    pub indexes: Vec<IndexInfo>,
}

impl SystemInfo {
    /// Bytes allocated by all indexes together.
    pub fn index_heap_size(&self) -> usize {
        self.indexes.iter().map(|i| i.heap_size).sum()
    }

    pub fn pretty(&self) -> String {
        self.to_string()
    }
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

impl Display for SystemInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} rows in {} slots ({} free), heap {}, used {}",
            self.name,
            self.rows,
            self.slots,
            self.free_slots,
            format_bytes(self.heap_size),
            format_bytes(self.used_size),
        )?;

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.set_titles(row!["Index", "Kind", "Uniqueness", "Entries", "Heap"]);
        for info in &self.indexes {
            table.add_row(row![
                info.name,
                info.kind,
                info.uniqueness,
                info.len,
                format_bytes(info.heap_size)
            ]);
        }
        write!(f, "{table}")
    }
}

impl<Row, Indexes> MultiIndexStore<Row, Indexes>
where
    Row: MemStat,
    Indexes: TableIndexes<Row>,
{
    pub fn system_info(&self) -> SystemInfo {
        SystemInfo {
            name: self.config.name,
            rows: self.data.len(),
            slots: self.data.slot_count(),
            free_slots: self.data.free_slot_count(),
            heap_size: self.data.heap_size(),
            used_size: self.data.used_size(),
            indexes: self.indexes.index_info(),
        }
    }
}

impl<Row, Indexes> MemStat for MultiIndexStore<Row, Indexes>
where
    Row: MemStat,
    Indexes: TableIndexes<Row>,
{
    fn heap_size(&self) -> usize {
        self.data.heap_size() + self.indexes.heap_size()
    }

    fn used_size(&self) -> usize {
        self.data.used_size() + self.indexes.heap_size()
    }
}
