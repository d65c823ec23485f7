use std::fmt::Debug;

use crate::in_memory::empty_slot_registry::EmptySlotRegistry;
use crate::mem_stat::MemStat;
use crate::util::RecordHandle;

#[derive(Debug)]
struct Slot<Row> {
    generation: u32,
    row: Option<Row>,
}

impl<Row> Slot<Row> {
    /// Moves an emptied slot to its next generation. Returns `false` when the
    /// generation is exhausted: such a slot is retired and never reused, so
    /// old handles to it can not resolve again.
    fn vacate(&mut self) -> bool {
        match self.generation.checked_add(1) {
            Some(generation) => {
                self.generation = generation;
                true
            }
            None => false,
        }
    }
}

/// Canonical storage for the rows of a store.
///
/// Every row lives in exactly one slot. Indexes never copy rows, they keep
/// [`RecordHandle`]s that resolve through [`DataArena::get`]. A slot's
/// generation is bumped each time its row is removed, so handles to removed
/// rows stop resolving.
#[derive(Debug)]
pub struct DataArena<Row> {
    slots: Vec<Slot<Row>>,

    empty_slots: EmptySlotRegistry,

    /// Count of live rows.
    row_count: usize,
}

impl<Row> Default for DataArena<Row> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Row> DataArena<Row> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            empty_slots: EmptySlotRegistry::default(),
            row_count: 0,
        }
    }

    pub fn insert(&mut self, row: Row) -> RecordHandle {
        self.row_count += 1;
        if let Some(slot_id) = self.empty_slots.pop_min() {
            let slot = &mut self.slots[slot_id as usize];
            debug_assert!(slot.row.is_none(), "empty slot registry returned a live slot");
            slot.row = Some(row);
            return RecordHandle::new(slot_id, slot.generation);
        }

        let slot_id = u32::try_from(self.slots.len()).expect("arena holds at most u32::MAX slots");
        self.slots.push(Slot {
            generation: 0,
            row: Some(row),
        });
        RecordHandle::new(slot_id, 0)
    }

    fn live_slot(&self, handle: RecordHandle) -> Option<&Slot<Row>> {
        self.slots
            .get(handle.slot as usize)
            .filter(|s| s.generation == handle.generation && s.row.is_some())
    }

    fn live_slot_mut(&mut self, handle: RecordHandle) -> Option<&mut Slot<Row>> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|s| s.generation == handle.generation && s.row.is_some())
    }

    pub fn contains(&self, handle: RecordHandle) -> bool {
        self.live_slot(handle).is_some()
    }

    pub fn get(&self, handle: RecordHandle) -> Option<&Row> {
        self.live_slot(handle).and_then(|s| s.row.as_ref())
    }

    pub fn get_mut(&mut self, handle: RecordHandle) -> Option<&mut Row> {
        self.live_slot_mut(handle).and_then(|s| s.row.as_mut())
    }

    /// Swaps the row behind `handle` with `row`, returning the previous value.
    /// The handle stays valid.
    pub fn replace(&mut self, handle: RecordHandle, row: Row) -> Option<Row> {
        let slot = self.live_slot_mut(handle)?;
        slot.row.replace(row)
    }

    pub fn remove(&mut self, handle: RecordHandle) -> Option<Row> {
        let slot = self.live_slot_mut(handle)?;
        let row = slot.row.take();
        if slot.vacate() {
            self.empty_slots.push(handle.slot);
        }
        self.row_count -= 1;
        row
    }

    /// Removes every row. Slots are kept, so handles issued before the call
    /// never resolve to rows inserted after it.
    pub fn clear(&mut self) {
        for (slot_id, slot) in self.slots.iter_mut().enumerate() {
            if slot.row.take().is_some() && slot.vacate() {
                self.empty_slots.push(slot_id as u32);
            }
        }
        self.row_count = 0;
    }

    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Count of slots ever allocated, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn free_slot_count(&self) -> usize {
        self.empty_slots.len()
    }

    /// Iterates live rows in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordHandle, &Row)> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot_id, slot)| {
            slot.row
                .as_ref()
                .map(|row| (RecordHandle::new(slot_id as u32, slot.generation), row))
        })
    }
}

impl<Row: MemStat> MemStat for DataArena<Row> {
    fn heap_size(&self) -> usize {
        let slots = self.slots.capacity() * size_of::<Slot<Row>>();
        let rows: usize = self.iter().map(|(_, row)| row.heap_size()).sum();
        slots + rows + self.empty_slots.len() * size_of::<u32>()
    }

    fn used_size(&self) -> usize {
        let rows: usize = self.iter().map(|(_, row)| row.used_size()).sum();
        self.row_count * size_of::<Slot<Row>>() + rows
    }
}
