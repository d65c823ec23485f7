use indexset::concurrent::set::BTreeSet;

/// Keeps slots freed by erased rows so that new rows reuse them before the
/// arena grows. Lowest slot is handed out first, which keeps live rows packed
/// at the start of the arena.
#[derive(Debug)]
pub struct EmptySlotRegistry {
    slots: BTreeSet<u32>,
}

impl Default for EmptySlotRegistry {
    fn default() -> Self {
        Self {
            slots: BTreeSet::new(),
        }
    }
}

impl EmptySlotRegistry {
    pub fn push(&self, slot: u32) {
        self.slots.insert(slot);
    }

    pub fn pop_min(&self) -> Option<u32> {
        let slot = self.slots.iter().next().map(|s| *s)?;
        self.slots.remove(&slot);
        Some(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().map(|s| *s)
    }
}
