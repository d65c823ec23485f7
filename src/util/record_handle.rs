//! Stable reference to a row stored in [`DataArena`].
//!
//! [`RecordHandle`] identifies a slot together with the slot's generation at
//! the moment the row was inserted. After the row is erased the slot's
//! generation moves on, so an old handle no longer resolves even if the slot
//! is reused for another row.
//!
//! [`DataArena`]: crate::in_memory::DataArena

use derive_more::Display;

/// Non-owning handle to a row in a store.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{slot}v{generation}")]
pub struct RecordHandle {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl RecordHandle {
    /// Smallest possible handle, used as a lower sentinel in index ranges.
    pub const MIN: RecordHandle = RecordHandle {
        slot: 0,
        generation: 0,
    };
    /// Largest possible handle, used as an upper sentinel in index ranges.
    pub const MAX: RecordHandle = RecordHandle {
        slot: u32::MAX,
        generation: u32::MAX,
    };

    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}
