mod arena;
mod empty_slot_registry;

pub use arena::DataArena;
pub use empty_slot_registry::EmptySlotRegistry;
