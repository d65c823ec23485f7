use ordered_float::OrderedFloat;

use crate::util::RecordHandle;

/// Memory accounting for rows and containers. `heap_size` is what is
/// allocated, `used_size` is what is occupied by live values.
pub trait MemStat {
    fn heap_size(&self) -> usize;
    fn used_size(&self) -> usize;
}

impl<T: MemStat> MemStat for Option<T> {
    fn heap_size(&self) -> usize {
        self.as_ref().map_or(0, |v| v.heap_size())
    }
    fn used_size(&self) -> usize {
        self.as_ref().map_or(0, |v| v.used_size())
    }
}

impl<T: MemStat> MemStat for Vec<T> {
    fn heap_size(&self) -> usize {
        self.capacity() * size_of::<T>() + self.iter().map(|v| v.heap_size()).sum::<usize>()
    }
    fn used_size(&self) -> usize {
        self.len() * size_of::<T>() + self.iter().map(|v| v.used_size()).sum::<usize>()
    }
}

impl MemStat for String {
    fn heap_size(&self) -> usize {
        self.capacity()
    }
    fn used_size(&self) -> usize {
        self.len()
    }
}

impl<A: MemStat, B: MemStat> MemStat for (A, B) {
    fn heap_size(&self) -> usize {
        self.0.heap_size() + self.1.heap_size()
    }
    fn used_size(&self) -> usize {
        self.0.used_size() + self.1.used_size()
    }
}

macro_rules! inline_mem_stat {
    ($($t:ty),* $(,)?) => {
        $(
            impl MemStat for $t {
                fn heap_size(&self) -> usize {
                    0
                }
                fn used_size(&self) -> usize {
                    0
                }
            }
        )*
    };
}

inline_mem_stat!(
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    bool,
    char,
    OrderedFloat<f32>,
    OrderedFloat<f64>,
    RecordHandle,
);
