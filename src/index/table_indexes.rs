use crate::index::{DuplicateKeyError, IndexInfo, RowIndex, Uniqueness};
use crate::util::RecordHandle;

/// The full set of indexes of a store.
///
/// Normally generated with [`indexes!`], which declares a struct with one
/// field per index and forwards every method to each field in turn.
///
/// [`indexes!`]: crate::indexes
pub trait TableIndexes<Row> {
    /// Checks every unique index for a live row, other than `own`, already
    /// holding the key `row` would get. Nothing is modified.
    fn check_row(&self, row: &Row, own: Option<RecordHandle>) -> Result<(), DuplicateKeyError>;

    /// Adds an entry for `row` to every index. Must be preceded by a
    /// successful [`TableIndexes::check_row`].
    fn save_row(&mut self, row: &Row, handle: RecordHandle);

    fn delete_row(&mut self, row: &Row, handle: RecordHandle);

    /// Moves the entry of `handle` from the key of `row_old` to the key of
    /// `row_new` in those indexes where the key differs.
    fn reinsert_row(&mut self, row_old: &Row, row_new: &Row, handle: RecordHandle);

    /// Returns the name of the first index that has no entry for `row` under
    /// `handle`.
    fn holds_row(&self, row: &Row, handle: RecordHandle) -> Result<(), &'static str>;

    /// Returns the first index whose entry count differs from `expected`.
    fn check_len(&self, expected: usize) -> Result<(), (&'static str, usize)>;

    fn index_info(&self) -> Vec<IndexInfo>;

    fn clear(&mut self);

    fn heap_size(&self) -> usize;
}

impl<Row> TableIndexes<Row> for () {
    fn check_row(&self, _: &Row, _: Option<RecordHandle>) -> Result<(), DuplicateKeyError> {
        Ok(())
    }

    fn save_row(&mut self, _: &Row, _: RecordHandle) {}

    fn delete_row(&mut self, _: &Row, _: RecordHandle) {}

    fn reinsert_row(&mut self, _: &Row, _: &Row, _: RecordHandle) {}

    fn holds_row(&self, _: &Row, _: RecordHandle) -> Result<(), &'static str> {
        Ok(())
    }

    fn check_len(&self, _: usize) -> Result<(), (&'static str, usize)> {
        Ok(())
    }

    fn index_info(&self) -> Vec<IndexInfo> {
        vec![]
    }

    fn clear(&mut self) {}

    fn heap_size(&self) -> usize {
        0
    }
}

pub fn check_unique<Row, I>(
    index: &I,
    row: &Row,
    own: Option<RecordHandle>,
) -> Result<(), DuplicateKeyError>
where
    I: RowIndex<Row>,
{
    if index.uniqueness() == Uniqueness::NonUnique {
        return Ok(());
    }
    let key = index.extract(row);
    match index.conflict(&key, own) {
        Some(_) => Err(DuplicateKeyError {
            index: index.name(),
            key: format!("{key:?}"),
        }),
        None => Ok(()),
    }
}

pub fn save<Row, I>(index: &mut I, row: &Row, handle: RecordHandle)
where
    I: RowIndex<Row>,
{
    let key = index.extract(row);
    index.insert_entry(key, handle);
}

pub fn delete<Row, I>(index: &mut I, row: &Row, handle: RecordHandle)
where
    I: RowIndex<Row>,
{
    let key = index.extract(row);
    index.remove_entry(&key, handle);
}

pub fn reinsert<Row, I>(index: &mut I, row_old: &Row, row_new: &Row, handle: RecordHandle)
where
    I: RowIndex<Row>,
{
    let old_key = index.extract(row_old);
    let new_key = index.extract(row_new);
    if old_key != new_key {
        index.remove_entry(&old_key, handle);
        index.insert_entry(new_key, handle);
    }
}

pub fn holds<Row, I>(index: &I, row: &Row, handle: RecordHandle) -> Result<(), &'static str>
where
    I: RowIndex<Row>,
{
    if index.contains_entry(&index.extract(row), handle) {
        Ok(())
    } else {
        Err(index.name())
    }
}

pub fn check_len<Row, I>(index: &I, expected: usize) -> Result<(), (&'static str, usize)>
where
    I: RowIndex<Row>,
{
    let len = index.len();
    if len == expected {
        Ok(())
    } else {
        Err((index.name(), len))
    }
}

pub fn info<Row, I>(index: &I) -> IndexInfo
where
    I: RowIndex<Row>,
{
    index.info()
}

pub fn clear<Row, I>(index: &mut I)
where
    I: RowIndex<Row>,
{
    index.clear()
}

pub fn heap_size<Row, I>(index: &I) -> usize
where
    I: RowIndex<Row>,
{
    index.heap_size()
}

/// Declares the index set of a store.
///
/// ```ignore
/// indexes! {
///     pub struct PointIndexes for Point {
///         by_x: OrderedIndex<Point, i32> =
///             OrderedIndex::non_unique("by_x", Order::Asc, |p: &Point| p.x),
///         by_xy: HashedIndex<Point, (i32, i32)> =
///             HashedIndex::unique("by_xy", |p: &Point| (p.x, p.y)),
///     }
/// }
/// ```
///
/// Each field is one index. The struct gets `new`/`Default` building every
/// index from its initializer, and a [`TableIndexes`] implementation that
/// visits the fields in declaration order.
#[macro_export]
macro_rules! indexes {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident for $row:ty {
            $($field:ident : $index:ty = $init:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(pub $field: $index,)*
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    $($field: $init,)*
                }
            }
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        #[allow(unused_variables)]
        impl $crate::TableIndexes<$row> for $name {
            fn check_row(
                &self,
                row: &$row,
                own: ::core::option::Option<$crate::RecordHandle>,
            ) -> ::core::result::Result<(), $crate::DuplicateKeyError> {
                $($crate::__ops::check_unique(&self.$field, row, own)?;)*
                ::core::result::Result::Ok(())
            }

            fn save_row(&mut self, row: &$row, handle: $crate::RecordHandle) {
                $($crate::__ops::save(&mut self.$field, row, handle);)*
            }

            fn delete_row(&mut self, row: &$row, handle: $crate::RecordHandle) {
                $($crate::__ops::delete(&mut self.$field, row, handle);)*
            }

            fn reinsert_row(&mut self, row_old: &$row, row_new: &$row, handle: $crate::RecordHandle) {
                $($crate::__ops::reinsert(&mut self.$field, row_old, row_new, handle);)*
            }

            fn holds_row(
                &self,
                row: &$row,
                handle: $crate::RecordHandle,
            ) -> ::core::result::Result<(), &'static str> {
                $($crate::__ops::holds(&self.$field, row, handle)?;)*
                ::core::result::Result::Ok(())
            }

            fn check_len(
                &self,
                expected: usize,
            ) -> ::core::result::Result<(), (&'static str, usize)> {
                $($crate::__ops::check_len::<$row, _>(&self.$field, expected)?;)*
                ::core::result::Result::Ok(())
            }

            fn index_info(&self) -> ::std::vec::Vec<$crate::IndexInfo> {
                ::std::vec![$($crate::__ops::info::<$row, _>(&self.$field)),*]
            }

            fn clear(&mut self) {
                $($crate::__ops::clear::<$row, _>(&mut self.$field);)*
            }

            fn heap_size(&self) -> usize {
                0 $(+ $crate::__ops::heap_size::<$row, _>(&self.$field))*
            }
        }
    };
}
