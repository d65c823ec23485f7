use std::fmt::{self, Debug, Formatter};

use crate::select::{Order, QueryParams};

type Filter<'a, Row> = Box<dyn Fn(&Row) -> bool + 'a>;

/// Lazy query over the rows of one index.
///
/// `Order::Asc` keeps the order of the index, `Order::Desc` walks it back to
/// front. Filters run first, then ordering, then `offset` and `limit`.
pub struct SelectQueryBuilder<'a, Row, I>
where
    I: Iterator<Item = &'a Row>,
    Row: 'a,
{
    pub params: QueryParams,
    filters: Vec<Filter<'a, Row>>,
    iter: I,
}

impl<'a, Row, I> SelectQueryBuilder<'a, Row, I>
where
    I: Iterator<Item = &'a Row>,
    Row: 'a,
{
    pub fn new(iter: I) -> Self {
        Self {
            params: QueryParams::default(),
            filters: vec![],
            iter,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.params.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.params.offset = Some(offset);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.params.order = order;
        self
    }

    pub fn where_by<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + 'a,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    pub fn execute(self) -> Vec<&'a Row> {
        let Self {
            params,
            filters,
            iter,
        } = self;
        let offset = params.offset.unwrap_or(0);
        let limit = params.limit.unwrap_or(usize::MAX);
        let rows = iter.filter(|r| filters.iter().all(|f| f(*r)));
        match params.order {
            Order::Asc => rows.skip(offset).take(limit).collect(),
            Order::Desc => {
                let mut rows: Vec<&'a Row> = rows.collect();
                rows.reverse();
                rows.into_iter().skip(offset).take(limit).collect()
            }
        }
    }

    pub fn execute_cloned(self) -> Vec<Row>
    where
        Row: Clone,
    {
        self.execute().into_iter().cloned().collect()
    }
}

impl<'a, Row, I> Debug for SelectQueryBuilder<'a, Row, I>
where
    I: Iterator<Item = &'a Row>,
    Row: 'a,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectQueryBuilder")
            .field("params", &self.params)
            .field("filters", &self.filters.len())
            .finish()
    }
}
