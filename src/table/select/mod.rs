mod query;

pub use query::SelectQueryBuilder;

pub use crate::index::Order;

#[derive(Debug, Clone, Copy)]
pub struct QueryParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub order: Order,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            limit: None,
            offset: None,
            order: Order::Asc,
        }
    }
}
