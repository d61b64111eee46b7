use serde::{Deserialize, Serialize};

use rr_types::{Product, SortMode};

/// Search box and sort selector state. Transient; never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub sort: SortMode,
}

impl FilterState {
    pub fn new(query: impl Into<String>, sort: SortMode) -> Self {
        Self {
            query: query.into(),
            sort,
        }
    }

    /// Run [`filter_and_sort`] with this state.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        filter_and_sort(products, &self.query, self.sort)
    }
}

/// Case-insensitive substring match against name or description.
/// An empty query matches every product.
pub fn matches_query(product: &Product, query_lower: &str) -> bool {
    query_lower.is_empty()
        || product.name.to_lowercase().contains(query_lower)
        || product.description.to_lowercase().contains(query_lower)
}

/// Filter `products` by `query` and order the survivors by `sort`.
///
/// - `Featured`: input order.
/// - `PriceAsc` / `PriceDesc`: stable sort on price only; equal prices keep
///   their input order.
/// - `New`: the filtered sequence reversed.
pub fn filter_and_sort(products: &[Product], query: &str, sort: SortMode) -> Vec<Product> {
    let query = query.to_lowercase();
    let mut out: Vec<Product> = products
        .iter()
        .filter(|p| matches_query(p, &query))
        .cloned()
        .collect();

    match sort {
        SortMode::Featured => {}
        SortMode::PriceAsc => out.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortMode::PriceDesc => out.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortMode::New => out.reverse(),
    }
    out
}
