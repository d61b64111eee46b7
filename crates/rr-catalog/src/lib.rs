//! Product catalog search and ordering.
//!
//! [`filter_and_sort`] is a pure function: it never mutates its input and
//! holds no state between calls, so the same arguments always produce the
//! same sequence.

pub mod catalog;
pub mod error;
pub mod filter;

pub use catalog::{demo_catalog, find, load_catalog, parse_catalog};
pub use error::{CatalogError, CatalogResult};
pub use filter::{filter_and_sort, matches_query, FilterState};
