//! Product table: filtering, sorting, pagination and pending row quantities

mod pagination;
mod query;
mod store;

pub use pagination::{PAGE_SIZE_PRESETS, PageSize, PageWindow, Pagination, total_pages};
pub use query::{ProductFilters, SortDirection, SortKey, SortSpec, derive_view, sort_products};
pub use store::{CatalogFilter, QuantityChange};
