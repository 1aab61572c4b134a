//! Catalog filter store
//!
//! Holds the products of the current group selection, the table filters, the
//! sort, the pagination and the per-row pending quantities. The derived view
//! is recomputed eagerly on every change of source, filters or sort.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use shared::ProductRecord;
use shared::money;
use tracing::debug;

use super::pagination::{PageSize, PageWindow, Pagination};
use super::query::{ProductFilters, SortDirection, SortKey, SortSpec, derive_view};
use crate::cart_store::{CartEvent, clamp_qty};

/// Result of a quantity edit in the product table
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityChange {
    /// Value echoed back into the row's input, exactly as typed
    pub echoed: String,
    /// What the cart should do with it
    pub event: CartEvent,
}

#[derive(Debug, Default)]
pub struct CatalogFilter {
    source: Vec<ProductRecord>,
    filters: ProductFilters,
    sort: SortSpec,
    view: Vec<ProductRecord>,
    /// code -> quantity as typed; only codes present in `view`
    pending: HashMap<String, String>,
    pagination: Pagination,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Source ====================

    /// Switch to a new product source.
    ///
    /// `groups == None` (or an empty set) means the whole catalog. Pending
    /// quantities are dropped and paging returns to page 1; filters and sort
    /// are kept.
    pub fn set_source(&mut self, catalog: &[ProductRecord], groups: Option<&BTreeSet<String>>) {
        self.source = match groups {
            Some(groups) if !groups.is_empty() => catalog
                .iter()
                .filter(|p| groups.contains(&p.group_code))
                .cloned()
                .collect(),
            _ => catalog.to_vec(),
        };
        self.pending.clear();
        debug!(
            products = self.source.len(),
            restricted = groups.is_some_and(|g| !g.is_empty()),
            "Catalog source switched"
        );
        self.rederive();
    }

    /// Empty the table while a new source is being fetched
    pub fn clear_source(&mut self) {
        self.source.clear();
        self.pending.clear();
        self.rederive();
    }

    pub fn source(&self) -> &[ProductRecord] {
        &self.source
    }

    // ==================== Filters and sort ====================

    pub fn filters(&self) -> &ProductFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: ProductFilters) {
        self.filters = filters;
        self.rederive();
    }

    pub fn set_name_query(&mut self, value: impl Into<String>) {
        self.filters.name = value.into();
        self.rederive();
    }

    pub fn set_article_query(&mut self, value: impl Into<String>) {
        self.filters.article = value.into();
        self.rederive();
    }

    pub fn set_manufacturer_query(&mut self, value: impl Into<String>) {
        self.filters.manufacturer = value.into();
        self.rederive();
    }

    pub fn set_price_min(&mut self, value: impl Into<String>) {
        self.filters.price_min = value.into();
        self.rederive();
    }

    pub fn set_price_max(&mut self, value: impl Into<String>) {
        self.filters.price_max = value.into();
        self.rederive();
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(ProductFilters::default());
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.rederive();
    }

    /// Column header click: same column flips direction, a new column starts ascending
    pub fn toggle_sort(&mut self, key: SortKey) {
        let sort = if self.sort.key == key {
            SortSpec::new(key, self.sort.direction.flip())
        } else {
            SortSpec::new(key, SortDirection::Asc)
        };
        self.set_sort(sort);
    }

    fn rederive(&mut self) {
        self.view = derive_view(&self.source, &self.filters, self.sort);

        let view = &self.view;
        self.pending
            .retain(|code, qty| !qty.is_empty() && view.iter().any(|p| &p.code == code));
        self.pagination.reset_page();

        debug!(
            rows = self.view.len(),
            source = self.source.len(),
            pending = self.pending.len(),
            "Product view derived"
        );
    }

    // ==================== View ====================

    /// All rows after filtering and sorting (every page)
    pub fn view(&self) -> &[ProductRecord] {
        &self.view
    }

    pub fn row(&self, code: &str) -> Option<&ProductRecord> {
        self.view.iter().find(|p| p.code == code)
    }

    /// Serializable copy of the derived view for export
    pub fn export_records(&self) -> Vec<ProductRecord> {
        self.view.clone()
    }

    // ==================== Pending quantities ====================

    /// Quantity edit in a table row.
    ///
    /// The raw text is echoed into the pending map whatever it holds; the cart
    /// gets an upsert for a positive number and a remove otherwise. Rows not in
    /// the current view are ignored.
    pub fn set_quantity(&mut self, code: &str, raw: &str) -> Option<QuantityChange> {
        let product = self.row(code)?.clone();
        self.pending.insert(code.to_string(), raw.to_string());

        let event = match money::parse_quantity(raw) {
            Some(qty) if qty > 0 => CartEvent::Upsert {
                product,
                qty: clamp_qty(qty),
            },
            _ => CartEvent::Remove {
                code: code.to_string(),
            },
        };
        Some(QuantityChange {
            echoed: raw.to_string(),
            event,
        })
    }

    /// Write a committed quantity back into a row (quick order "add to cart")
    pub fn echo_quantity(&mut self, code: &str, qty: u32) {
        if self.row(code).is_some() {
            self.pending.insert(code.to_string(), qty.to_string());
        }
    }

    pub fn pending_qty(&self, code: &str) -> Option<&str> {
        self.pending.get(code).map(String::as_str)
    }

    /// Pending quantity as a positive number
    pub fn pending_value(&self, code: &str) -> Option<u32> {
        self.pending_qty(code)
            .and_then(money::parse_quantity)
            .filter(|q| *q > 0)
            .and_then(|q| u32::try_from(q).ok())
    }

    pub fn pending(&self) -> &HashMap<String, String> {
        &self.pending
    }

    /// Row sum column: pending quantity times normalized price
    pub fn row_total(&self, code: &str) -> Option<Decimal> {
        let qty = self.pending_value(code)?;
        let row = self.row(code)?;
        Some(money::line_total(row.amount(), qty))
    }

    // ==================== Pagination ====================

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn current_page(&self) -> PageWindow<'_, ProductRecord> {
        self.pagination.window(&self.view)
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.view.len())
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.pagination.set_preset(size);
    }

    pub fn set_custom_page_size(&mut self, raw: impl Into<String>) {
        self.pagination.set_custom(raw);
    }

    pub fn type_page(&mut self, raw: &str) {
        self.pagination.type_page(raw);
    }

    pub fn commit_page(&mut self, raw: &str) {
        self.pagination.commit_page(raw, self.view.len());
    }

    pub fn first_page(&mut self) {
        self.pagination.first_page();
    }

    pub fn prev_page(&mut self) {
        self.pagination.prev_page(self.view.len());
    }

    pub fn next_page(&mut self) {
        self.pagination.next_page(self.view.len());
    }

    pub fn last_page(&mut self) {
        self.pagination.last_page(self.view.len());
    }
}
