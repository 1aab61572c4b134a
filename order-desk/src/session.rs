//! Order desk session
//!
//! Owns every store and turns host events into store transitions. Each method
//! runs to completion; the only asynchronous step is product loading, which is
//! split into `request_products` and `complete_products` so a load that was
//! superseded while in flight can be recognised and dropped.

use std::collections::{BTreeSet, HashMap};

use shared::{ContactFields, NodeId, ProductRecord, RawCategory, Theme};
use tracing::{debug, info, warn};

use crate::cart_store::{CartEvent, CartStore};
use crate::catalog::CatalogFilter;
use crate::category_store::{CategoryStore, GroupIndex};
use crate::error::DeskResult;
use crate::order_text;
use crate::preferences::UiPreferences;
use crate::quick_order::{ExpressOrder, QuickOrder, QuickOrderEffect};
use crate::sources::CatalogSource;

/// Monotonically increasing product load id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Product load issued by the session, to be completed by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRequest {
    pub ticket: LoadTicket,
    /// Group restriction; `None` is the whole catalog
    pub groups: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { rows: usize },
    /// Stale ticket or failed load; state untouched
    Discarded,
}

pub struct OrderDesk {
    categories: CategoryStore,
    catalog: CatalogFilter,
    cart: CartStore,
    quick: QuickOrder,
    /// Last successfully loaded product list (whole catalog)
    products: Vec<ProductRecord>,
    index: GroupIndex,
    next_ticket: u64,
    in_flight: Option<ProductRequest>,
    preferences: UiPreferences,
}

impl OrderDesk {
    pub fn new(preferences: UiPreferences) -> Self {
        Self {
            categories: CategoryStore::new(),
            catalog: CatalogFilter::new(),
            cart: CartStore::new(),
            quick: QuickOrder::new(),
            products: Vec::new(),
            index: GroupIndex::default(),
            next_ticket: 0,
            in_flight: None,
            preferences,
        }
    }

    // ==================== Store access ====================

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut CategoryStore {
        &mut self.categories
    }

    pub fn catalog(&self) -> &CatalogFilter {
        &self.catalog
    }

    /// Filters, sort and paging; source changes go through the load methods
    pub fn catalog_mut(&mut self) -> &mut CatalogFilter {
        &mut self.catalog
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    pub fn quick_order(&self) -> &QuickOrder {
        &self.quick
    }

    pub fn quick_order_mut(&mut self) -> &mut QuickOrder {
        &mut self.quick
    }

    pub fn preferences(&self) -> &UiPreferences {
        &self.preferences
    }

    // ==================== Categories ====================

    /// Install the category tree; a failed load leaves an empty tree
    pub fn load_categories(&mut self, result: DeskResult<Vec<RawCategory>>) {
        match result {
            Ok(raw) => self.categories.load(raw),
            Err(e) => {
                warn!(error = %e, "Category load failed, using empty tree");
                self.categories.load(Vec::new());
            }
        }
    }

    /// Product count per node (whole subtree), from the last loaded catalog
    pub fn group_counts(&self) -> HashMap<NodeId, usize> {
        self.categories.product_counts(&self.index)
    }

    // ==================== Product loading ====================

    /// Tree node clicked: select it and request its subtree's products.
    ///
    /// Unknown ids change nothing and issue no request.
    pub fn on_group_select(&mut self, id: &NodeId) -> Option<ProductRequest> {
        let codes = self.categories.select(id)?;
        Some(self.request_products(Some(codes)))
    }

    /// "Show all products".
    ///
    /// Issues no request when the whole catalog is already shown (no group
    /// selected and nothing loading), so pending quantities survive.
    pub fn show_all(&mut self) -> Option<ProductRequest> {
        if self.categories.selected().is_none() && !self.is_loading() {
            debug!("Whole catalog already shown");
            return None;
        }
        self.categories.clear_selection();
        Some(self.request_products(None))
    }

    /// Issue a new load and switch the table into its loading state.
    ///
    /// The view, pending quantities and paging are reset here, in the same
    /// transition that supersedes any earlier request.
    pub fn request_products(&mut self, groups: Option<BTreeSet<String>>) -> ProductRequest {
        self.next_ticket += 1;
        let request = ProductRequest {
            ticket: LoadTicket(self.next_ticket),
            groups,
        };
        if let Some(previous) = &self.in_flight {
            debug!(
                superseded = previous.ticket.id(),
                ticket = request.ticket.id(),
                "Product load superseded"
            );
        }
        self.quick.close();
        self.catalog.clear_source();
        self.in_flight = Some(request.clone());
        request
    }

    /// Apply a finished load if it is still the latest request
    pub fn complete_products(
        &mut self,
        ticket: LoadTicket,
        result: DeskResult<Vec<ProductRecord>>,
    ) -> LoadOutcome {
        let Some(request) = self.in_flight.take_if(|r| r.ticket == ticket) else {
            debug!(ticket = ticket.id(), "Stale product load discarded");
            return LoadOutcome::Discarded;
        };

        let products = match result {
            Ok(products) => products,
            Err(e) => {
                warn!(ticket = ticket.id(), error = %e, "Product load failed");
                return LoadOutcome::Discarded;
            }
        };

        self.index = GroupIndex::from_products(&products);
        self.products = products;
        self.catalog.set_source(&self.products, request.groups.as_ref());

        let rows = self.catalog.view().len();
        info!(ticket = ticket.id(), rows, "Products loaded");
        LoadOutcome::Applied { rows }
    }

    /// Request and await products in one step
    pub async fn load_products<S>(
        &mut self,
        source: &S,
        groups: Option<BTreeSet<String>>,
    ) -> LoadOutcome
    where
        S: CatalogSource + ?Sized,
    {
        let request = self.request_products(groups);
        let result = source.load_products().await;
        self.complete_products(request.ticket, result)
    }

    /// Load the category tree and the whole product list from `source`
    pub async fn open<S>(&mut self, source: &S) -> LoadOutcome
    where
        S: CatalogSource + ?Sized,
    {
        let categories = source.load_categories().await;
        self.load_categories(categories);
        self.load_products(source, None).await
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Last loaded catalog, unrestricted
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    // ==================== Host callbacks ====================

    /// Quantity typed in a product row; returns the echoed text
    pub fn on_quantity_change(&mut self, code: &str, raw: &str) -> Option<String> {
        let change = self.catalog.set_quantity(code, raw)?;
        self.cart.apply(change.event);
        Some(change.echoed)
    }

    /// Records of the derived view (every page) for the host to encode
    pub fn on_export(&self) -> Vec<ProductRecord> {
        self.catalog.export_records()
    }

    /// Order text for the whole cart
    pub fn on_order_submit(&self, contact: &ContactFields) -> String {
        order_text::format_order(self.cart.lines(), contact)
    }

    /// Order text for the checked cart lines only
    pub fn on_order_submit_selected(&self, contact: &ContactFields) -> String {
        order_text::format_order(&self.cart.selected_lines(), contact)
    }

    // ==================== Quick order ====================

    /// Cart button on a product row; ignored for rows not in the view
    pub fn open_quick_order(&mut self, code: &str) -> bool {
        let Some(product) = self.catalog.row(code).cloned() else {
            return false;
        };
        let pending = self.catalog.pending_value(code);
        self.quick.open(product, pending);
        true
    }

    /// "Add to cart" in the quick order popover
    pub fn quick_add_to_cart(&mut self) -> bool {
        let Some(QuickOrderEffect::AddToCart(event)) = self.quick.add_to_cart() else {
            return false;
        };
        if let CartEvent::Upsert { product, qty } = &event {
            self.catalog.echo_quantity(&product.code, *qty);
        }
        self.cart.apply(event);
        true
    }

    /// "Send" in the express form; the host delivers the returned order
    pub fn quick_send(&mut self) -> Option<ExpressOrder> {
        match self.quick.send()? {
            QuickOrderEffect::Send(order) => Some(order),
            QuickOrderEffect::AddToCart(_) => None,
        }
    }

    // ==================== Preferences ====================

    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.preferences.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.preferences.toggle_theme()
    }
}

impl Default for OrderDesk {
    fn default() -> Self {
        Self::new(UiPreferences::default())
    }
}
