//! Cart store
//!
//! Ordered list of cart lines keyed by product code, plus the checkbox
//! selection used by bulk actions. Line order is insertion order and is what
//! the cart table and the order export show.
//!
//! Two quantity rules coexist on purpose:
//! - [`CartStore::upsert`] (driven by the product table) removes the line when
//!   the quantity is not positive
//! - [`CartStore::set_qty`] (the cart's own quantity field) clamps to 1, since
//!   removal from the cart view is a separate explicit action

use std::collections::HashSet;

use rust_decimal::Decimal;
use shared::money;
use shared::{CartLine, ProductRecord};
use tracing::{debug, warn};

/// Change requested by a quantity edit in the product table
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// Insert or replace the line for `product.code`; `qty` is always positive
    Upsert { product: ProductRecord, qty: u32 },
    /// Drop the line for `code`
    Remove { code: String },
}

/// Narrow a parsed quantity to a line quantity, clamping out-of-range values
pub(crate) fn clamp_qty(qty: i64) -> u32 {
    u32::try_from(qty).unwrap_or_else(|_| {
        let clamped = if qty < 0 { 0 } else { u32::MAX };
        warn!(qty, clamped, "Quantity out of range, clamped");
        clamped
    })
}

/// Cart state
#[derive(Debug, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
    /// Always a subset of the codes in `lines`
    selected: HashSet<String>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Line mutation ====================

    /// Insert or update the line for `product.code`.
    ///
    /// An existing line keeps its position and gets the new quantity and a
    /// fresh product snapshot. A non-positive quantity removes the line.
    pub fn upsert(&mut self, product: ProductRecord, qty: i64) {
        if qty <= 0 {
            self.remove(&product.code);
            return;
        }
        let qty = clamp_qty(qty);

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.code == product.code) {
            line.product = product;
            line.qty = qty;
            return;
        }

        debug!(code = %product.code, qty, "Cart line added");
        self.lines.push(CartLine::new(product, qty));
    }

    /// Drop the line for `code` (and its selection) if present
    pub fn remove(&mut self, code: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.code() != code);
        self.selected.remove(code);
        if self.lines.len() != before {
            debug!(code, "Cart line removed");
        }
    }

    pub fn apply(&mut self, event: CartEvent) {
        match event {
            CartEvent::Upsert { product, qty } => self.upsert(product, i64::from(qty)),
            CartEvent::Remove { code } => self.remove(&code),
        }
    }

    /// Edit a quantity from the cart view; below 1 or unparsable becomes 1
    pub fn set_qty(&mut self, code: &str, raw: &str) {
        let qty = money::parse_quantity(raw)
            .filter(|q| *q >= 1)
            .map(clamp_qty)
            .unwrap_or(1);
        if let Some(line) = self.lines.iter_mut().find(|l| l.code() == code) {
            line.qty = qty;
        }
    }

    // ==================== Selection ====================

    /// Check or uncheck one line; codes not in the cart are ignored
    pub fn select(&mut self, code: &str, checked: bool) {
        if !checked {
            self.selected.remove(code);
        } else if self.line(code).is_some() {
            self.selected.insert(code.to_string());
        }
    }

    pub fn select_all(&mut self, checked: bool) {
        self.selected = if checked {
            self.lines.iter().map(|l| l.code().to_string()).collect()
        } else {
            HashSet::new()
        };
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.contains(code)
    }

    pub fn selected_codes(&self) -> &HashSet<String> {
        &self.selected
    }

    /// Header checkbox state
    pub fn is_all_selected(&self) -> bool {
        !self.lines.is_empty() && self.selected.len() == self.lines.len()
    }

    /// Selected lines in cart order
    pub fn selected_lines(&self) -> Vec<CartLine> {
        self.lines
            .iter()
            .filter(|l| self.selected.contains(l.code()))
            .cloned()
            .collect()
    }

    pub fn remove_selected(&mut self) {
        let selected = std::mem::take(&mut self.selected);
        self.lines.retain(|l| !selected.contains(l.code()));
        debug!(removed = selected.len(), "Selected cart lines removed");
    }

    pub fn remove_all(&mut self) {
        self.lines.clear();
        self.selected.clear();
    }

    // ==================== Queries ====================

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, code: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.code() == code)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_total(&self, code: &str) -> Option<Decimal> {
        self.line(code).map(CartLine::line_total)
    }

    /// Total number of units
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.qty)).sum()
    }

    /// Sum of `price * qty` over all lines, saturating at `Decimal::MAX`
    pub fn sum(&self) -> Decimal {
        money::sum_money(self.lines.iter().map(CartLine::line_total))
    }
}
