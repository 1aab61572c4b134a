//! Cart line model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::ProductRecord;
use crate::money;

/// One aggregated cart entry, unique per product code.
///
/// Carries a snapshot of the product taken when the line was last upserted.
/// `qty` is always at least 1; a line with no quantity does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: ProductRecord,
    pub qty: u32,
}

impl CartLine {
    pub fn new(product: ProductRecord, qty: u32) -> Self {
        Self { product, qty }
    }

    pub fn code(&self) -> &str {
        &self.product.code
    }

    /// Normalized unit price
    pub fn unit_price(&self) -> Option<Decimal> {
        self.product.amount()
    }

    /// `price * qty` with the shared normalization (unparsable price counts as 0)
    pub fn line_total(&self) -> Decimal {
        money::line_total(self.unit_price(), self.qty)
    }
}
