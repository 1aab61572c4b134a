//! Quick order popover
//!
//! Row-level flow started from a product's cart button:
//!
//! ```text
//! Idle -> QuantitySelect -> add_to_cart -> Idle   (cart upsert)
//!                        -> order -> ExpressForm -> send -> Idle   (express order)
//! close/cancel from any state -> Idle, no effect
//! ```
//!
//! The machine performs no I/O; transitions hand back an effect for the
//! session to apply.

use shared::money;
use shared::{ContactFields, ProductRecord};
use tracing::debug;

use crate::cart_store::{CartEvent, clamp_qty};
use crate::order_text;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum QuickOrderState {
    #[default]
    Idle,
    QuantitySelect {
        product: ProductRecord,
        qty: u32,
    },
    ExpressForm {
        product: ProductRecord,
        qty: u32,
        contact: ContactFields,
    },
}

/// Single-product order ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressOrder {
    pub product: ProductRecord,
    pub qty: u32,
    pub contact: ContactFields,
    pub text: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuickOrderEffect {
    /// Always an `Upsert`
    AddToCart(CartEvent),
    Send(ExpressOrder),
}

#[derive(Debug, Default)]
pub struct QuickOrder {
    state: QuickOrderState,
}

impl QuickOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QuickOrderState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, QuickOrderState::Idle)
    }

    /// Code of the row the popover is attached to
    pub fn active_code(&self) -> Option<&str> {
        match &self.state {
            QuickOrderState::Idle => None,
            QuickOrderState::QuantitySelect { product, .. }
            | QuickOrderState::ExpressForm { product, .. } => Some(&product.code),
        }
    }

    pub fn qty(&self) -> Option<u32> {
        match &self.state {
            QuickOrderState::Idle => None,
            QuickOrderState::QuantitySelect { qty, .. }
            | QuickOrderState::ExpressForm { qty, .. } => Some(*qty),
        }
    }

    /// Cart button clicked: start with the row's pending quantity or 1
    pub fn open(&mut self, product: ProductRecord, pending: Option<u32>) {
        let qty = pending.filter(|q| *q > 0).unwrap_or(1);
        debug!(code = %product.code, qty, "Quick order opened");
        self.state = QuickOrderState::QuantitySelect { product, qty };
    }

    pub fn increment(&mut self) {
        if let QuickOrderState::QuantitySelect { qty, .. } = &mut self.state {
            *qty = qty.saturating_add(1);
        }
    }

    /// Bounded below at 1
    pub fn decrement(&mut self) {
        if let QuickOrderState::QuantitySelect { qty, .. } = &mut self.state {
            *qty = qty.saturating_sub(1).max(1);
        }
    }

    /// Typed quantity; non-positive or unparsable becomes 1
    pub fn set_qty(&mut self, raw: &str) {
        if let QuickOrderState::QuantitySelect { qty, .. } = &mut self.state {
            *qty = money::parse_quantity(raw)
                .filter(|q| *q > 0)
                .map(clamp_qty)
                .unwrap_or(1);
        }
    }

    /// QuantitySelect -> AddedToCart -> Idle
    pub fn add_to_cart(&mut self) -> Option<QuickOrderEffect> {
        match std::mem::take(&mut self.state) {
            QuickOrderState::QuantitySelect { product, qty } => {
                Some(QuickOrderEffect::AddToCart(CartEvent::Upsert { product, qty }))
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// QuantitySelect -> ExpressForm
    pub fn order(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            QuickOrderState::QuantitySelect { product, qty } => QuickOrderState::ExpressForm {
                product,
                qty,
                contact: ContactFields::default(),
            },
            other => other,
        };
    }

    /// Contact fields while the express form is shown
    pub fn contact_mut(&mut self) -> Option<&mut ContactFields> {
        match &mut self.state {
            QuickOrderState::ExpressForm { contact, .. } => Some(contact),
            _ => None,
        }
    }

    /// ExpressForm -> Sent -> Idle
    pub fn send(&mut self) -> Option<QuickOrderEffect> {
        match std::mem::take(&mut self.state) {
            QuickOrderState::ExpressForm {
                product,
                qty,
                contact,
            } => {
                let text = order_text::format_express_order(&product, qty, &contact);
                let file_name = format!("order_{}.txt", product.code);
                Some(QuickOrderEffect::Send(ExpressOrder {
                    product,
                    qty,
                    contact,
                    text,
                    file_name,
                }))
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Close or cancel from any state
    pub fn close(&mut self) {
        self.state = QuickOrderState::Idle;
    }
}
